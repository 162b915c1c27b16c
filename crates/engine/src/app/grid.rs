use serde::Serialize;

/// Grid coordinate in tiles. Row-major: `y` selects the row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn offset(self, dx: i32, dy: i32) -> TileCoord {
        TileCoord {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridBounds {
    pub width: u32,
    pub height: u32,
}

impl GridBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        tile.x >= 0
            && tile.y >= 0
            && (tile.x as u32) < self.width
            && (tile.y as u32) < self.height
    }

    /// Clamps into `[0, width) x [0, height)`. An empty grid clamps to the origin.
    pub fn clamp(&self, tile: TileCoord) -> TileCoord {
        TileCoord {
            x: clamp_axis(tile.x, self.width),
            y: clamp_axis(tile.y, self.height),
        }
    }

    pub fn index_of(&self, tile: TileCoord) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }
        Some(tile.y as usize * self.width as usize + tile.x as usize)
    }

    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

fn clamp_axis(value: i32, extent: u32) -> i32 {
    let max = i32::try_from(extent).unwrap_or(i32::MAX).saturating_sub(1).max(0);
    value.clamp(0, max)
}
