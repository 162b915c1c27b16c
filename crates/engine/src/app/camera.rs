use serde::Serialize;

use super::grid::{GridBounds, TileCoord};
use super::rendering::{tile_to_screen_px, Viewport};

/// Pixel-space offset of the viewport's top-left corner over the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GridCamera {
    pub x: i32,
    pub y: i32,
}

/// Inclusive upper limits for the camera. Maps smaller than the viewport collapse to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraBounds {
    pub max_x: i32,
    pub max_y: i32,
}

impl CameraBounds {
    pub fn for_map(grid: GridBounds, tile_px: i32, viewport: Viewport) -> Self {
        let map_width_px = grid.width as i64 * tile_px as i64;
        let map_height_px = grid.height as i64 * tile_px as i64;
        Self {
            max_x: clamp_extent(map_width_px - viewport.width as i64),
            max_y: clamp_extent(map_height_px - viewport.height as i64),
        }
    }
}

fn clamp_extent(value: i64) -> i32 {
    value.clamp(0, i32::MAX as i64) as i32
}

impl GridCamera {
    pub fn move_by(&mut self, dx: i32, dy: i32, bounds: &CameraBounds) {
        self.x = self.x.saturating_add(dx).clamp(0, bounds.max_x);
        self.y = self.y.saturating_add(dy).clamp(0, bounds.max_y);
    }

    /// Scrolls so `cursor` stays at least `margin_px` away from every viewport edge.
    /// Returns true when the camera position changed.
    pub fn follow_cursor(
        &mut self,
        cursor: TileCoord,
        tile_px: i32,
        viewport: Viewport,
        margin_px: i32,
        bounds: &CameraBounds,
    ) -> bool {
        let before = *self;
        let (screen_x, _) = tile_to_screen_px(cursor, self, tile_px);
        let far_x = far_edge(viewport.width, margin_px, tile_px);
        if screen_x < margin_px {
            self.move_by(screen_x.saturating_sub(margin_px), 0, bounds);
        } else if screen_x > far_x {
            self.move_by(screen_x.saturating_sub(far_x), 0, bounds);
        }

        let (_, screen_y) = tile_to_screen_px(cursor, self, tile_px);
        let far_y = far_edge(viewport.height, margin_px, tile_px);
        if screen_y < margin_px {
            self.move_by(0, screen_y.saturating_sub(margin_px), bounds);
        } else if screen_y > far_y {
            self.move_by(0, screen_y.saturating_sub(far_y), bounds);
        }

        *self != before
    }
}

/// Last on-screen pixel a tile may start at before the camera has to scroll.
fn far_edge(viewport_extent: u32, margin_px: i32, tile_px: i32) -> i32 {
    let edge = viewport_extent as i64 - margin_px as i64 - tile_px as i64;
    edge.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
