use thiserror::Error;

use crate::app::{GridBounds, TileCoord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLayer {
    pub name: String,
    pub visible: bool,
    pub tiles: Vec<i32>,
}

/// Layered tile grid. The first layer is the base layer and must cover the
/// whole grid; later layers are decorative and may be sparse or oversized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tilemap {
    width: u32,
    height: u32,
    layers: Vec<MapLayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilemapError {
    #[error("base layer '{layer}' tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch {
        layer: String,
        expected: usize,
        actual: usize,
    },
}

impl Tilemap {
    pub fn new(width: u32, height: u32, layers: Vec<MapLayer>) -> Result<Self, TilemapError> {
        if let Some(base) = layers.first() {
            let expected = width as usize * height as usize;
            let actual = base.tiles.len();
            if expected != actual {
                return Err(TilemapError::TileCountMismatch {
                    layer: base.name.clone(),
                    expected,
                    actual,
                });
            }
        }
        Ok(Self {
            width,
            height,
            layers,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.width, self.height)
    }

    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    /// Tile id of the base layer at `tile`.
    pub fn tile_at(&self, tile: TileCoord) -> Option<i32> {
        let index = self.bounds().index_of(tile)?;
        self.layers.first()?.tiles.get(index).copied()
    }

    /// Ids of every visible layer at `tile`, bottom to top; missing entries are skipped.
    pub fn visible_stack_at(&self, tile: TileCoord) -> Vec<i32> {
        let Some(index) = self.bounds().index_of(tile) else {
            return Vec::new();
        };
        self.layers
            .iter()
            .filter(|layer| layer.visible)
            .filter_map(|layer| layer.tiles.get(index).copied())
            .collect()
    }
}
