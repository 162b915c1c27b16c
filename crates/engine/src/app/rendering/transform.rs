use crate::app::{GridCamera, TileCoord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// On-screen edge length of one tile. Truncates like the blitter does.
pub fn scaled_tile_size(tile_size: u32, scale: f32) -> i32 {
    if !scale.is_finite() || scale <= 0.0 {
        return tile_size as i32;
    }
    (tile_size as f32 * scale) as i32
}

/// Top-left pixel of `tile` on screen. Saturates at the `i32` range.
pub fn tile_to_screen_px(tile: TileCoord, camera: &GridCamera, tile_px: i32) -> (i32, i32) {
    (
        tile.x.saturating_mul(tile_px).saturating_sub(camera.x),
        tile.y.saturating_mul(tile_px).saturating_sub(camera.y),
    )
}

/// Tile under a screen pixel. A non-positive tile size maps everything to the origin.
pub fn screen_to_tile(screen_px: (i32, i32), camera: &GridCamera, tile_px: i32) -> TileCoord {
    if tile_px <= 0 {
        return TileCoord::default();
    }
    TileCoord {
        x: screen_px.0.saturating_add(camera.x).div_euclid(tile_px),
        y: screen_px.1.saturating_add(camera.y).div_euclid(tile_px),
    }
}
