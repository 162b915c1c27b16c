mod transform;

pub use transform::{scaled_tile_size, screen_to_tile, tile_to_screen_px, Viewport};
