mod audio;
mod camera;
mod config;
mod grid;
mod input;
mod rendering;

pub use audio::{AudioCue, AudioCueSink, AudioSettings, NullAudio};
pub use camera::{CameraBounds, GridCamera};
pub use config::{
    MapConfig, DEFAULT_DISPLAY_SCALE, DEFAULT_SCROLL_MARGIN_TILES, MASTER_VOLUME_ENV_VAR,
    SCALE_ENV_VAR, SFX_VOLUME_ENV_VAR,
};
pub use grid::{GridBounds, TileCoord};
pub use input::{key_code_from_name, map_key_code, Direction, MapInput};
pub use rendering::{scaled_tile_size, screen_to_tile, tile_to_screen_px, Viewport};
