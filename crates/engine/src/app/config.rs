use std::env;

use tracing::warn;

use super::audio::AudioSettings;
use super::rendering::Viewport;

pub const MASTER_VOLUME_ENV_VAR: &str = "TACTICS_MASTER_VOLUME";
pub const SFX_VOLUME_ENV_VAR: &str = "TACTICS_SFX_VOLUME";
pub const SCALE_ENV_VAR: &str = "TACTICS_DISPLAY_SCALE";

pub const DEFAULT_DISPLAY_SCALE: f32 = 3.0;
pub const DEFAULT_SCROLL_MARGIN_TILES: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    pub viewport: Viewport,
    pub display_scale: f32,
    pub scroll_margin_tiles: i32,
    pub audio: AudioSettings,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            display_scale: DEFAULT_DISPLAY_SCALE,
            scroll_margin_tiles: DEFAULT_SCROLL_MARGIN_TILES,
            audio: AudioSettings::default(),
        }
    }
}

impl MapConfig {
    /// Defaults with any `TACTICS_*` overrides applied. Bad values warn and keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let master = read_env_override(MASTER_VOLUME_ENV_VAR, defaults.audio.master_volume);
        let sfx = read_env_override(SFX_VOLUME_ENV_VAR, defaults.audio.sfx_volume);
        let display_scale = read_env_override(SCALE_ENV_VAR, defaults.display_scale);
        Self {
            display_scale: sanitize_scale(display_scale),
            audio: AudioSettings::new(master, sfx),
            ..defaults
        }
    }

    pub fn with_audio(mut self, audio: AudioSettings) -> Self {
        self.audio = audio;
        self
    }
}

fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        warn!(scale, fallback = DEFAULT_DISPLAY_SCALE, "display_scale_invalid_using_default");
        DEFAULT_DISPLAY_SCALE
    }
}

fn read_env_override<T>(env_var: &'static str, fallback: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match env::var(env_var) {
        Ok(value) => parse_override(env_var, &value, fallback),
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var,
                error = %err,
                "unable to read config env var; falling back to default"
            );
            fallback
        }
    }
}

fn parse_override<T>(env_var: &'static str, value: &str, fallback: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match value.trim().parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(
                env_var,
                value,
                "invalid config env var value; falling back to default"
            );
            fallback
        }
    }
}
