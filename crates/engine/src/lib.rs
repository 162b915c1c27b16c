use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;

pub use app::{
    key_code_from_name, map_key_code, scaled_tile_size, screen_to_tile, tile_to_screen_px,
    AudioCue, AudioCueSink, AudioSettings, CameraBounds, Direction, GridBounds, GridCamera,
    MapConfig, MapInput, NullAudio, TileCoord, Viewport, DEFAULT_DISPLAY_SCALE,
    DEFAULT_SCROLL_MARGIN_TILES, MASTER_VOLUME_ENV_VAR, SCALE_ENV_VAR, SFX_VOLUME_ENV_VAR,
};
pub use content::{
    load_atlas, load_class_table, load_map_definition, load_unit_table, load_weapon_table,
    ClassRecord, ClassTable, ContentLoadError, Durability, GameData, MapDefinition, MapLayer,
    StatBlockDef, TileAtlas, TileType, Tilemap, TilemapError, UnitDef, UnitPlacement, UnitTable,
    WeaponLookup, WeaponPartition, WeaponRecord, WeaponTable, DEFAULT_TILE_SIZE,
};

pub const ROOT_ENV_VAR: &str = "TACTICS_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub maps_dir: PathBuf,
}

impl AppPaths {
    /// Builds the layout under an explicit root without touching the filesystem.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            data_dir: root.join("data"),
            maps_dir: root.join("maps"),
            root,
        }
    }

    /// Project-relative references in map files (atlas paths) resolve against the root.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "TACTICS_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain a data/ directory."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing data/ next to either Cargo.toml or maps/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/tactics\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    Ok(AppPaths::from_root(root))
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if normalized.join("data").is_dir() {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    let has_data = path.join("data").is_dir();
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_maps = path.join("maps").is_dir();

    has_data && (cargo_toml || has_maps)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
