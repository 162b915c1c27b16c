use std::env;
use std::path::PathBuf;

use engine::{
    load_map_definition, resolve_app_paths, AudioCue, AudioCueSink, ContentLoadError, GameData,
    MapConfig, StartupError,
};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::tactics::MapSession;

const MAP_ENV_VAR: &str = "TACTICS_MAP";
const SCRIPT_ENV_VAR: &str = "TACTICS_SCRIPT";
const DEFAULT_MAP: &str = "maps/demo.json";

/// Where the replayed key names come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScriptSource {
    Stdin,
    File(PathBuf),
}

pub(crate) struct AppWiring {
    pub(crate) session: MapSession,
    pub(crate) script: ScriptSource,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Content(#[from] ContentLoadError),
}

/// No mixer in a headless run; cues only show up in the log.
struct TracedAudio;

impl AudioCueSink for TracedAudio {
    fn play(&mut self, cue: AudioCue) {
        debug!(?cue, "audio_cue");
    }
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Tactics Startup ===");

    let config = MapConfig::from_env();
    let app_paths = resolve_app_paths()?;
    info!(root = %app_paths.root.display(), "project_root_resolved");

    let data = GameData::load(&app_paths)?;
    let map_path = app_paths.resolve(&map_reference_from_env());
    let definition = load_map_definition(&app_paths, &map_path)?;
    let session = MapSession::new(&definition, data, config, Box::new(TracedAudio));

    Ok(AppWiring {
        session,
        script: script_source_from_env(),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn map_reference_from_env() -> String {
    non_empty_env(MAP_ENV_VAR).unwrap_or_else(|| DEFAULT_MAP.to_string())
}

fn script_source_from_env() -> ScriptSource {
    non_empty_env(SCRIPT_ENV_VAR).map_or(ScriptSource::Stdin, |raw| {
        ScriptSource::File(PathBuf::from(raw))
    })
}

fn non_empty_env(env_var: &str) -> Option<String> {
    env::var(env_var)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}
