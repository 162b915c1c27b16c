use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use engine::{key_code_from_name, map_key_code, MapInput};
use tracing::{debug, error, info, warn};

use super::bootstrap::{AppWiring, ScriptSource};
use super::tactics::{InputOutcome, MapSession};

/// One line of a replay script: a key name, or a host directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptStep {
    Input(MapInput),
    Snapshot,
    BeginTurn,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ScriptSummary {
    applied: usize,
    rejected: usize,
    ignored: usize,
    unrecognized: usize,
    exit_requested: bool,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        mut session,
        script,
    } = app;

    let raw = match read_script(&script) {
        Ok(raw) => raw,
        Err(err) => {
            error!(error = %err, source = ?script, "script_read_failed");
            return ExitCode::FAILURE;
        }
    };

    let summary = run_script(&mut session, &raw);
    if !summary.exit_requested {
        let mut unwound = 0_usize;
        while session.cancel() {
            unwound += 1;
        }
        debug!(unwound, "open_menus_unwound");
    }
    log_snapshot(&session, None);
    info!(
        applied = summary.applied,
        rejected = summary.rejected,
        ignored = summary.ignored,
        unrecognized = summary.unrecognized,
        exit_requested = summary.exit_requested,
        "script_finished"
    );
    ExitCode::SUCCESS
}

fn read_script(source: &ScriptSource) -> io::Result<String> {
    match source {
        ScriptSource::File(path) => fs::read_to_string(path),
        ScriptSource::Stdin => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

/// Feeds every script line to the session, one input per tick, until the
/// script ends or the map asks to exit.
fn run_script(session: &mut MapSession, raw: &str) -> ScriptSummary {
    let mut summary = ScriptSummary::default();
    for (index, line) in raw.lines().enumerate() {
        let line_no = index + 1;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let Some(step) = parse_step(token) else {
            warn!(line = line_no, token, "script_token_unrecognized");
            summary.unrecognized += 1;
            continue;
        };

        match step {
            ScriptStep::Snapshot => log_snapshot(session, Some(line_no)),
            ScriptStep::BeginTurn => session.begin_player_turn(),
            ScriptStep::Input(input) => match session.handle_input(input) {
                InputOutcome::Applied(command) => {
                    summary.applied += 1;
                    debug!(
                        line = line_no,
                        ?command,
                        phase = ?session.phase(),
                        x = session.cursor().x,
                        y = session.cursor().y,
                        "input_applied"
                    );
                }
                InputOutcome::Rejected(command, reason) => {
                    summary.rejected += 1;
                    info!(
                        line = line_no,
                        ?command,
                        reason = reason.as_token(),
                        "input_rejected"
                    );
                }
                InputOutcome::Ignored => summary.ignored += 1,
                InputOutcome::ExitRequested => {
                    summary.exit_requested = true;
                    break;
                }
            },
        }
    }
    summary
}

fn parse_step(token: &str) -> Option<ScriptStep> {
    match token {
        "Snapshot" => Some(ScriptStep::Snapshot),
        "BeginTurn" => Some(ScriptStep::BeginTurn),
        name => key_code_from_name(name)
            .and_then(map_key_code)
            .map(ScriptStep::Input),
    }
}

fn log_snapshot(session: &MapSession, line: Option<usize>) {
    match serde_json::to_string(&session.snapshot()) {
        Ok(json) => info!(line, snapshot = %json, "map_snapshot"),
        Err(err) => warn!(line, error = %err, "map_snapshot_serialize_failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::app::tactics::test_support::sample_session;
    use engine::{
        load_map_definition, AppPaths, Direction, GameData, MapConfig, NullAudio, TileCoord,
    };

    #[test]
    fn parse_step_accepts_keys_and_directives() {
        assert_eq!(
            parse_step("KeyW"),
            Some(ScriptStep::Input(MapInput::Move(Direction::Up)))
        );
        assert_eq!(parse_step("Enter"), Some(ScriptStep::Input(MapInput::Confirm)));
        assert_eq!(parse_step("Snapshot"), Some(ScriptStep::Snapshot));
        assert_eq!(parse_step("BeginTurn"), Some(ScriptStep::BeginTurn));
        assert_eq!(parse_step("F5"), None);
    }

    #[test]
    fn script_stops_at_exit_request() {
        let (mut session, _) = sample_session();
        let raw = "# walk right twice\nArrowRight\nArrowRight\n\nBogus\nEscape\nArrowDown\n";

        let summary = run_script(&mut session, raw);
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.unrecognized, 1);
        assert!(summary.exit_requested);
        assert_eq!(session.cursor(), TileCoord::new(2, 0));
    }

    #[test]
    fn script_counts_rejections_without_stopping() {
        let (mut session, _) = sample_session();
        let raw = "KeyZ\nArrowDown\nArrowRight\nKeyZ\nSnapshot\n";

        let summary = run_script(&mut session, raw);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.applied, 3);
        assert!(!summary.exit_requested);
        let snapshot = serde_json::to_value(session.snapshot()).expect("serialize");
        assert_eq!(snapshot["phase"], "selected");
    }

    #[test]
    fn script_file_is_read_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("moves.txt");
        fs::write(&path, "ArrowRight\n").expect("script");
        let raw = read_script(&ScriptSource::File(path)).expect("read");
        assert_eq!(raw.trim(), "ArrowRight");
    }

    #[test]
    fn shipped_demo_script_runs_to_exit() {
        let paths = AppPaths::from_root(Path::new(env!("CARGO_MANIFEST_DIR")).join("../.."));
        let data = GameData::load(&paths).expect("game data");
        let definition =
            load_map_definition(&paths, &paths.maps_dir.join("demo.json")).expect("demo map");
        let mut session =
            MapSession::new(&definition, data, MapConfig::default(), Box::new(NullAudio));
        let raw = fs::read_to_string(paths.root.join("scripts/demo.keys")).expect("script");

        let summary = run_script(&mut session, &raw);
        assert!(summary.exit_requested);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.unrecognized, 0);
        assert_eq!(session.cursor(), TileCoord::new(9, 8));
    }
}
