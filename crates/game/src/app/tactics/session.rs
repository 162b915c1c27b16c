use engine::{
    scaled_tile_size, screen_to_tile, AudioCue, AudioCueSink, CameraBounds, GameData, GridCamera,
    MapConfig, MapDefinition, MapInput, TileCoord,
};
use tracing::{debug, info};

use super::board::Board;
use super::interaction::{CommandOutcome, InteractionPhase, InteractionState, RejectReason};
use super::range::RangeOverlay;
use super::roster::{UnitIndex, UnitRoster};

/// Intent inside an open menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MenuIntent {
    Navigate(i32),
    Confirm,
    Cancel,
}

/// One map-screen command, decided from the input and the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MapCommand {
    MoveCursor { dx: i32, dy: i32 },
    SelectUnit,
    ConfirmMove,
    CancelSelection,
    ActionMenu(MenuIntent),
    Inventory(MenuIntent),
    ToggleUnitInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputOutcome {
    Applied(MapCommand),
    Rejected(MapCommand, RejectReason),
    /// The input has no meaning in the current state.
    Ignored,
    /// `Back` found nothing to cancel; the host should leave the map.
    ExitRequested,
}

/// A loaded map being played: terrain, units, interaction state, cursor and camera.
pub(crate) struct MapSession {
    pub(super) board: Board,
    pub(super) data: GameData,
    pub(super) roster: UnitRoster,
    pub(super) state: InteractionState,
    pub(super) ranges: RangeOverlay,
    pub(super) unit_info: Option<UnitIndex>,
    pub(super) cursor: TileCoord,
    pub(super) camera: GridCamera,
    camera_bounds: CameraBounds,
    pub(super) tile_px: i32,
    config: MapConfig,
    audio: Box<dyn AudioCueSink>,
}

impl MapSession {
    pub(crate) fn new(
        definition: &MapDefinition,
        data: GameData,
        config: MapConfig,
        audio: Box<dyn AudioCueSink>,
    ) -> Self {
        let board = Board::from_definition(definition);
        let roster = UnitRoster::from_placements(&definition.placements, &data);
        let tile_px = scaled_tile_size(board.tile_size, config.display_scale);
        let camera_bounds = CameraBounds::for_map(board.bounds(), tile_px, config.viewport);
        info!(
            map = %board.name,
            width = board.bounds().width,
            height = board.bounds().height,
            units = roster.len(),
            tile_px,
            "map_session_started"
        );
        Self {
            board,
            data,
            roster,
            state: InteractionState::Idle,
            ranges: RangeOverlay::default(),
            unit_info: None,
            cursor: TileCoord::default(),
            camera: GridCamera::default(),
            camera_bounds,
            tile_px,
            config,
            audio,
        }
    }

    pub(crate) fn cursor(&self) -> TileCoord {
        self.cursor
    }

    pub(crate) fn phase(&self) -> InteractionPhase {
        self.state.phase()
    }

    /// Steps the cursor, clamped to the map. Plays the cursor cue and drags the
    /// camera along only when the cursor actually moved.
    pub(crate) fn move_cursor(&mut self, dx: i32, dy: i32) -> bool {
        let target = self.board.bounds().clamp(self.cursor.offset(dx, dy));
        if target == self.cursor {
            return false;
        }
        self.cursor = target;
        if self.config.audio.sfx_audible() {
            self.audio.play(AudioCue::CursorMove);
        }
        let margin_px = self.config.scroll_margin_tiles.saturating_mul(self.tile_px);
        let scrolled = self.camera.follow_cursor(
            target,
            self.tile_px,
            self.config.viewport,
            margin_px,
            &self.camera_bounds,
        );
        debug!(
            x = target.x,
            y = target.y,
            scrolled,
            camera_x = self.camera.x,
            camera_y = self.camera.y,
            "cursor_moved"
        );
        true
    }

    /// First and last map tiles touched by the viewport at the current camera.
    pub(crate) fn visible_tiles(&self) -> (TileCoord, TileCoord) {
        let bounds = self.board.bounds();
        let viewport = self.config.viewport;
        let far_corner = (
            i32::try_from(viewport.width).unwrap_or(i32::MAX).saturating_sub(1),
            i32::try_from(viewport.height).unwrap_or(i32::MAX).saturating_sub(1),
        );
        (
            bounds.clamp(screen_to_tile((0, 0), &self.camera, self.tile_px)),
            bounds.clamp(screen_to_tile(far_corner, &self.camera, self.tile_px)),
        )
    }

    /// Places the cursor without sound or camera follow.
    pub(crate) fn set_cursor(&mut self, tile: TileCoord) {
        self.cursor = self.board.bounds().clamp(tile);
    }

    /// Turn-advance hook for the host: every unit may act again.
    pub(crate) fn begin_player_turn(&mut self) {
        self.roster.reset_turn();
        info!(map = %self.board.name, "player_turn_started");
    }

    /// Open menus take the input first, then the default map controls.
    pub(crate) fn route(&self, input: MapInput) -> Option<MapCommand> {
        match self.state.phase() {
            InteractionPhase::InventoryMenu | InteractionPhase::ConfirmDrop => {
                menu_intent(input).map(MapCommand::Inventory)
            }
            InteractionPhase::ActionMenu => menu_intent(input).map(MapCommand::ActionMenu),
            phase @ (InteractionPhase::Idle | InteractionPhase::Selected) => match input {
                MapInput::Move(direction) => {
                    let (dx, dy) = direction.delta();
                    Some(MapCommand::MoveCursor { dx, dy })
                }
                MapInput::Confirm if phase == InteractionPhase::Selected => {
                    Some(MapCommand::ConfirmMove)
                }
                MapInput::Confirm => Some(MapCommand::SelectUnit),
                MapInput::ToggleInfo => Some(MapCommand::ToggleUnitInfo),
                MapInput::Cancel | MapInput::Back if phase == InteractionPhase::Selected => {
                    Some(MapCommand::CancelSelection)
                }
                MapInput::Cancel | MapInput::Back => {
                    self.unit_info.map(|_| MapCommand::ToggleUnitInfo)
                }
            },
        }
    }

    pub(crate) fn apply(&mut self, command: MapCommand) -> CommandOutcome {
        match command {
            MapCommand::MoveCursor { dx, dy } => {
                self.move_cursor(dx, dy);
                CommandOutcome::Applied
            }
            MapCommand::SelectUnit => self.select_unit(),
            MapCommand::ConfirmMove => self.confirm_move(),
            MapCommand::CancelSelection => self.cancel_selection(),
            MapCommand::ActionMenu(MenuIntent::Navigate(delta)) => {
                self.move_action_selection(delta)
            }
            MapCommand::ActionMenu(MenuIntent::Confirm) => self.confirm_action(),
            MapCommand::ActionMenu(MenuIntent::Cancel) => self.cancel_action_menu(),
            MapCommand::Inventory(MenuIntent::Navigate(delta)) => {
                self.move_inventory_selection(delta)
            }
            MapCommand::Inventory(MenuIntent::Confirm) => self.confirm_inventory_action(),
            MapCommand::Inventory(MenuIntent::Cancel) => {
                if self.state.phase() == InteractionPhase::ConfirmDrop {
                    self.cancel_drop_confirmation()
                } else {
                    self.close_inventory()
                }
            }
            MapCommand::ToggleUnitInfo => self.toggle_unit_info(),
        }
    }

    /// Backs out of the innermost open thing. Returns false when nothing was open.
    pub(crate) fn cancel(&mut self) -> bool {
        self.route(MapInput::Cancel)
            .is_some_and(|command| self.apply(command).is_applied())
    }

    pub(crate) fn handle_input(&mut self, input: MapInput) -> InputOutcome {
        let Some(command) = self.route(input) else {
            if input == MapInput::Back {
                info!(map = %self.board.name, "map_exit_requested");
                return InputOutcome::ExitRequested;
            }
            debug!(?input, phase = ?self.state.phase(), "input_ignored");
            return InputOutcome::Ignored;
        };
        match self.apply(command) {
            CommandOutcome::Applied => InputOutcome::Applied(command),
            CommandOutcome::Rejected(reason) => InputOutcome::Rejected(command, reason),
        }
    }
}

fn menu_intent(input: MapInput) -> Option<MenuIntent> {
    match input {
        MapInput::Move(direction) => direction.menu_step().map(MenuIntent::Navigate),
        MapInput::Confirm => Some(MenuIntent::Confirm),
        MapInput::Cancel | MapInput::Back => Some(MenuIntent::Cancel),
        MapInput::ToggleInfo => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tactics::test_support::{
        open_field, placement, sample_game_data, sample_session, CueLog,
    };
    use engine::{AudioSettings, Direction, TileAtlas};

    #[test]
    fn cursor_cue_plays_only_on_actual_movement() {
        let (mut session, cues) = sample_session();
        assert!(!session.move_cursor(-1, 0));
        assert_eq!(cues.count(), 0);

        assert!(session.move_cursor(1, 0));
        assert_eq!(session.cursor(), TileCoord::new(1, 0));
        assert_eq!(cues.count(), 1);

        session.set_cursor(TileCoord::new(4, 4));
        assert_eq!(cues.count(), 1);
    }

    #[test]
    fn muted_sfx_suppresses_cursor_cue() {
        let cues = CueLog::default();
        let config = MapConfig::default().with_audio(AudioSettings::new(80, 0));
        let mut session = MapSession::new(
            &open_field(4, 4, Vec::new()),
            sample_game_data(),
            config,
            Box::new(cues.clone()),
        );
        assert!(session.move_cursor(0, 1));
        assert_eq!(cues.count(), 0);
    }

    #[test]
    fn cursor_clamps_to_map_and_empty_map_pins_origin() {
        let (mut session, _) = sample_session();
        session.set_cursor(TileCoord::new(40, -3));
        assert_eq!(session.cursor(), TileCoord::new(9, 0));

        let mut empty = MapSession::new(
            &open_field(0, 0, Vec::new()),
            sample_game_data(),
            MapConfig::default(),
            Box::new(CueLog::default()),
        );
        assert!(!empty.move_cursor(1, 1));
        assert_eq!(empty.cursor(), TileCoord::new(0, 0));
    }

    #[test]
    fn camera_scrolls_when_cursor_nears_far_edge() {
        let mut session = MapSession::new(
            &open_field(40, 30, Vec::new()),
            sample_game_data(),
            MapConfig::default(),
            Box::new(CueLog::default()),
        );
        assert_eq!(session.tile_px, 96);
        session.set_cursor(TileCoord::new(17, 0));
        assert!(session.move_cursor(1, 0));
        assert_eq!(session.camera, GridCamera { x: 96, y: 0 });

        session.set_cursor(TileCoord::new(3, 0));
        assert!(session.move_cursor(-1, 0));
        assert_eq!(session.camera.x, 0);
    }

    #[test]
    fn atlas_tile_size_drives_scaled_tiles_and_camera_limits() {
        let mut definition = open_field(40, 30, Vec::new());
        definition.atlas = TileAtlas::from_tile_types(16, definition.atlas.tile_types().to_vec());
        let mut session = MapSession::new(
            &definition,
            sample_game_data(),
            MapConfig::default(),
            Box::new(CueLog::default()),
        );
        assert_eq!(session.tile_px, 48);
        assert_eq!(session.camera_bounds.max_x, 40 * 48 - 1920);
        assert_eq!(session.camera_bounds.max_y, 30 * 48 - 1080);
    }

    #[test]
    fn small_map_never_scrolls() {
        let (mut session, _) = sample_session();
        for _ in 0..12 {
            session.move_cursor(1, 1);
        }
        assert_eq!(session.cursor(), TileCoord::new(9, 9));
        assert_eq!(session.camera, GridCamera::default());
    }

    #[test]
    fn idle_routing_never_produces_menu_commands() {
        let (session, _) = sample_session();
        let inputs = [
            MapInput::Move(Direction::Up),
            MapInput::Move(Direction::Left),
            MapInput::Confirm,
            MapInput::Cancel,
            MapInput::Back,
            MapInput::ToggleInfo,
        ];
        for input in inputs {
            assert!(!matches!(
                session.route(input),
                Some(MapCommand::ActionMenu(_) | MapCommand::Inventory(_))
            ));
        }
        assert_eq!(session.route(MapInput::Confirm), Some(MapCommand::SelectUnit));
        assert_eq!(session.route(MapInput::Back), None);
    }

    #[test]
    fn menus_take_vertical_navigation_only() {
        let (mut session, _) = sample_session();
        session.set_cursor(TileCoord::new(1, 1));
        session.select_unit();
        session.confirm_move();

        assert_eq!(
            session.route(MapInput::Move(Direction::Down)),
            Some(MapCommand::ActionMenu(MenuIntent::Navigate(1)))
        );
        assert_eq!(session.route(MapInput::Move(Direction::Left)), None);
        assert_eq!(session.route(MapInput::ToggleInfo), None);
        assert_eq!(
            session.handle_input(MapInput::Move(Direction::Right)),
            InputOutcome::Ignored
        );
    }

    #[test]
    fn back_exits_only_when_nothing_is_open() {
        let (mut session, _) = sample_session();
        session.set_cursor(TileCoord::new(1, 1));
        session.select_unit();
        assert_eq!(
            session.handle_input(MapInput::Back),
            InputOutcome::Applied(MapCommand::CancelSelection)
        );

        session.toggle_unit_info();
        assert!(session.cancel());
        assert_eq!(session.unit_info, None);

        assert!(!session.cancel());
        assert_eq!(session.handle_input(MapInput::Back), InputOutcome::ExitRequested);
        assert_eq!(session.handle_input(MapInput::Cancel), InputOutcome::Ignored);
    }

    #[test]
    fn cancel_unwinds_one_level_at_a_time() {
        let (mut session, _) = sample_session();
        session.set_cursor(TileCoord::new(1, 1));
        session.select_unit();
        session.set_cursor(TileCoord::new(1, 3));
        session.confirm_move();
        session.confirm_action();
        session.move_inventory_selection(-1);
        session.confirm_inventory_action();

        let mut phases = vec![session.phase()];
        while session.cancel() {
            phases.push(session.phase());
        }
        assert_eq!(
            phases,
            vec![
                InteractionPhase::ConfirmDrop,
                InteractionPhase::InventoryMenu,
                InteractionPhase::ActionMenu,
                InteractionPhase::Selected,
                InteractionPhase::Idle,
            ]
        );
        assert_eq!(session.cursor(), TileCoord::new(1, 1));
    }

    #[test]
    fn keyboard_flow_moves_unit_and_waits() {
        let (mut session, _) = sample_session();
        session.set_cursor(TileCoord::new(1, 1));
        let script = [
            MapInput::Confirm,
            MapInput::Move(Direction::Down),
            MapInput::Move(Direction::Right),
            MapInput::Confirm,
            MapInput::Confirm,
            MapInput::Cancel,
            MapInput::Move(Direction::Down),
            MapInput::Confirm,
        ];
        for input in script {
            assert!(matches!(session.handle_input(input), InputOutcome::Applied(_)));
        }

        let sigurd = session.roster.get(UnitIndex(0)).expect("sigurd");
        assert_eq!(sigurd.position, TileCoord::new(2, 2));
        assert!(sigurd.has_moved);
        assert_eq!(session.phase(), InteractionPhase::Idle);

        session.begin_player_turn();
        assert!(session.roster.get(UnitIndex(0)).expect("sigurd").is_commandable());
    }

    #[test]
    fn rejected_inputs_report_reason() {
        let mut session = MapSession::new(
            &open_field(3, 3, vec![placement("enemy", "brigand", 0, 0)]),
            sample_game_data(),
            MapConfig::default(),
            Box::new(CueLog::default()),
        );
        assert_eq!(
            session.handle_input(MapInput::Confirm),
            InputOutcome::Rejected(MapCommand::SelectUnit, RejectReason::NotPlayerUnit)
        );
    }
}
