use engine::{GridCamera, TileCoord};
use serde::Serialize;

use super::board::TerrainView;
use super::equipment::{EquipmentResolver, InventoryRow, UnitInfoPanel};
use super::interaction::{ActionOption, InteractionPhase, InteractionState};
use super::roster::{Faction, UnitIndex};
use super::session::MapSession;

/// Everything a renderer needs to draw one frame of the map screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct MapSnapshot {
    pub(crate) map_name: String,
    pub(crate) music: String,
    pub(crate) tile_px: i32,
    pub(crate) cursor: TileCoord,
    /// The cursor is hidden while a menu owns the input.
    pub(crate) cursor_visible: bool,
    pub(crate) camera: GridCamera,
    pub(crate) visible_tiles: VisibleTiles,
    pub(crate) phase: InteractionPhase,
    pub(crate) selected_unit: Option<UnitIndex>,
    pub(crate) move_tiles: Vec<TileCoord>,
    pub(crate) attack_tiles: Vec<TileCoord>,
    pub(crate) units: Vec<UnitMarker>,
    pub(crate) terrain: Option<TerrainView>,
    pub(crate) action_menu: Option<ActionMenuView>,
    pub(crate) inventory: Option<InventoryMenuView>,
    pub(crate) unit_info: Option<UnitInfoPanel>,
}

/// Inclusive tile window under the viewport, for culling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct VisibleTiles {
    pub(crate) first: TileCoord,
    pub(crate) last: TileCoord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct UnitMarker {
    pub(crate) index: UnitIndex,
    pub(crate) unit_id: String,
    pub(crate) faction: Faction,
    pub(crate) sprite: String,
    pub(crate) position: TileCoord,
    pub(crate) has_moved: bool,
    /// Player unit that can still be selected this turn.
    pub(crate) commandable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ActionMenuView {
    pub(crate) options: Vec<ActionOption>,
    pub(crate) highlighted: ActionOption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct InventoryMenuView {
    pub(crate) unit_name: String,
    pub(crate) rows: Vec<InventoryRow>,
    /// Equals `rows.len()` when the drop row is highlighted.
    pub(crate) highlighted_row: usize,
    pub(crate) drop_enabled: bool,
    pub(crate) confirming_drop: bool,
}

impl MapSession {
    pub(crate) fn snapshot(&self) -> MapSnapshot {
        let resolver = EquipmentResolver::new(&self.data);
        let phase = self.state.phase();
        let (first, last) = self.visible_tiles();

        let action_menu = match self.state {
            InteractionState::ActionMenu { option, .. } => Some(ActionMenuView {
                options: ActionOption::ALL.to_vec(),
                highlighted: option,
            }),
            _ => None,
        };
        let inventory = match &self.state {
            InteractionState::InventoryMenu { unit, menu, .. } => {
                self.roster.get(*unit).map(|unit| InventoryMenuView {
                    unit_name: unit.name.clone(),
                    rows: resolver.inventory_rows(unit),
                    highlighted_row: menu.row,
                    drop_enabled: unit.equipped_item().is_some(),
                    confirming_drop: menu.confirming_drop,
                })
            }
            _ => None,
        };

        MapSnapshot {
            map_name: self.board.name.clone(),
            music: self.board.music.clone(),
            tile_px: self.tile_px,
            cursor: self.cursor,
            cursor_visible: matches!(phase, InteractionPhase::Idle | InteractionPhase::Selected),
            camera: self.camera,
            visible_tiles: VisibleTiles { first, last },
            phase,
            selected_unit: self.state.selected_unit(),
            move_tiles: self.ranges.move_tiles().iter().copied().collect(),
            attack_tiles: self.ranges.attack_tiles().iter().copied().collect(),
            units: self
                .roster
                .iter()
                .map(|(index, unit)| UnitMarker {
                    index,
                    unit_id: unit.unit_id.clone(),
                    faction: unit.faction,
                    sprite: unit.sprite.clone(),
                    position: unit.position,
                    has_moved: unit.has_moved,
                    commandable: unit.is_commandable(),
                })
                .collect(),
            terrain: self.board.terrain_at(self.cursor),
            action_menu,
            inventory,
            unit_info: self
                .unit_info
                .and_then(|index| self.roster.get(index))
                .map(|unit| resolver.unit_info_panel(unit)),
        }
    }
}
