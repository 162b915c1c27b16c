use engine::TileCoord;
use serde::Serialize;
use tracing::{debug, info};

use super::equipment::EquipmentResolver;
use super::range::RangeOverlay;
use super::roster::{Faction, Unit, UnitIndex};
use super::session::MapSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ActionOption {
    Items,
    Wait,
}

impl ActionOption {
    pub(crate) const ALL: [ActionOption; 2] = [ActionOption::Items, ActionOption::Wait];

    fn index(self) -> usize {
        match self {
            Self::Items => 0,
            Self::Wait => 1,
        }
    }

    fn stepped(self, delta: i32) -> Self {
        Self::ALL[wrap_index(self.index(), delta, Self::ALL.len())]
    }
}

/// Inventory as it was when the menu opened, refreshed by every committed
/// equip or drop. Closing the menu writes it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InventoryBackup {
    pub(crate) inventory: Vec<String>,
    pub(crate) equipped: Option<usize>,
}

impl InventoryBackup {
    fn capture(unit: &Unit) -> Self {
        Self {
            inventory: unit.inventory.clone(),
            equipped: unit.equipped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InventoryMenuState {
    /// `0..len` are items; `len` is the drop row.
    pub(crate) row: usize,
    pub(crate) backup: InventoryBackup,
    pub(crate) confirming_drop: bool,
}

/// Where the map screen is in the select, move, act flow. Menus can only exist
/// for a selected unit, so each menu state carries the unit it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum InteractionState {
    #[default]
    Idle,
    Selected {
        unit: UnitIndex,
    },
    ActionMenu {
        unit: UnitIndex,
        origin: TileCoord,
        option: ActionOption,
    },
    InventoryMenu {
        unit: UnitIndex,
        origin: TileCoord,
        menu: InventoryMenuState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum InteractionPhase {
    Idle,
    Selected,
    ActionMenu,
    InventoryMenu,
    ConfirmDrop,
}

impl InteractionState {
    pub(crate) fn phase(&self) -> InteractionPhase {
        match self {
            Self::Idle => InteractionPhase::Idle,
            Self::Selected { .. } => InteractionPhase::Selected,
            Self::ActionMenu { .. } => InteractionPhase::ActionMenu,
            Self::InventoryMenu { menu, .. } if menu.confirming_drop => {
                InteractionPhase::ConfirmDrop
            }
            Self::InventoryMenu { .. } => InteractionPhase::InventoryMenu,
        }
    }

    pub(crate) fn selected_unit(&self) -> Option<UnitIndex> {
        match self {
            Self::Idle => None,
            Self::Selected { unit }
            | Self::ActionMenu { unit, .. }
            | Self::InventoryMenu { unit, .. } => Some(*unit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RejectReason {
    WrongState,
    NoUnitAtCursor,
    NotPlayerUnit,
    AlreadyMoved,
    OutOfMoveRange,
    CannotWield,
    NoEquippedItem,
    DropPending,
    UnitMissing,
}

impl RejectReason {
    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::WrongState => "wrong_state",
            Self::NoUnitAtCursor => "no_unit_at_cursor",
            Self::NotPlayerUnit => "not_player_unit",
            Self::AlreadyMoved => "already_moved",
            Self::OutOfMoveRange => "out_of_move_range",
            Self::CannotWield => "cannot_wield",
            Self::NoEquippedItem => "no_equipped_item",
            Self::DropPending => "drop_pending",
            Self::UnitMissing => "unit_missing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommandOutcome {
    Applied,
    Rejected(RejectReason),
}

impl CommandOutcome {
    pub(crate) fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

fn rejected(operation: &'static str, reason: RejectReason) -> CommandOutcome {
    debug!(operation, reason = reason.as_token(), "command_rejected");
    CommandOutcome::Rejected(reason)
}

/// Steps `current` by `delta` and wraps around both ends of `0..len`.
pub(crate) fn wrap_index(current: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (current as i64 + i64::from(delta)).rem_euclid(len) as usize
}

impl MapSession {
    pub(crate) fn select_unit(&mut self) -> CommandOutcome {
        const OP: &str = "select_unit";
        if self.state != InteractionState::Idle {
            return rejected(OP, RejectReason::WrongState);
        }
        let Some(index) = self.roster.index_at(self.cursor) else {
            return rejected(OP, RejectReason::NoUnitAtCursor);
        };
        let Some(unit) = self.roster.get(index) else {
            return rejected(OP, RejectReason::UnitMissing);
        };
        if unit.faction != Faction::Player {
            return rejected(OP, RejectReason::NotPlayerUnit);
        }
        if unit.has_moved {
            return rejected(OP, RejectReason::AlreadyMoved);
        }

        self.ranges = RangeOverlay::compute(self.board.bounds(), &self.roster, index);
        self.state = InteractionState::Selected { unit: index };
        info!(
            unit = %unit.name,
            x = unit.position.x,
            y = unit.position.y,
            move_tiles = self.ranges.move_tiles().len(),
            attack_tiles = self.ranges.attack_tiles().len(),
            "unit_selected"
        );
        CommandOutcome::Applied
    }

    pub(crate) fn cancel_selection(&mut self) -> CommandOutcome {
        let InteractionState::Selected { unit } = self.state else {
            return rejected("cancel_selection", RejectReason::WrongState);
        };
        self.ranges.clear();
        self.state = InteractionState::Idle;
        debug!(unit = unit.0, "selection_cancelled");
        CommandOutcome::Applied
    }

    pub(crate) fn confirm_move(&mut self) -> CommandOutcome {
        const OP: &str = "confirm_move";
        let InteractionState::Selected { unit: index } = self.state else {
            return rejected(OP, RejectReason::WrongState);
        };
        let Some(unit) = self.roster.get_mut(index) else {
            return rejected(OP, RejectReason::UnitMissing);
        };
        if !self.ranges.is_in_move_range(self.cursor, unit.position) {
            return rejected(OP, RejectReason::OutOfMoveRange);
        }

        let origin = unit.position;
        unit.position = self.cursor;
        self.ranges.clear();
        self.state = InteractionState::ActionMenu {
            unit: index,
            origin,
            option: ActionOption::Items,
        };
        info!(
            unit = %unit.name,
            from_x = origin.x,
            from_y = origin.y,
            to_x = unit.position.x,
            to_y = unit.position.y,
            "unit_moved"
        );
        CommandOutcome::Applied
    }

    pub(crate) fn move_action_selection(&mut self, delta: i32) -> CommandOutcome {
        let InteractionState::ActionMenu { option, .. } = &mut self.state else {
            return rejected("move_action_selection", RejectReason::WrongState);
        };
        *option = option.stepped(delta);
        CommandOutcome::Applied
    }

    pub(crate) fn confirm_action(&mut self) -> CommandOutcome {
        const OP: &str = "confirm_action";
        let InteractionState::ActionMenu { unit: index, option, .. } = self.state else {
            return rejected(OP, RejectReason::WrongState);
        };
        match option {
            ActionOption::Items => self.open_inventory(),
            ActionOption::Wait => {
                let Some(unit) = self.roster.get_mut(index) else {
                    return rejected(OP, RejectReason::UnitMissing);
                };
                unit.has_moved = true;
                self.ranges.clear();
                self.state = InteractionState::Idle;
                info!(
                    unit = %unit.name,
                    x = unit.position.x,
                    y = unit.position.y,
                    "unit_waited"
                );
                CommandOutcome::Applied
            }
        }
    }

    /// Undoes the tentative move: the unit and cursor return to the origin tile
    /// and the range overlay is rebuilt for it.
    pub(crate) fn cancel_action_menu(&mut self) -> CommandOutcome {
        let InteractionState::ActionMenu {
            unit: index,
            origin,
            ..
        } = self.state
        else {
            return rejected("cancel_action_menu", RejectReason::WrongState);
        };
        if let Some(unit) = self.roster.get_mut(index) {
            unit.position = origin;
        }
        self.set_cursor(origin);
        self.ranges = RangeOverlay::compute(self.board.bounds(), &self.roster, index);
        self.state = InteractionState::Selected { unit: index };
        debug!(unit = index.0, x = origin.x, y = origin.y, "move_reverted");
        CommandOutcome::Applied
    }

    pub(crate) fn open_inventory(&mut self) -> CommandOutcome {
        const OP: &str = "open_inventory";
        let InteractionState::ActionMenu {
            unit: index,
            origin,
            ..
        } = self.state
        else {
            return rejected(OP, RejectReason::WrongState);
        };
        let Some(unit) = self.roster.get(index) else {
            return rejected(OP, RejectReason::UnitMissing);
        };
        self.state = InteractionState::InventoryMenu {
            unit: index,
            origin,
            menu: InventoryMenuState {
                row: 0,
                backup: InventoryBackup::capture(unit),
                confirming_drop: false,
            },
        };
        debug!(unit = %unit.name, items = unit.inventory.len(), "inventory_opened");
        CommandOutcome::Applied
    }

    pub(crate) fn close_inventory(&mut self) -> CommandOutcome {
        let (index, origin, backup) = match &self.state {
            InteractionState::InventoryMenu { unit, origin, menu } => {
                (*unit, *origin, menu.backup.clone())
            }
            _ => return rejected("close_inventory", RejectReason::WrongState),
        };
        if let Some(unit) = self.roster.get_mut(index) {
            unit.inventory = backup.inventory;
            unit.equipped = backup.equipped;
        }
        self.state = InteractionState::ActionMenu {
            unit: index,
            origin,
            option: ActionOption::Items,
        };
        debug!(unit = index.0, "inventory_closed");
        CommandOutcome::Applied
    }

    pub(crate) fn move_inventory_selection(&mut self, delta: i32) -> CommandOutcome {
        const OP: &str = "move_inventory_selection";
        let InteractionState::InventoryMenu { unit, menu, .. } = &mut self.state else {
            return rejected(OP, RejectReason::WrongState);
        };
        if menu.confirming_drop {
            return rejected(OP, RejectReason::DropPending);
        }
        let rows = self
            .roster
            .get(*unit)
            .map_or(0, |unit| unit.inventory.len())
            + 1;
        menu.row = wrap_index(menu.row, delta, rows);
        CommandOutcome::Applied
    }

    /// Equips the highlighted item, arms the drop prompt from the drop row, or
    /// executes a pending drop.
    pub(crate) fn confirm_inventory_action(&mut self) -> CommandOutcome {
        const OP: &str = "confirm_inventory_action";
        let InteractionState::InventoryMenu {
            unit: index, menu, ..
        } = &mut self.state
        else {
            return rejected(OP, RejectReason::WrongState);
        };
        let Some(unit) = self.roster.get_mut(*index) else {
            return rejected(OP, RejectReason::UnitMissing);
        };
        let resolver = EquipmentResolver::new(&self.data);
        let equipped = unit
            .equipped
            .filter(|slot| *slot < unit.inventory.len());

        if menu.confirming_drop {
            let Some(slot) = equipped else {
                return rejected(OP, RejectReason::NoEquippedItem);
            };
            let dropped = unit.inventory.remove(slot);
            unit.equipped = resolver.first_wieldable(unit);
            menu.backup = InventoryBackup::capture(unit);
            menu.row = menu.row.min(unit.inventory.len());
            menu.confirming_drop = false;
            info!(
                unit = %unit.name,
                item = %dropped,
                equipped = unit.equipped_item().unwrap_or("none"),
                "item_dropped"
            );
            return CommandOutcome::Applied;
        }

        if let Some(item_id) = unit.inventory.get(menu.row) {
            let weapon = resolver.weapon_data(item_id);
            if !resolver.can_wield(unit, &weapon) {
                debug!(
                    unit = %unit.name,
                    class = %unit.class_name,
                    weapon = %weapon.id,
                    weapon_type = %weapon.weapon_type,
                    "equip_not_allowed"
                );
                return rejected(OP, RejectReason::CannotWield);
            }
            unit.equipped = Some(menu.row);
            menu.backup = InventoryBackup::capture(unit);
            info!(unit = %unit.name, item = %weapon.name, "item_equipped");
            return CommandOutcome::Applied;
        }

        if equipped.is_none() {
            return rejected(OP, RejectReason::NoEquippedItem);
        }
        menu.confirming_drop = true;
        debug!(unit = %unit.name, "drop_confirmation_requested");
        CommandOutcome::Applied
    }

    pub(crate) fn cancel_drop_confirmation(&mut self) -> CommandOutcome {
        match &mut self.state {
            InteractionState::InventoryMenu { menu, .. } if menu.confirming_drop => {
                menu.confirming_drop = false;
                CommandOutcome::Applied
            }
            _ => rejected("cancel_drop_confirmation", RejectReason::WrongState),
        }
    }

    pub(crate) fn toggle_unit_info(&mut self) -> CommandOutcome {
        if let Some(index) = self.unit_info.take() {
            debug!(unit = index.0, "unit_info_closed");
            return CommandOutcome::Applied;
        }
        let Some(index) = self.roster.index_at(self.cursor) else {
            return rejected("toggle_unit_info", RejectReason::NoUnitAtCursor);
        };
        self.unit_info = Some(index);
        debug!(unit = index.0, "unit_info_opened");
        CommandOutcome::Applied
    }
}
