use engine::{ClassTable, GameData, StatBlockDef, TileCoord, UnitDef, UnitPlacement};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Faction {
    Player,
    Enemy,
}

impl Faction {
    /// Placement `type` tokens. Anything that is not a player unit cannot be commanded.
    pub(crate) fn from_token(token: &str) -> Self {
        match token {
            "player" => Self::Player,
            "enemy" => Self::Enemy,
            other => {
                warn!(unit_type = other, "unknown_unit_type_treated_as_enemy");
                Self::Enemy
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct Stats {
    pub(crate) hp: u32,
    pub(crate) max_hp: u32,
    pub(crate) str: u32,
    pub(crate) mag: u32,
    pub(crate) skl: u32,
    pub(crate) spd: u32,
    pub(crate) lck: u32,
    pub(crate) def: u32,
    pub(crate) res: u32,
    pub(crate) con: u32,
    pub(crate) mov: u32,
}

impl From<StatBlockDef> for Stats {
    fn from(block: StatBlockDef) -> Self {
        Self {
            hp: block.hp,
            max_hp: block.hp,
            str: block.str,
            mag: block.mag,
            skl: block.skl,
            spd: block.spd,
            lck: block.lck,
            def: block.def,
            res: block.res,
            con: block.con,
            mov: block.mov,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Unit {
    pub(crate) faction: Faction,
    pub(crate) unit_id: String,
    pub(crate) name: String,
    pub(crate) class_id: String,
    pub(crate) class_name: String,
    pub(crate) level: u32,
    pub(crate) sprite: String,
    pub(crate) stats: Stats,
    pub(crate) position: TileCoord,
    pub(crate) inventory: Vec<String>,
    pub(crate) equipped: Option<usize>,
    pub(crate) has_moved: bool,
}

impl Unit {
    pub(crate) fn from_def(
        faction: Faction,
        placement: &UnitPlacement,
        def: &UnitDef,
        classes: &ClassTable,
    ) -> Self {
        let class_name = classes
            .display_name(&def.class)
            .unwrap_or(&def.class)
            .to_string();
        let equipped = (!def.current_inventory.is_empty()).then_some(0);
        Self {
            faction,
            unit_id: placement.unit_id.clone(),
            name: def.name.clone(),
            class_id: def.class.clone(),
            class_name,
            level: def.level,
            sprite: placement.sprite.clone(),
            stats: Stats::from(def.stats),
            position: placement.position(),
            inventory: def.current_inventory.clone(),
            equipped,
            has_moved: false,
        }
    }

    pub(crate) fn is_commandable(&self) -> bool {
        self.faction == Faction::Player && !self.has_moved
    }

    pub(crate) fn equipped_item(&self) -> Option<&str> {
        self.equipped
            .and_then(|index| self.inventory.get(index))
            .map(String::as_str)
    }
}

/// Stable handle into a [`UnitRoster`]. Units are never removed during a map, so
/// indices stay valid for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub(crate) struct UnitIndex(pub(crate) usize);

#[derive(Debug, Clone, Default)]
pub(crate) struct UnitRoster {
    units: Vec<Unit>,
}

impl UnitRoster {
    pub(crate) fn from_placements(placements: &[UnitPlacement], data: &GameData) -> Self {
        let fallback = UnitDef::default();
        let units = placements
            .iter()
            .map(|placement| {
                let faction = Faction::from_token(&placement.unit_type);
                let def = data
                    .units
                    .unit_def(&placement.unit_type, &placement.unit_id)
                    .unwrap_or_else(|| {
                        warn!(
                            unit_type = %placement.unit_type,
                            unit_id = %placement.unit_id,
                            "unit_definition_missing_using_defaults"
                        );
                        &fallback
                    });
                Unit::from_def(faction, placement, def, &data.classes)
            })
            .collect::<Vec<_>>();
        debug!(unit_count = units.len(), "unit_roster_built");
        Self { units }
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, unit: Unit) -> UnitIndex {
        self.units.push(unit);
        UnitIndex(self.units.len() - 1)
    }

    pub(crate) fn len(&self) -> usize {
        self.units.len()
    }

    pub(crate) fn get(&self, index: UnitIndex) -> Option<&Unit> {
        self.units.get(index.0)
    }

    pub(crate) fn get_mut(&mut self, index: UnitIndex) -> Option<&mut Unit> {
        self.units.get_mut(index.0)
    }

    /// First unit standing on `tile`, in placement order.
    pub(crate) fn index_at(&self, tile: TileCoord) -> Option<UnitIndex> {
        self.units
            .iter()
            .position(|unit| unit.position == tile)
            .map(UnitIndex)
    }

    pub(crate) fn is_occupied_by_other(&self, tile: TileCoord, except: UnitIndex) -> bool {
        self.iter()
            .any(|(index, unit)| index != except && unit.position == tile)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (UnitIndex, &Unit)> {
        self.units
            .iter()
            .enumerate()
            .map(|(index, unit)| (UnitIndex(index), unit))
    }

    /// Turn-advance hook: every unit may act again.
    pub(crate) fn reset_turn(&mut self) {
        for unit in &mut self.units {
            unit.has_moved = false;
        }
        debug!(unit_count = self.units.len(), "unit_turn_reset");
    }
}
