use engine::{Durability, GameData, TileCoord, WeaponLookup, WeaponPartition};
use serde::Serialize;
use tracing::debug;

use super::roster::{Faction, Stats, Unit};

/// Flattened weapon record with the type key it was filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WeaponData {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) weapon_type: String,
    pub(crate) might: i32,
    pub(crate) hit: i32,
    pub(crate) crit: i32,
    pub(crate) weight: i32,
    pub(crate) durability: Durability,
    pub(crate) range: Vec<u32>,
    pub(crate) user: Option<String>,
    pub(crate) is_prf: bool,
}

impl WeaponData {
    /// Stand-in for ids missing from every partition (consumables, typos).
    fn unknown(weapon_id: &str) -> Self {
        Self {
            id: weapon_id.to_string(),
            name: weapon_id.to_string(),
            weapon_type: String::new(),
            might: 0,
            hit: 0,
            crit: 0,
            weight: 0,
            durability: Durability::default(),
            range: Vec::new(),
            user: None,
            is_prf: false,
        }
    }

    fn from_lookup(lookup: WeaponLookup<'_>) -> Self {
        let record = lookup.record;
        Self {
            id: record.id.clone(),
            name: record.name.clone().unwrap_or_else(|| record.id.clone()),
            weapon_type: lookup.weapon_type.to_string(),
            might: record.might,
            hit: record.hit,
            crit: record.crit,
            weight: record.weight,
            durability: record.durability,
            range: record.range.clone(),
            user: record.user.clone(),
            is_prf: lookup.partition == WeaponPartition::Prf,
        }
    }

    /// Personal weapons only restrict wielders when they name one.
    fn personal_user(&self) -> Option<&str> {
        if !self.is_prf {
            return None;
        }
        self.user.as_deref().filter(|user| !user.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct InventoryRow {
    pub(crate) item_id: String,
    pub(crate) name: String,
    pub(crate) weapon_type: String,
    pub(crate) might: i32,
    pub(crate) hit: i32,
    pub(crate) crit: i32,
    pub(crate) weight: i32,
    /// `None` for unbreakable weapons.
    pub(crate) uses: Option<u32>,
    pub(crate) range: Vec<u32>,
    pub(crate) equipped: bool,
    pub(crate) wieldable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct UnitInfoPanel {
    pub(crate) unit_id: String,
    pub(crate) name: String,
    pub(crate) class_name: String,
    pub(crate) level: u32,
    pub(crate) faction: Faction,
    pub(crate) position: TileCoord,
    pub(crate) has_moved: bool,
    pub(crate) stats: Stats,
    pub(crate) items: Vec<InventoryRow>,
}

/// Read-only view over the weapon and class tables. Lookups never fail; unknown
/// ids resolve to neutral defaults.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EquipmentResolver<'a> {
    data: &'a GameData,
}

impl<'a> EquipmentResolver<'a> {
    pub(crate) fn new(data: &'a GameData) -> Self {
        Self { data }
    }

    pub(crate) fn weapon_data(&self, weapon_id: &str) -> WeaponData {
        match self.data.weapons.find(weapon_id) {
            Some(lookup) => WeaponData::from_lookup(lookup),
            None => {
                debug!(weapon_id, "weapon_lookup_missing_using_default");
                WeaponData::unknown(weapon_id)
            }
        }
    }

    pub(crate) fn can_wield(&self, unit: &Unit, weapon: &WeaponData) -> bool {
        if let Some(user) = weapon.personal_user() {
            return user == unit.unit_id;
        }
        self.data
            .classes
            .classes()
            .filter(|&(class_id, record)| {
                record.name.as_deref().unwrap_or(class_id) == unit.class_name
            })
            .any(|(_, record)| {
                record
                    .weapon_types
                    .iter()
                    .any(|weapon_type| *weapon_type == weapon.weapon_type)
            })
    }

    pub(crate) fn can_wield_item(&self, unit: &Unit, item_id: &str) -> bool {
        self.can_wield(unit, &self.weapon_data(item_id))
    }

    pub(crate) fn class_display_name(&self, class_id: &str) -> String {
        self.data
            .classes
            .display_name(class_id)
            .unwrap_or(class_id)
            .to_string()
    }

    /// Index of the first inventory entry the unit may equip.
    pub(crate) fn first_wieldable(&self, unit: &Unit) -> Option<usize> {
        unit.inventory
            .iter()
            .position(|item_id| self.can_wield_item(unit, item_id))
    }

    pub(crate) fn inventory_rows(&self, unit: &Unit) -> Vec<InventoryRow> {
        unit.inventory
            .iter()
            .enumerate()
            .map(|(index, item_id)| {
                let weapon = self.weapon_data(item_id);
                let uses = match weapon.durability {
                    Durability::Finite(uses) => Some(uses),
                    Durability::Infinite => None,
                };
                InventoryRow {
                    item_id: item_id.clone(),
                    wieldable: self.can_wield(unit, &weapon),
                    equipped: unit.equipped == Some(index),
                    might: weapon.might,
                    hit: weapon.hit,
                    crit: weapon.crit,
                    weight: weapon.weight,
                    uses,
                    range: weapon.range,
                    name: weapon.name,
                    weapon_type: weapon.weapon_type,
                }
            })
            .collect()
    }

    pub(crate) fn unit_info_panel(&self, unit: &Unit) -> UnitInfoPanel {
        UnitInfoPanel {
            unit_id: unit.unit_id.clone(),
            name: unit.name.clone(),
            class_name: self.class_display_name(&unit.class_id),
            level: unit.level,
            faction: unit.faction,
            position: unit.position,
            has_moved: unit.has_moved,
            stats: unit.stats,
            items: self.inventory_rows(unit),
        }
    }
}
