use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::info;

use super::loader::{read_json_file, ContentLoadError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatBlockDef {
    pub hp: u32,
    pub str: u32,
    pub mag: u32,
    pub skl: u32,
    pub spd: u32,
    pub lck: u32,
    pub def: u32,
    pub res: u32,
    pub con: u32,
    pub mov: u32,
}

impl Default for StatBlockDef {
    fn default() -> Self {
        Self {
            hp: 20,
            str: 5,
            mag: 5,
            skl: 5,
            spd: 5,
            lck: 5,
            def: 5,
            res: 5,
            con: 5,
            mov: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UnitDef {
    pub name: String,
    pub class: String,
    pub level: u32,
    pub stats: StatBlockDef,
    pub current_inventory: Vec<String>,
}

impl Default for UnitDef {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            class: String::new(),
            level: 1,
            stats: StatBlockDef::default(),
            current_inventory: Vec::new(),
        }
    }
}

/// `units.json`: faction type, then unit id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct UnitTable {
    by_type: BTreeMap<String, BTreeMap<String, UnitDef>>,
}

impl UnitTable {
    pub fn unit_def(&self, unit_type: &str, unit_id: &str) -> Option<&UnitDef> {
        self.by_type.get(unit_type)?.get(unit_id)
    }

    pub fn unit_count(&self) -> usize {
        self.by_type.values().map(BTreeMap::len).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    Finite(u32),
    Infinite,
}

impl Default for Durability {
    fn default() -> Self {
        Self::Finite(0)
    }
}

fn durability_or_infinite<'de, D>(deserializer: D) -> Result<Durability, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<u32>::deserialize(deserializer)?;
    Ok(value.map_or(Durability::Infinite, Durability::Finite))
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct WeaponRecord {
    pub id: String,
    pub name: Option<String>,
    pub might: i32,
    pub hit: i32,
    pub crit: i32,
    pub weight: i32,
    #[serde(deserialize_with = "durability_or_infinite")]
    pub durability: Durability,
    pub range: Vec<u32>,
    pub user: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponPartition {
    Generic,
    Prf,
    Attributed,
}

impl WeaponPartition {
    pub const SEARCH_ORDER: [WeaponPartition; 3] = [
        WeaponPartition::Generic,
        WeaponPartition::Prf,
        WeaponPartition::Attributed,
    ];
}

type WeaponsByType = BTreeMap<String, Vec<WeaponRecord>>;

/// `weapons.json`: partition, then weapon type, then records.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeaponTable {
    generic: WeaponsByType,
    prf: WeaponsByType,
    attributed: WeaponsByType,
}

#[derive(Debug, Clone, Copy)]
pub struct WeaponLookup<'a> {
    pub partition: WeaponPartition,
    pub weapon_type: &'a str,
    pub record: &'a WeaponRecord,
}

impl WeaponTable {
    pub fn partition(&self, partition: WeaponPartition) -> &WeaponsByType {
        match partition {
            WeaponPartition::Generic => &self.generic,
            WeaponPartition::Prf => &self.prf,
            WeaponPartition::Attributed => &self.attributed,
        }
    }

    /// First match in generic, prf, attributed order.
    pub fn find(&self, weapon_id: &str) -> Option<WeaponLookup<'_>> {
        WeaponPartition::SEARCH_ORDER
            .into_iter()
            .find_map(|partition| {
                self.partition(partition)
                    .iter()
                    .find_map(|(weapon_type, records)| {
                        records
                            .iter()
                            .find(|record| record.id == weapon_id)
                            .map(|record| WeaponLookup {
                                partition,
                                weapon_type: weapon_type.as_str(),
                                record,
                            })
                    })
            })
    }

    pub fn weapon_count(&self) -> usize {
        WeaponPartition::SEARCH_ORDER
            .into_iter()
            .map(|partition| self.partition(partition).values().map(Vec::len).sum::<usize>())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ClassRecord {
    pub name: Option<String>,
    pub weapon_types: Vec<String>,
}

/// `classes.json`: class id to a list whose first entry is the class itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ClassTable {
    by_id: BTreeMap<String, Vec<ClassRecord>>,
}

impl ClassTable {
    pub fn class(&self, class_id: &str) -> Option<&ClassRecord> {
        self.by_id.get(class_id)?.first()
    }

    pub fn display_name(&self, class_id: &str) -> Option<&str> {
        self.class(class_id)?.name.as_deref()
    }

    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassRecord)> {
        self.by_id
            .iter()
            .filter_map(|(class_id, records)| records.first().map(|record| (class_id.as_str(), record)))
    }
}

pub fn load_unit_table(path: &Path) -> Result<UnitTable, ContentLoadError> {
    let table = read_json_file::<UnitTable>(path)?;
    info!(path = %path.display(), unit_count = table.unit_count(), "unit_table_loaded");
    Ok(table)
}

pub fn load_weapon_table(path: &Path) -> Result<WeaponTable, ContentLoadError> {
    let table = read_json_file::<WeaponTable>(path)?;
    info!(path = %path.display(), weapon_count = table.weapon_count(), "weapon_table_loaded");
    Ok(table)
}

pub fn load_class_table(path: &Path) -> Result<ClassTable, ContentLoadError> {
    let table = read_json_file::<ClassTable>(path)?;
    info!(path = %path.display(), class_count = table.classes().count(), "class_table_loaded");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::parse_json_str;

    fn parse<T: serde::de::DeserializeOwned>(raw: &str) -> T {
        parse_json_str(Path::new("inline.json"), raw).expect("parse")
    }

    #[test]
    fn weapon_durability_null_means_infinite() {
        let table: WeaponTable = parse(
            r#"{"generic":{"sword":[
                {"id":"iron_sword","name":"Iron Sword","might":5,"durability":46,"range":[1]},
                {"id":"wooden_sword","durability":null},
                {"id":"rusty_sword"}
            ]}}"#,
        );
        let iron = table.find("iron_sword").expect("iron");
        assert_eq!(iron.record.durability, Durability::Finite(46));
        assert_eq!(iron.weapon_type, "sword");
        assert_eq!(
            table.find("wooden_sword").expect("wooden").record.durability,
            Durability::Infinite
        );
        assert_eq!(
            table.find("rusty_sword").expect("rusty").record.durability,
            Durability::Finite(0)
        );
    }

    #[test]
    fn find_prefers_generic_over_prf_and_attributed() {
        let table: WeaponTable = parse(
            r#"{
                "attributed":{"lance":[{"id":"shared","name":"Attributed"}]},
                "prf":{"sword":[{"id":"shared","name":"Personal","user":"alvis"},{"id":"mine","user":"alvis"}]},
                "generic":{"axe":[{"id":"shared","name":"Generic"}]}
            }"#,
        );
        let shared = table.find("shared").expect("shared");
        assert_eq!(shared.partition, WeaponPartition::Generic);
        assert_eq!(shared.weapon_type, "axe");

        let mine = table.find("mine").expect("mine");
        assert_eq!(mine.partition, WeaponPartition::Prf);
        assert_eq!(mine.record.user.as_deref(), Some("alvis"));
        assert!(table.find("missing").is_none());
        assert_eq!(table.weapon_count(), 4);
    }

    #[test]
    fn unit_defs_fill_missing_stats_with_defaults() {
        let table: UnitTable = parse(
            r#"{"player":{"alvis":{"name":"Alvis","class":"lord","stats":{"hp":22,"mov":6}}}}"#,
        );
        let alvis = table.unit_def("player", "alvis").expect("alvis");
        assert_eq!(alvis.level, 1);
        assert_eq!(alvis.stats.hp, 22);
        assert_eq!(alvis.stats.mov, 6);
        assert_eq!(alvis.stats.str, 5);
        assert!(table.unit_def("enemy", "alvis").is_none());
    }

    #[test]
    fn class_table_exposes_first_record() {
        let table: ClassTable = parse(
            r#"{"lord":[{"name":"Lord","weapon_types":["sword"]},{"name":"Promoted"}],"empty":[]}"#,
        );
        assert_eq!(table.display_name("lord"), Some("Lord"));
        assert!(table.class("empty").is_none());
        assert_eq!(table.classes().count(), 1);
    }
}
