use tracing::info;

use crate::AppPaths;

use super::loader::ContentLoadError;
use super::tables::{
    load_class_table, load_unit_table, load_weapon_table, ClassTable, UnitTable, WeaponTable,
};

pub const UNITS_FILE: &str = "units.json";
pub const WEAPONS_FILE: &str = "weapons.json";
pub const CLASSES_FILE: &str = "classes.json";

/// Reference tables shared by every map: unit definitions, weapons and classes.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub units: UnitTable,
    pub weapons: WeaponTable,
    pub classes: ClassTable,
}

impl GameData {
    pub fn load(app_paths: &AppPaths) -> Result<Self, ContentLoadError> {
        let units = load_unit_table(&app_paths.data_dir.join(UNITS_FILE))?;
        let weapons = load_weapon_table(&app_paths.data_dir.join(WEAPONS_FILE))?;
        let classes = load_class_table(&app_paths.data_dir.join(CLASSES_FILE))?;
        info!(data_dir = %app_paths.data_dir.display(), "game_data_loaded");
        Ok(Self {
            units,
            weapons,
            classes,
        })
    }
}
