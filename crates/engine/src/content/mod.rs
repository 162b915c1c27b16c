mod atlas;
mod database;
mod loader;
mod map;
mod tables;
mod tilemap;

pub use atlas::{load_atlas, TileAtlas, TileType, DEFAULT_TILE_SIZE};
pub use database::{GameData, CLASSES_FILE, UNITS_FILE, WEAPONS_FILE};
pub use loader::ContentLoadError;
pub use map::{load_map_definition, MapDefinition, UnitPlacement};
pub use tables::{
    load_class_table, load_unit_table, load_weapon_table, ClassRecord, ClassTable, Durability,
    StatBlockDef, UnitDef, UnitTable, WeaponLookup, WeaponPartition, WeaponRecord, WeaponTable,
};
pub use tilemap::{MapLayer, Tilemap, TilemapError};
