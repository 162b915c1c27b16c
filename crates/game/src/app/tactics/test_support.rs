use std::cell::RefCell;
use std::rc::Rc;

use engine::{
    AudioCue, AudioCueSink, ClassTable, GameData, MapConfig, MapDefinition, MapLayer,
    StatBlockDef, TileAtlas, TileCoord, TileType, Tilemap, UnitPlacement, UnitTable, WeaponTable,
};
use serde_json::json;

use super::roster::{Faction, Stats, Unit};
use super::session::MapSession;

/// Audio sink that records cues so tests can count them after handing the sink
/// to a session.
#[derive(Debug, Clone, Default)]
pub(crate) struct CueLog(Rc<RefCell<Vec<AudioCue>>>);

impl CueLog {
    pub(crate) fn count(&self) -> usize {
        self.0.borrow().len()
    }
}

impl AudioCueSink for CueLog {
    fn play(&mut self, cue: AudioCue) {
        self.0.borrow_mut().push(cue);
    }
}

pub(crate) fn sample_game_data() -> GameData {
    let units: UnitTable = serde_json::from_value(json!({
        "player": {
            "sigurd": {
                "name": "Sigurd",
                "class": "lord",
                "level": 1,
                "stats": { "hp": 24, "str": 8, "skl": 7, "spd": 7, "def": 6, "mov": 3 },
                "current_inventory": ["iron_sword", "vulnerary"]
            },
            "alvis": {
                "name": "Alvis",
                "class": "mage",
                "level": 5,
                "stats": { "hp": 20, "mag": 9, "mov": 2 },
                "current_inventory": ["fire", "tyrfing"]
            }
        },
        "enemy": {
            "brigand": {
                "name": "Brigand",
                "class": "fighter",
                "current_inventory": ["iron_axe"]
            }
        }
    }))
    .expect("units");
    let weapons: WeaponTable = serde_json::from_value(json!({
        "generic": {
            "sword": [{
                "id": "iron_sword", "name": "Iron Sword",
                "might": 5, "hit": 90, "crit": 0, "weight": 5,
                "durability": 46, "range": [1]
            }],
            "axe": [{
                "id": "iron_axe", "name": "Iron Axe",
                "might": 8, "hit": 75, "weight": 10, "durability": 45, "range": [1]
            }]
        },
        "prf": {
            "sword": [{
                "id": "mystletainn", "name": "Mystletainn",
                "might": 12, "durability": 40, "range": [1], "user": ""
            }],
            "fire": [{
                "id": "tyrfing", "name": "Tyrfing",
                "might": 20, "durability": null, "range": [1, 2], "user": "alvis"
            }]
        },
        "attributed": {
            "fire": [{
                "id": "fire", "name": "Fire",
                "might": 5, "hit": 90, "durability": 40, "range": [1, 2]
            }]
        }
    }))
    .expect("weapons");
    let classes: ClassTable = serde_json::from_value(json!({
        "lord": [{ "name": "Lord", "weapon_types": ["sword"] }],
        "mage": [{ "name": "Mage", "weapon_types": ["fire", "thunder", "wind"] }],
        "fighter": [{ "name": "Fighter", "weapon_types": ["axe"] }]
    }))
    .expect("classes");
    GameData {
        units,
        weapons,
        classes,
    }
}

pub(crate) fn placement(unit_type: &str, unit_id: &str, x: i32, y: i32) -> UnitPlacement {
    UnitPlacement {
        unit_type: unit_type.to_string(),
        unit_id: unit_id.to_string(),
        sprite: format!("units/{unit_id}.png"),
        x,
        y,
    }
}

/// All-plains map of the given size.
pub(crate) fn open_field(width: u32, height: u32, placements: Vec<UnitPlacement>) -> MapDefinition {
    let tiles = vec![0; (width * height) as usize];
    let tilemap = Tilemap::new(
        width,
        height,
        vec![MapLayer {
            name: "ground".to_string(),
            visible: true,
            tiles,
        }],
    )
    .expect("tilemap");
    let atlas = TileAtlas::from_tile_types(
        32,
        vec![TileType {
            id: 0,
            name: "Plains".to_string(),
            ..TileType::default()
        }],
    );
    MapDefinition {
        name: "Test Field".to_string(),
        music: "music/field.ogg".to_string(),
        tilemap,
        atlas,
        placements,
    }
}

/// 10x10 field: Sigurd (0) at (1,1), Alvis (1) at (6,6), a brigand (2) at
/// (3,1) and Lex (3), who has no unit definition, at (8,8).
pub(crate) fn sample_session() -> (MapSession, CueLog) {
    let cues = CueLog::default();
    let definition = open_field(
        10,
        10,
        vec![
            placement("player", "sigurd", 1, 1),
            placement("player", "alvis", 6, 6),
            placement("enemy", "brigand", 3, 1),
            placement("player", "lex", 8, 8),
        ],
    );
    let session = MapSession::new(
        &definition,
        sample_game_data(),
        MapConfig::default(),
        Box::new(cues.clone()),
    );
    (session, cues)
}

pub(crate) fn unit_at(faction: Faction, position: TileCoord, mov: u32) -> Unit {
    Unit {
        faction,
        unit_id: "test".to_string(),
        name: "Test".to_string(),
        class_id: String::new(),
        class_name: String::new(),
        level: 1,
        sprite: String::new(),
        stats: Stats {
            mov,
            ..Stats::from(StatBlockDef::default())
        },
        position,
        inventory: Vec::new(),
        equipped: None,
        has_moved: false,
    }
}

pub(crate) fn unit_with_class(unit_id: &str, class_name: &str) -> Unit {
    Unit {
        unit_id: unit_id.to_string(),
        name: unit_id.to_string(),
        class_id: class_name.to_lowercase(),
        class_name: class_name.to_string(),
        ..unit_at(Faction::Player, TileCoord::new(0, 0), 5)
    }
}
