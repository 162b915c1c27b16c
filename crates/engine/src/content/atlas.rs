use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::loader::{read_json_file, ContentLoadError};

pub const DEFAULT_TILE_SIZE: u32 = 32;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TileType {
    pub id: i32,
    pub name: String,
    pub texture: String,
    pub passable: bool,
    pub move_cost: u32,
    pub avoid_bonus: i32,
    pub defense_bonus: i32,
}

impl Default for TileType {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            texture: String::new(),
            passable: true,
            move_cost: 1,
            avoid_bonus: 0,
            defense_bonus: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AtlasFile {
    #[serde(default = "default_tile_size")]
    tile_size: u32,
    #[serde(default)]
    tiles: Vec<TileType>,
}

pub(crate) fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}

/// Tile type registry. Immutable after load.
#[derive(Debug, Clone, Default)]
pub struct TileAtlas {
    tile_size: u32,
    tile_types: Vec<TileType>,
    index_by_id: HashMap<i32, usize>,
}

impl TileAtlas {
    pub fn from_tile_types(tile_size: u32, tile_types: Vec<TileType>) -> Self {
        let mut index_by_id = HashMap::with_capacity(tile_types.len());
        for (index, tile_type) in tile_types.iter().enumerate() {
            if index_by_id.insert(tile_type.id, index).is_some() {
                warn!(tile_id = tile_type.id, "atlas_duplicate_tile_id_last_wins");
            }
        }
        Self {
            tile_size,
            tile_types,
            index_by_id,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn tile_type(&self, id: i32) -> Option<&TileType> {
        self.index_by_id
            .get(&id)
            .and_then(|index| self.tile_types.get(*index))
    }

    pub fn tile_types(&self) -> &[TileType] {
        &self.tile_types
    }

    pub fn is_empty(&self) -> bool {
        self.tile_types.is_empty()
    }
}

pub fn load_atlas(path: &Path) -> Result<TileAtlas, ContentLoadError> {
    let file = read_json_file::<AtlasFile>(path)?;
    let atlas = TileAtlas::from_tile_types(file.tile_size, file.tiles);
    if atlas.is_empty() {
        warn!(path = %path.display(), "atlas_has_no_tile_types");
    }
    info!(
        path = %path.display(),
        tile_size = atlas.tile_size(),
        tile_type_count = atlas.tile_types().len(),
        "atlas_loaded"
    );
    Ok(atlas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_atlas_applies_field_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plains.json");
        fs::write(
            &path,
            r#"{"tiles":[{"id":1,"name":"Grass"},{"id":2,"name":"Wall","passable":false,"move_cost":99}]}"#,
        )
        .expect("write atlas");

        let atlas = load_atlas(&path).expect("atlas");
        assert_eq!(atlas.tile_size(), DEFAULT_TILE_SIZE);
        let grass = atlas.tile_type(1).expect("grass");
        assert!(grass.passable);
        assert_eq!(grass.move_cost, 1);
        let wall = atlas.tile_type(2).expect("wall");
        assert!(!wall.passable);
        assert_eq!(wall.move_cost, 99);
        assert!(atlas.tile_type(3).is_none());
    }

    #[test]
    fn atlas_without_tiles_still_loads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("void.json");
        fs::write(&path, r#"{"tile_size":24}"#).expect("write atlas");
        let atlas = load_atlas(&path).expect("atlas");
        assert!(atlas.is_empty());
        assert_eq!(atlas.tile_size(), 24);
    }

    #[test]
    fn malformed_atlas_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{"tile_size":"big"}"#).expect("write atlas");
        let err = load_atlas(&path).expect_err("parse");
        assert!(matches!(err, ContentLoadError::Parse { .. }));
    }
}
