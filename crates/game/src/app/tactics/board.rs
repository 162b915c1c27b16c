use engine::{GridBounds, MapDefinition, TileAtlas, TileCoord, TileType, Tilemap};
use serde::Serialize;

/// Static terrain of the loaded map. Units live in the roster, not here.
#[derive(Debug, Clone)]
pub(crate) struct Board {
    pub(crate) name: String,
    pub(crate) music: String,
    pub(crate) tile_size: u32,
    tilemap: Tilemap,
    atlas: TileAtlas,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct TerrainView {
    pub(crate) tile_id: i32,
    pub(crate) name: String,
    pub(crate) passable: bool,
    pub(crate) avoid_bonus: i32,
    pub(crate) defense_bonus: i32,
    /// Tile ids of the visible layers, bottom to top.
    pub(crate) layer_stack: Vec<i32>,
}

impl Board {
    pub(crate) fn from_definition(definition: &MapDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            music: definition.music.clone(),
            tile_size: definition.atlas.tile_size(),
            tilemap: definition.tilemap.clone(),
            atlas: definition.atlas.clone(),
        }
    }

    pub(crate) fn bounds(&self) -> GridBounds {
        self.tilemap.bounds()
    }

    pub(crate) fn tile_type_at(&self, tile: TileCoord) -> Option<&TileType> {
        let id = self.tilemap.tile_at(tile)?;
        self.atlas.tile_type(id)
    }

    /// Terrain readout for the tile under the cursor; `None` for empty cells and
    /// ids the atlas does not know.
    pub(crate) fn terrain_at(&self, tile: TileCoord) -> Option<TerrainView> {
        let tile_type = self.tile_type_at(tile)?;
        Some(TerrainView {
            tile_id: tile_type.id,
            name: tile_type.name.clone(),
            passable: tile_type.passable,
            avoid_bonus: tile_type.avoid_bonus,
            defense_bonus: tile_type.defense_bonus,
            layer_stack: self.tilemap.visible_stack_at(tile),
        })
    }
}
