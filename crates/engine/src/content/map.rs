use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::app::TileCoord;
use crate::AppPaths;

use super::atlas::{default_tile_size, load_atlas, TileAtlas};
use super::loader::{read_json_file, ContentLoadError};
use super::tilemap::{MapLayer, Tilemap};

#[derive(Debug, Deserialize)]
struct MapFile {
    #[serde(default = "default_map_name")]
    name: String,
    #[serde(default)]
    music: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default = "default_tile_size")]
    tile_size: u32,
    #[serde(default)]
    atlas: Option<String>,
    #[serde(default)]
    layers: Vec<LayerEntry>,
    #[serde(default)]
    units: Vec<UnitPlacement>,
}

fn default_map_name() -> String {
    "Untitled Map".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LayerEntry {
    name: String,
    visible: bool,
    data: Vec<i32>,
}

impl Default for LayerEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            visible: true,
            data: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct UnitPlacement {
    #[serde(rename = "type")]
    pub unit_type: String,
    pub unit_id: String,
    pub sprite: String,
    pub x: i32,
    pub y: i32,
}

impl UnitPlacement {
    pub fn position(&self) -> TileCoord {
        TileCoord::new(self.x, self.y)
    }
}

/// A fully loaded map file with its atlas. Unit placements are raw; the game
/// merges them with the unit table. The atlas owns the tile size.
#[derive(Debug, Clone)]
pub struct MapDefinition {
    pub name: String,
    pub music: String,
    pub tilemap: Tilemap,
    pub atlas: TileAtlas,
    pub placements: Vec<UnitPlacement>,
}

pub fn load_map_definition(
    app_paths: &AppPaths,
    map_path: &Path,
) -> Result<MapDefinition, ContentLoadError> {
    let file = read_json_file::<MapFile>(map_path)?;

    let atlas_ref = file.atlas.ok_or_else(|| ContentLoadError::MissingAtlas {
        path: map_path.to_path_buf(),
    })?;
    let atlas = load_atlas(&app_paths.resolve(&atlas_ref))?;
    if file.tile_size != atlas.tile_size() {
        debug!(
            map_tile_size = file.tile_size,
            atlas_tile_size = atlas.tile_size(),
            "map_tile_size_overridden_by_atlas"
        );
    }

    let layers = file
        .layers
        .into_iter()
        .map(|layer| MapLayer {
            name: layer.name,
            visible: layer.visible,
            tiles: layer.data,
        })
        .collect::<Vec<_>>();
    let tilemap = Tilemap::new(file.width, file.height, layers).map_err(|source| {
        ContentLoadError::Tilemap {
            path: map_path.to_path_buf(),
            source,
        }
    })?;

    let bounds = tilemap.bounds();
    if let Some(stray) = file
        .units
        .iter()
        .find(|placement| !bounds.contains(placement.position()))
    {
        return Err(ContentLoadError::UnitOutOfBounds {
            path: map_path.to_path_buf(),
            unit_id: stray.unit_id.clone(),
            x: stray.x,
            y: stray.y,
            width: bounds.width,
            height: bounds.height,
        });
    }

    for layer in tilemap.layers() {
        info!(
            layer = %layer.name,
            tile_count = layer.tiles.len(),
            visible = layer.visible,
            "map_layer_loaded"
        );
    }
    info!(
        map = %file.name,
        width = tilemap.width(),
        height = tilemap.height(),
        unit_count = file.units.len(),
        "map_loaded"
    );

    Ok(MapDefinition {
        name: file.name,
        music: file.music,
        tilemap,
        atlas,
        placements: file.units,
    })
}
