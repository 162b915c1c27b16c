use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::tilemap::TilemapError;

#[derive(Debug, Error)]
pub enum ContentLoadError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path} at `{json_path}`: {message}")]
    Parse {
        path: PathBuf,
        json_path: String,
        message: String,
    },
    #[error("invalid tile layers in {path}: {source}")]
    Tilemap {
        path: PathBuf,
        #[source]
        source: TilemapError,
    },
    #[error("map {path} does not reference a tile atlas")]
    MissingAtlas { path: PathBuf },
    #[error(
        "map {path} places unit '{unit_id}' at ({x}, {y}), outside the {width}x{height} grid"
    )]
    UnitOutOfBounds {
        path: PathBuf,
        unit_id: String,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, ContentLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentLoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json_str(path, &raw)
}

pub(crate) fn parse_json_str<T: DeserializeOwned>(
    path: &Path,
    raw: &str,
) -> Result<T, ContentLoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        ContentLoadError::Parse {
            path: path.to_path_buf(),
            json_path,
            message: error.into_inner().to_string(),
        }
    })
}
