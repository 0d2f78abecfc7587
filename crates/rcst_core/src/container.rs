//! Zip container codec: `structure.json` plus an opaque `worldData.nbt`.

use std::io::{Cursor, Read, Write};

use serde_json::Value as JsonValue;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::core_api::{CoreError, CoreErrorCode};

pub const STRUCTURE_MEMBER: &str = "structure.json";
pub const WORLD_DATA_MEMBER: &str = "worldData.nbt";
pub const COMPRESSION_LEVEL: i64 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub structure: JsonValue,
    pub world_data: Vec<u8>,
}

impl Container {
    pub fn new(structure: JsonValue, world_data: Vec<u8>) -> Self {
        Self {
            structure,
            world_data,
        }
    }

    pub fn from_zip_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Archive,
                format!("not a zip archive: {e}"),
            )
        })?;

        let structure_bytes = read_member(&mut archive, STRUCTURE_MEMBER)?;
        let world_data = read_member(&mut archive, WORLD_DATA_MEMBER)?;
        let structure = decode_structure(&structure_bytes)?;

        Ok(Self {
            structure,
            world_data,
        })
    }

    pub fn structure_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(&self.structure).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Parse,
                format!("failed to encode {STRUCTURE_MEMBER}: {e}"),
            )
        })
    }

    pub fn to_zip_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let structure = self.structure_json_bytes()?;
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(COMPRESSION_LEVEL));

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        write_member(&mut writer, STRUCTURE_MEMBER, &structure, options)?;
        write_member(&mut writer, WORLD_DATA_MEMBER, &self.world_data, options)?;
        let cursor = writer.finish().map_err(|e| {
            CoreError::new(
                CoreErrorCode::Archive,
                format!("failed to finish archive: {e}"),
            )
        })?;
        Ok(cursor.into_inner())
    }
}

/// Whether `bytes` open as a zip archive at all.
pub fn is_zip_archive(bytes: &[u8]) -> bool {
    ZipArchive::new(Cursor::new(bytes)).is_ok()
}

pub fn decode_structure(bytes: &[u8]) -> Result<JsonValue, CoreError> {
    let structure: JsonValue = serde_json::from_slice(bytes).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Parse,
            format!("{STRUCTURE_MEMBER} is not valid JSON: {e}"),
        )
    })?;
    if !structure.is_object() {
        return Err(CoreError::new(
            CoreErrorCode::Parse,
            format!("{STRUCTURE_MEMBER} must hold a JSON object"),
        ));
    }
    Ok(structure)
}

fn read_member(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Vec<u8>, CoreError> {
    let mut member = archive.by_name(name).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Archive,
            format!("archive has no readable {name}: {e}"),
        )
    })?;
    let mut out = Vec::new();
    member.read_to_end(&mut out).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Archive,
            format!("failed to extract {name}: {e}"),
        )
    })?;
    Ok(out)
}

fn write_member(
    writer: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    bytes: &[u8],
    options: SimpleFileOptions,
) -> Result<(), CoreError> {
    writer.start_file(name, options).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Archive,
            format!("failed to start {name}: {e}"),
        )
    })?;
    writer.write_all(bytes).map_err(|e| {
        CoreError::new(CoreErrorCode::Io, format!("failed to write {name}: {e}"))
    })
}
