//! Binary glTF container
//!
//! A GLB file is a 12-byte header followed by 4-byte-aligned chunks:
//!
//! ```text
//! magic "glTF" | version 2 | total length
//! chunk length | chunk type "JSON" | JSON bytes (space padded)
//! chunk length | chunk type "BIN\0" | binary payload (zero padded)
//! ```

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use bytes::Bytes;
use log::{debug, warn};

use crate::error::{GltfError, Result};

/// "glTF" read as a little-endian u32
pub const GLB_MAGIC: u32 = 0x4654_6C67;
pub const GLB_VERSION: u32 = 2;
/// "JSON"
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// "BIN\0"
pub const CHUNK_BIN: u32 = 0x004E_4942;

const HEADER_SIZE: usize = 12;
const CHUNK_HEADER_SIZE: usize = 8;

/// Check whether `data` starts with the GLB magic
pub fn is_glb(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == GLB_MAGIC.to_le_bytes()
}

/// The JSON and binary chunks of a GLB file
#[derive(Debug, Clone)]
pub struct Glb {
    pub version: u32,
    pub json: Bytes,
    pub bin: Option<Bytes>,
}

impl Glb {
    /// Split a GLB file into its chunks
    ///
    /// The JSON chunk must come first. A second BIN chunk and chunks of
    /// unknown type are skipped with a warning.
    pub fn parse(data: impl Into<Bytes>) -> Result<Self> {
        let data: Bytes = data.into();
        if data.len() < HEADER_SIZE {
            return Err(GltfError::InvalidGlb(format!(
                "file is {} bytes, shorter than the GLB header",
                data.len()
            )));
        }

        let mut cursor = Cursor::new(&data[..]);
        let magic = cursor.read_u32::<LittleEndian>()?;
        if magic != GLB_MAGIC {
            return Err(GltfError::InvalidGlb(format!("bad magic 0x{magic:08X}")));
        }
        let version = cursor.read_u32::<LittleEndian>()?;
        if version != GLB_VERSION {
            return Err(GltfError::InvalidGlb(format!(
                "unsupported container version {version}"
            )));
        }
        let length = cursor.read_u32::<LittleEndian>()? as usize;
        if length > data.len() {
            return Err(GltfError::InvalidGlb(format!(
                "header declares {} bytes but the file has {}",
                length,
                data.len()
            )));
        }

        let mut json = None;
        let mut bin = None;
        let mut offset = HEADER_SIZE;
        while offset + CHUNK_HEADER_SIZE <= length {
            cursor.set_position(offset as u64);
            let chunk_length = cursor.read_u32::<LittleEndian>()? as usize;
            let chunk_type = cursor.read_u32::<LittleEndian>()?;
            let start = offset + CHUNK_HEADER_SIZE;
            let end = start
                .checked_add(chunk_length)
                .filter(|&end| end <= length)
                .ok_or_else(|| {
                    GltfError::InvalidGlb(format!(
                        "chunk at offset {offset} with length {chunk_length} runs past the end"
                    ))
                })?;

            match chunk_type {
                CHUNK_JSON if json.is_none() && offset == HEADER_SIZE => {
                    json = Some(data.slice(start..end));
                }
                CHUNK_JSON => {
                    return Err(GltfError::InvalidGlb(
                        "JSON chunk must be the first and only JSON chunk".to_string(),
                    ));
                }
                CHUNK_BIN if bin.is_none() => bin = Some(data.slice(start..end)),
                other => warn!("skipping GLB chunk 0x{other:08X} at offset {offset}"),
            }

            // Chunks are 4-byte aligned
            offset = end.next_multiple_of(4);
        }

        let json = json.ok_or_else(|| GltfError::InvalidGlb("missing JSON chunk".to_string()))?;
        debug!(
            "GLB container: {} bytes JSON, {} bytes BIN",
            json.len(),
            bin.as_ref().map_or(0, Bytes::len)
        );
        Ok(Self { version, json, bin })
    }

    /// Serialize a container, padding the JSON chunk with spaces and the
    /// binary chunk with zeros
    pub fn to_vec(&self) -> Vec<u8> {
        let json_padded = self.json.len().next_multiple_of(4);
        let bin_padded = self.bin.as_ref().map(|bin| bin.len().next_multiple_of(4));
        let total = HEADER_SIZE
            + CHUNK_HEADER_SIZE
            + json_padded
            + bin_padded.map_or(0, |len| CHUNK_HEADER_SIZE + len);

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());

        out.extend_from_slice(&(json_padded as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&self.json);
        out.resize(out.len() + json_padded - self.json.len(), b' ');

        if let (Some(bin), Some(padded)) = (&self.bin, bin_padded) {
            out.extend_from_slice(&(padded as u32).to_le_bytes());
            out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
            out.extend_from_slice(bin);
            out.resize(out.len() + padded - bin.len(), 0);
        }
        out
    }
}
