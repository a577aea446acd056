//! Asset loading
//!
//! [`GltfAsset`] pairs a parsed [`GltfDocument`] with its resolved buffers,
//! buffer views and accessors. Buffers come from the GLB BIN chunk, from
//! base64 `data:` URIs, or from files next to the asset.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use log::{debug, trace};

use crate::accessor::{Accessor, AttributeType, ComponentType};
use crate::buffer::{Buffer, BufferTarget, BufferView};
use crate::document::GltfDocument;
use crate::error::{GltfError, Result};
use crate::glb::{self, Glb};

/// Options controlling how an asset and its buffers are loaded
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Directory relative buffer URIs resolve against
    pub base_dir: Option<PathBuf>,
    /// Allow buffers that live in separate files
    pub allow_external_uris: bool,
    /// Check decoded accessor data against declared `min`/`max`
    pub validate_min_max: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            base_dir: None,
            allow_external_uris: true,
            validate_min_max: false,
        }
    }
}

impl LoadOptions {
    /// Set the directory relative buffer URIs resolve against
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Allow or refuse buffer URIs that point at files
    pub fn with_external_uris(mut self, allow: bool) -> Self {
        self.allow_external_uris = allow;
        self
    }

    /// Check accessor data against declared min/max on load
    pub fn with_min_max_validation(mut self, validate: bool) -> Self {
        self.validate_min_max = validate;
        self
    }
}

/// A parsed glTF document with every buffer, view and accessor resolved
#[derive(Debug, Clone)]
pub struct GltfAsset {
    document: GltfDocument,
    buffers: Vec<Arc<Buffer>>,
    buffer_views: Vec<Arc<BufferView>>,
    accessors: Vec<Accessor>,
}

impl GltfAsset {
    /// Load a `.gltf` or `.glb` file
    ///
    /// Relative buffer URIs resolve against `options.base_dir`, or the file's
    /// directory when unset.
    pub fn open<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading glTF asset {}", path.display());
        let data = fs::read(path)?;

        let mut options = options.clone();
        if options.base_dir.is_none() {
            options.base_dir = path.parent().map(Path::to_path_buf);
        }
        Self::from_slice(data, &options)
    }

    /// Load an asset from memory, detecting GLB by its magic
    pub fn from_slice(data: impl Into<Bytes>, options: &LoadOptions) -> Result<Self> {
        let data: Bytes = data.into();
        if glb::is_glb(&data) {
            let container = Glb::parse(data)?;
            let document = GltfDocument::from_slice(&container.json)?;
            Self::from_document(document, container.bin, options)
        } else {
            let document = GltfDocument::from_slice(&data)?;
            Self::from_document(document, None, options)
        }
    }

    /// Resolve the buffers, views and accessors of a parsed document
    ///
    /// `bin` is the GLB binary chunk; it backs the first buffer when that
    /// buffer has no URI.
    pub fn from_document(
        document: GltfDocument,
        bin: Option<Bytes>,
        options: &LoadOptions,
    ) -> Result<Self> {
        if !document.extensions_required.is_empty() {
            return Err(GltfError::ValidationError(format!(
                "required extensions are not supported: {}",
                document.extensions_required.join(", ")
            )));
        }

        let mut bin = bin;
        let mut buffers = Vec::with_capacity(document.buffers.len());
        for (index, def) in document.buffers.iter().enumerate() {
            let data = match def.uri.as_deref() {
                Some(uri) => load_uri(uri, options)?,
                None if index == 0 => bin.take().ok_or_else(|| {
                    GltfError::InvalidGlb("buffer 0 has no URI and no BIN chunk".to_string())
                })?,
                None => {
                    return Err(GltfError::InvalidUri(format!(
                        "buffer {index} has no URI"
                    )));
                }
            };
            trace!("buffer {}: {} bytes", index, def.byte_length);
            buffers.push(Arc::new(Buffer::new(
                def.name.clone(),
                def.uri.clone(),
                def.byte_length,
                data,
            )?));
        }

        let mut buffer_views = Vec::with_capacity(document.buffer_views.len());
        for def in &document.buffer_views {
            let buffer = buffers.get(def.buffer).ok_or(GltfError::MissingReference {
                kind: "buffer",
                index: def.buffer,
            })?;
            let view = BufferView::new(
                buffer.clone(),
                def.byte_offset,
                def.byte_length,
                def.name.clone(),
            )?
            .with_byte_stride(def.byte_stride)
            .with_target(def.target.and_then(BufferTarget::from_gl));
            buffer_views.push(Arc::new(view));
        }

        let mut accessors = Vec::with_capacity(document.accessors.len());
        for (index, def) in document.accessors.iter().enumerate() {
            let view_index = def.buffer_view.ok_or_else(|| {
                GltfError::ValidationError(format!(
                    "accessor {index} has no bufferView (sparse or zero-filled)"
                ))
            })?;
            let view = buffer_views.get(view_index).ok_or(GltfError::MissingReference {
                kind: "bufferView",
                index: view_index,
            })?;

            let stride = def.byte_stride.or(view.byte_stride()).unwrap_or(0);
            let accessor = Accessor::new(
                view.clone(),
                ComponentType::from_gl(def.component_type)?,
                AttributeType::from_name(&def.attribute_type)?,
                def.byte_offset,
                stride,
                def.count,
            )?
            .with_name(def.name.clone())
            .with_normalized(def.normalized)
            .with_bounds(def.min.clone(), def.max.clone());

            if options.validate_min_max {
                accessor.validate_bounds()?;
            }
            accessors.push(accessor);
        }

        debug!(
            "resolved {} buffers, {} buffer views, {} accessors",
            buffers.len(),
            buffer_views.len(),
            accessors.len()
        );

        Ok(Self {
            document,
            buffers,
            buffer_views,
            accessors,
        })
    }

    /// Parsed JSON document
    pub fn document(&self) -> &GltfDocument {
        &self.document
    }

    /// Resolved buffers, in document order
    pub fn buffers(&self) -> &[Arc<Buffer>] {
        &self.buffers
    }

    /// Resolved buffer views, in document order
    pub fn buffer_views(&self) -> &[Arc<BufferView>] {
        &self.buffer_views
    }

    /// Resolved accessors, in document order
    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    /// Look up an accessor, failing with a missing reference error
    pub fn accessor(&self, index: usize) -> Result<&Accessor> {
        self.accessors.get(index).ok_or(GltfError::MissingReference {
            kind: "accessor",
            index,
        })
    }
}

/// Fetch the bytes behind a buffer URI
fn load_uri(uri: &str, options: &LoadOptions) -> Result<Bytes> {
    if let Some(rest) = uri.strip_prefix("data:") {
        return decode_data_uri(rest).map(Bytes::from);
    }

    if uri.contains("://") {
        return Err(GltfError::InvalidUri(format!(
            "only data URIs and relative paths are supported: {uri}"
        )));
    }
    if !options.allow_external_uris {
        return Err(GltfError::InvalidUri(format!(
            "external buffer {uri} is not allowed"
        )));
    }

    let path = match &options.base_dir {
        Some(base) => base.join(uri),
        None => PathBuf::from(uri),
    };
    debug!("reading external buffer {}", path.display());
    Ok(Bytes::from(fs::read(&path)?))
}

/// Decode the part of a `data:` URI after the scheme
///
/// Format: `[<mediatype>][;base64],<data>`. Only base64 payloads are accepted.
fn decode_data_uri(rest: &str) -> Result<Vec<u8>> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| GltfError::InvalidUri("data URI without a comma".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(GltfError::InvalidUri(format!(
            "data URI is not base64 encoded: data:{header}"
        )));
    }
    Ok(STANDARD.decode(payload)?)
}
