use std::io;
use thiserror::Error;

/// Error types for glTF decoding and skeleton construction
#[derive(Error, Debug)]
pub enum GltfError {
    /// I/O Error while reading an asset or one of its external buffers
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The JSON part of the asset could not be deserialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A `data:` URI carried an invalid base64 payload
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Malformed binary glTF container
    #[error("Invalid GLB: {0}")]
    InvalidGlb(String),

    /// A buffer URI could not be resolved
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// An element or array index is past the end of its collection
    #[error("Index out of bounds: {context} (index: {index}, len: {len})")]
    IndexOutOfBounds {
        /// What was being indexed
        context: String,
        /// The offending index
        index: usize,
        /// Number of valid entries
        len: usize,
    },

    /// A byte range does not fit inside its parent range
    #[error("Range error: {context} (offset: {offset}, length: {length}, limit: {limit})")]
    OutOfRange {
        /// What was being addressed
        context: String,
        /// Start of the requested range
        offset: usize,
        /// Length of the requested range
        length: usize,
        /// Length of the enclosing range
        limit: usize,
    },

    /// An accessor was read as a type its attribute type does not describe
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Attribute type the caller asked for
        expected: String,
        /// Attribute type the accessor declares
        actual: String,
    },

    /// Unknown numeric `componentType`
    #[error("Unknown component type: {0}")]
    UnknownComponentType(u32),

    /// Unknown accessor `type` string
    #[error("Unknown attribute type: {0}")]
    UnknownAttributeType(String),

    /// A reference to another top-level glTF object does not resolve
    #[error("Missing reference: {kind} {index}")]
    MissingReference {
        /// Collection the index points into (e.g. "accessor")
        kind: &'static str,
        /// The dangling index
        index: usize,
    },

    /// Keyframe data that cannot drive playback
    #[error("Invalid animation: {0}")]
    InvalidAnimation(String),

    /// Bone hierarchy that is cyclic or not ordered parent-before-child
    #[error("Malformed hierarchy: {0}")]
    MalformedHierarchy(String),

    /// Error during validation
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl GltfError {
    pub(crate) fn index(context: impl Into<String>, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            context: context.into(),
            index,
            len,
        }
    }

    pub(crate) fn range(
        context: impl Into<String>,
        offset: usize,
        length: usize,
        limit: usize,
    ) -> Self {
        Self::OutOfRange {
            context: context.into(),
            offset,
            length,
            limit,
        }
    }
}

/// Result type using GltfError
pub type Result<T> = std::result::Result<T, GltfError>;
