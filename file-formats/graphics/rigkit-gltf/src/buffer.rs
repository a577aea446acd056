//! Raw byte storage and the named sub-ranges accessors read from
//!
//! A [`Buffer`] owns one contiguous blob, loaded from a file, a `data:` URI or
//! the BIN chunk of a GLB. A [`BufferView`] is a checked window into a buffer.
//! Both are immutable once built and are shared through [`Arc`].

use std::sync::Arc;

use bytes::Bytes;

use crate::error::{GltfError, Result};

/// Hint for what a buffer view holds, from the glTF `target` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// Vertex attribute data (34962)
    ArrayBuffer,
    /// Index data (34963)
    ElementArrayBuffer,
}

impl BufferTarget {
    /// Map the GL enum value used by glTF to a target
    pub fn from_gl(value: u32) -> Option<Self> {
        match value {
            34962 => Some(Self::ArrayBuffer),
            34963 => Some(Self::ElementArrayBuffer),
            _ => None,
        }
    }
}

/// A contiguous byte blob
#[derive(Debug, Clone)]
pub struct Buffer {
    name: Option<String>,
    uri: Option<String>,
    byte_length: usize,
    data: Bytes,
}

impl Buffer {
    /// Create a buffer over `data`, declaring `byte_length` usable bytes
    ///
    /// Fails if the blob is shorter than the declared length. A longer blob is
    /// accepted (GLB BIN chunks are padded to four bytes) and truncated to the
    /// declared length.
    pub fn new(
        name: Option<String>,
        uri: Option<String>,
        byte_length: usize,
        data: impl Into<Bytes>,
    ) -> Result<Self> {
        let data: Bytes = data.into();
        if data.len() < byte_length {
            return Err(GltfError::range(
                format!("buffer {}", name.as_deref().unwrap_or("<unnamed>")),
                0,
                byte_length,
                data.len(),
            ));
        }

        Ok(Self {
            name,
            uri,
            byte_length,
            data: data.slice(..byte_length),
        })
    }

    /// Create an unnamed buffer whose length is the length of `data`
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data: Bytes = data.into();
        Self {
            name: None,
            uri: None,
            byte_length: data.len(),
            data,
        }
    }

    /// Buffer name, if the asset gave one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// URI the bytes were loaded from; `None` for GLB-embedded data
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Declared length in bytes
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// The buffer contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A sub-range of one [`Buffer`]
#[derive(Debug, Clone)]
pub struct BufferView {
    buffer: Arc<Buffer>,
    byte_offset: usize,
    byte_length: usize,
    byte_stride: Option<usize>,
    target: Option<BufferTarget>,
    name: Option<String>,
}

impl BufferView {
    /// Create a view, checking `byte_offset + byte_length <= buffer.byte_length`
    pub fn new(
        buffer: Arc<Buffer>,
        byte_offset: usize,
        byte_length: usize,
        name: Option<String>,
    ) -> Result<Self> {
        let end = byte_offset.checked_add(byte_length);
        if end.is_none_or(|end| end > buffer.byte_length()) {
            return Err(GltfError::range(
                format!("buffer view {}", name.as_deref().unwrap_or("<unnamed>")),
                byte_offset,
                byte_length,
                buffer.byte_length(),
            ));
        }

        Ok(Self {
            buffer,
            byte_offset,
            byte_length,
            byte_stride: None,
            target: None,
            name,
        })
    }

    /// Set the stride declared on the view (glTF 2.0 interleaving)
    pub fn with_byte_stride(mut self, byte_stride: Option<usize>) -> Self {
        self.byte_stride = byte_stride.filter(|&stride| stride > 0);
        self
    }

    /// Set the usage hint
    pub fn with_target(mut self, target: Option<BufferTarget>) -> Self {
        self.target = target;
        self
    }

    /// The buffer this view reads from
    pub fn buffer(&self) -> &Arc<Buffer> {
        &self.buffer
    }

    /// Offset of the view inside its buffer
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Length of the view in bytes
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// Stride declared on the view, if any
    pub fn byte_stride(&self) -> Option<usize> {
        self.byte_stride
    }

    /// Usage hint
    pub fn target(&self) -> Option<BufferTarget> {
        self.target
    }

    /// View name, if the asset gave one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The bytes covered by the view
    pub fn data(&self) -> &[u8] {
        &self.buffer.data()[self.byte_offset..self.byte_offset + self.byte_length]
    }

    /// The bytes covered by the view, starting `offset` bytes in
    pub fn data_at(&self, offset: usize) -> Result<&[u8]> {
        if offset > self.byte_length {
            return Err(GltfError::range(
                format!("buffer view {}", self.name().unwrap_or("<unnamed>")),
                offset,
                0,
                self.byte_length,
            ));
        }
        Ok(&self.data()[offset..])
    }
}
