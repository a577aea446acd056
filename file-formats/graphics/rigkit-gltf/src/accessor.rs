//! Typed, strided views over buffer views
//!
//! An [`Accessor`] interprets the bytes of a [`BufferView`] as `count`
//! elements of one [`AttributeType`] built from [`ComponentType`] components.
//! Nothing is copied: every read computes its offset from the accessor's
//! metadata and slices the view on demand.
//!
//! Element `i` starts at `byte_offset + i * effective_stride`. The effective
//! stride is the declared stride when one is set, otherwise the tightly packed
//! element size, so interleaved vertex data and packed animation channels go
//! through the same arithmetic.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use glam::Vec3;
//! use rigkit_gltf::accessor::{Accessor, AttributeType, ComponentType};
//! use rigkit_gltf::buffer::{Buffer, BufferView};
//!
//! let bytes: Vec<u8> = [1.0f32, 2.0, 3.0]
//!     .iter()
//!     .flat_map(|v| v.to_le_bytes())
//!     .collect();
//! let buffer = Arc::new(Buffer::from_bytes(bytes));
//! let view = Arc::new(BufferView::new(buffer, 0, 12, None)?);
//! let accessor = Accessor::new(view, ComponentType::Float, AttributeType::Vec3, 0, 0, 1)?;
//!
//! assert_eq!(accessor.get_element::<Vec3>(0)?, Vec3::new(1.0, 2.0, 3.0));
//! # Ok::<(), rigkit_gltf::GltfError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian};
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::buffer::BufferView;
use crate::error::{GltfError, Result};

/// Largest number of components in one element (MAT4)
const MAX_COMPONENTS: usize = 16;

/// Numeric type of a single component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Signed 8-bit integer (5120)
    Byte,
    /// Unsigned 8-bit integer (5121)
    UnsignedByte,
    /// Signed 16-bit integer (5122)
    Short,
    /// Unsigned 16-bit integer (5123)
    UnsignedShort,
    /// Unsigned 32-bit integer (5125), used by index data
    UnsignedInt,
    /// 32-bit IEEE float (5126)
    Float,
}

impl ComponentType {
    /// Parse the GL enum value stored in `componentType`
    pub fn from_gl(value: u32) -> Result<Self> {
        match value {
            5120 => Ok(Self::Byte),
            5121 => Ok(Self::UnsignedByte),
            5122 => Ok(Self::Short),
            5123 => Ok(Self::UnsignedShort),
            5125 => Ok(Self::UnsignedInt),
            5126 => Ok(Self::Float),
            other => Err(GltfError::UnknownComponentType(other)),
        }
    }

    /// The GL enum value for this component type
    pub fn to_gl(self) -> u32 {
        match self {
            Self::Byte => 5120,
            Self::UnsignedByte => 5121,
            Self::Short => 5122,
            Self::UnsignedShort => 5123,
            Self::UnsignedInt => 5125,
            Self::Float => 5126,
        }
    }

    /// Size of one component in bytes
    pub fn size(self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::UnsignedInt | Self::Float => 4,
        }
    }

    /// Whether the component is an integer type
    pub fn is_integer(self) -> bool {
        !matches!(self, Self::Float)
    }

    /// Decode one little-endian component as `f32`
    ///
    /// `bytes` must hold exactly [`size`](Self::size) bytes. Integer values are
    /// converted raw unless `normalized` is set, in which case they map to
    /// `[0, 1]` (unsigned) or `[-1, 1]` (signed).
    fn decode(self, bytes: &[u8], normalized: bool) -> f32 {
        match (self, normalized) {
            (Self::Byte, false) => f32::from(bytes[0] as i8),
            (Self::Byte, true) => (f32::from(bytes[0] as i8) / 127.0).max(-1.0),
            (Self::UnsignedByte, false) => f32::from(bytes[0]),
            (Self::UnsignedByte, true) => f32::from(bytes[0]) / 255.0,
            (Self::Short, false) => f32::from(LittleEndian::read_i16(bytes)),
            (Self::Short, true) => (f32::from(LittleEndian::read_i16(bytes)) / 32767.0).max(-1.0),
            (Self::UnsignedShort, false) => f32::from(LittleEndian::read_u16(bytes)),
            (Self::UnsignedShort, true) => f32::from(LittleEndian::read_u16(bytes)) / 65535.0,
            (Self::UnsignedInt, false) => LittleEndian::read_u32(bytes) as f32,
            (Self::UnsignedInt, true) => LittleEndian::read_u32(bytes) as f32 / u32::MAX as f32,
            (Self::Float, _) => LittleEndian::read_f32(bytes),
        }
    }

    /// Decode one little-endian integer component without conversion
    fn decode_integer(self, bytes: &[u8]) -> Option<u32> {
        match self {
            Self::UnsignedByte => Some(u32::from(bytes[0])),
            Self::UnsignedShort => Some(u32::from(LittleEndian::read_u16(bytes))),
            Self::UnsignedInt => Some(LittleEndian::read_u32(bytes)),
            Self::Byte | Self::Short | Self::Float => None,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Byte => "BYTE",
            Self::UnsignedByte => "UNSIGNED_BYTE",
            Self::Short => "SHORT",
            Self::UnsignedShort => "UNSIGNED_SHORT",
            Self::UnsignedInt => "UNSIGNED_INT",
            Self::Float => "FLOAT",
        };
        f.write_str(name)
    }
}

/// Shape of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AttributeType {
    /// Parse the accessor `type` string
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "SCALAR" => Ok(Self::Scalar),
            "VEC2" => Ok(Self::Vec2),
            "VEC3" => Ok(Self::Vec3),
            "VEC4" => Ok(Self::Vec4),
            "MAT2" => Ok(Self::Mat2),
            "MAT3" => Ok(Self::Mat3),
            "MAT4" => Ok(Self::Mat4),
            other => Err(GltfError::UnknownAttributeType(other.to_string())),
        }
    }

    /// The accessor `type` string
    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
            Self::Mat2 => "MAT2",
            Self::Mat3 => "MAT3",
            Self::Mat4 => "MAT4",
        }
    }

    /// Number of components in one element
    pub fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value type an accessor element can be decoded into
///
/// Matrix components are column-major, as glTF stores them.
pub trait Element: Sized {
    /// The attribute type this value corresponds to
    const ATTRIBUTE_TYPE: AttributeType;

    /// Build the value from exactly `ATTRIBUTE_TYPE.component_count()` components
    fn from_components(components: &[f32]) -> Self;
}

impl Element for f32 {
    const ATTRIBUTE_TYPE: AttributeType = AttributeType::Scalar;

    fn from_components(components: &[f32]) -> Self {
        components[0]
    }
}

impl Element for Vec2 {
    const ATTRIBUTE_TYPE: AttributeType = AttributeType::Vec2;

    fn from_components(components: &[f32]) -> Self {
        Vec2::from_slice(components)
    }
}

impl Element for Vec3 {
    const ATTRIBUTE_TYPE: AttributeType = AttributeType::Vec3;

    fn from_components(components: &[f32]) -> Self {
        Vec3::from_slice(components)
    }
}

impl Element for Vec4 {
    const ATTRIBUTE_TYPE: AttributeType = AttributeType::Vec4;

    fn from_components(components: &[f32]) -> Self {
        Vec4::from_slice(components)
    }
}

impl Element for Mat2 {
    const ATTRIBUTE_TYPE: AttributeType = AttributeType::Mat2;

    fn from_components(components: &[f32]) -> Self {
        Mat2::from_cols_slice(components)
    }
}

impl Element for Mat3 {
    const ATTRIBUTE_TYPE: AttributeType = AttributeType::Mat3;

    fn from_components(components: &[f32]) -> Self {
        Mat3::from_cols_slice(components)
    }
}

impl Element for Mat4 {
    const ATTRIBUTE_TYPE: AttributeType = AttributeType::Mat4;

    fn from_components(components: &[f32]) -> Self {
        Mat4::from_cols_slice(components)
    }
}

/// A typed, strided view over one buffer view
#[derive(Debug, Clone)]
pub struct Accessor {
    buffer_view: Arc<BufferView>,
    component_type: ComponentType,
    attribute_type: AttributeType,
    byte_offset: usize,
    byte_stride: usize,
    count: usize,
    normalized: bool,
    min: Option<Vec<f32>>,
    max: Option<Vec<f32>>,
    name: Option<String>,
}

impl Accessor {
    /// Create an accessor and check that it fits inside its buffer view
    ///
    /// A `byte_stride` of zero means tightly packed. A non-zero stride smaller
    /// than one element is rejected, as are accessors whose last element ends
    /// past the end of the view.
    pub fn new(
        buffer_view: Arc<BufferView>,
        component_type: ComponentType,
        attribute_type: AttributeType,
        byte_offset: usize,
        byte_stride: usize,
        count: usize,
    ) -> Result<Self> {
        let accessor = Self {
            buffer_view,
            component_type,
            attribute_type,
            byte_offset,
            byte_stride,
            count,
            normalized: false,
            min: None,
            max: None,
            name: None,
        };

        if byte_stride > 0 && byte_stride < accessor.element_size() {
            return Err(GltfError::ValidationError(format!(
                "byte stride {} is smaller than the {} byte {} {} element",
                byte_stride,
                accessor.element_size(),
                component_type,
                attribute_type
            )));
        }

        let length = accessor.span_length(count).ok_or_else(|| {
            GltfError::range("accessor", byte_offset, usize::MAX, accessor.view_length())
        })?;
        if byte_offset
            .checked_add(length)
            .is_none_or(|end| end > accessor.view_length())
        {
            return Err(GltfError::range(
                "accessor",
                byte_offset,
                length,
                accessor.view_length(),
            ));
        }

        Ok(accessor)
    }

    /// Set the accessor name
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Map integer components to `[0, 1]` / `[-1, 1]` when decoding
    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Attach the per-component bounds declared by the asset
    pub fn with_bounds(mut self, min: Option<Vec<f32>>, max: Option<Vec<f32>>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// View the elements are read from
    pub fn buffer_view(&self) -> &Arc<BufferView> {
        &self.buffer_view
    }

    /// Storage type of each component
    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    /// Shape of each element
    pub fn attribute_type(&self) -> AttributeType {
        self.attribute_type
    }

    /// Offset of the first element within the view
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Declared stride; zero when tightly packed
    pub fn byte_stride(&self) -> usize {
        self.byte_stride
    }

    /// Number of elements
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the accessor has no elements
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether integer components map to [0, 1] or [-1, 1]
    pub fn normalized(&self) -> bool {
        self.normalized
    }

    /// Declared per-component minimum
    pub fn min(&self) -> Option<&[f32]> {
        self.min.as_deref()
    }

    /// Declared per-component maximum
    pub fn max(&self) -> Option<&[f32]> {
        self.max.as_deref()
    }

    /// Name given in the asset
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Components per element
    pub fn component_count(&self) -> usize {
        self.attribute_type.component_count()
    }

    /// Bytes per component
    pub fn component_size(&self) -> usize {
        self.component_type.size()
    }

    /// Bytes per tightly packed element
    pub fn element_size(&self) -> usize {
        self.component_count() * self.component_size()
    }

    /// Distance in bytes between the starts of consecutive elements
    pub fn effective_stride(&self) -> usize {
        if self.byte_stride > 0 {
            self.byte_stride
        } else {
            self.element_size()
        }
    }

    /// Number of bytes the accessor addresses, from its first element to the
    /// end of its last
    pub fn byte_length(&self) -> usize {
        self.span_length(self.count).unwrap_or(usize::MAX)
    }

    fn view_length(&self) -> usize {
        self.buffer_view.byte_length()
    }

    /// Bytes covered by `elements` consecutive elements; the last element
    /// does not need trailing stride padding
    fn span_length(&self, elements: usize) -> Option<usize> {
        if elements == 0 {
            return Some(0);
        }
        (elements - 1)
            .checked_mul(self.effective_stride())?
            .checked_add(self.element_size())
    }

    /// Offset of element `index` inside the view, with its end checked
    /// against the view length
    fn element_base(&self, index: usize) -> Result<usize> {
        if index >= self.count {
            return Err(GltfError::index(
                format!("accessor {}", self.name().unwrap_or("<unnamed>")),
                index,
                self.count,
            ));
        }

        let base = index
            .checked_mul(self.effective_stride())
            .and_then(|offset| offset.checked_add(self.byte_offset));
        match base {
            Some(base)
                if base
                    .checked_add(self.element_size())
                    .is_some_and(|end| end <= self.view_length()) =>
            {
                Ok(base)
            }
            _ => Err(GltfError::range(
                format!("accessor {} element {}", self.name().unwrap_or("<unnamed>"), index),
                base.unwrap_or(usize::MAX),
                self.element_size(),
                self.view_length(),
            )),
        }
    }

    /// Decode the components of element `index` into `out`
    fn read_components<'a>(
        &self,
        index: usize,
        out: &'a mut [f32; MAX_COMPONENTS],
    ) -> Result<&'a [f32]> {
        let base = self.element_base(index)?;
        let size = self.component_size();
        let bytes = &self.buffer_view.data()[base..base + self.element_size()];

        let count = self.component_count();
        for (slot, chunk) in out.iter_mut().zip(bytes.chunks_exact(size)) {
            *slot = self.component_type.decode(chunk, self.normalized);
        }
        Ok(&out[..count])
    }

    fn check_type<T: Element>(&self) -> Result<()> {
        if T::ATTRIBUTE_TYPE != self.attribute_type {
            return Err(GltfError::TypeMismatch {
                expected: T::ATTRIBUTE_TYPE.to_string(),
                actual: self.attribute_type.to_string(),
            });
        }
        Ok(())
    }

    /// Decode element `index` as `T`
    ///
    /// Fails if `T` does not match the attribute type, if `index >= count`, or
    /// if the element would end past the buffer view.
    pub fn get_element<T: Element>(&self, index: usize) -> Result<T> {
        self.check_type::<T>()?;
        let mut components = [0.0; MAX_COMPONENTS];
        let components = self.read_components(index, &mut components)?;
        Ok(T::from_components(components))
    }

    /// Decode every element as `T`
    pub fn read_all<T: Element>(&self) -> Result<Vec<T>> {
        self.check_type::<T>()?;
        (0..self.count).map(|i| self.get_element(i)).collect()
    }

    /// Decode element `index` of a scalar unsigned integer accessor, unconverted
    pub fn get_u32(&self, index: usize) -> Result<u32> {
        if self.attribute_type != AttributeType::Scalar {
            return Err(GltfError::TypeMismatch {
                expected: AttributeType::Scalar.to_string(),
                actual: self.attribute_type.to_string(),
            });
        }
        let base = self.element_base(index)?;
        let bytes = &self.buffer_view.data()[base..base + self.element_size()];
        self.component_type.decode_integer(bytes).ok_or_else(|| {
            GltfError::ValidationError(format!(
                "{} components cannot be read as unsigned integers",
                self.component_type
            ))
        })
    }

    /// Decode every element of a scalar unsigned integer accessor
    pub fn read_scalars_u32(&self) -> Result<Vec<u32>> {
        (0..self.count).map(|i| self.get_u32(i)).collect()
    }

    /// A raw, possibly strided byte view of `element_count` elements starting
    /// at `element_offset`
    pub fn get_data(
        &self,
        element_offset: usize,
        element_count: usize,
    ) -> Result<AccessorData<'_>> {
        let end = element_offset
            .checked_add(element_count)
            .filter(|&end| end <= self.count)
            .ok_or_else(|| {
                GltfError::index(
                    format!("accessor {} data", self.name().unwrap_or("<unnamed>")),
                    element_offset.saturating_add(element_count),
                    self.count,
                )
            })?;

        if element_count == 0 {
            return Ok(AccessorData {
                bytes: &[],
                stride: self.effective_stride(),
                element_size: self.element_size(),
                len: 0,
            });
        }

        let start = self.element_base(element_offset)?;
        // The last element carries the end-of-view check
        let last = self.element_base(end - 1)?;
        let stop = last + self.element_size();

        Ok(AccessorData {
            bytes: &self.buffer_view.data()[start..stop],
            stride: self.effective_stride(),
            element_size: self.element_size(),
            len: element_count,
        })
    }

    /// Check every decoded component against the declared `min`/`max`
    pub fn validate_bounds(&self) -> Result<()> {
        if self.min.is_none() && self.max.is_none() {
            return Ok(());
        }

        let count = self.component_count();
        for bounds in [&self.min, &self.max].into_iter().flatten() {
            if bounds.len() != count {
                return Err(GltfError::ValidationError(format!(
                    "accessor {} declares {} bounds for {} components",
                    self.name().unwrap_or("<unnamed>"),
                    bounds.len(),
                    count
                )));
            }
        }

        let mut components = [0.0; MAX_COMPONENTS];
        for index in 0..self.count {
            let values = self.read_components(index, &mut components)?;
            for (c, &value) in values.iter().enumerate() {
                let below = self.min.as_ref().is_some_and(|min| value < min[c] - f32::EPSILON);
                let above = self.max.as_ref().is_some_and(|max| value > max[c] + f32::EPSILON);
                if below || above {
                    return Err(GltfError::ValidationError(format!(
                        "accessor {} element {} component {} = {} lies outside its declared bounds",
                        self.name().unwrap_or("<unnamed>"),
                        index,
                        c,
                        value
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Raw bytes of a run of accessor elements
///
/// `as_bytes` spans from the start of the first element to the end of the
/// last; with a stride larger than the element size it includes the bytes of
/// interleaved neighbours, which [`element`](Self::element) and
/// [`iter`](Self::iter) skip.
#[derive(Debug, Clone, Copy)]
pub struct AccessorData<'a> {
    bytes: &'a [u8],
    stride: usize,
    element_size: usize,
    len: usize,
}

impl<'a> AccessorData<'a> {
    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distance in bytes between element starts
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Size in bytes of one element
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// True when elements are packed back to back
    pub fn is_contiguous(&self) -> bool {
        self.stride == self.element_size
    }

    /// Raw bytes from the first element to the end of the last
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Bytes of element `index`, relative to the start of this view
    pub fn element(&self, index: usize) -> Option<&'a [u8]> {
        if index >= self.len {
            return None;
        }
        let start = index * self.stride;
        self.bytes.get(start..start + self.element_size)
    }

    /// Iterate over the bytes of each element
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> {
        let data = *self;
        (0..self.len).filter_map(move |i| data.element(i))
    }
}
