//! Integration tests for accessor decode over strided and interleaved views

use std::sync::Arc;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use pretty_assertions::assert_eq;
use rigkit_gltf::GltfError;
use rigkit_gltf::accessor::{Accessor, AttributeType, ComponentType, Element};
use rigkit_gltf::buffer::{Buffer, BufferView};
use test_case::test_case;

fn view_over(bytes: Vec<u8>) -> Arc<BufferView> {
    let len = bytes.len();
    Arc::new(BufferView::new(Arc::new(Buffer::from_bytes(bytes)), 0, len, None).unwrap())
}

/// FLOAT accessor over `len` zero bytes
fn zeroed_floats(
    len: usize,
    attribute_type: AttributeType,
    byte_offset: usize,
    byte_stride: usize,
    count: usize,
) -> rigkit_gltf::Result<Accessor> {
    let view = view_over(vec![0; len]);
    Accessor::new(view, ComponentType::Float, attribute_type, byte_offset, byte_stride, count)
}

fn encode(component_type: ComponentType, value: f32) -> Vec<u8> {
    match component_type {
        ComponentType::Byte => vec![value as i8 as u8],
        ComponentType::UnsignedByte => vec![value as u8],
        ComponentType::Short => (value as i16).to_le_bytes().to_vec(),
        ComponentType::UnsignedShort => (value as u16).to_le_bytes().to_vec(),
        ComponentType::UnsignedInt => (value as u32).to_le_bytes().to_vec(),
        ComponentType::Float => value.to_le_bytes().to_vec(),
    }
}

/// Components of element `index`, read through the typed API
fn components(accessor: &Accessor, index: usize) -> Vec<f32> {
    match accessor.attribute_type() {
        AttributeType::Scalar => vec![accessor.get_element::<f32>(index).unwrap()],
        AttributeType::Vec2 => element::<Vec2>(accessor, index).to_array().to_vec(),
        AttributeType::Vec3 => element::<Vec3>(accessor, index).to_array().to_vec(),
        AttributeType::Vec4 => element::<Vec4>(accessor, index).to_array().to_vec(),
        AttributeType::Mat2 => element::<Mat2>(accessor, index).to_cols_array().to_vec(),
        AttributeType::Mat3 => element::<Mat3>(accessor, index).to_cols_array().to_vec(),
        AttributeType::Mat4 => element::<Mat4>(accessor, index).to_cols_array().to_vec(),
    }
}

fn element<T: Element>(accessor: &Accessor, index: usize) -> T {
    accessor.get_element::<T>(index).unwrap()
}

const COMPONENT_TYPES: [ComponentType; 6] = [
    ComponentType::Byte,
    ComponentType::UnsignedByte,
    ComponentType::Short,
    ComponentType::UnsignedShort,
    ComponentType::UnsignedInt,
    ComponentType::Float,
];

const ATTRIBUTE_TYPES: [AttributeType; 7] = [
    AttributeType::Scalar,
    AttributeType::Vec2,
    AttributeType::Vec3,
    AttributeType::Vec4,
    AttributeType::Mat2,
    AttributeType::Mat3,
    AttributeType::Mat4,
];

/// Write four elements with distinct components at `stride` (0 for packed)
/// and check every one decodes back to what was written
fn assert_round_trip(component_type: ComponentType, attribute_type: AttributeType, stride: usize) {
    let count = 4;
    let component_count = attribute_type.component_count();
    let element_size = component_count * component_type.size();
    let step = if stride == 0 { element_size } else { stride };
    let signed = matches!(component_type, ComponentType::Byte | ComponentType::Short);

    // Filler bytes between elements must never leak into decoded values
    let mut bytes = Vec::new();
    let mut expected = Vec::new();
    for i in 0..count {
        let mut element = Vec::new();
        let mut values = Vec::new();
        for c in 0..component_count {
            let raw = (i * component_count + c) as f32;
            let value = if signed && c % 2 == 1 { -raw } else { raw };
            element.extend(encode(component_type, value));
            values.push(value);
        }
        element.resize(step, 0xAB);
        bytes.extend(element);
        expected.push(values);
    }

    let accessor =
        Accessor::new(view_over(bytes), component_type, attribute_type, 0, stride, count)
            .unwrap();
    assert_eq!(accessor.effective_stride(), step);
    for (i, values) in expected.iter().enumerate() {
        assert_eq!(
            &components(&accessor, i),
            values,
            "{component_type} {attribute_type} stride {stride} element {i}"
        );
    }
}

#[test_case(ComponentType::Float, AttributeType::Vec3, 16 ; "float vec3 padded to 16")]
#[test_case(ComponentType::Float, AttributeType::Mat4, 0 ; "float mat4 packed")]
#[test_case(ComponentType::UnsignedShort, AttributeType::Vec4, 12 ; "u16 vec4 padded to 12")]
#[test_case(ComponentType::Byte, AttributeType::Scalar, 4 ; "i8 scalar padded to 4")]
#[test_case(ComponentType::UnsignedByte, AttributeType::Vec2, 0 ; "u8 vec2 packed")]
#[test_case(ComponentType::Short, AttributeType::Mat3, 20 ; "i16 mat3 padded to 20")]
#[test_case(ComponentType::UnsignedInt, AttributeType::Scalar, 8 ; "u32 scalar padded to 8")]
fn test_decode_with_stride(
    component_type: ComponentType,
    attribute_type: AttributeType,
    stride: usize,
) {
    assert_round_trip(component_type, attribute_type, stride);
}

#[test]
fn test_every_component_and_attribute_type() {
    for component_type in COMPONENT_TYPES {
        for attribute_type in ATTRIBUTE_TYPES {
            let element_size = attribute_type.component_count() * component_type.size();
            // Next multiple of four past the element, so there is always padding
            let padded = (element_size / 4 + 1) * 4;
            assert_round_trip(component_type, attribute_type, 0);
            assert_round_trip(component_type, attribute_type, padded);
        }
    }
}

#[test]
fn test_interleaved_attributes() {
    // position (VEC3) and uv (VEC2) interleaved with a 20 byte stride
    let vertices = [
        ([1.0f32, 2.0, 3.0], [0.0f32, 1.0]),
        ([4.0, 5.0, 6.0], [0.5, 0.5]),
        ([7.0, 8.0, 9.0], [1.0, 0.0]),
    ];
    let bytes: Vec<u8> = vertices
        .iter()
        .flat_map(|(p, uv)| p.iter().chain(uv.iter()).flat_map(|v| v.to_le_bytes()))
        .collect();
    let view = view_over(bytes);

    let positions =
        Accessor::new(view.clone(), ComponentType::Float, AttributeType::Vec3, 0, 20, 3).unwrap();
    let uvs = Accessor::new(view, ComponentType::Float, AttributeType::Vec2, 12, 20, 3).unwrap();

    assert_eq!(
        positions.read_all::<Vec3>().unwrap(),
        vertices.iter().map(|(p, _)| Vec3::from_array(*p)).collect::<Vec<_>>()
    );
    assert_eq!(
        uvs.read_all::<Vec2>().unwrap(),
        vertices.iter().map(|(_, uv)| Vec2::from_array(*uv)).collect::<Vec<_>>()
    );

    let data = uvs.get_data(1, 2).unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data.stride(), 20);
    assert!(!data.is_contiguous());
    let second: Vec<u8> = [0.5f32, 0.5].iter().flat_map(|v| v.to_le_bytes()).collect();
    assert_eq!(data.element(0).unwrap(), &second[..]);
    assert_eq!(data.iter().count(), 2);
    // From the first uv to the end of the last
    assert_eq!(data.as_bytes().len(), 20 + 8);
}

#[test]
fn test_normalized_components() {
    let view = view_over(vec![255, 0, 128, 0x80, 0x7F, 0x81, 0x00, 0x00]);

    let unsigned = Accessor::new(
        view.clone(),
        ComponentType::UnsignedByte,
        AttributeType::Vec2,
        0,
        0,
        1,
    )
    .unwrap()
    .with_normalized(true);
    assert_eq!(unsigned.get_element::<Vec2>(0).unwrap(), Vec2::new(1.0, 0.0));

    let signed = Accessor::new(view, ComponentType::Byte, AttributeType::Vec4, 3, 0, 1)
        .unwrap()
        .with_normalized(true);
    let value = signed.get_element::<Vec4>(0).unwrap();
    // -128 clamps to -1, 127 maps to 1, -127 to -1
    assert_eq!(value.x, -1.0);
    assert_eq!(value.y, 1.0);
    assert_eq!(value.z, -1.0);
    assert_eq!(value.w, 0.0);
}

#[test]
fn test_index_past_count() {
    let accessor = zeroed_floats(12, AttributeType::Scalar, 0, 0, 3).unwrap();
    assert!(accessor.get_element::<f32>(2).is_ok());
    assert!(matches!(
        accessor.get_element::<f32>(3),
        Err(GltfError::IndexOutOfBounds { index: 3, len: 3, .. })
    ));
    assert!(matches!(
        accessor.get_data(2, 2),
        Err(GltfError::IndexOutOfBounds { .. })
    ));
}

#[test]
fn test_last_element_must_fit_view() {
    // 3 VEC2 floats with a 12 byte stride need 12 + 12 + 8 = 32 bytes
    assert!(zeroed_floats(32, AttributeType::Vec2, 0, 12, 3).is_ok());
    assert!(matches!(
        zeroed_floats(31, AttributeType::Vec2, 0, 12, 3),
        Err(GltfError::OutOfRange { .. })
    ));
    assert!(matches!(
        zeroed_floats(32, AttributeType::Vec2, 4, 12, 3),
        Err(GltfError::OutOfRange { .. })
    ));
}

#[test]
fn test_wrong_element_type() {
    let accessor = zeroed_floats(12, AttributeType::Vec3, 0, 0, 1).unwrap();
    assert!(matches!(
        accessor.get_element::<Vec4>(0),
        Err(GltfError::TypeMismatch { .. })
    ));
    assert!(matches!(
        accessor.read_all::<f32>(),
        Err(GltfError::TypeMismatch { .. })
    ));
}

#[test]
fn test_integer_scalars() {
    let bytes: Vec<u8> = [3u16, 0, 65535, 7].iter().flat_map(|v| v.to_le_bytes()).collect();
    let accessor = Accessor::new(
        view_over(bytes),
        ComponentType::UnsignedShort,
        AttributeType::Scalar,
        0,
        0,
        4,
    )
    .unwrap();
    assert_eq!(accessor.read_scalars_u32().unwrap(), vec![3, 0, 65535, 7]);

    let floats = zeroed_floats(4, AttributeType::Scalar, 0, 0, 1).unwrap();
    assert!(floats.get_u32(0).is_err());
}

#[test]
fn test_view_offset_applies() {
    let bytes: Vec<u8> = [9.0f32, 1.0, 2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
    let buffer = Arc::new(Buffer::from_bytes(bytes));
    let view = Arc::new(BufferView::new(buffer, 4, 8, None).unwrap());
    let accessor = Accessor::new(view, ComponentType::Float, AttributeType::Vec2, 0, 0, 1).unwrap();
    assert_eq!(accessor.get_element::<Vec2>(0).unwrap(), Vec2::new(1.0, 2.0));
}
