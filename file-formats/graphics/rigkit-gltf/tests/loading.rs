//! Integration tests for loading .gltf and .glb assets

mod common;

use std::fs;

use common::{AssetBuilder, init_logging};
use glam::Vec3;
use pretty_assertions::assert_eq;
use rigkit_gltf::{GltfAsset, GltfError, LoadOptions};
use serde_json::json;

fn positions() -> AssetBuilder {
    let mut builder = AssetBuilder::new();
    builder.vec3s(&[[0.0, 0.0, 0.0], [1.0, 2.0, 3.0], [-4.0, 5.5, 6.25]]);
    builder
}

fn expected_positions() -> Vec<Vec3> {
    vec![
        Vec3::ZERO,
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(-4.0, 5.5, 6.25),
    ]
}

#[test]
fn test_glb_round_trip() {
    init_logging();
    let glb = positions().to_glb();
    let asset = GltfAsset::from_slice(glb, &LoadOptions::default()).unwrap();

    assert_eq!(asset.buffers().len(), 1);
    assert_eq!(asset.buffers()[0].uri(), None);
    assert_eq!(asset.document().asset.version, "2.0");
    let values = asset.accessor(0).unwrap().read_all::<Vec3>().unwrap();
    assert_eq!(values, expected_positions());
}

#[test]
fn test_data_uri_buffer() {
    let gltf = positions().to_gltf();
    let asset = GltfAsset::from_slice(gltf, &LoadOptions::default()).unwrap();

    assert_eq!(asset.buffers()[0].byte_length(), 36);
    let values = asset.accessor(0).unwrap().read_all::<Vec3>().unwrap();
    assert_eq!(values, expected_positions());
}

#[test]
fn test_open_gltf_with_external_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let builder = positions();
    fs::write(dir.path().join("mesh.bin"), builder.bin()).unwrap();
    let path = dir.path().join("mesh.gltf");
    fs::write(&path, builder.to_gltf_external("mesh.bin")).unwrap();

    let asset = GltfAsset::open(&path, &LoadOptions::default()).unwrap();
    assert_eq!(asset.buffers()[0].uri(), Some("mesh.bin"));
    let values = asset.accessor(0).unwrap().read_all::<Vec3>().unwrap();
    assert_eq!(values, expected_positions());
}

#[test]
fn test_open_glb_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mesh.glb");
    fs::write(&path, positions().to_glb()).unwrap();

    let asset = GltfAsset::open(&path, &LoadOptions::default()).unwrap();
    assert_eq!(asset.accessors().len(), 1);
}

#[test]
fn test_external_buffer_disallowed() {
    let dir = tempfile::tempdir().unwrap();
    let builder = positions();
    fs::write(dir.path().join("mesh.bin"), builder.bin()).unwrap();

    let options = LoadOptions::default()
        .with_base_dir(dir.path())
        .with_external_uris(false);
    let result = GltfAsset::from_slice(builder.to_gltf_external("mesh.bin"), &options);
    assert!(matches!(result, Err(GltfError::InvalidUri(_))));
}

#[test]
fn test_missing_external_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let options = LoadOptions::default().with_base_dir(dir.path());
    let result = GltfAsset::from_slice(positions().to_gltf_external("gone.bin"), &options);
    assert!(matches!(result, Err(GltfError::Io(_))));
}

#[test]
fn test_buffer_shorter_than_declared() {
    let builder = positions();
    let mut document = builder.document(Some("data:application/octet-stream;base64,AAAA"));
    document["buffers"][0]["byteLength"] = json!(36);
    let json = serde_json::to_vec(&document).unwrap();
    let result = GltfAsset::from_slice(json, &LoadOptions::default());
    assert!(matches!(result, Err(GltfError::OutOfRange { .. })));
}

#[test]
fn test_view_past_buffer_end() {
    let builder = positions();
    let mut document = builder.document(None);
    document["bufferViews"][0]["byteOffset"] = json!(8);
    let glb_json = serde_json::to_vec(&document).unwrap();
    let glb = rigkit_gltf::Glb {
        version: 2,
        json: glb_json.into(),
        bin: Some(builder.bin().to_vec().into()),
    };

    let result = GltfAsset::from_slice(glb.to_vec(), &LoadOptions::default());
    assert!(matches!(result, Err(GltfError::OutOfRange { .. })));
}

#[test]
fn test_min_max_validation() {
    let mut builder = positions();
    builder.accessor(json!({
        "bufferView": 0,
        "componentType": 5126,
        "count": 3,
        "type": "VEC3",
        "min": [-4.0, 0.0, 0.0],
        "max": [1.0, 5.0, 6.25],
    }));
    let gltf = builder.to_gltf();

    // Off by default
    assert!(GltfAsset::from_slice(gltf.clone(), &LoadOptions::default()).is_ok());

    let options = LoadOptions::default().with_min_max_validation(true);
    let result = GltfAsset::from_slice(gltf, &options);
    assert!(matches!(result, Err(GltfError::ValidationError(_))));
}

#[test]
fn test_invalid_json() {
    let result = GltfAsset::from_slice(&b"{ not json"[..], &LoadOptions::default());
    assert!(matches!(result, Err(GltfError::Json(_))));
}
