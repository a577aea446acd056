//! Common test utilities and fixtures

#![allow(dead_code)]

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use rigkit_gltf::glb::{GLB_VERSION, Glb};
use serde_json::{Value, json};

/// Assembles a small glTF asset with a single binary buffer
#[derive(Debug, Default)]
pub struct AssetBuilder {
    bin: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
    nodes: Vec<Value>,
    skins: Vec<Value>,
    animations: Vec<Value>,
}

impl AssetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes as a new buffer view, returning its index
    pub fn view(&mut self, bytes: &[u8], byte_stride: Option<usize>) -> usize {
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
        let mut view = json!({
            "buffer": 0,
            "byteOffset": self.bin.len(),
            "byteLength": bytes.len(),
        });
        if let Some(stride) = byte_stride {
            view["byteStride"] = json!(stride);
        }
        self.bin.extend_from_slice(bytes);
        self.views.push(view);
        self.views.len() - 1
    }

    /// Add an accessor definition as-is, returning its index
    pub fn accessor(&mut self, accessor: Value) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    /// Store tightly packed floats in their own view and add a FLOAT accessor
    pub fn floats(&mut self, values: &[f32], attribute_type: &str, components: usize) -> usize {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let view = self.view(&bytes, None);
        self.accessor(json!({
            "bufferView": view,
            "componentType": 5126,
            "count": values.len() / components,
            "type": attribute_type,
        }))
    }

    pub fn scalars(&mut self, values: &[f32]) -> usize {
        self.floats(values, "SCALAR", 1)
    }

    pub fn vec3s(&mut self, values: &[[f32; 3]]) -> usize {
        let flat: Vec<f32> = values.iter().flatten().copied().collect();
        self.floats(&flat, "VEC3", 3)
    }

    pub fn vec4s(&mut self, values: &[[f32; 4]]) -> usize {
        let flat: Vec<f32> = values.iter().flatten().copied().collect();
        self.floats(&flat, "VEC4", 4)
    }

    pub fn mat4s(&mut self, values: &[[f32; 16]]) -> usize {
        let flat: Vec<f32> = values.iter().flatten().copied().collect();
        self.floats(&flat, "MAT4", 16)
    }

    pub fn node(&mut self, node: Value) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn skin(&mut self, skin: Value) -> usize {
        self.skins.push(skin);
        self.skins.len() - 1
    }

    pub fn animation(&mut self, animation: Value) -> usize {
        self.animations.push(animation);
        self.animations.len() - 1
    }

    pub fn bin(&self) -> &[u8] {
        &self.bin
    }

    /// Document JSON; `uri` is the buffer URI, or `None` for a GLB BIN chunk
    pub fn document(&self, uri: Option<&str>) -> Value {
        let mut buffer = json!({ "byteLength": self.bin.len() });
        if let Some(uri) = uri {
            buffer["uri"] = json!(uri);
        }
        json!({
            "asset": { "version": "2.0", "generator": "rigkit tests" },
            "buffers": [buffer],
            "bufferViews": self.views,
            "accessors": self.accessors,
            "nodes": self.nodes,
            "skins": self.skins,
            "animations": self.animations,
        })
    }

    /// A `.gltf` file with the buffer embedded as a base64 data URI
    pub fn to_gltf(&self) -> Vec<u8> {
        let uri = format!(
            "data:application/octet-stream;base64,{}",
            STANDARD.encode(&self.bin)
        );
        serde_json::to_vec(&self.document(Some(&uri))).unwrap()
    }

    /// A `.gltf` file referencing the buffer at `uri`
    pub fn to_gltf_external(&self, uri: &str) -> Vec<u8> {
        serde_json::to_vec(&self.document(Some(uri))).unwrap()
    }

    pub fn to_glb(&self) -> Vec<u8> {
        Glb {
            version: GLB_VERSION,
            json: Bytes::from(serde_json::to_vec(&self.document(None)).unwrap()),
            bin: Some(Bytes::from(self.bin.clone())),
        }
        .to_vec()
    }
}

/// Column-major glTF translation matrix
pub fn gltf_translation(x: f32, y: f32, z: f32) -> [f32; 16] {
    [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        x, y, z, 1.0,
    ]
}

/// Three joints stacked one unit apart along +Y, each inverse bind undoing
/// its rest world position
pub fn chain_asset() -> AssetBuilder {
    let mut builder = AssetBuilder::new();
    builder.node(json!({ "name": "root", "translation": [0.0, 1.0, 0.0], "children": [1] }));
    builder.node(json!({ "name": "spine", "translation": [0.0, 1.0, 0.0], "children": [2] }));
    builder.node(json!({ "name": "head", "translation": [0.0, 1.0, 0.0] }));

    let inverse_binds = builder.mat4s(&[
        gltf_translation(0.0, -1.0, 0.0),
        gltf_translation(0.0, -2.0, 0.0),
        gltf_translation(0.0, -3.0, 0.0),
    ]);
    builder.skin(json!({
        "name": "body",
        "joints": [0, 1, 2],
        "inverseBindMatrices": inverse_binds,
    }));
    builder
}

/// Route library logs through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
