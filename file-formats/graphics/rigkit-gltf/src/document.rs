//! glTF JSON schema
//!
//! Only the parts of a glTF document the decode path and the skeleton reader
//! consume are modelled. Unknown fields are ignored.

use serde::Deserialize;

use crate::error::{GltfError, Result};

/// Root of a glTF JSON document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GltfDocument {
    #[serde(default)]
    pub asset: AssetInfo,
    #[serde(default)]
    pub buffers: Vec<BufferDef>,
    #[serde(default)]
    pub buffer_views: Vec<BufferViewDef>,
    #[serde(default)]
    pub accessors: Vec<AccessorDef>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub skins: Vec<SkinDef>,
    #[serde(default)]
    pub animations: Vec<AnimationDef>,
    #[serde(default)]
    pub extensions_required: Vec<String>,
}

/// The `asset` block
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    #[serde(default)]
    pub version: String,
    pub generator: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferDef {
    pub uri: Option<String>,
    pub byte_length: usize,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferViewDef {
    pub buffer: usize,
    #[serde(default)]
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
    pub target: Option<u32>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorDef {
    pub buffer_view: Option<usize>,
    #[serde(default)]
    pub byte_offset: usize,
    /// Per-accessor stride, as older assets declare it
    pub byte_stride: Option<usize>,
    pub component_type: u32,
    #[serde(default)]
    pub normalized: bool,
    pub count: usize,
    #[serde(rename = "type")]
    pub attribute_type: String,
    pub min: Option<Vec<f32>>,
    pub max: Option<Vec<f32>>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDef {
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<usize>,
    /// Column-major 4x4 matrix
    pub matrix: Option<[f32; 16]>,
    pub translation: Option<[f32; 3]>,
    /// Unit quaternion `[x, y, z, w]`
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
    pub skin: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinDef {
    pub name: Option<String>,
    pub joints: Vec<usize>,
    pub inverse_bind_matrices: Option<usize>,
    /// Column-major bind shape matrix; identity when absent
    pub bind_shape_matrix: Option<[f32; 16]>,
    pub skeleton: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDef {
    pub name: Option<String>,
    pub channels: Vec<ChannelDef>,
    pub samplers: Vec<SamplerDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDef {
    pub sampler: usize,
    pub target: ChannelTargetDef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelTargetDef {
    pub node: Option<usize>,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerDef {
    pub input: usize,
    pub output: usize,
    #[serde(default = "default_interpolation")]
    pub interpolation: String,
}

fn default_interpolation() -> String {
    "LINEAR".to_string()
}

impl GltfDocument {
    /// Parse a document from JSON bytes
    pub fn from_slice(json: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }

    /// Look up a node, failing with a missing reference error
    pub fn node(&self, index: usize) -> Result<&NodeDef> {
        self.nodes.get(index).ok_or(GltfError::MissingReference {
            kind: "node",
            index,
        })
    }

    /// Look up a skin, failing with a missing reference error
    pub fn skin(&self, index: usize) -> Result<&SkinDef> {
        self.skins.get(index).ok_or(GltfError::MissingReference {
            kind: "skin",
            index,
        })
    }

    /// Index of the parent of every node, `None` for scene roots
    ///
    /// Fails if a node is listed as the child of two nodes or a child index
    /// does not resolve.
    pub fn node_parents(&self) -> Result<Vec<Option<usize>>> {
        let mut parents = vec![None; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                let slot = parents.get_mut(child).ok_or(GltfError::MissingReference {
                    kind: "node",
                    index: child,
                })?;
                if let Some(existing) = *slot {
                    return Err(GltfError::MalformedHierarchy(format!(
                        "node {child} is a child of both node {existing} and node {index}"
                    )));
                }
                *slot = Some(index);
            }
        }
        Ok(parents)
    }
}
