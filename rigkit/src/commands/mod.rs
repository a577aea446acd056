//! Command implementations

pub mod accessor;
pub mod info;
pub mod skeleton;

use std::path::Path;

use anyhow::{Context, Result};
use rigkit_gltf::{GltfAsset, LoadOptions};

/// Load a `.gltf` or `.glb` file, resolving external buffers next to it
pub(crate) fn load_asset(path: &Path) -> Result<GltfAsset> {
    log::info!("Loading asset: {}", path.display());
    GltfAsset::open(path, &LoadOptions::default())
        .with_context(|| format!("Failed to load glTF asset from {}", path.display()))
}
