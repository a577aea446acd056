//! `rigkit info`: asset overview

use std::path::Path;

use anyhow::Result;
use console::style;
use rigkit_gltf::GltfAsset;
use rigkit_gltf::document::AnimationDef;

use crate::commands::load_asset;
use crate::utils::{add_table_row, create_table, describe_uri, format_bytes, print_section};

pub fn execute(path: &Path, detailed: bool) -> Result<()> {
    let asset = load_asset(path)?;
    let document = asset.document();

    println!("{}", style("glTF Asset Information").bold().cyan());
    println!("======================");
    println!("Path: {}", path.display());
    println!("Version: {}", document.asset.version);
    if let Some(generator) = &document.asset.generator {
        println!("Generator: {generator}");
    }
    let total: usize = asset.buffers().iter().map(|b| b.byte_length()).sum();
    println!(
        "Buffers: {} ({})",
        asset.buffers().len(),
        format_bytes(total as u64)
    );
    println!("Buffer views: {}", asset.buffer_views().len());
    println!("Accessors: {}", asset.accessors().len());
    println!("Nodes: {}", document.nodes.len());
    println!("Skins: {}", document.skins.len());
    println!("Animations: {}", document.animations.len());

    if detailed {
        print_buffers(&asset);
        print_views(&asset);
        print_accessors(&asset);
        print_skins(&asset);
        print_animations(&asset);
    }

    Ok(())
}

fn print_buffers(asset: &GltfAsset) {
    let mut table = create_table(&["#", "Name", "Source", "Size"]);
    for (i, buffer) in asset.buffers().iter().enumerate() {
        add_table_row(
            &mut table,
            vec![
                i.to_string(),
                buffer.name().unwrap_or("-").to_string(),
                describe_uri(buffer.uri()),
                format_bytes(buffer.byte_length() as u64),
            ],
        );
    }
    print_section("Buffers", &table);
}

fn print_views(asset: &GltfAsset) {
    let mut table = create_table(&["#", "Buffer", "Offset", "Length", "Stride", "Target"]);
    for (i, def) in asset.document().buffer_views.iter().enumerate() {
        add_table_row(
            &mut table,
            vec![
                i.to_string(),
                def.buffer.to_string(),
                def.byte_offset.to_string(),
                def.byte_length.to_string(),
                def.byte_stride.map_or("-".to_string(), |s| s.to_string()),
                def.target.map_or("-".to_string(), |t| t.to_string()),
            ],
        );
    }
    print_section("Buffer Views", &table);
}

fn print_accessors(asset: &GltfAsset) {
    let mut table = create_table(&[
        "#",
        "Name",
        "Type",
        "Component",
        "Count",
        "Stride",
        "Normalized",
    ]);
    for (i, accessor) in asset.accessors().iter().enumerate() {
        add_table_row(
            &mut table,
            vec![
                i.to_string(),
                accessor.name().unwrap_or("-").to_string(),
                accessor.attribute_type().to_string(),
                accessor.component_type().to_string(),
                accessor.count().to_string(),
                accessor.effective_stride().to_string(),
                if accessor.normalized() { "yes" } else { "no" }.to_string(),
            ],
        );
    }
    print_section("Accessors", &table);
}

fn print_skins(asset: &GltfAsset) {
    let mut table = create_table(&["#", "Name", "Joints", "Inverse binds", "Bind shape"]);
    for (i, skin) in asset.document().skins.iter().enumerate() {
        add_table_row(
            &mut table,
            vec![
                i.to_string(),
                skin.name.clone().unwrap_or_else(|| "-".to_string()),
                skin.joints.len().to_string(),
                skin.inverse_bind_matrices
                    .map_or("-".to_string(), |a| format!("accessor {a}")),
                if skin.bind_shape_matrix.is_some() { "yes" } else { "identity" }.to_string(),
            ],
        );
    }
    print_section("Skins", &table);
}

fn print_animations(asset: &GltfAsset) {
    let mut table = create_table(&["#", "Name", "Channels", "Samplers", "Duration"]);
    for (i, animation) in asset.document().animations.iter().enumerate() {
        let duration = animation_duration(asset, animation)
            .map_or("?".to_string(), |d| format!("{d:.3}s"));
        add_table_row(
            &mut table,
            vec![
                i.to_string(),
                animation.name.clone().unwrap_or_else(|| "-".to_string()),
                animation.channels.len().to_string(),
                animation.samplers.len().to_string(),
                duration,
            ],
        );
    }
    print_section("Animations", &table);
}

/// Latest input time across all samplers of an animation
fn animation_duration(asset: &GltfAsset, animation: &AnimationDef) -> Option<f32> {
    let mut duration = 0.0f32;
    for sampler in &animation.samplers {
        let times = asset.accessor(sampler.input).ok()?.read_all::<f32>().ok()?;
        duration = times.into_iter().fold(duration, f32::max);
    }
    Some(duration)
}
