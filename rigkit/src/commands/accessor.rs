//! `rigkit accessor`: decode one accessor's elements

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use rigkit_gltf::{Accessor, AttributeType};

use crate::commands::load_asset;
use crate::utils::{format_bytes, format_components};

pub fn execute(path: &Path, index: usize, limit: usize) -> Result<()> {
    let asset = load_asset(path)?;
    let accessor = asset
        .accessor(index)
        .with_context(|| format!("No accessor {index} in {}", path.display()))?;

    println!(
        "{} {} {}",
        style(format!("Accessor {index}")).bold().cyan(),
        accessor.attribute_type(),
        accessor.component_type()
    );
    if let Some(name) = accessor.name() {
        println!("Name: {name}");
    }
    println!("Count: {}", accessor.count());
    println!(
        "Offset: {}  Stride: {}  Span: {}",
        accessor.byte_offset(),
        accessor.effective_stride(),
        format_bytes(accessor.byte_length() as u64)
    );
    if let (Some(min), Some(max)) = (accessor.min(), accessor.max()) {
        println!("Bounds: {} .. {}", format_components(min), format_components(max));
    }
    println!();

    let shown = accessor.count().min(limit);
    for i in 0..shown {
        let components = element_components(accessor, i)
            .with_context(|| format!("Failed to decode element {i}"))?;
        println!("{i:>6}: {}", format_components(&components));
    }
    if accessor.count() > shown {
        println!("  ... and {} more", accessor.count() - shown);
    }

    Ok(())
}

/// Decode element `index` into its components, matrices column by column
fn element_components(accessor: &Accessor, index: usize) -> rigkit_gltf::Result<Vec<f32>> {
    Ok(match accessor.attribute_type() {
        AttributeType::Scalar => vec![accessor.get_element::<f32>(index)?],
        AttributeType::Vec2 => accessor.get_element::<Vec2>(index)?.to_array().to_vec(),
        AttributeType::Vec3 => accessor.get_element::<Vec3>(index)?.to_array().to_vec(),
        AttributeType::Vec4 => accessor.get_element::<Vec4>(index)?.to_array().to_vec(),
        AttributeType::Mat2 => accessor.get_element::<Mat2>(index)?.to_cols_array().to_vec(),
        AttributeType::Mat3 => accessor.get_element::<Mat3>(index)?.to_cols_array().to_vec(),
        AttributeType::Mat4 => accessor.get_element::<Mat4>(index)?.to_cols_array().to_vec(),
    })
}
