//! `rigkit skeleton`: joint hierarchy and animated skin matrices

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use console::style;
use rigkit_gltf::{AnimationSelector, GltfAsset, ReaderOptions, Skeleton, SkeletonReader};
use serde::Serialize;

use crate::commands::load_asset;
use crate::utils::{NodeType, TreeNode, TreeOptions, format_matrix_rows, render_tree};

#[derive(Subcommand)]
pub enum SkeletonCommands {
    /// Display the joint hierarchy of a skin
    Tree {
        /// Path to the .gltf or .glb file
        file: PathBuf,

        /// Skin index
        #[arg(short, long, default_value = "0")]
        skin: usize,

        /// Animation to mark animated joints with (name or index)
        #[arg(short, long)]
        animation: Option<String>,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Show joint details inline
        #[arg(long)]
        compact: bool,
    },

    /// Play an animation and print the resulting joint matrices
    Animate {
        /// Path to the .gltf or .glb file
        file: PathBuf,

        /// Skin index
        #[arg(short, long, default_value = "0")]
        skin: usize,

        /// Animation to play (name or index), defaults to the first
        #[arg(short, long)]
        animation: Option<String>,

        /// Number of updates to run
        #[arg(short, long, default_value = "60")]
        frames: u32,

        /// Seconds per update
        #[arg(long, default_value = "0.016666668")]
        dt: f32,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub fn execute(command: SkeletonCommands) -> Result<()> {
    match command {
        SkeletonCommands::Tree {
            file,
            skin,
            animation,
            depth,
            no_color,
            compact,
        } => handle_tree(&file, skin, animation.as_deref(), depth, no_color, compact),
        SkeletonCommands::Animate {
            file,
            skin,
            animation,
            frames,
            dt,
            json,
        } => handle_animate(&file, skin, animation.as_deref(), frames, dt, json),
    }
}

/// A numeric value selects by index, anything else by name
fn parse_selector(animation: Option<&str>) -> AnimationSelector {
    match animation {
        None => AnimationSelector::First,
        Some(value) => match value.parse::<usize>() {
            Ok(index) => AnimationSelector::Index(index),
            Err(_) => AnimationSelector::Name(value.to_string()),
        },
    }
}

fn read_skeleton(asset: &GltfAsset, skin: usize, animation: Option<&str>) -> Result<Skeleton> {
    let options = ReaderOptions {
        animation: parse_selector(animation),
    };
    SkeletonReader::new(asset)
        .with_options(options)
        .read_skeleton(skin)
        .with_context(|| format!("Failed to read skeleton of skin {skin}"))
}

fn skin_label(asset: &GltfAsset, skin: usize) -> String {
    asset
        .document()
        .skins
        .get(skin)
        .and_then(|s| s.name.clone())
        .map_or_else(|| format!("skin {skin}"), |name| format!("skin {skin} ({name})"))
}

fn bone_label(skeleton: &Skeleton, bone: usize) -> String {
    skeleton
        .bone(bone)
        .and_then(|b| b.name())
        .map_or_else(|| format!("joint {}", skeleton.joint_slots()[bone]), str::to_string)
}

fn handle_tree(
    path: &Path,
    skin: usize,
    animation: Option<&str>,
    depth: Option<usize>,
    no_color: bool,
    compact: bool,
) -> Result<()> {
    let asset = load_asset(path)?;
    let skeleton = read_skeleton(&asset, skin, animation)?;

    let mut root = TreeNode::new(skin_label(&asset, skin), NodeType::Skin)
        .with_metadata("joints", skeleton.bone_count().to_string());
    for bone in skeleton.bones().iter().filter(|b| b.parent().is_none()) {
        root = root.add_child(bone_node(&skeleton, bone.index()));
    }

    let options = TreeOptions {
        max_depth: depth,
        no_color,
        show_metadata: true,
        compact,
    };
    print!("{}", render_tree(&root, &options));
    Ok(())
}

fn bone_node(skeleton: &Skeleton, index: usize) -> TreeNode {
    let Some(bone) = skeleton.bone(index) else {
        return TreeNode::new(format!("bone {index}"), NodeType::Bone);
    };

    let mut node = match bone.animation() {
        Some(animation) => TreeNode::new(bone_label(skeleton, index), NodeType::AnimatedBone)
            .with_metadata("keyframes", animation.keyframes().len().to_string())
            .with_metadata("duration", format!("{:.3}s", animation.duration())),
        None => TreeNode::new(bone_label(skeleton, index), NodeType::Bone),
    }
    .with_metadata("slot", skeleton.joint_slots()[index].to_string());

    for &child in bone.children() {
        node = node.add_child(bone_node(skeleton, child));
    }
    node
}

#[derive(Serialize)]
struct AnimateReport {
    skin: usize,
    animation: Option<String>,
    frames: u32,
    time: f32,
    joints: Vec<JointReport>,
}

#[derive(Serialize)]
struct JointReport {
    slot: usize,
    name: Option<String>,
    /// Rows of the skinning matrix
    matrix: [[f32; 4]; 4],
}

fn handle_animate(
    path: &Path,
    skin: usize,
    animation: Option<&str>,
    frames: u32,
    dt: f32,
    json: bool,
) -> Result<()> {
    if !dt.is_finite() || dt < 0.0 {
        bail!("--dt must be a non-negative number of seconds, got {dt}");
    }

    let asset = load_asset(path)?;
    let mut skeleton = read_skeleton(&asset, skin, animation)?;

    for _ in 0..frames {
        skeleton.update(dt);
    }

    let animation_name = skeleton
        .bones()
        .iter()
        .find_map(|b| b.animation())
        .and_then(|a| a.name().map(str::to_string));
    let time = skeleton
        .bones()
        .iter()
        .find_map(|b| b.animation())
        .map_or(0.0, |a| a.current_time());

    // Bone index of each joint slot
    let mut bone_of_slot = vec![0; skeleton.bone_count()];
    for (bone, &slot) in skeleton.joint_slots().iter().enumerate() {
        bone_of_slot[slot] = bone;
    }

    let matrices = skeleton.joint_matrices();
    let joints: Vec<JointReport> = matrices
        .iter()
        .enumerate()
        .map(|(slot, matrix)| JointReport {
            slot,
            name: skeleton
                .bone(bone_of_slot[slot])
                .and_then(|b| b.name())
                .map(str::to_string),
            matrix: matrix.transpose().to_cols_array_2d(),
        })
        .collect();

    let report = AnimateReport {
        skin,
        animation: animation_name,
        frames,
        time,
        joints,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} after {} frames ({:.3}s clip time)",
        style(skin_label(&asset, skin)).bold().cyan(),
        report.frames,
        report.time
    );
    if let Some(name) = &report.animation {
        println!("Animation: {name}");
    }
    for (joint, matrix) in report.joints.iter().zip(&matrices) {
        println!(
            "\n{} {}",
            style(format!("[{}]", joint.slot)).bold(),
            joint.name.as_deref().unwrap_or("-")
        );
        for row in format_matrix_rows(matrix) {
            println!("  {row}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector() {
        assert_eq!(parse_selector(None), AnimationSelector::First);
        assert_eq!(parse_selector(Some("2")), AnimationSelector::Index(2));
        assert_eq!(
            parse_selector(Some("walk")),
            AnimationSelector::Name("walk".to_string())
        );
    }
}
