//! Root CLI structure for rigkit

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rigkit")]
#[command(about = "Command-line tools for glTF accessors and skinned skeletons", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display buffers, views, accessors, skins and animations of an asset
    Info {
        /// Path to the .gltf or .glb file
        file: PathBuf,

        /// Show per-object tables
        #[arg(short, long)]
        detailed: bool,
    },

    /// Decode and print the elements of one accessor
    Accessor {
        /// Path to the .gltf or .glb file
        file: PathBuf,

        /// Accessor index
        index: usize,

        /// Maximum number of elements to print
        #[arg(short, long, default_value = "16")]
        limit: usize,
    },

    /// Skeleton operations
    Skeleton {
        #[command(subcommand)]
        command: crate::commands::skeleton::SkeletonCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
