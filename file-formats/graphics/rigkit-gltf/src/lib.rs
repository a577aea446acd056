//! glTF binary decoding and skeletal animation runtime
//!
//! This crate reads the binary side of glTF assets, meaning buffers, buffer
//! views and typed accessors, and drives skinned skeletons from their
//! animation channels:
//!
//! - [`buffer`]: raw buffers and the checked sub-ranges views expose
//! - [`accessor`]: typed, strided, zero-copy element decode
//! - [`glb`]: the binary container with its JSON and BIN chunks
//! - [`loader`]: turning a `.gltf`/`.glb` file into resolved accessors
//! - [`reader`]: building a [`Skeleton`] from a skin and an animation
//! - [`animation`]: keyframe playback and per-frame skin matrices
//!
//! # Example
//!
//! ```no_run
//! use rigkit_gltf::{GltfAsset, LoadOptions, SkeletonReader};
//!
//! let asset = GltfAsset::open("character.glb", &LoadOptions::default())?;
//! let mut skeleton = SkeletonReader::new(&asset).read_skeleton(0)?;
//!
//! skeleton.update(1.0 / 60.0);
//! for matrix in skeleton.joint_matrices() {
//!     println!("{matrix:?}");
//! }
//! # Ok::<(), rigkit_gltf::GltfError>(())
//! ```

pub mod accessor;
pub mod animation;
pub mod buffer;
pub mod document;
pub mod error;
pub mod glb;
pub mod loader;
pub mod reader;

pub use accessor::{Accessor, AccessorData, AttributeType, ComponentType, Element};
pub use animation::{Animation, Bone, Keyframe, Skeleton};
pub use buffer::{Buffer, BufferTarget, BufferView};
pub use document::GltfDocument;
pub use error::{GltfError, Result};
pub use glb::Glb;
pub use loader::{GltfAsset, LoadOptions};
pub use reader::{AnimationSelector, ReaderOptions, SkeletonReader};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
