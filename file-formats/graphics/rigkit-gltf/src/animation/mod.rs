//! Skeletal animation runtime
//!
//! This module turns per-bone keyframe tracks into per-bone skinning matrices:
//! - [`Keyframe`]: one (time, transform) sample
//! - [`Animation`]: keyframe playback state with looping and time smoothing
//! - [`Bone`]: hierarchy node owning an optional animation
//! - [`Skeleton`]: flat parent-before-child bone array and the per-frame
//!   local, world and skin transform passes
//! - channel sampling used when keyframes are built from glTF samplers
//!
//! Matrices use the row-vector convention: a point transforms as `p * M`, so
//! `a * b` applies `a` first. See [`transform`] for the conversions from the
//! column-vector matrices glTF and `glam` produce.
//!
//! # Example
//!
//! ```rust
//! use glam::{Mat4, Vec3};
//! use rigkit_gltf::animation::{transform, Animation, Bone, Keyframe, Skeleton};
//!
//! let walk = Animation::new(
//!     Some("walk".to_string()),
//!     vec![
//!         Keyframe::new(0.0, Mat4::IDENTITY),
//!         Keyframe::new(1.0, transform::translation(Vec3::X)),
//!     ],
//! )?;
//!
//! let bones = vec![
//!     Bone::new(0, Some("root".to_string())).with_animation(walk),
//!     Bone::new(1, Some("arm".to_string())).with_parent(0),
//! ];
//! let mut skeleton = Skeleton::new(Mat4::IDENTITY, vec![Mat4::IDENTITY; 2], bones)?;
//!
//! skeleton.update(1.0 / 60.0);
//! let matrices = skeleton.skin_transforms();
//! assert_eq!(matrices.len(), 2);
//! # Ok::<(), rigkit_gltf::GltfError>(())
//! ```

mod bone;
mod keyframe;
mod playback;
mod sampling;
mod skeleton;
pub mod transform;

pub use bone::Bone;
pub use keyframe::Keyframe;
pub use playback::{Animation, TIME_SMOOTHING};
pub use sampling::{ChannelTrack, Interpolation, Lerp, find_keyframe_index};
pub use skeleton::Skeleton;
