//! Bone hierarchy transform computation
//!
//! The skeleton stores its bones flat, every parent before its children, and
//! recomputes three parallel matrix arrays on each update:
//!
//! 1. bone transforms: each bone's current local transform
//! 2. world transforms: `bone[i] * world[parent(i)]`, one linear sweep
//! 3. skin transforms: `bind_shape * inverse_bind[i] * world[i]`
//!
//! The ordering is validated once at construction and relied on every frame.

use glam::Mat4;
use log::debug;

use super::bone::Bone;
use crate::error::{GltfError, Result};

/// Skinned bone hierarchy with per-frame transform arrays
#[derive(Debug, Clone)]
pub struct Skeleton {
    bind_shape_matrix: Mat4,
    inverse_bind_matrices: Vec<Mat4>,
    bones: Vec<Bone>,
    /// Source joint slot of each bone (bone index -> slot)
    joint_slots: Vec<usize>,
    bone_transforms: Vec<Mat4>,
    world_transforms: Vec<Mat4>,
    skin_transforms: Vec<Mat4>,
}

impl Skeleton {
    /// Create a skeleton from bones already in parent-before-child order
    ///
    /// Checks that bone `i` has index `i`, that every parent index is lower
    /// than its child's, and that there is one inverse bind matrix per bone.
    /// Child lists are rebuilt from the parent links. Transform arrays start
    /// at the rest pose.
    pub fn new(
        bind_shape_matrix: Mat4,
        inverse_bind_matrices: Vec<Mat4>,
        mut bones: Vec<Bone>,
    ) -> Result<Self> {
        if bones.is_empty() {
            return Err(GltfError::MalformedHierarchy(
                "skeleton has no bones".to_string(),
            ));
        }

        if inverse_bind_matrices.len() != bones.len() {
            return Err(GltfError::ValidationError(format!(
                "{} inverse bind matrices for {} bones",
                inverse_bind_matrices.len(),
                bones.len()
            )));
        }

        let mut children = vec![Vec::new(); bones.len()];
        for (i, bone) in bones.iter().enumerate() {
            if bone.index() != i {
                return Err(GltfError::MalformedHierarchy(format!(
                    "bone at position {} has index {}",
                    i,
                    bone.index()
                )));
            }
            if let Some(parent) = bone.parent() {
                if parent >= i {
                    return Err(GltfError::MalformedHierarchy(format!(
                        "bone {} has parent {} which is not ordered before it",
                        i, parent
                    )));
                }
                children[parent].push(i);
            }
        }
        for (bone, children) in bones.iter_mut().zip(children) {
            bone.set_children(children);
        }

        let count = bones.len();
        let mut skeleton = Self {
            bind_shape_matrix,
            inverse_bind_matrices,
            bones,
            joint_slots: (0..count).collect(),
            bone_transforms: vec![Mat4::IDENTITY; count],
            world_transforms: vec![Mat4::IDENTITY; count],
            skin_transforms: vec![Mat4::IDENTITY; count],
        };
        skeleton.compose();

        debug!(
            "skeleton created with {} bones ({} animated)",
            count,
            skeleton.bones.iter().filter(|b| b.animation().is_some()).count()
        );
        Ok(skeleton)
    }

    /// Record the source joint slot of each bone
    ///
    /// `joint_slots[i]` is the position bone `i` had in the skin's joint list
    /// before it was reordered. It must be a permutation of `0..bone_count`.
    pub fn with_joint_slots(mut self, joint_slots: Vec<usize>) -> Result<Self> {
        let count = self.bones.len();
        let mut seen = vec![false; count];
        if joint_slots.len() != count {
            return Err(GltfError::ValidationError(format!(
                "{} joint slots for {} bones",
                joint_slots.len(),
                count
            )));
        }
        for &slot in &joint_slots {
            if slot >= count || seen[slot] {
                return Err(GltfError::ValidationError(format!(
                    "joint slot {} is out of range or repeated",
                    slot
                )));
            }
            seen[slot] = true;
        }
        self.joint_slots = joint_slots;
        Ok(self)
    }

    /// Get number of bones
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Bones in parent-before-child order
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Get a bone by index
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// Get a mutable bone by index
    pub fn bone_mut(&mut self, index: usize) -> Option<&mut Bone> {
        self.bones.get_mut(index)
    }

    /// Find a bone by name
    pub fn find_bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|b| b.name() == Some(name))
    }

    /// Matrix applied to the mesh before skinning
    pub fn bind_shape_matrix(&self) -> Mat4 {
        self.bind_shape_matrix
    }

    /// Inverse bind matrix of each bone, in bone order
    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind_matrices
    }

    /// Original joint slot of each bone
    pub fn joint_slots(&self) -> &[usize] {
        &self.joint_slots
    }

    /// Local transform of each bone for the current frame
    pub fn bone_transforms(&self) -> &[Mat4] {
        &self.bone_transforms
    }

    /// Model-space transform of each bone for the current frame
    pub fn world_transforms(&self) -> &[Mat4] {
        &self.world_transforms
    }

    /// Per-bone skinning matrices for the current frame, in bone order
    pub fn skin_transforms(&self) -> &[Mat4] {
        &self.skin_transforms
    }

    /// Skinning matrices in the skin's original joint order, the order vertex
    /// joint indices refer to
    pub fn joint_matrices(&self) -> Vec<Mat4> {
        let mut matrices = vec![Mat4::IDENTITY; self.skin_transforms.len()];
        for (bone, &slot) in self.joint_slots.iter().enumerate() {
            matrices[slot] = self.skin_transforms[bone];
        }
        matrices
    }

    /// Advance every bone animation by `time_delta` seconds and recompute all
    /// transform arrays
    pub fn update(&mut self, time_delta: f32) {
        for bone in &mut self.bones {
            if let Some(animation) = bone.animation_mut() {
                animation.update(time_delta, true);
            }
        }
        self.compose();
    }

    /// Rewind every bone animation and return to the first keyframes
    pub fn reset(&mut self) {
        for bone in &mut self.bones {
            if let Some(animation) = bone.animation_mut() {
                animation.reset();
            }
        }
        self.compose();
    }

    /// Local, world and skin passes over the whole bone set
    fn compose(&mut self) {
        for (i, bone) in self.bones.iter().enumerate() {
            self.bone_transforms[i] = bone.current_transform();
        }

        // Parents precede children, so world[parent] is already final here
        for i in 0..self.bones.len() {
            self.world_transforms[i] = match self.bones[i].parent() {
                Some(parent) => self.bone_transforms[i] * self.world_transforms[parent],
                None => self.bone_transforms[i],
            };
        }

        for i in 0..self.bones.len() {
            self.skin_transforms[i] =
                self.bind_shape_matrix * self.inverse_bind_matrices[i] * self.world_transforms[i];
        }
    }
}
