//! Skeleton content reader
//!
//! Builds a runtime [`Skeleton`] from one skin of a loaded [`GltfAsset`]:
//! joints are reordered parent-before-child, inverse bind matrices are
//! converted and permuted to match, and the selected animation's channels are
//! resampled into one keyframe track per bone.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3, Vec4};
use log::{debug, trace, warn};

use crate::accessor::{Accessor, AttributeType, ComponentType};
use crate::animation::transform;
use crate::animation::{Animation, Bone, ChannelTrack, Interpolation, Keyframe, Skeleton};
use crate::document::{AnimationDef, NodeDef};
use crate::error::{GltfError, Result};
use crate::loader::GltfAsset;

/// Which animation drives the skeleton
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnimationSelector {
    /// The first animation in the asset, if there is one
    #[default]
    First,
    Index(usize),
    Name(String),
    /// Leave every bone at its rest pose
    None,
}

/// Options for [`SkeletonReader`]
#[derive(Debug, Clone, Default)]
pub struct ReaderOptions {
    pub animation: AnimationSelector,
}

/// Rest translation, rotation and scale of a node
#[derive(Debug, Clone, Copy)]
struct RestPose {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl RestPose {
    fn of(node: &NodeDef) -> Self {
        if let Some(matrix) = &node.matrix {
            let (scale, rotation, translation) =
                Mat4::from_cols_array(matrix).to_scale_rotation_translation();
            return Self {
                translation,
                rotation,
                scale,
            };
        }

        Self {
            translation: node.translation.map_or(Vec3::ZERO, Vec3::from_array),
            rotation: node
                .rotation
                .map_or(Quat::IDENTITY, |r| Quat::from_array(r).normalize()),
            scale: node.scale.map_or(Vec3::ONE, Vec3::from_array),
        }
    }
}

/// Sampled channels targeting one bone
#[derive(Debug, Default)]
struct BoneTracks {
    translation: Option<ChannelTrack<Vec3>>,
    rotation: Option<ChannelTrack<Quat>>,
    scale: Option<ChannelTrack<Vec3>>,
}

impl BoneTracks {
    fn is_empty(&self) -> bool {
        self.translation.is_none() && self.rotation.is_none() && self.scale.is_none()
    }

    /// Sorted, deduplicated union of every channel's timestamps
    fn times(&self) -> Vec<f32> {
        let mut times: Vec<f32> = [
            self.translation.as_ref().map(ChannelTrack::times),
            self.rotation.as_ref().map(ChannelTrack::times),
            self.scale.as_ref().map(ChannelTrack::times),
        ]
        .into_iter()
        .flatten()
        .flatten()
        .copied()
        .collect();
        times.sort_by(f32::total_cmp);
        times.dedup();
        times
    }

    fn keyframes(&self, rest: RestPose) -> Vec<Keyframe> {
        self.times()
            .into_iter()
            .map(|time| {
                let t = self
                    .translation
                    .as_ref()
                    .map_or(rest.translation, |track| track.sample(time));
                let r = self
                    .rotation
                    .as_ref()
                    .map_or(rest.rotation, |track| track.sample(time));
                let s = self
                    .scale
                    .as_ref()
                    .map_or(rest.scale, |track| track.sample(time));
                Keyframe::new(time, transform::compose_srt(s, r, t))
            })
            .collect()
    }
}

/// Reads skins of a [`GltfAsset`] into runtime skeletons
pub struct SkeletonReader<'a> {
    asset: &'a GltfAsset,
    options: ReaderOptions,
}

impl<'a> SkeletonReader<'a> {
    /// Create a reader with default options
    pub fn new(asset: &'a GltfAsset) -> Self {
        Self {
            asset,
            options: ReaderOptions::default(),
        }
    }

    /// Replace the reader options
    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the skeleton of skin `skin_index`
    pub fn read_skeleton(&self, skin_index: usize) -> Result<Skeleton> {
        let document = self.asset.document();
        let skin = document.skin(skin_index)?;
        if skin.joints.is_empty() {
            return Err(GltfError::MalformedHierarchy(format!(
                "skin {skin_index} has no joints"
            )));
        }

        // Node index -> joint slot
        let mut slot_of_node = HashMap::with_capacity(skin.joints.len());
        for (slot, &node) in skin.joints.iter().enumerate() {
            document.node(node)?;
            if slot_of_node.insert(node, slot).is_some() {
                return Err(GltfError::MalformedHierarchy(format!(
                    "node {node} appears twice in the joints of skin {skin_index}"
                )));
            }
        }

        let parent_slots = self.joint_parents(&skin.joints, &slot_of_node)?;
        let order = sort_joints(&parent_slots);
        let mut bone_of_slot = vec![0; order.len()];
        for (bone, &slot) in order.iter().enumerate() {
            bone_of_slot[slot] = bone;
        }

        let inverse_binds = self.inverse_bind_matrices(skin_index, &order)?;
        let bind_shape = skin
            .bind_shape_matrix
            .as_ref()
            .map_or(Mat4::IDENTITY, transform::from_gltf_array);

        let mut tracks = self.read_tracks(&slot_of_node)?;
        let animation_name = self
            .selected_animation()?
            .and_then(|animation| animation.name.clone());

        let mut bones = Vec::with_capacity(order.len());
        for (bone_index, &slot) in order.iter().enumerate() {
            let node = document.node(skin.joints[slot])?;
            let rest = RestPose::of(node);
            let rest_matrix = node.matrix.as_ref().map_or_else(
                || transform::compose_srt(rest.scale, rest.rotation, rest.translation),
                transform::from_gltf_array,
            );

            let mut bone =
                Bone::new(bone_index, node.name.clone()).with_local_transform(rest_matrix);
            if let Some(parent_slot) = parent_slots[slot] {
                bone = bone.with_parent(bone_of_slot[parent_slot]);
            }
            if let Some(bone_tracks) = tracks.remove(&slot).filter(|t| !t.is_empty()) {
                let animation =
                    Animation::new(animation_name.clone(), bone_tracks.keyframes(rest))?;
                bone = bone.with_animation(animation);
            }
            bones.push(bone);
        }

        debug!(
            "skin {} read into {} bones (joint order {:?})",
            skin_index,
            bones.len(),
            order
        );
        Skeleton::new(bind_shape, inverse_binds, bones)?.with_joint_slots(order)
    }

    /// Joint slot of each joint's nearest ancestor that is also a joint
    fn joint_parents(
        &self,
        joints: &[usize],
        slot_of_node: &HashMap<usize, usize>,
    ) -> Result<Vec<Option<usize>>> {
        let node_parents = self.asset.document().node_parents()?;
        let limit = node_parents.len();

        joints
            .iter()
            .map(|&node| {
                // Walk the whole chain so cycles above the nearest joint are caught
                let mut nearest = None;
                let mut current = node_parents[node];
                let mut steps = 0;
                while let Some(ancestor) = current {
                    if ancestor == node || steps >= limit {
                        return Err(GltfError::MalformedHierarchy(format!(
                            "node {node} has a cyclic ancestry"
                        )));
                    }
                    if nearest.is_none() {
                        nearest = slot_of_node.get(&ancestor).copied();
                    }
                    current = node_parents[ancestor];
                    steps += 1;
                }
                Ok(nearest)
            })
            .collect()
    }

    /// Inverse bind matrices in bone order, identity when the skin has none
    fn inverse_bind_matrices(&self, skin_index: usize, order: &[usize]) -> Result<Vec<Mat4>> {
        let skin = self.asset.document().skin(skin_index)?;
        let Some(accessor_index) = skin.inverse_bind_matrices else {
            return Ok(vec![Mat4::IDENTITY; order.len()]);
        };

        let accessor = self.asset.accessor(accessor_index)?;
        if accessor.attribute_type() != AttributeType::Mat4
            || accessor.component_type() != ComponentType::Float
        {
            return Err(GltfError::TypeMismatch {
                expected: "FLOAT MAT4".to_string(),
                actual: format!("{} {}", accessor.component_type(), accessor.attribute_type()),
            });
        }
        if accessor.count() < order.len() {
            return Err(GltfError::ValidationError(format!(
                "skin {} has {} joints but only {} inverse bind matrices",
                skin_index,
                order.len(),
                accessor.count()
            )));
        }

        order
            .iter()
            .map(|&slot| {
                accessor
                    .get_element::<Mat4>(slot)
                    .map(transform::from_gltf_matrix)
            })
            .collect()
    }

    fn selected_animation(&self) -> Result<Option<&'a AnimationDef>> {
        let animations = &self.asset.document().animations;
        match &self.options.animation {
            AnimationSelector::None => Ok(None),
            AnimationSelector::First => Ok(animations.first()),
            AnimationSelector::Index(index) => animations
                .get(*index)
                .map(Some)
                .ok_or(GltfError::MissingReference {
                    kind: "animation",
                    index: *index,
                }),
            AnimationSelector::Name(name) => animations
                .iter()
                .find(|animation| animation.name.as_deref() == Some(name.as_str()))
                .map(Some)
                .ok_or_else(|| GltfError::InvalidAnimation(format!("no animation named {name}"))),
        }
    }

    /// Sample every channel of the selected animation that targets a joint,
    /// keyed by joint slot
    fn read_tracks(
        &self,
        slot_of_node: &HashMap<usize, usize>,
    ) -> Result<HashMap<usize, BoneTracks>> {
        let mut tracks: HashMap<usize, BoneTracks> = HashMap::new();
        let Some(animation) = self.selected_animation()? else {
            return Ok(tracks);
        };
        let label = animation.name.as_deref().unwrap_or("<unnamed>");

        for (channel_index, channel) in animation.channels.iter().enumerate() {
            let Some(node) = channel.target.node else {
                trace!("animation {label} channel {channel_index} has no target node");
                continue;
            };
            let Some(&slot) = slot_of_node.get(&node) else {
                trace!("animation {label} channel {channel_index} targets non-joint node {node}");
                continue;
            };
            let sampler = animation
                .samplers
                .get(channel.sampler)
                .ok_or(GltfError::MissingReference {
                    kind: "sampler",
                    index: channel.sampler,
                })?;
            let interpolation = Interpolation::from_name(&sampler.interpolation)?;
            let times = self.read_times(sampler.input)?;
            let output = self.asset.accessor(sampler.output)?;

            let entry = tracks.entry(slot).or_default();
            match channel.target.path.as_str() {
                "translation" => {
                    let raw = output.read_all::<Vec3>()?;
                    let values = sampler_values(raw, interpolation, times.len())?;
                    entry.translation = Some(ChannelTrack::new(interpolation, times, values)?);
                }
                "scale" => {
                    let raw = output.read_all::<Vec3>()?;
                    let values = sampler_values(raw, interpolation, times.len())?;
                    entry.scale = Some(ChannelTrack::new(interpolation, times, values)?);
                }
                "rotation" => {
                    let raw = output
                        .read_all::<Vec4>()?
                        .into_iter()
                        .map(|v| Quat::from_vec4(v).normalize())
                        .collect();
                    let values = sampler_values(raw, interpolation, times.len())?;
                    entry.rotation = Some(ChannelTrack::new(interpolation, times, values)?);
                }
                "weights" => {
                    debug!("animation {label} channel {channel_index}: ignoring morph weights");
                }
                other => {
                    warn!("animation {label} channel {channel_index}: unknown target path {other}");
                }
            }
        }

        Ok(tracks)
    }

    /// Keyframe timestamps from a sampler input accessor
    fn read_times(&self, index: usize) -> Result<Vec<f32>> {
        let accessor: &Accessor = self.asset.accessor(index)?;
        if accessor.component_type() != ComponentType::Float {
            return Err(GltfError::InvalidAnimation(format!(
                "sampler input accessor {} is {}, not FLOAT",
                index,
                accessor.component_type()
            )));
        }
        let times = accessor.read_all::<f32>()?;
        if times.is_empty() {
            return Err(GltfError::InvalidAnimation(format!(
                "sampler input accessor {index} has no keyframes"
            )));
        }
        Ok(times)
    }
}

/// One value per keyframe, taking the value element of each cubic-spline
/// `(in-tangent, value, out-tangent)` triple
fn sampler_values<T: Copy>(
    values: Vec<T>,
    interpolation: Interpolation,
    keyframes: usize,
) -> Result<Vec<T>> {
    let expected = match interpolation {
        Interpolation::CubicSpline => keyframes * 3,
        Interpolation::Linear | Interpolation::Step => keyframes,
    };
    if values.len() != expected {
        return Err(GltfError::InvalidAnimation(format!(
            "sampler has {} keyframes but {} output values (expected {})",
            keyframes,
            values.len(),
            expected
        )));
    }

    Ok(match interpolation {
        Interpolation::CubicSpline => values.chunks_exact(3).map(|triple| triple[1]).collect(),
        Interpolation::Linear | Interpolation::Step => values,
    })
}

/// Order joint slots so every parent precedes its children
///
/// Joints keep their skin order except where a parent has to be pulled
/// forward. `parents` must be acyclic.
fn sort_joints(parents: &[Option<usize>]) -> Vec<usize> {
    let mut placed = vec![false; parents.len()];
    let mut order = Vec::with_capacity(parents.len());
    let mut chain = Vec::new();

    for slot in 0..parents.len() {
        let mut current = Some(slot);
        while let Some(s) = current.filter(|&s| !placed[s]) {
            chain.push(s);
            current = parents[s];
        }
        while let Some(s) = chain.pop() {
            placed[s] = true;
            order.push(s);
        }
    }
    order
}
