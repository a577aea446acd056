//! Skeleton hierarchy nodes

use glam::Mat4;

use super::playback::Animation;

/// A joint in the skeletal hierarchy
///
/// The parent is a plain index into the owning skeleton's bone array, so the
/// child-to-parent link never owns anything. Children are filled in by
/// [`Skeleton::new`](super::Skeleton::new) from the parent links.
#[derive(Debug, Clone)]
pub struct Bone {
    index: usize,
    name: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
    animation: Option<Animation>,
    local_transform: Mat4,
}

impl Bone {
    /// Create a root bone at `index` with an identity rest transform
    pub fn new(index: usize, name: Option<String>) -> Self {
        Self {
            index,
            name,
            parent: None,
            children: Vec::new(),
            animation: None,
            local_transform: Mat4::IDENTITY,
        }
    }

    /// Attach to the parent at `parent` in the skeleton's bone array
    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Give the bone its own animation
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Rest transform, used when the bone has no animation
    pub fn with_local_transform(mut self, local_transform: Mat4) -> Self {
        self.local_transform = local_transform;
        self
    }

    /// Position of the bone in its skeleton
    pub fn index(&self) -> usize {
        self.index
    }

    /// Name of the joint node
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Index of the parent bone, `None` for roots
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Indices of the child bones
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Keyframe animation driving this bone
    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Mutable access to the bone animation
    pub fn animation_mut(&mut self) -> Option<&mut Animation> {
        self.animation.as_mut()
    }

    /// Rest transform relative to the parent
    pub fn local_transform(&self) -> Mat4 {
        self.local_transform
    }

    /// Transform of the current keyframe, or the rest transform
    pub fn current_transform(&self) -> Mat4 {
        self.animation
            .as_ref()
            .map_or(self.local_transform, |animation| {
                animation.current_keyframe().transform()
            })
    }

    pub(crate) fn set_children(&mut self, children: Vec<usize>) {
        self.children = children;
    }
}
