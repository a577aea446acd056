//! Keyframe samples

use glam::Mat4;

/// One (time, local transform) sample of a bone animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    time: f32,
    transform: Mat4,
}

impl Keyframe {
    /// Create a keyframe at `time` seconds
    pub fn new(time: f32, transform: Mat4) -> Self {
        Self { time, transform }
    }

    /// Time of the sample in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Local bone transform at this time
    pub fn transform(&self) -> Mat4 {
        self.transform
    }
}
