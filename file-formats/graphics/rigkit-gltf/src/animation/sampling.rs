//! Keyframe interpolation for glTF animation channels
//!
//! Channels are sampled independently at the union of their timestamps while
//! bone keyframes are built, so this only runs at load time.

use glam::{Quat, Vec3};

use crate::error::{GltfError, Result};

/// Sampler interpolation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    #[default]
    Linear,
    /// Hold the previous value until the next timestamp
    Step,
    /// Cubic spline with tangents; sampled linearly between the value elements
    CubicSpline,
}

impl Interpolation {
    /// Parse the sampler `interpolation` string
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "LINEAR" => Ok(Self::Linear),
            "STEP" => Ok(Self::Step),
            "CUBICSPLINE" => Ok(Self::CubicSpline),
            other => Err(GltfError::InvalidAnimation(format!(
                "unknown interpolation {other}"
            ))),
        }
    }
}

/// Trait for types that can be interpolated between keyframes
pub trait Lerp: Copy {
    /// Interpolate between self and other
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for Vec3 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec3::lerp(*self, *other, t)
    }
}

impl Lerp for Quat {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        // Shortest-arc slerp, renormalised against drift in the source data
        self.slerp(*other, t).normalize()
    }
}

/// Find the index of the keyframe at or before the given time
///
/// Returns None if the track has no keyframes. Times before the first
/// keyframe map to index 0 and times past the last to the last index.
pub fn find_keyframe_index(times: &[f32], time: f32) -> Option<usize> {
    if times.is_empty() {
        return None;
    }

    // Number of keyframes at or before `time`
    let passed = times.partition_point(|&t| t <= time);
    Some(passed.saturating_sub(1))
}

/// Timestamps and values of one sampled channel
#[derive(Debug, Clone)]
pub struct ChannelTrack<T> {
    interpolation: Interpolation,
    times: Vec<f32>,
    values: Vec<T>,
}

impl<T: Lerp> ChannelTrack<T> {
    /// Create a track; `values` holds one value per timestamp
    ///
    /// For cubic-spline samplers the caller passes only the value elements,
    /// with the tangents already stripped.
    pub fn new(interpolation: Interpolation, times: Vec<f32>, values: Vec<T>) -> Result<Self> {
        if times.is_empty() {
            return Err(GltfError::InvalidAnimation(
                "channel has no keyframes".to_string(),
            ));
        }
        if times.len() != values.len() {
            return Err(GltfError::InvalidAnimation(format!(
                "channel has {} timestamps but {} values",
                times.len(),
                values.len()
            )));
        }
        if times.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(GltfError::InvalidAnimation(
                "channel timestamps are not ascending".to_string(),
            ));
        }

        Ok(Self {
            interpolation,
            times,
            values,
        })
    }

    /// Interpolation between keyframes
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Keyframe times in seconds
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    /// Value at each keyframe
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Sample the track at `time`, holding the end values outside its range
    pub fn sample(&self, time: f32) -> T {
        let last = self.times.len() - 1;
        if time <= self.times[0] {
            return self.values[0];
        }
        if time >= self.times[last] {
            return self.values[last];
        }

        let Some(index) = find_keyframe_index(&self.times, time) else {
            return self.values[0];
        };

        let time1 = self.times[index];
        let time2 = self.times[index + 1];
        let value1 = &self.values[index];
        let value2 = &self.values[index + 1];

        match self.interpolation {
            Interpolation::Step => *value1,
            Interpolation::Linear | Interpolation::CubicSpline => {
                let t = if time2 > time1 {
                    (time - time1) / (time2 - time1)
                } else {
                    0.0
                };
                value1.lerp(value2, t.clamp(0.0, 1.0))
            }
        }
    }
}
