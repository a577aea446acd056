//! Keyframe playback state for one bone animation

use log::trace;

use super::keyframe::Keyframe;
use crate::error::{GltfError, Result};

/// Weight of the requested time when the committed playback time is smoothed
/// toward it each update.
///
/// Playback trails the requested time instead of snapping to it. The value
/// sets the visible pacing of every animation and must stay fixed.
pub const TIME_SMOOTHING: f32 = 0.1;

/// An ordered keyframe sequence plus its live playback state
///
/// There is no playing/paused flag: the owner decides whether to call
/// [`update`](Self::update) each frame. Playback loops unconditionally.
#[derive(Debug, Clone)]
pub struct Animation {
    name: Option<String>,
    keyframes: Vec<Keyframe>,
    duration: f32,
    /// Requested playback time, advanced by relative updates
    clock: f32,
    /// Smoothed time the keyframe scan runs against
    current_time: f32,
    current_keyframe_index: usize,
}

impl Animation {
    /// Create an animation from time-ascending keyframes
    ///
    /// Fails on an empty list, on non-finite times and on times that go
    /// backwards. The duration is the time of the last keyframe.
    pub fn new(name: Option<String>, keyframes: Vec<Keyframe>) -> Result<Self> {
        let label = name.as_deref().unwrap_or("<unnamed>");
        let Some(last) = keyframes.last() else {
            return Err(GltfError::InvalidAnimation(format!(
                "animation {label} has no keyframes"
            )));
        };

        if let Some(bad) = keyframes.iter().position(|k| !k.time().is_finite()) {
            return Err(GltfError::InvalidAnimation(format!(
                "animation {label} keyframe {bad} has a non-finite time"
            )));
        }

        if let Some(i) = keyframes
            .windows(2)
            .position(|pair| pair[1].time() < pair[0].time())
        {
            return Err(GltfError::InvalidAnimation(format!(
                "animation {label} keyframe {} at {}s precedes keyframe {} at {}s",
                i + 1,
                keyframes[i + 1].time(),
                i,
                keyframes[i].time()
            )));
        }

        let duration = last.time();
        Ok(Self {
            name,
            keyframes,
            duration,
            clock: 0.0,
            current_time: 0.0,
            current_keyframe_index: 0,
        })
    }

    /// Name of the source animation
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Keyframes in time order
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Time of the last keyframe in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Smoothed playback time in seconds
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Index of the next keyframe the scan will pass
    pub fn current_keyframe_index(&self) -> usize {
        self.current_keyframe_index
    }

    /// Advance playback
    ///
    /// With `relative_to_current_time` the requested time is the running
    /// playback time plus `time_delta`; otherwise `time_delta` is an absolute
    /// time. Reaching the duration restarts from zero and keyframe 0 without
    /// interpolating across the loop boundary. Otherwise the committed time
    /// moves toward the requested time by [`TIME_SMOOTHING`] and the keyframe
    /// index scans forward past every keyframe at or before it.
    pub fn update(&mut self, time_delta: f32, relative_to_current_time: bool) {
        let new_time = if relative_to_current_time {
            self.clock + time_delta
        } else {
            time_delta
        };

        if new_time >= self.duration {
            trace!(
                "animation {} looped at {}s",
                self.name().unwrap_or("<unnamed>"),
                new_time
            );
            self.reset();
            return;
        }

        self.clock = new_time;
        self.current_time += (new_time - self.current_time) * TIME_SMOOTHING;

        while self.current_keyframe_index < self.keyframes.len()
            && self.keyframes[self.current_keyframe_index].time() <= self.current_time
        {
            self.current_keyframe_index += 1;
        }
    }

    /// The keyframe at the current index, or the last keyframe once the scan
    /// has passed the end
    pub fn current_keyframe(&self) -> &Keyframe {
        let index = self.current_keyframe_index.min(self.keyframes.len() - 1);
        &self.keyframes[index]
    }

    /// Rewind to time zero and keyframe 0
    pub fn reset(&mut self) {
        self.clock = 0.0;
        self.current_time = 0.0;
        self.current_keyframe_index = 0;
    }
}
