//! Keyframe tracks — time-indexed property animation.
//!
//! A [`Track`] holds a sorted list of keyframes over a single typed property
//! and produces the interpolated value at an arbitrary query time. Looping
//! tracks wrap the query time into the cycle; one-shot tracks clamp at the
//! final keyframe. Tracks carry no clock of their own: the caller supplies
//! elapsed time, which keeps sampling pure and testable.

use crate::core::math::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// Values that can be linearly interpolated between keyframes.
pub trait Interpolate: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Interpolate for Vec3 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Vec3::lerp(a, b, t)
    }
}

impl Interpolate for Color {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Color::lerp(a, b, t)
    }
}

/// A single keyframe: a value pinned to a point in track-local time (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub const fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// Playback mode for a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    /// Wrap the query time into the track duration and repeat forever.
    Loop,
    /// Clamp at the final keyframe. A one-shot track is considered finished
    /// once the query time passes its duration.
    Once,
}

/// A keyframe track over a single typed property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track<T> {
    keys: Vec<Keyframe<T>>,
    mode: PlayMode,
}

impl<T: Interpolate> Track<T> {
    /// Build a track from keyframes. Keyframe times must be non-decreasing;
    /// out-of-order input is sorted rather than rejected, so that
    /// programmatically assembled tracks are always valid.
    pub fn new(mut keys: Vec<Keyframe<T>>, mode: PlayMode) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys, mode }
    }

    /// A one-shot track animating from `from` to `to` over `duration` seconds.
    ///
    /// This is the programmatic transition used for runtime-triggered moves
    /// (lean-forward, lean-back) where no authored keyframes exist.
    pub fn transition(from: T, to: T, duration: f32) -> Self {
        Self::new(
            vec![Keyframe::new(0.0, from), Keyframe::new(duration, to)],
            PlayMode::Once,
        )
    }

    /// A constant single-value track. Loops forever so the value holds until
    /// the channel is cleared.
    pub fn constant(value: T) -> Self {
        Self::new(vec![Keyframe::new(0.0, value)], PlayMode::Loop)
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Track duration: the time of the last keyframe.
    pub fn duration(&self) -> f32 {
        self.keys.last().map(|k| k.time).unwrap_or(0.0)
    }

    /// Whether a one-shot track has played past its final keyframe.
    /// Looping tracks never finish.
    pub fn is_finished(&self, t: f32) -> bool {
        self.mode == PlayMode::Once && t >= self.duration()
    }

    /// Sample the track at elapsed time `t` (seconds since the track started).
    ///
    /// Returns `None` only for an empty track.
    pub fn sample(&self, t: f32) -> Option<T> {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return None,
        };

        let duration = last.time;
        let local = match self.mode {
            PlayMode::Loop if duration > 0.0 => t.rem_euclid(duration),
            PlayMode::Loop => 0.0,
            PlayMode::Once => t.clamp(0.0, duration),
        };

        if local <= first.time {
            return Some(first.value);
        }
        if local >= duration {
            return Some(last.value);
        }

        // Find the bracketing pair. Keyframe counts are small (2..8), so a
        // linear scan beats a binary search in practice.
        for pair in self.keys.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if local >= a.time && local <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return Some(b.value);
                }
                let frac = (local - a.time) / span;
                return Some(T::lerp(a.value, b.value, frac));
            }
        }

        Some(last.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Track<f32> {
        Track::new(
            vec![Keyframe::new(0.0, 0.0), Keyframe::new(2.0, 10.0)],
            PlayMode::Once,
        )
    }

    #[test]
    fn test_once_interpolates_and_clamps() {
        let track = ramp();
        assert_eq!(track.sample(0.0), Some(0.0));
        assert_eq!(track.sample(1.0), Some(5.0));
        assert_eq!(track.sample(2.0), Some(10.0));
        // Past the end: clamped, not wrapped
        assert_eq!(track.sample(5.0), Some(10.0));
        assert_eq!(track.sample(-1.0), Some(0.0));
    }

    #[test]
    fn test_loop_wraps_time() {
        let track = Track::new(
            vec![Keyframe::new(0.0, 0.0), Keyframe::new(2.0, 10.0)],
            PlayMode::Loop,
        );
        assert_eq!(track.sample(3.0), Some(5.0));
        assert_eq!(track.sample(4.5), Some(2.5));
    }

    #[test]
    fn test_once_finishes_loop_does_not() {
        let once = ramp();
        assert!(!once.is_finished(1.9));
        assert!(once.is_finished(2.0));

        let looped = Track::new(
            vec![Keyframe::new(0.0, 0.0), Keyframe::new(2.0, 1.0)],
            PlayMode::Loop,
        );
        assert!(!looped.is_finished(100.0));
    }

    #[test]
    fn test_transition_builder() {
        let track = Track::transition(Vec3::ZERO, Vec3::ONE, 1.0);
        assert_eq!(track.mode(), PlayMode::Once);
        assert_eq!(track.sample(0.5), Some(Vec3::splat(0.5)));
        assert_eq!(track.sample(2.0), Some(Vec3::ONE));
    }

    #[test]
    fn test_unordered_keyframes_are_sorted() {
        let track = Track::new(
            vec![Keyframe::new(2.0, 10.0f32), Keyframe::new(0.0, 0.0)],
            PlayMode::Once,
        );
        assert_eq!(track.sample(1.0), Some(5.0));
    }

    #[test]
    fn test_empty_track_samples_none() {
        let track: Track<f32> = Track::new(vec![], PlayMode::Loop);
        assert_eq!(track.sample(1.0), None);
    }

    #[test]
    fn test_multi_segment_track() {
        let track = Track::new(
            vec![
                Keyframe::new(0.0, 1.0f32),
                Keyframe::new(1.0, 2.0),
                Keyframe::new(3.0, 0.0),
            ],
            PlayMode::Once,
        );
        assert_eq!(track.sample(0.5), Some(1.5));
        assert_eq!(track.sample(2.0), Some(1.0));
    }
}
