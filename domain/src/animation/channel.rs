//! Named animation channels and deterministic composition.
//!
//! Multiple behaviors animate the same visual target at once: the breathing
//! cycle scales the orb while a gesture tilts the character and the mouth
//! loop runs over both. Instead of letting each behavior write target fields
//! directly (last write wins, order-dependent), every behavior owns a named
//! [`ChannelKind`] slot in a [`Mixer`] and the final [`VisualState`] is
//! computed by explicit composition at sample time.
//!
//! Composition rules, applied in fixed channel order:
//! - scale: component-wise product
//! - rotation: component-wise sum
//! - opacity: product
//! - color: the last color-bearing channel in order overrides
//!
//! Installing a clip on an occupied channel replaces the previous clip, so
//! restarting an animation can never leave a duplicate playback behind.

use super::keyframe::Track;
use crate::core::math::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// The complete animated state of one visual target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub scale: Vec3,
    pub color: Color,
    pub opacity: f32,
    pub rotation: Vec3,
}

impl VisualState {
    pub const fn new(scale: Vec3, color: Color, opacity: f32, rotation: Vec3) -> Self {
        Self {
            scale,
            color,
            opacity,
            rotation,
        }
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            color: Color::WHITE,
            opacity: 1.0,
            rotation: Vec3::ZERO,
        }
    }
}

/// The closed set of animation channels on an entity.
///
/// The order of variants is the composition order; it is part of the
/// contract (color overrides resolve in this order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    Breathing,
    Sway,
    Gesture,
    Mouth,
    Blink,
}

impl ChannelKind {
    /// All channels in composition order.
    pub const ALL: [ChannelKind; 5] = [
        ChannelKind::Breathing,
        ChannelKind::Sway,
        ChannelKind::Gesture,
        ChannelKind::Mouth,
        ChannelKind::Blink,
    ];

    fn index(self) -> usize {
        match self {
            ChannelKind::Breathing => 0,
            ChannelKind::Sway => 1,
            ChannelKind::Gesture => 2,
            ChannelKind::Mouth => 3,
            ChannelKind::Blink => 4,
        }
    }
}

/// A bundle of tracks animating one channel, pinned to the clock time at
/// which it was installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    started_at: f32,
    scale: Option<Track<Vec3>>,
    color: Option<Track<Color>>,
    opacity: Option<Track<f32>>,
    rotation: Option<Track<Vec3>>,
}

impl Clip {
    pub fn new() -> Self {
        Self {
            started_at: 0.0,
            scale: None,
            color: None,
            opacity: None,
            rotation: None,
        }
    }

    pub fn with_scale(mut self, track: Track<Vec3>) -> Self {
        self.scale = Some(track);
        self
    }

    pub fn with_color(mut self, track: Track<Color>) -> Self {
        self.color = Some(track);
        self
    }

    pub fn with_opacity(mut self, track: Track<f32>) -> Self {
        self.opacity = Some(track);
        self
    }

    pub fn with_rotation(mut self, track: Track<Vec3>) -> Self {
        self.rotation = Some(track);
        self
    }

    /// Longest track duration in this clip.
    pub fn duration(&self) -> f32 {
        let mut d: f32 = 0.0;
        if let Some(t) = &self.scale {
            d = d.max(t.duration());
        }
        if let Some(t) = &self.color {
            d = d.max(t.duration());
        }
        if let Some(t) = &self.opacity {
            d = d.max(t.duration());
        }
        if let Some(t) = &self.rotation {
            d = d.max(t.duration());
        }
        d
    }

    /// Whether every track in the clip is a finished one-shot at local time `t`.
    fn is_finished(&self, t: f32) -> bool {
        let mut any = false;
        let mut finished = true;
        if let Some(track) = &self.scale {
            any = true;
            finished &= track.is_finished(t);
        }
        if let Some(track) = &self.color {
            any = true;
            finished &= track.is_finished(t);
        }
        if let Some(track) = &self.opacity {
            any = true;
            finished &= track.is_finished(t);
        }
        if let Some(track) = &self.rotation {
            any = true;
            finished &= track.is_finished(t);
        }
        any && finished
    }
}

impl Default for Clip {
    fn default() -> Self {
        Self::new()
    }
}

/// Composes a base [`VisualState`] with the currently installed channel clips.
///
/// The mixer carries no clock; callers pass the current clock time (seconds)
/// into [`set`](Mixer::set) and [`sample`](Mixer::sample) so that sampling is
/// deterministic under test clocks.
#[derive(Debug, Clone)]
pub struct Mixer {
    base: VisualState,
    channels: [Option<Clip>; 5],
}

impl Mixer {
    pub fn new(base: VisualState) -> Self {
        Self {
            base,
            channels: [None, None, None, None, None],
        }
    }

    pub fn base(&self) -> VisualState {
        self.base
    }

    pub fn set_base(&mut self, base: VisualState) {
        self.base = base;
    }

    /// Install a clip on a channel at clock time `now`, replacing any clip
    /// already playing there.
    pub fn set(&mut self, kind: ChannelKind, mut clip: Clip, now: f32) {
        clip.started_at = now;
        self.channels[kind.index()] = Some(clip);
    }

    /// Remove a channel's clip. The next sample reflects the removal
    /// immediately; there is no fade-out.
    pub fn clear(&mut self, kind: ChannelKind) {
        self.channels[kind.index()] = None;
    }

    /// Remove every clip, returning the target to its base state.
    pub fn clear_all(&mut self) {
        self.channels = [None, None, None, None, None];
    }

    pub fn is_active(&self, kind: ChannelKind) -> bool {
        self.channels[kind.index()].is_some()
    }

    /// Compose the final state at clock time `now`.
    ///
    /// Finished one-shot clips are pruned here, so a completed gesture does
    /// not keep holding its final keyframe forever.
    pub fn sample(&mut self, now: f32) -> VisualState {
        let mut out = self.base;

        for kind in ChannelKind::ALL {
            let idx = kind.index();
            let Some(clip) = &self.channels[idx] else {
                continue;
            };
            let local = now - clip.started_at;

            if clip.is_finished(local) {
                self.channels[idx] = None;
                continue;
            }

            if let Some(track) = &clip.scale
                && let Some(v) = track.sample(local)
            {
                out.scale = out.scale.mul(v);
            }
            if let Some(track) = &clip.rotation
                && let Some(v) = track.sample(local)
            {
                out.rotation = out.rotation.add(v);
            }
            if let Some(track) = &clip.opacity
                && let Some(v) = track.sample(local)
            {
                out.opacity *= v;
            }
            if let Some(track) = &clip.color
                && let Some(v) = track.sample(local)
            {
                out.color = v;
            }
        }

        out
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(VisualState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::keyframe::{Keyframe, PlayMode};

    fn pulse_scale() -> Track<Vec3> {
        Track::new(
            vec![
                Keyframe::new(0.0, Vec3::ONE),
                Keyframe::new(1.0, Vec3::splat(2.0)),
                Keyframe::new(2.0, Vec3::ONE),
            ],
            PlayMode::Loop,
        )
    }

    #[test]
    fn test_channels_compose_independently() {
        let mut mixer = Mixer::default();
        mixer.set(
            ChannelKind::Breathing,
            Clip::new().with_scale(pulse_scale()),
            0.0,
        );
        mixer.set(
            ChannelKind::Gesture,
            Clip::new().with_rotation(Track::transition(Vec3::ZERO, Vec3::new(0.3, 0.0, 0.0), 2.0)),
            0.0,
        );

        let state = mixer.sample(1.0);
        // Scale from breathing, rotation from gesture; neither overwrote the other
        assert_eq!(state.scale, Vec3::splat(2.0));
        assert_eq!(state.rotation, Vec3::new(0.15, 0.0, 0.0));
    }

    #[test]
    fn test_replacing_clip_restarts_cleanly() {
        let mut mixer = Mixer::default();
        mixer.set(
            ChannelKind::Gesture,
            Clip::new().with_scale(Track::transition(Vec3::ONE, Vec3::splat(3.0), 10.0)),
            0.0,
        );
        // Replace mid-flight at t=5 with a fresh clip starting from base
        mixer.set(
            ChannelKind::Gesture,
            Clip::new().with_scale(Track::transition(Vec3::ONE, Vec3::splat(2.0), 10.0)),
            5.0,
        );
        // At t=5 the new clip is at local time 0 — no residue of the old one
        assert_eq!(mixer.sample(5.0).scale, Vec3::ONE);
    }

    #[test]
    fn test_clear_is_immediate() {
        let mut mixer = Mixer::default();
        mixer.set(
            ChannelKind::Mouth,
            Clip::new().with_scale(pulse_scale()),
            0.0,
        );
        assert_ne!(mixer.sample(1.0).scale, Vec3::ONE);
        mixer.clear(ChannelKind::Mouth);
        assert_eq!(mixer.sample(1.0).scale, Vec3::ONE);
    }

    #[test]
    fn test_finished_one_shot_is_pruned() {
        let mut mixer = Mixer::default();
        mixer.set(
            ChannelKind::Blink,
            Clip::new().with_scale(Track::transition(Vec3::ONE, Vec3::splat(0.1), 0.2)),
            0.0,
        );
        assert!(mixer.is_active(ChannelKind::Blink));
        let state = mixer.sample(0.5);
        assert_eq!(state.scale, Vec3::ONE);
        assert!(!mixer.is_active(ChannelKind::Blink));
    }

    fn hold_color(c: Color) -> Track<Color> {
        Track::new(
            vec![Keyframe::new(0.0, c), Keyframe::new(1.0, c)],
            PlayMode::Loop,
        )
    }

    #[test]
    fn test_color_override_order() {
        let mut mixer = Mixer::default();
        let red = Color::new(1.0, 0.0, 0.0);
        let blue = Color::new(0.0, 0.0, 1.0);
        mixer.set(
            ChannelKind::Breathing,
            Clip::new().with_color(hold_color(red)),
            0.0,
        );
        mixer.set(
            ChannelKind::Gesture,
            Clip::new().with_color(hold_color(blue)),
            0.0,
        );
        // Gesture is later in channel order, so its color wins
        assert_eq!(mixer.sample(0.5).color, blue);
    }

    #[test]
    fn test_clear_all_restores_base() {
        let base = VisualState::default();
        let mut mixer = Mixer::new(base);
        mixer.set(
            ChannelKind::Breathing,
            Clip::new().with_scale(pulse_scale()),
            0.0,
        );
        mixer.set(ChannelKind::Sway, Clip::new().with_scale(pulse_scale()), 0.0);
        mixer.clear_all();
        assert_eq!(mixer.sample(1.0), base);
    }
}
