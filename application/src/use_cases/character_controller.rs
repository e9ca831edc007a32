//! Therapist character controller.
//!
//! Owns the rig's idle behaviors (sway, randomized blinking) and the
//! externally triggered ones (gestures, speaking, emotion). Every behavior
//! animates its own channel on the rig's mixers, so a gesture can never
//! stall the mouth loop or suppress a blink. All timers run under the
//! scheduler; `dispose()` cancels them so nothing can fire against a
//! destroyed rig.

use crate::clock::SceneClock;
use crate::scheduler::{Scheduler, TaskHandle};
use halcyon_domain::character::{
    blink_clip, emotion_tint, idle_sway_clip, mouth_speaking_clip,
};
use halcyon_domain::{ChannelKind, CharacterState, Gesture, Mixer, TherapistEmotion};
use rand::Rng;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// The animated targets of one character: body (sway, gestures, blink) and
/// mouth (speaking loop).
#[derive(Clone)]
pub struct CharacterRig {
    pub body: Arc<Mutex<Mixer>>,
    pub mouth: Arc<Mutex<Mixer>>,
}

impl CharacterRig {
    pub fn new() -> Self {
        Self {
            body: Arc::new(Mutex::new(Mixer::default())),
            mouth: Arc::new(Mutex::new(Mixer::default())),
        }
    }
}

impl Default for CharacterRig {
    fn default() -> Self {
        Self::new()
    }
}

struct Inner {
    rig: CharacterRig,
    state: Mutex<CharacterState>,
    clock: SceneClock,
    scheduler: Scheduler,
    blink_task: Mutex<Option<TaskHandle>>,
    gesture_clear: Mutex<Option<TaskHandle>>,
    disposed: AtomicBool,
    blink_count: AtomicU32,
    clear_delay: Duration,
}

/// Controller for one character rig. Cheap to clone; clones share the rig.
#[derive(Clone)]
pub struct CharacterController {
    inner: Arc<Inner>,
}

impl CharacterController {
    /// Create the controller, install the idle sway, and start the blink
    /// task (a random 3–5 s pause between blinks by default).
    pub fn new(
        rig: CharacterRig,
        clock: SceneClock,
        scheduler: Scheduler,
        blink_min: Duration,
        blink_max: Duration,
        clear_delay: Duration,
    ) -> Self {
        {
            let mut body = rig.body.lock().unwrap_or_else(|e| e.into_inner());
            body.set(ChannelKind::Sway, idle_sway_clip(), clock.now_secs());
            let mut base = body.base();
            base.color = emotion_tint(TherapistEmotion::Neutral);
            body.set_base(base);
        }

        let inner = Arc::new(Inner {
            rig,
            state: Mutex::new(CharacterState::default()),
            clock,
            scheduler: scheduler.clone(),
            blink_task: Mutex::new(None),
            gesture_clear: Mutex::new(None),
            disposed: AtomicBool::new(false),
            blink_count: AtomicU32::new(0),
            clear_delay,
        });

        let blink_inner = inner.clone();
        let handle = scheduler.spawn(async move {
            blink_loop(blink_inner, blink_min, blink_max).await;
        });
        *inner.blink_task.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);

        Self { inner }
    }

    // ==================== External triggers ====================

    /// Fire-and-forget gesture. A gesture arriving while another is in
    /// flight overrides it: the clip is replaced and the auto-clear timer is
    /// re-armed for the new gesture only.
    pub fn perform_gesture(&self, gesture: Gesture) {
        if self.inner.disposed.load(Ordering::SeqCst) {
            return;
        }

        {
            let mut body = self.lock_body();
            body.set(
                ChannelKind::Gesture,
                gesture.clip(),
                self.inner.clock.now_secs(),
            );
        }
        self.lock_state().current_gesture = Some(gesture);
        debug!("Gesture {:?} started", gesture);

        let clear_inner = self.inner.clone();
        let handle = self
            .inner
            .scheduler
            .spawn_after(self.inner.clear_delay, async move {
                clear_inner
                    .state
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .current_gesture = None;
            });
        self.store_gesture_clear(Some(handle));
    }

    /// Drop the current gesture immediately, clip and state both.
    pub fn clear_gesture(&self) {
        self.store_gesture_clear(None);
        self.lock_state().current_gesture = None;
        self.lock_body().clear(ChannelKind::Gesture);
    }

    /// Toggle the speaking mouth loop. Lowering the flag snaps the mouth
    /// back to neutral in the same call — no easing, no stuck-open mouth.
    /// Valid in any order, including `false` with no prior `true`.
    pub fn set_speaking(&self, speaking: bool) {
        if self.inner.disposed.load(Ordering::SeqCst) {
            return;
        }

        let mut mouth = self.lock_mouth();
        if speaking {
            mouth.set(
                ChannelKind::Mouth,
                mouth_speaking_clip(),
                self.inner.clock.now_secs(),
            );
        } else {
            mouth.clear(ChannelKind::Mouth);
        }
        drop(mouth);
        self.lock_state().is_speaking = speaking;
    }

    /// Retint the idle presentation for an emotion.
    pub fn set_emotion(&self, emotion: TherapistEmotion) {
        if self.inner.disposed.load(Ordering::SeqCst) {
            return;
        }

        {
            let mut body = self.lock_body();
            let mut base = body.base();
            base.color = emotion_tint(emotion);
            body.set_base(base);
        }
        self.lock_state().emotion = emotion;
    }

    // ==================== Accessors ====================

    pub fn state(&self) -> CharacterState {
        *self.lock_state()
    }

    pub fn current_gesture(&self) -> Option<Gesture> {
        self.lock_state().current_gesture
    }

    pub fn is_speaking(&self) -> bool {
        self.lock_state().is_speaking
    }

    /// Number of blinks played so far. Stops advancing after `dispose()`.
    pub fn blink_count(&self) -> u32 {
        self.inner.blink_count.load(Ordering::SeqCst)
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    // ==================== Teardown ====================

    /// Cancel the blink task and any pending gesture clear, and strip the
    /// rig's animation channels. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(task) = self
            .inner
            .blink_task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            task.cancel();
        }
        self.store_gesture_clear(None);

        self.lock_body().clear_all();
        self.lock_mouth().clear_all();
        debug!("Character controller disposed");
    }

    // ==================== Internals ====================

    fn lock_state(&self) -> std::sync::MutexGuard<'_, CharacterState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_body(&self) -> std::sync::MutexGuard<'_, Mixer> {
        self.inner.rig.body.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_mouth(&self) -> std::sync::MutexGuard<'_, Mixer> {
        self.inner
            .rig
            .mouth
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn store_gesture_clear(&self, handle: Option<TaskHandle>) {
        let mut slot = self
            .inner
            .gesture_clear
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(old) = slot.take() {
            old.cancel();
        }
        *slot = handle;
    }
}

async fn blink_loop(inner: Arc<Inner>, min: Duration, max: Duration) {
    let (lo, hi) = (min.as_secs_f32(), max.as_secs_f32().max(min.as_secs_f32()));
    loop {
        let wait = {
            let mut rng = rand::thread_rng();
            Duration::from_secs_f32(rng.gen_range(lo..=hi))
        };
        tokio::time::sleep(wait).await;

        if inner.disposed.load(Ordering::SeqCst) {
            return;
        }

        let mut body = inner.rig.body.lock().unwrap_or_else(|e| e.into_inner());
        body.set(ChannelKind::Blink, blink_clip(), inner.clock.now_secs());
        drop(body);
        inner.blink_count.fetch_add(1, Ordering::SeqCst);
    }
}
