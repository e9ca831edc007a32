//! Scene lifecycle manager.
//!
//! Owns the render surface binding, camera, light, and every scene object,
//! and composes the session/breathing/character controllers around them.
//!
//! Architecture:
//! ```text
//! SceneManager                        render_task (scheduler-owned)
//!   ├─ mount()/unmount()               ├─ frame tick    -> sample mixers, present
//!   ├─ RenderBackend (bind/dispose)    ├─ surface_rx    -> resize
//!   ├─ controllers + coordinator       ├─ immersive_rx  -> camera origin swap
//!   └─ immersive session               └─ session watch -> breathing on/off, end
//! ```
//!
//! Teardown runs in strict reverse of construction: immersive session,
//! speech, character timers, breathing, scheduler (render loop included),
//! backend binding. The manager may be mounted again afterwards; a fresh
//! mount builds fresh objects and leaks nothing from the previous life.

use crate::backend::{
    LightRig, RenderBackend, RenderedEntity, SceneError, SceneFrame, SurfaceDescriptor,
    SurfaceEvent,
};
use crate::camera::CameraRig;
use crate::entities::{
    BREATHING_ORB, CHARACTER_BODY, CHARACTER_MOUTH, ENVIRONMENT, SceneEntities,
};
use halcyon_application::{
    BreathingController, CharacterController, DialogueCoordinator, DialogueGateway,
    ImmersivePort, ImmersiveSession, ImmersiveState, Pose, SceneClock, Scheduler,
    SessionContext, SessionController, SessionParams, SpeechInputPort, SpeechOutputPort,
};
use halcyon_domain::{Mixer, SessionPhase};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

type SharedImmersive = Arc<tokio::sync::Mutex<Option<Box<dyn ImmersiveSession>>>>;

/// Ceiling on XR runtime initialization during mount.
const IMMERSIVE_INIT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Everything alive between `mount()` and `unmount()`.
struct Mounted {
    scheduler: Scheduler,
    session: SessionController,
    breathing: BreathingController,
    character: CharacterController,
    coordinator: DialogueCoordinator,
    immersive_session: SharedImmersive,
}

/// Composes and owns the 3D session scene.
///
/// Generic over the render backend the way the embedding host provides it;
/// ports are injected as trait objects.
pub struct SceneManager<B: RenderBackend + 'static> {
    backend: Arc<Mutex<B>>,
    dialogue: Arc<dyn DialogueGateway>,
    speech_in: Arc<dyn SpeechInputPort>,
    speech_out: Arc<dyn SpeechOutputPort>,
    immersive: Arc<dyn ImmersivePort>,
    params: SessionParams,
    context: SessionContext,
    mounted: Option<Mounted>,
}

impl<B: RenderBackend + 'static> SceneManager<B> {
    pub fn new(
        backend: B,
        dialogue: Arc<dyn DialogueGateway>,
        speech_in: Arc<dyn SpeechInputPort>,
        speech_out: Arc<dyn SpeechOutputPort>,
        immersive: Arc<dyn ImmersivePort>,
        params: SessionParams,
        context: SessionContext,
    ) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
            dialogue,
            speech_in,
            speech_out,
            immersive,
            params,
            context,
            mounted: None,
        }
    }

    /// Shared handle to the backend (host-side inspection, screenshots).
    pub fn backend(&self) -> Arc<Mutex<B>> {
        self.backend.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// The session state machine, for host UI actions (start/end/reset,
    /// breathing toggle). `None` while unmounted.
    pub fn session(&self) -> Option<SessionController> {
        self.mounted.as_ref().map(|m| m.session.clone())
    }

    pub fn breathing(&self) -> Option<BreathingController> {
        self.mounted.as_ref().map(|m| m.breathing.clone())
    }

    pub fn character(&self) -> Option<CharacterController> {
        self.mounted.as_ref().map(|m| m.character.clone())
    }

    pub fn coordinator(&self) -> Option<DialogueCoordinator> {
        self.mounted.as_ref().map(|m| m.coordinator.clone())
    }

    // ==================== Mount ====================

    /// Bind the backend, build the scene, and start the render loop.
    ///
    /// Speech and immersive capabilities degrade individually: a missing
    /// microphone or a failed XR init is logged and the scene continues in
    /// the reduced mode.
    pub async fn mount(
        &mut self,
        surface: SurfaceDescriptor,
        surface_events: mpsc::Receiver<SurfaceEvent>,
    ) -> Result<(), SceneError> {
        if self.mounted.is_some() {
            return Err(SceneError::AlreadyMounted);
        }

        self.backend
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .bind(&surface)?;

        let clock = SceneClock::new();
        let scheduler = Scheduler::new();
        let entities = SceneEntities::build();
        let camera = Arc::new(Mutex::new(CameraRig::new()));

        let session = SessionController::new(scheduler.clone(), self.params.duration_tick);
        let breathing = BreathingController::new(
            entities.orb.clone(),
            clock,
            self.params.cycle_secs,
        );
        let character = CharacterController::new(
            entities.character.clone(),
            clock,
            scheduler.clone(),
            self.params.blink_min,
            self.params.blink_max,
            self.params.gesture_clear,
        );
        let coordinator = DialogueCoordinator::new(
            self.dialogue.clone(),
            self.speech_out.clone(),
            session.clone(),
            character.clone(),
            scheduler.clone(),
            self.context.clone(),
            self.params.clone(),
        );

        // Speech input: absent capability is a reduced feature set, not an
        // error
        if self.speech_in.is_supported() {
            match self.speech_in.start_listening() {
                Ok(transcripts) => {
                    let turn_loop = coordinator.clone();
                    scheduler.spawn(async move {
                        turn_loop.run(transcripts).await;
                    });
                }
                Err(e) => warn!("Speech input unavailable, continuing without: {}", e),
            }
        } else {
            info!("Speech input not supported on this host");
        }

        // Immersive init is asynchronous and non-fatal; a hung runtime must
        // not stall the mount
        let immersive_session: SharedImmersive = Arc::new(tokio::sync::Mutex::new(None));
        let immersive_rx = if self.immersive.is_supported() {
            match tokio::time::timeout(IMMERSIVE_INIT_TIMEOUT, self.immersive.create_session())
                .await
            {
                Ok(Ok(xr)) => {
                    let rx = xr.state();
                    *immersive_session.lock().await = Some(xr);
                    info!("Immersive session initialized");
                    Some(rx)
                }
                Ok(Err(e)) => {
                    warn!("Immersive init failed, continuing flat: {}", e);
                    None
                }
                Err(_) => {
                    warn!("Immersive init timed out, continuing flat");
                    None
                }
            }
        } else {
            info!("Immersive mode not supported, rendering flat");
            None
        };

        let loop_ctx = RenderLoop {
            backend: self.backend.clone(),
            clock,
            frame_period: self.params.frame_period,
            camera,
            environment: entities.environment.clone(),
            body: entities.character.body.clone(),
            mouth: entities.character.mouth.clone(),
            orb: entities.orb.clone(),
            session: session.clone(),
            breathing: breathing.clone(),
            speech_in: self.speech_in.clone(),
            speech_out: self.speech_out.clone(),
            immersive_session: immersive_session.clone(),
        };
        scheduler.spawn(loop_ctx.run(surface_events, immersive_rx));

        self.mounted = Some(Mounted {
            scheduler,
            session,
            breathing,
            character,
            coordinator,
            immersive_session,
        });

        info!("Scene mounted ({}x{})", surface.width, surface.height);
        Ok(())
    }

    // ==================== Unmount ====================

    /// Tear down in strict reverse of construction. Idempotent; the manager
    /// can be mounted again afterwards.
    pub async fn unmount(&mut self) {
        let Some(mounted) = self.mounted.take() else {
            debug!("unmount() with no mounted scene");
            return;
        };

        // 1. Immersive session, while the runtime is still alive
        if let Some(mut session) = mounted.immersive_session.lock().await.take()
            && let Err(e) = session.end().await
        {
            warn!("Immersive session end failed: {}", e);
        }

        // 2. Voice I/O
        self.speech_in.stop_listening();
        self.speech_out.stop();

        // 3. Character timers (blink, gesture clear)
        mounted.character.dispose();

        // 4. Breathing visual back to rest
        mounted.breathing.stop();

        // 5. Every scheduler task: render loop, duration ticker, turn loop,
        //    pending delayed actions
        mounted.scheduler.shutdown();

        // 6. Render surface binding
        self.backend
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .dispose();

        info!("Scene unmounted");
    }
}

/// The continuous render loop plus the event reactions that drive it.
struct RenderLoop<B: RenderBackend> {
    backend: Arc<Mutex<B>>,
    clock: SceneClock,
    frame_period: std::time::Duration,
    camera: Arc<Mutex<CameraRig>>,
    environment: Arc<Mutex<Mixer>>,
    body: Arc<Mutex<Mixer>>,
    mouth: Arc<Mutex<Mixer>>,
    orb: Arc<Mutex<Mixer>>,
    session: SessionController,
    breathing: BreathingController,
    speech_in: Arc<dyn SpeechInputPort>,
    speech_out: Arc<dyn SpeechOutputPort>,
    immersive_session: SharedImmersive,
}

impl<B: RenderBackend> RenderLoop<B> {
    async fn run(
        self,
        mut surface_events: mpsc::Receiver<SurfaceEvent>,
        immersive_rx: Option<watch::Receiver<ImmersiveState>>,
    ) {
        let mut tick = tokio::time::interval(self.frame_period);
        let mut session_rx = self.session.subscribe();
        let mut was_breathing = session_rx.borrow().breathing_active;

        // A disabled immersive watch is represented by a closed channel;
        // the guard keeps the closed receiver from busy-looping the select
        let (mut immersive_rx, mut immersive_live) = match immersive_rx {
            Some(rx) => (rx, true),
            None => {
                let (tx, rx) = watch::channel(ImmersiveState::ExitedImmersive);
                drop(tx);
                (rx, false)
            }
        };
        let mut surface_live = true;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.present_frame();
                }

                event = surface_events.recv(), if surface_live => {
                    match event {
                        Some(SurfaceEvent::Resized { width, height }) => {
                            self.lock_backend().resize(width, height);
                        }
                        Some(SurfaceEvent::Closed) => {
                            debug!("Surface closed; awaiting unmount");
                            surface_live = false;
                        }
                        None => surface_live = false,
                    }
                }

                changed = immersive_rx.changed(), if immersive_live => {
                    match changed {
                        Ok(()) => {
                            let state = *immersive_rx.borrow_and_update();
                            self.on_immersive_state(state).await;
                        }
                        Err(_) => immersive_live = false,
                    }
                }

                changed = session_rx.changed() => {
                    if changed.is_err() {
                        // Session controller dropped; the scheduler is
                        // tearing us down
                        return;
                    }
                    let snapshot = session_rx.borrow_and_update().clone();
                    if snapshot.breathing_active != was_breathing {
                        was_breathing = snapshot.breathing_active;
                        if snapshot.breathing_active {
                            self.breathing.start();
                        } else {
                            self.breathing.stop();
                        }
                    }
                    if snapshot.phase == SessionPhase::Ended {
                        self.speech_in.stop_listening();
                        self.speech_out.stop();
                        self.breathing.stop();
                    }
                }
            }
        }
    }

    fn present_frame(&self) {
        let now = self.clock.now_secs();
        let entities = vec![
            RenderedEntity {
                name: ENVIRONMENT,
                visual: self.sample(&self.environment, now),
            },
            RenderedEntity {
                name: CHARACTER_BODY,
                visual: self.sample(&self.body, now),
            },
            RenderedEntity {
                name: CHARACTER_MOUTH,
                visual: self.sample(&self.mouth, now),
            },
            RenderedEntity {
                name: BREATHING_ORB,
                visual: self.sample(&self.orb, now),
            },
        ];
        let frame = SceneFrame {
            time_secs: now,
            camera: self.camera.lock().unwrap_or_else(|e| e.into_inner()).pose(),
            light: LightRig::default(),
            entities,
        };
        self.lock_backend().present(&frame);
    }

    async fn on_immersive_state(&self, state: ImmersiveState) {
        match state {
            ImmersiveState::EnteredImmersive => {
                let origin = self
                    .immersive_session
                    .lock()
                    .await
                    .as_ref()
                    .map(|s| s.origin())
                    .unwrap_or(Pose::default());
                self.camera
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .enter_immersive(origin);
                info!("Entered immersive mode");
            }
            ImmersiveState::ExitedImmersive => {
                self.camera
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .exit_immersive();
                info!("Exited immersive mode");
            }
        }
    }

    fn sample(&self, mixer: &Arc<Mutex<Mixer>>, now: f32) -> halcyon_domain::VisualState {
        mixer.lock().unwrap_or_else(|e| e.into_inner()).sample(now)
    }

    fn lock_backend(&self) -> std::sync::MutexGuard<'_, B> {
        self.backend.lock().unwrap_or_else(|e| e.into_inner())
    }
}
