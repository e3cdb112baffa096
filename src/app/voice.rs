use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::session::{COMPLETION_ERROR_FALLBACK, EMPTY_COMPLETION_FALLBACK};
use crate::domain::{
    AtomicSessionStatus, DomainError, SessionEvent, SessionStatus, SpeechConfig, VoiceSettings,
};
use crate::ports::{
    AudioOutput, CaptureConfig, CaptureEvent, CompletionProvider, PlaybackHandle, SpeechCapture,
    SpeechSynthesizer,
};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Session state mirrored for UI reads.
///
/// `active` is the user's intent (true from `start()` until `stop()`);
/// `status` is the observable machine state. They diverge exactly when a
/// completion request outlives an explicit stop.
struct SessionShared {
    status: AtomicSessionStatus,
    transcript: RwLock<String>,
    response: RwLock<String>,
    active: AtomicBool,
    /// Bumped on every `start()`. A driver task whose epoch is stale no
    /// longer owns the status or the capture session.
    epoch: AtomicU64,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionShared {
    fn set_status(&self, to: SessionStatus) {
        let from = self.status.swap(to);
        if from != to {
            let _ = self.events.send(SessionEvent::StateChanged { from, to });
        }
    }

    /// Transition `from -> to` only if the status is still `from`; a
    /// concurrent writer that already moved the machine wins.
    fn set_status_if(&self, from: SessionStatus, to: SessionStatus) -> bool {
        if self.status.compare_exchange(from, to) {
            let _ = self.events.send(SessionEvent::StateChanged { from, to });
            true
        } else {
            false
        }
    }
}

/// Owns the single live playback handle and serializes synthesis against
/// stops. A stop issued while a `speak` is mid-flight always wins: the
/// late-arriving clip is discarded unplayed.
struct PlaybackManager {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    output: Arc<dyn AudioOutput>,
    active: Mutex<Option<Box<dyn PlaybackHandle>>>,
    generation: AtomicU64,
}

impl PlaybackManager {
    fn new(synthesizer: Arc<dyn SpeechSynthesizer>, output: Arc<dyn AudioOutput>) -> Self {
        Self {
            synthesizer,
            output,
            active: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Synthesize and play `text`, releasing any previous playback first.
    /// Synthesis and playback failures are logged and swallowed; the text
    /// response path is never affected.
    async fn speak(&self, text: &str) {
        self.stop();
        let generation = self.generation.load(Ordering::Acquire);

        let audio = match self.synthesizer.synthesize(text).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!(error = %e, "speech synthesis failed; response stays text-only");
                return;
            }
        };

        if self.generation.load(Ordering::Acquire) != generation {
            debug!("discarding synthesized clip; playback was stopped mid-flight");
            return;
        }

        match self.output.play(audio).await {
            Ok(handle) => {
                let mut active = self.active.lock();
                if self.generation.load(Ordering::Acquire) != generation {
                    handle.stop();
                    return;
                }
                if let Some(previous) = active.replace(handle) {
                    previous.stop();
                }
            }
            Err(e) => {
                warn!(error = %e, "audio playback failed; response stays text-only");
            }
        }
    }

    /// Stop and release the live handle, if any. Idempotent. Also
    /// invalidates any in-flight `speak`.
    fn stop(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(handle) = self.active.lock().take() {
            handle.stop();
        }
    }
}

/// The voice session controller and its UI-facing surface.
///
/// Coordinates one continuous capture session, at most one outstanding
/// completion request, and exclusive audio playback. All provider access
/// goes through ports so the state machine can be driven by test doubles.
pub struct VoiceAssistant {
    capture: Arc<dyn SpeechCapture>,
    completion: Arc<dyn CompletionProvider>,
    playback: Arc<PlaybackManager>,
    shared: Arc<SessionShared>,
    audio_enabled: Arc<AtomicBool>,
    speech: SpeechConfig,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl VoiceAssistant {
    pub fn new(
        capture: Arc<dyn SpeechCapture>,
        completion: Arc<dyn CompletionProvider>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        output: Arc<dyn AudioOutput>,
        speech: SpeechConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            capture,
            completion,
            playback: Arc::new(PlaybackManager::new(synthesizer, output)),
            shared: Arc::new(SessionShared {
                status: AtomicSessionStatus::default(),
                transcript: RwLock::new(String::new()),
                response: RwLock::new(String::new()),
                active: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                events,
            }),
            audio_enabled: Arc::new(AtomicBool::new(VoiceSettings::default().use_audio_response)),
            speech,
            driver: Mutex::new(None),
        }
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.shared.status.load()
    }

    /// Most recent finalized transcript.
    pub fn transcript(&self) -> String {
        self.shared.transcript.read().clone()
    }

    /// Most recent completion text (or fallback).
    pub fn response(&self) -> String {
        self.shared.response.read().clone()
    }

    /// True while a completion request is outstanding. Gates the record
    /// toggle so a second session cannot start mid-flight.
    pub fn is_processing(&self) -> bool {
        self.shared.status.load().is_processing()
    }

    pub fn settings(&self) -> VoiceSettings {
        VoiceSettings {
            use_audio_response: self.audio_enabled.load(Ordering::Acquire),
        }
    }

    pub fn audio_response(&self) -> bool {
        self.audio_enabled.load(Ordering::Acquire)
    }

    /// Toggle the audio response setting. Turning it off stops any active
    /// playback synchronously as part of the same change.
    pub fn set_audio_response(&self, enabled: bool) {
        self.audio_enabled.store(enabled, Ordering::Release);
        if !enabled {
            self.playback.stop();
        }
    }

    /// Stop and release any active playback. Idempotent.
    pub fn stop_audio(&self) {
        self.playback.stop();
    }

    /// Begin a continuous capture session.
    ///
    /// Clears the transcript and response, then listens until `stop()` or
    /// an unrecoverable capture failure.
    ///
    /// # Errors
    ///
    /// `CapabilityUnavailable` if the platform has no speech capture;
    /// `SessionActive` if a session is already running. On failure the
    /// status reads `Idle` (or the running session's status) and no state
    /// change is emitted.
    pub async fn start(&self) -> Result<(), DomainError> {
        // Claim the session slot atomically so two concurrent starts can
        // never both open a capture session. Failure paths roll the claim
        // back without emitting a state change.
        if !self
            .shared
            .status
            .compare_exchange(SessionStatus::Idle, SessionStatus::Listening)
        {
            return Err(DomainError::SessionActive);
        }
        if !self.capture.is_available() {
            self.shared.status.store(SessionStatus::Idle);
            return Err(DomainError::CapabilityUnavailable);
        }

        self.shared.transcript.write().clear();
        self.shared.response.write().clear();

        let config = CaptureConfig::continuous(self.speech.language.clone());
        let receiver = match self.capture.start(&config).await {
            Ok(receiver) => receiver,
            Err(e) => {
                self.shared.status.store(SessionStatus::Idle);
                return Err(e);
            }
        };

        let epoch = self.shared.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        self.shared.active.store(true, Ordering::Release);
        let _ = self.shared.events.send(SessionEvent::StateChanged {
            from: SessionStatus::Idle,
            to: SessionStatus::Listening,
        });
        info!(language = %config.language, "voice session started");

        let driver = tokio::spawn(drive_session(SessionDriver {
            shared: Arc::clone(&self.shared),
            capture: Arc::clone(&self.capture),
            completion: Arc::clone(&self.completion),
            playback: Arc::clone(&self.playback),
            audio_enabled: Arc::clone(&self.audio_enabled),
            config,
            max_restarts: self.speech.max_consecutive_restarts,
            epoch,
            receiver,
        }));
        *self.driver.lock() = Some(driver);

        Ok(())
    }

    /// End the capture session and return to `Idle`. Idempotent; never
    /// fails when no session is active. Does not cancel an outstanding
    /// completion request: its eventual result still updates the response.
    pub async fn stop(&self) {
        self.shared.active.store(false, Ordering::Release);
        self.capture.stop().await;
        self.shared.set_status(SessionStatus::Idle);
        info!("voice session stopped");
    }
}

struct SessionDriver {
    shared: Arc<SessionShared>,
    capture: Arc<dyn SpeechCapture>,
    completion: Arc<dyn CompletionProvider>,
    playback: Arc<PlaybackManager>,
    audio_enabled: Arc<AtomicBool>,
    config: CaptureConfig,
    max_restarts: u32,
    epoch: u64,
    receiver: mpsc::Receiver<CaptureEvent>,
}

/// Session event loop.
///
/// One task owns the loop and awaits each completion before receiving the
/// next capture event, so finalized utterances are processed strictly in
/// arrival order and at most one completion request is ever outstanding.
async fn drive_session(driver: SessionDriver) {
    let SessionDriver {
        shared,
        capture,
        completion,
        playback,
        audio_enabled,
        config,
        max_restarts,
        epoch,
        mut receiver,
    } = driver;
    let mut consecutive_restarts = 0u32;

    loop {
        let event = receiver.recv().await;
        let current = shared.epoch.load(Ordering::Acquire) == epoch;

        match event {
            Some(CaptureEvent::Transcript { text, is_final }) => {
                if !current || !shared.active.load(Ordering::Acquire) {
                    break;
                }
                if !is_final || text.trim().is_empty() {
                    continue;
                }
                consecutive_restarts = 0;
                process_transcript(
                    &shared,
                    completion.as_ref(),
                    &playback,
                    &audio_enabled,
                    epoch,
                    text,
                )
                .await;
            }
            Some(CaptureEvent::Error(error)) => {
                warn!(error = %error, "capture provider error");
                if !current {
                    break;
                }
                let _ = shared.events.send(SessionEvent::CaptureFailed {
                    message: error.user_message(),
                });
                shared.set_status(SessionStatus::Error);
                shared.active.store(false, Ordering::Release);
                capture.stop().await;
                shared.set_status(SessionStatus::Idle);
                break;
            }
            Some(CaptureEvent::Ended) | None => {
                if !current || !shared.active.load(Ordering::Acquire) {
                    break;
                }
                // The provider halted on its own (platform timeout).
                // Restart to keep the continuous-listening illusion, but
                // never loop unbounded on a misbehaving provider.
                if consecutive_restarts >= max_restarts {
                    info!(
                        restarts = consecutive_restarts,
                        "capture keeps ending; giving up on auto-restart"
                    );
                    shared.active.store(false, Ordering::Release);
                    shared.set_status(SessionStatus::Idle);
                    break;
                }
                consecutive_restarts += 1;
                debug!(attempt = consecutive_restarts, "capture ended; restarting");
                match capture.start(&config).await {
                    Ok(next_receiver) => receiver = next_receiver,
                    Err(e) => {
                        warn!(error = %e, "capture restart failed");
                        shared.active.store(false, Ordering::Release);
                        shared.set_status(SessionStatus::Idle);
                        break;
                    }
                }
            }
        }
    }
}

/// Handle one finalized utterance: exactly one completion request, then the
/// response (real or fallback) is shown and, when enabled, spoken. The user
/// never gets silence.
async fn process_transcript(
    shared: &Arc<SessionShared>,
    completion: &dyn CompletionProvider,
    playback: &Arc<PlaybackManager>,
    audio_enabled: &Arc<AtomicBool>,
    epoch: u64,
    text: String,
) {
    shared.set_status(SessionStatus::Processing);
    *shared.transcript.write() = text.clone();
    shared.response.write().clear();
    let _ = shared
        .events
        .send(SessionEvent::TranscriptFinalized { text: text.clone() });

    let reply = match completion.complete(&text).await {
        Ok(content) if !content.trim().is_empty() => content,
        Ok(_) => {
            debug!("empty completion; substituting fallback");
            EMPTY_COMPLETION_FALLBACK.to_string()
        }
        Err(e) => {
            warn!(error = %e, "completion failed; substituting fallback");
            COMPLETION_ERROR_FALLBACK.to_string()
        }
    };

    *shared.response.write() = reply.clone();
    // The Processing exit must lose against anyone who already moved the
    // machine: a newer session owns the status (stale epoch), or an
    // explicit stop() settled on Idle between our `active` load and the
    // store. Either way the trailing completion still updated the response
    // text above, deterministically.
    if shared.epoch.load(Ordering::Acquire) == epoch {
        let next = if shared.active.load(Ordering::Acquire) {
            SessionStatus::Listening
        } else {
            SessionStatus::Idle
        };
        shared.set_status_if(SessionStatus::Processing, next);
    }
    let _ = shared
        .events
        .send(SessionEvent::ResponseReady { text: reply.clone() });

    if audio_enabled.load(Ordering::Acquire) {
        playback.speak(&reply).await;
    }
}
