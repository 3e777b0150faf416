//! Session controller
//!
//! Owns the session state and drives the `Configuring -> Active ->
//! Configuring` lifecycle. Entering `Active` schedules a one-shot task that
//! fills in the simulated recognition results; leaving `Active` cancels it.

use super::config::{self, CameraConfiguration, ConfigDraft, ValidationError};
use super::record::{default_roster, synthesize_records, RosterEntry};
use super::state::{Notification, SessionEvent, SessionPhase, SessionSnapshot, SessionState};
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Delay before simulated results arrive
pub const DEFAULT_SYNTHESIS_DELAY: Duration = Duration::from_millis(2000);

/// Session-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Monitoring session is already active")]
    AlreadyActive,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// How the simulated recognizer behaves
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    pub delay: Duration,
    pub roster: Vec<RosterEntry>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_SYNTHESIS_DELAY,
            roster: default_roster(),
        }
    }
}

/// Sole owner of the session state
pub struct SessionController {
    /// Shared with the deferred synthesis task
    state: Arc<RwLock<SessionState>>,

    synthesis: SynthesisConfig,

    /// Result synthesis scheduled for the current Active session
    pending: Option<JoinHandle<()>>,

    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    pub fn new(synthesis: SynthesisConfig) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            synthesis,
            pending: None,
            event_tx,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.read().phase
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.read().snapshot()
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Validate the form draft and start a session with it.
    ///
    /// A rejected draft leaves the state untouched and produces an error
    /// notification.
    pub fn submit(&mut self, draft: &ConfigDraft) -> SessionResult<SessionSnapshot> {
        if self.phase() != SessionPhase::Configuring {
            return Err(SessionError::AlreadyActive);
        }

        match config::submit(draft) {
            Ok(configuration) => self.start(configuration),
            Err(e) => {
                tracing::warn!("Camera configuration rejected: {}", e);
                let _ = self
                    .event_tx
                    .send(SessionEvent::Notification(Notification::error(e.to_string())));
                Err(e.into())
            }
        }
    }

    /// Enter `Active` with an already validated configuration.
    ///
    /// Must be called inside a Tokio runtime; the result synthesis is
    /// spawned onto it.
    pub fn start(&mut self, configuration: CameraConfiguration) -> SessionResult<SessionSnapshot> {
        let (generation, snapshot) = {
            let mut state = self.state.write();
            if state.phase != SessionPhase::Configuring {
                return Err(SessionError::AlreadyActive);
            }

            state.phase = SessionPhase::Active;
            state.session_id = Some(Uuid::new_v4());
            state.started_at = Some(Utc::now());
            state.configuration = Some(configuration.clone());
            state.records.clear();
            state.generation += 1;
            (state.generation, state.snapshot())
        };

        tracing::info!(
            "Session {:?} started with {} ({} camera(s))",
            snapshot.session_id,
            configuration.source_label(),
            configuration.camera_count()
        );

        let _ = self.event_tx.send(SessionEvent::Activated {
            snapshot: snapshot.clone(),
        });

        self.schedule_synthesis(generation, configuration);
        Ok(snapshot)
    }

    /// Return to `Configuring`, discarding configuration and records.
    ///
    /// Valid from any phase. Any pending result synthesis is cancelled.
    pub fn stop(&mut self) -> SessionSnapshot {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }

        let (previous, snapshot) = {
            let mut state = self.state.write();
            let previous = state.phase;
            state.reset();
            (previous, state.snapshot())
        };

        if previous == SessionPhase::Active {
            tracing::info!("Session stopped");
        } else {
            tracing::debug!("Stop requested while {:?}, state reset", previous);
        }

        let _ = self.event_tx.send(SessionEvent::Stopped);
        snapshot
    }

    fn schedule_synthesis(&mut self, generation: u64, configuration: CameraConfiguration) {
        let state = self.state.clone();
        let event_tx = self.event_tx.clone();
        let delay = self.synthesis.delay;
        let roster = self.synthesis.roster.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let records = synthesize_records(&roster, configuration.camera_count(), Utc::now());
            {
                let mut state = state.write();
                // A stop (or a newer session) happened while we slept
                if state.generation != generation || state.phase != SessionPhase::Active {
                    tracing::debug!("Dropping stale result synthesis (generation {})", generation);
                    return;
                }
                state.records = records.clone();
            }

            tracing::info!("Simulated recognition produced {} record(s)", records.len());

            let _ = event_tx.send(SessionEvent::ResultsUpdated { records });
            let _ = event_tx.send(SessionEvent::Notification(Notification::info(
                "Face Recognition Active",
                format!("Connected to {} successfully", configuration.source_label()),
            )));
        });

        if let Some(previous) = self.pending.replace(handle) {
            previous.abort();
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(SynthesisConfig::default())
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
