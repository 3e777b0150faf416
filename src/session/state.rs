//! Session state management
//!
//! Defines the session state machine, the read-only snapshot handed to the
//! front-end, and the events broadcast on every transition.

use super::config::CameraConfiguration;
use super::record::RecognitionRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current phase of the monitoring session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Setup form is showing
    #[default]
    Configuring,
    /// Feed and results are showing
    Active,
}

/// State exclusively owned by the session controller
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub session_id: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub configuration: Option<CameraConfiguration>,
    pub records: Vec<RecognitionRecord>,
    /// Bumped on every transition; deferred work compares against it
    pub generation: u64,
}

impl SessionState {
    /// Back to the initial state, keeping the generation counter moving
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            session_id: self.session_id,
            started_at: self.started_at,
            configuration: self.configuration.clone(),
            records: self.records.clone(),
        }
    }
}

/// Read-only view of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub session_id: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub configuration: Option<CameraConfiguration>,
    pub records: Vec<RecognitionRecord>,
}

impl SessionSnapshot {
    /// Camera count used for result grouping (1 when nothing is configured)
    pub fn camera_count(&self) -> usize {
        self.configuration
            .as_ref()
            .map(CameraConfiguration::camera_count)
            .unwrap_or(1)
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }
}

/// Toast styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// Transient user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

/// Events emitted by the session controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    /// Configuration accepted, session is active
    Activated { snapshot: SessionSnapshot },
    /// Recognition results replaced
    ResultsUpdated { records: Vec<RecognitionRecord> },
    /// Toast for the user
    Notification(Notification),
    /// Session torn down, back to setup
    Stopped,
}
