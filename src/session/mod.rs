//! Monitoring session module
//!
//! - Setup form draft and validation (`config`)
//! - Recognition records and the simulated recognizer (`record`)
//! - Session state machine and events (`state`, `controller`)
//! - Result panel render model (`panel`)

pub mod config;
pub mod controller;
pub mod panel;
pub mod record;
pub mod state;

pub use config::{
    CameraConfiguration, CameraEndpoint, CameraSource, ConfigDraft, SourceKind, ValidationError, MAX_CAMERAS,
};
pub use controller::{SessionController, SessionError, SessionResult, SynthesisConfig};
pub use panel::{CameraSection, ResultRow, ResultView};
pub use record::{RecognitionRecord, RosterEntry};
pub use state::{Notification, NotificationVariant, SessionEvent, SessionPhase, SessionSnapshot};
