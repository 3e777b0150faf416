//! Local camera capture
//!
//! This module provides the webcam preview used while a session is active.

pub mod frame;
#[cfg(test)]
pub(crate) mod mock;
pub mod traits;
pub mod viewer;
pub mod webcam;

// Re-export traits
pub use traits::{
    CameraInfo, CaptureDevice, CaptureError, CaptureResult, PreviewFrame, PreviewShared, PreviewStatus,
    PreviewStream,
};
pub use viewer::{FeedView, FeedViewer};
pub use webcam::{list_cameras, NokhwaDevice};
