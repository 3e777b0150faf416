//! Capture trait definitions
//!
//! Platform-agnostic types shared by the feed viewer and the capture
//! backends.

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Capture-related errors
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Encoding error: {0}")]
    Encoding(#[from] png::EncodingError),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// A local camera the preview can be pointed at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraInfo {
    /// Value to store as `preview.deviceId`
    pub id: String,

    pub name: String,

    /// Backend-provided details (driver, bus), may be empty
    pub description: String,
}

/// Where the local preview currently stands
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PreviewStatus {
    /// Nothing acquired
    #[default]
    Idle,
    /// Device requested, waiting for the first frame
    Pending,
    /// Frames are arriving
    Live { width: u32, height: u32 },
    /// Acquisition failed; the preview stays blank
    Failed { reason: String },
}

/// One decoded preview frame, tightly packed RGB8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Status and latest frame, written by the capture thread and read by the
/// viewer
#[derive(Debug, Clone, Default)]
pub struct PreviewShared {
    status: Arc<RwLock<PreviewStatus>>,
    frame: Arc<Mutex<Option<PreviewFrame>>>,
}

impl PreviewShared {
    pub fn status(&self) -> PreviewStatus {
        self.status.read().clone()
    }

    pub fn set_status(&self, status: PreviewStatus) {
        *self.status.write() = status;
    }

    pub fn publish_frame(&self, frame: PreviewFrame) {
        *self.frame.lock() = Some(frame);
    }

    pub fn latest_frame(&self) -> Option<PreviewFrame> {
        self.frame.lock().clone()
    }

    /// Forget the last frame and go back to `Idle`
    pub fn clear(&self) {
        *self.frame.lock() = None;
        self.set_status(PreviewStatus::Idle);
    }
}

/// A local camera that can be opened for preview
pub trait CaptureDevice: Send {
    /// Human readable device description for logs
    fn describe(&self) -> String;

    /// Start acquiring. Returns as soon as the request is issued; the
    /// outcome is reported through `shared`.
    fn open(&self, shared: PreviewShared) -> CaptureResult<Box<dyn PreviewStream>>;
}

/// An acquired device. Stopping releases every resource it holds.
pub trait PreviewStream: Send {
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}
