//! Feed viewer
//!
//! Holds the local preview device for as long as the session is active.
//! Only a webcam source is acquired; IP camera sets have no local device and
//! no feed integration yet, so their preview stays idle.

use super::frame::encode_png;
use super::traits::{CaptureDevice, CaptureResult, PreviewShared, PreviewStatus, PreviewStream};
use crate::session::CameraConfiguration;
use serde::{Deserialize, Serialize};

/// What the feed area shows while active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedView {
    pub title: String,
    pub badge: String,
    pub source: String,
    pub status: PreviewStatus,
    /// A capture stream is currently held
    pub streaming: bool,
}

pub struct FeedViewer {
    device: Box<dyn CaptureDevice>,
    shared: PreviewShared,
    stream: Option<Box<dyn PreviewStream>>,
    /// Configuration the viewer was activated with; `None` while inactive
    active: Option<CameraConfiguration>,
}

impl FeedViewer {
    pub fn new(device: Box<dyn CaptureDevice>) -> Self {
        Self {
            device,
            shared: PreviewShared::default(),
            stream: None,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Follow the session's active flag.
    ///
    /// Activating acquires the device (webcam only); deactivating releases
    /// it. Re-activating with a different configuration starts over.
    pub fn set_active(&mut self, active: bool, configuration: Option<&CameraConfiguration>) {
        if !active {
            if self.active.take().is_some() {
                self.release();
            }
            return;
        }

        let configuration = configuration.cloned().unwrap_or_else(CameraConfiguration::webcam);
        if self.active.as_ref() == Some(&configuration) {
            return;
        }

        self.release();
        if configuration.is_webcam() {
            self.acquire();
        } else {
            tracing::debug!("No local preview for {}", configuration.source_label());
        }
        self.active = Some(configuration);
    }

    /// Point the viewer at another device. A held webcam preview is moved
    /// over immediately; otherwise the device is used on next activation.
    pub fn set_device(&mut self, device: Box<dyn CaptureDevice>) {
        self.device = device;
        if self.active.as_ref().is_some_and(CameraConfiguration::is_webcam) {
            self.release();
            self.acquire();
        }
    }

    fn acquire(&mut self) {
        tracing::info!("Acquiring preview device: {}", self.device.describe());
        self.shared.set_status(PreviewStatus::Pending);

        match self.device.open(self.shared.clone()) {
            Ok(stream) => self.stream = Some(stream),
            Err(e) => {
                // Preview stays blank; results are unaffected
                tracing::error!("Error accessing the camera: {}", e);
                self.shared.set_status(PreviewStatus::Failed {
                    reason: e.to_string(),
                });
            }
        }
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::info!("Preview device released");
        }
        self.shared.clear();
    }

    pub fn status(&self) -> PreviewStatus {
        self.shared.status()
    }

    /// `None` while inactive
    pub fn view(&self) -> Option<FeedView> {
        let configuration = self.active.as_ref()?;
        Some(FeedView {
            title: "Recognition Feed".to_string(),
            badge: "Live Feed".to_string(),
            source: configuration.source_label().to_string(),
            status: self.shared.status(),
            streaming: self.stream.as_ref().is_some_and(|s| s.is_running()),
        })
    }

    /// PNG of the newest preview frame, if one has arrived
    pub fn latest_frame_png(&self) -> CaptureResult<Option<Vec<u8>>> {
        if !self.is_active() {
            return Ok(None);
        }
        self.shared.latest_frame().as_ref().map(encode_png).transpose()
    }
}

impl Drop for FeedViewer {
    fn drop(&mut self) {
        self.release();
    }
}
