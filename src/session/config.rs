//! Camera configuration and the setup form
//!
//! The form keeps an editable [`ConfigDraft`] until submission. A successful
//! [`submit`] turns the draft into a [`CameraConfiguration`] owned by the
//! session controller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Most cameras a single session can monitor
pub const MAX_CAMERAS: usize = 64;

/// Which kind of source the form is currently set to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Webcam,
    Ip,
}

/// One configured IP camera
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraEndpoint {
    /// Stream address, e.g. `rtsp://192.168.1.100:554/live`
    pub address: String,

    /// Human readable location, e.g. "Main Entrance"
    pub location: String,

    /// 1-based camera number
    pub ordinal: u32,
}

impl CameraEndpoint {
    /// Empty endpoint for the given 0-based position
    pub fn placeholder(position: usize) -> Self {
        Self {
            address: String::new(),
            location: String::new(),
            ordinal: position as u32 + 1,
        }
    }

    fn is_complete(&self) -> bool {
        !self.address.trim().is_empty() && !self.location.trim().is_empty()
    }
}

/// Camera source carried from the form through to the viewer and panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum CameraSource {
    Webcam,
    #[serde(rename = "ip")]
    IpCameraSet { endpoints: Vec<CameraEndpoint> },
}

/// A validated, submitted camera configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraConfiguration {
    pub source: CameraSource,
}

impl CameraConfiguration {
    pub fn webcam() -> Self {
        Self {
            source: CameraSource::Webcam,
        }
    }

    /// Number of cameras results are synthesized and grouped for
    pub fn camera_count(&self) -> usize {
        match &self.source {
            CameraSource::Webcam => 1,
            CameraSource::IpCameraSet { endpoints } => endpoints.len().max(1),
        }
    }

    pub fn is_webcam(&self) -> bool {
        matches!(self.source, CameraSource::Webcam)
    }

    pub fn endpoints(&self) -> &[CameraEndpoint] {
        match &self.source {
            CameraSource::Webcam => &[],
            CameraSource::IpCameraSet { endpoints } => endpoints,
        }
    }

    /// Label used in user notifications
    pub fn source_label(&self) -> &'static str {
        match self.source {
            CameraSource::Webcam => "webcam",
            CameraSource::IpCameraSet { .. } => "IP camera(s)",
        }
    }
}

/// Form rejection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// At least one endpoint lacks an address or location (1-based positions)
    #[error("missing required camera fields")]
    MissingFields { positions: Vec<usize> },

    #[error("at most {max} cameras are supported")]
    TooManyCameras { requested: usize, max: usize },
}

/// Editable form state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDraft {
    pub source: SourceKind,
    pub camera_count: usize,
    pub endpoints: Vec<CameraEndpoint>,
}

impl Default for ConfigDraft {
    fn default() -> Self {
        Self {
            source: SourceKind::Webcam,
            camera_count: 1,
            endpoints: vec![CameraEndpoint::placeholder(0)],
        }
    }
}

impl ConfigDraft {
    /// Change the camera count, resizing the endpoint list in place.
    ///
    /// Entries at positions below both the old and new count are kept.
    /// Counts are clamped to `1..=MAX_CAMERAS`.
    pub fn set_camera_count(&mut self, count: usize) {
        let count = count.clamp(1, MAX_CAMERAS);
        self.camera_count = count;
        resize_endpoints(&mut self.endpoints, count);
    }
}

/// Grow with placeholders or truncate from the end until `len == count`
pub fn resize_endpoints(endpoints: &mut Vec<CameraEndpoint>, count: usize) {
    if endpoints.len() > count {
        endpoints.truncate(count);
    } else {
        let start = endpoints.len();
        endpoints.extend((start..count).map(CameraEndpoint::placeholder));
    }
}

/// Validate a draft and produce the configuration the controller will own
pub fn submit(draft: &ConfigDraft) -> Result<CameraConfiguration, ValidationError> {
    match draft.source {
        SourceKind::Webcam => Ok(CameraConfiguration::webcam()),
        SourceKind::Ip if draft.camera_count > MAX_CAMERAS => {
            tracing::debug!("Rejecting IP configuration with {} cameras", draft.camera_count);
            Err(ValidationError::TooManyCameras {
                requested: draft.camera_count,
                max: MAX_CAMERAS,
            })
        }
        SourceKind::Ip => {
            let mut endpoints = draft.endpoints.clone();
            resize_endpoints(&mut endpoints, draft.camera_count.max(1));

            let positions: Vec<usize> = endpoints
                .iter()
                .enumerate()
                .filter(|(_, endpoint)| !endpoint.is_complete())
                .map(|(i, _)| i + 1)
                .collect();

            if !positions.is_empty() {
                tracing::debug!("Rejecting IP configuration, incomplete cameras: {:?}", positions);
                return Err(ValidationError::MissingFields { positions });
            }

            Ok(CameraConfiguration {
                source: CameraSource::IpCameraSet { endpoints },
            })
        }
    }
}
