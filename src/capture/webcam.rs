//! Webcam preview using nokhwa
//!
//! The camera is opened on a dedicated capture thread. Decoded RGB frames
//! are published to the shared preview slot until the stream is stopped.

use super::traits::{
    CameraInfo, CaptureDevice, CaptureError, CaptureResult, PreviewFrame, PreviewShared, PreviewStatus,
    PreviewStream,
};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Enumerate local cameras; an unavailable backend yields an empty list
pub fn list_cameras() -> Vec<CameraInfo> {
    let devices = nokhwa::query(ApiBackend::Auto).unwrap_or_else(|e| {
        tracing::warn!("Camera enumeration unavailable: {}", e);
        Vec::new()
    });
    tracing::debug!("Found {} camera(s)", devices.len());
    devices.iter().map(describe_camera).collect()
}

fn describe_camera(device: &nokhwa::utils::CameraInfo) -> CameraInfo {
    CameraInfo {
        id: device_id(device.index()),
        name: device.human_name(),
        description: device.description().to_string(),
    }
}

/// Inverse of [`NokhwaDevice::camera_index`]
fn device_id(index: &CameraIndex) -> String {
    match index {
        CameraIndex::Index(i) => i.to_string(),
        CameraIndex::String(s) => s.clone(),
    }
}

/// Local webcam opened through nokhwa
pub struct NokhwaDevice {
    /// Device ID/index to open (None = first camera)
    device_id: Option<String>,

    /// Requested preview frame rate
    fps: u32,
}

impl NokhwaDevice {
    pub fn new(device_id: Option<String>, fps: u32) -> Self {
        Self { device_id, fps }
    }

    fn camera_index(&self) -> CameraIndex {
        match &self.device_id {
            Some(id) => match id.parse::<u32>() {
                Ok(idx) => CameraIndex::Index(idx),
                Err(_) => CameraIndex::String(id.clone()),
            },
            None => CameraIndex::Index(0),
        }
    }
}

impl CaptureDevice for NokhwaDevice {
    fn describe(&self) -> String {
        format!("webcam {:?} @ {}fps", self.camera_index(), self.fps)
    }

    fn open(&self, shared: PreviewShared) -> CaptureResult<Box<dyn PreviewStream>> {
        let running = Arc::new(AtomicBool::new(true));
        let camera_index = self.camera_index();
        let fps = self.fps;
        let thread_running = running.clone();

        let handle = std::thread::Builder::new()
            .name("webcam-preview".to_string())
            .spawn(move || capture_loop(camera_index, fps, shared, thread_running))
            .map_err(|e| CaptureError::Stream(format!("failed to spawn capture thread: {}", e)))?;

        Ok(Box::new(NokhwaPreview {
            running,
            thread: Some(handle),
        }))
    }
}

fn capture_loop(camera_index: CameraIndex, fps: u32, shared: PreviewShared, running: Arc<AtomicBool>) {
    let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::HighestFrameRate(fps));

    let mut camera = match Camera::new(camera_index.clone(), format) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to open camera {:?}: {:?}", camera_index, e);
            shared.set_status(PreviewStatus::Failed {
                reason: e.to_string(),
            });
            return;
        }
    };

    if let Err(e) = camera.open_stream() {
        tracing::error!("Failed to open camera stream: {:?}", e);
        shared.set_status(PreviewStatus::Failed {
            reason: e.to_string(),
        });
        return;
    }

    let resolution = camera.camera_format().resolution();
    tracing::info!(
        "Webcam preview opened: {}x{} @ {}fps",
        resolution.width(),
        resolution.height(),
        camera.camera_format().frame_rate()
    );

    let mut frame_count: u64 = 0;
    while running.load(Ordering::SeqCst) {
        // Blocks until the camera delivers the next frame
        let decoded = camera
            .frame()
            .and_then(|buffer| buffer.decode_image::<RgbFormat>());

        match decoded {
            Ok(image) => {
                let (width, height) = (image.width(), image.height());
                if frame_count == 0 {
                    shared.set_status(PreviewStatus::Live { width, height });
                }
                shared.publish_frame(PreviewFrame {
                    width,
                    height,
                    rgb: image.into_raw(),
                });
                frame_count += 1;
            }
            Err(e) => {
                tracing::debug!("Failed to capture frame: {:?}", e);
            }
        }
    }

    if let Err(e) = camera.stop_stream() {
        tracing::warn!("Error stopping camera stream: {:?}", e);
    }

    tracing::info!("Webcam preview stopped after {} frames", frame_count);
}

/// Running capture thread; joined on stop
struct NokhwaPreview {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PreviewStream for NokhwaPreview {
    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                tracing::error!("Webcam capture thread panicked");
            }
        }
    }

    fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for NokhwaPreview {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_index_parsing() {
        assert!(matches!(
            NokhwaDevice::new(None, 30).camera_index(),
            CameraIndex::Index(0)
        ));
        assert!(matches!(
            NokhwaDevice::new(Some("2".to_string()), 30).camera_index(),
            CameraIndex::Index(2)
        ));
        assert!(matches!(
            NokhwaDevice::new(Some("/dev/video-front".to_string()), 30).camera_index(),
            CameraIndex::String(_)
        ));
    }

    #[test]
    fn test_listed_ids_select_the_same_camera() {
        for index in [CameraIndex::Index(3), CameraIndex::String("/dev/video-front".to_string())] {
            let device = nokhwa::utils::CameraInfo::new("Front", "v4l2", "", index.clone());
            let info = describe_camera(&device);
            assert_eq!(info.name, "Front");
            assert_eq!(info.description, "v4l2");

            let reopened = NokhwaDevice::new(Some(info.id), 30).camera_index();
            assert_eq!(reopened, index);
        }
    }
}
