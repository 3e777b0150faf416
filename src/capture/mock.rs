//! In-memory capture device for tests

use super::traits::{CaptureDevice, CaptureError, CaptureResult, PreviewFrame, PreviewShared, PreviewStatus, PreviewStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy, PartialEq)]
pub enum Outcome {
    Live,
    /// open() itself errors
    RefuseOpen,
    /// open() succeeds but the capture thread reports failure
    FailLater,
}

#[derive(Clone)]
pub struct MockDevice {
    outcome: Outcome,
    pub opens: Arc<AtomicUsize>,
    pub stops: Arc<AtomicUsize>,
}

impl MockDevice {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            opens: Arc::new(AtomicUsize::new(0)),
            stops: Arc::new(AtomicUsize::new(0)),
        }
    }
}

struct MockStream {
    stops: Arc<AtomicUsize>,
    running: bool,
}

impl PreviewStream for MockStream {
    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

impl CaptureDevice for MockDevice {
    fn describe(&self) -> String {
        "mock camera".to_string()
    }

    fn open(&self, shared: PreviewShared) -> CaptureResult<Box<dyn PreviewStream>> {
        if self.outcome == Outcome::RefuseOpen {
            return Err(CaptureError::DeviceNotFound("no cameras".to_string()));
        }
        self.opens.fetch_add(1, Ordering::SeqCst);

        match self.outcome {
            Outcome::FailLater => shared.set_status(PreviewStatus::Failed {
                reason: "permission denied".to_string(),
            }),
            _ => {
                shared.set_status(PreviewStatus::Live { width: 2, height: 1 });
                shared.publish_frame(PreviewFrame {
                    width: 2,
                    height: 1,
                    rgb: vec![0, 0, 0, 255, 255, 255],
                });
            }
        }

        Ok(Box::new(MockStream {
            stops: self.stops.clone(),
            running: true,
        }))
    }
}
