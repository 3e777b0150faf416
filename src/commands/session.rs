//! Session-related Tauri commands
//!
//! The setup form, session start/stop and the result panel.

use crate::capture::{CaptureDevice, FeedViewer, NokhwaDevice};
use crate::session::{panel, ConfigDraft, ResultView, SessionController, SessionError, SessionSnapshot};
use crate::settings::{self, MonitorSettings};
use crate::utils::{AppResult, ErrorResponse};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tauri::State;
use tokio::sync::Mutex;

/// Application state for the monitor.
///
/// Lock order is controller, then viewer.
pub struct MonitorState {
    pub controller: Arc<Mutex<SessionController>>,
    pub viewer: Arc<Mutex<FeedViewer>>,
    settings: RwLock<MonitorSettings>,
    /// Where settings changes are persisted; `None` keeps them in memory
    config_dir: Option<PathBuf>,
}

impl MonitorState {
    pub fn new(settings: MonitorSettings) -> Self {
        let device = NokhwaDevice::new(settings.preview.device_id.clone(), settings.preview.fps);
        Self::with_device(settings, Box::new(device))
    }

    pub fn with_device(settings: MonitorSettings, device: Box<dyn CaptureDevice>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(SessionController::new(settings.synthesis()))),
            viewer: Arc::new(Mutex::new(FeedViewer::new(device))),
            settings: RwLock::new(settings),
            config_dir: None,
        }
    }

    pub fn with_config_dir(mut self, config_dir: PathBuf) -> Self {
        self.config_dir = Some(config_dir);
        self
    }

    pub fn settings(&self) -> MonitorSettings {
        self.settings.read().clone()
    }

    /// Validate the draft, start the session and bring up the preview
    pub async fn submit(&self, draft: &ConfigDraft) -> Result<SessionSnapshot, SessionError> {
        let mut controller = self.controller.lock().await;
        let snapshot = controller.submit(draft)?;
        // Still holding the controller so a concurrent stop sees the preview up
        self.viewer
            .lock()
            .await
            .set_active(true, snapshot.configuration.as_ref());
        Ok(snapshot)
    }

    /// Tear the session down and release the preview device
    pub async fn stop(&self) -> SessionSnapshot {
        let mut controller = self.controller.lock().await;
        let snapshot = controller.stop();
        self.viewer.lock().await.set_active(false, None);
        snapshot
    }

    pub async fn results(&self) -> Option<ResultView> {
        let snapshot = self.controller.lock().await.snapshot();
        let mut view = panel::render(snapshot.is_active(), &snapshot.records, snapshot.camera_count())?;
        if let Some(configuration) = &snapshot.configuration {
            view.annotate_locations(configuration.endpoints());
        }
        Some(view)
    }

    /// Switch the preview to `device` and remember `device_id` for the next
    /// launch. Nothing changes if the settings cannot be saved.
    pub async fn select_camera(
        &self,
        device_id: Option<String>,
        device: Box<dyn CaptureDevice>,
    ) -> AppResult<MonitorSettings> {
        let mut updated = self.settings();
        updated.preview.device_id = device_id;
        if let Some(config_dir) = &self.config_dir {
            settings::save_settings(&updated, config_dir)?;
        }

        tracing::info!("Preview camera set to {:?}", updated.preview.device_id);
        *self.settings.write() = updated.clone();
        self.viewer.lock().await.set_device(device);
        Ok(updated)
    }
}

/// Fresh form state
#[tauri::command]
pub fn new_draft() -> ConfigDraft {
    ConfigDraft::default()
}

/// Resize the endpoint list after the camera count input changed
#[tauri::command]
pub fn set_camera_count(draft: ConfigDraft, count: usize) -> ConfigDraft {
    let mut draft = draft;
    draft.set_camera_count(count);
    draft
}

/// Submit the setup form and start recognition
#[tauri::command]
pub async fn submit_configuration(
    state: State<'_, MonitorState>,
    draft: ConfigDraft,
) -> Result<SessionSnapshot, ErrorResponse> {
    state.submit(&draft).await.map_err(ErrorResponse::from)
}

/// Stop recognition and go back to setup
#[tauri::command]
pub async fn stop_session(state: State<'_, MonitorState>) -> Result<SessionSnapshot, ErrorResponse> {
    Ok(state.stop().await)
}

/// Get the current session state
#[tauri::command]
pub async fn get_session(state: State<'_, MonitorState>) -> Result<SessionSnapshot, ErrorResponse> {
    Ok(state.controller.lock().await.snapshot())
}

/// Get the result panel contents (`null` when hidden)
#[tauri::command]
pub async fn get_results(state: State<'_, MonitorState>) -> Result<Option<ResultView>, ErrorResponse> {
    Ok(state.results().await)
}

/// Get the active runtime settings
#[tauri::command]
pub fn get_settings(state: State<'_, MonitorState>) -> MonitorSettings {
    state.settings()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::mock::{MockDevice, Outcome};
    use crate::capture::PreviewStatus;
    use crate::session::{CameraEndpoint, SessionPhase, SourceKind};
    use crate::session::MAX_CAMERAS;
    use crate::settings::load_settings;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tempfile::tempdir;

    fn state_with(device: &MockDevice) -> MonitorState {
        MonitorState::with_device(MonitorSettings::default(), Box::new(device.clone()))
    }

    fn two_camera_draft() -> ConfigDraft {
        let mut draft = ConfigDraft {
            source: SourceKind::Ip,
            ..Default::default()
        };
        draft.set_camera_count(2);
        draft.endpoints[0] = CameraEndpoint {
            address: "rtsp://a".to_string(),
            location: "Lobby".to_string(),
            ordinal: 1,
        };
        draft.endpoints[1] = CameraEndpoint {
            address: "rtsp://b".to_string(),
            location: "Gate".to_string(),
            ordinal: 2,
        };
        draft
    }

    #[tokio::test(start_paused = true)]
    async fn test_webcam_session_lifecycle() {
        let device = MockDevice::new(Outcome::Live);
        let state = state_with(&device);

        state.submit(&ConfigDraft::default()).await.unwrap();
        assert_eq!(device.opens.load(Ordering::SeqCst), 1);
        assert!(state.results().await.is_none());

        tokio::time::sleep(Duration::from_millis(2100)).await;
        match state.results().await {
            Some(ResultView::Flat(rows)) => assert_eq!(rows.len(), 2),
            other => panic!("expected flat results, got {:?}", other),
        }

        let snapshot = state.stop().await;
        assert_eq!(snapshot.phase, SessionPhase::Configuring);
        assert_eq!(device.stops.load(Ordering::SeqCst), 1);
        assert!(state.results().await.is_none());
        assert!(state.viewer.lock().await.view().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_camera_example() {
        let device = MockDevice::new(Outcome::Live);
        let state = state_with(&device);

        state.submit(&two_camera_draft()).await.unwrap();
        assert_eq!(device.opens.load(Ordering::SeqCst), 0);
        assert_eq!(
            state.viewer.lock().await.view().map(|v| v.status),
            Some(PreviewStatus::Idle)
        );

        tokio::time::sleep(Duration::from_millis(2100)).await;
        let Some(ResultView::Grouped(sections)) = state.results().await else {
            panic!("expected grouped results");
        };
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Camera 1", "Camera 2"]);
        assert!(sections.iter().all(|s| s.rows.len() == 2));
        assert_eq!(sections[1].location.as_deref(), Some("Gate"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_draft_acquires_nothing() {
        let device = MockDevice::new(Outcome::Live);
        let state = state_with(&device);

        let mut draft = two_camera_draft();
        draft.endpoints[1].location.clear();

        let err = ErrorResponse::from(state.submit(&draft).await.unwrap_err());
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(state.controller.lock().await.phase(), SessionPhase::Configuring);
        assert!(state.viewer.lock().await.view().is_none());
        assert_eq!(device.opens.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cannot_slip_between_session_and_preview() {
        let device = MockDevice::new(Outcome::Live);
        let state = Arc::new(state_with(&device));

        // Park submit on the viewer lock
        let viewer = state.viewer.lock().await;
        let submit = tokio::spawn({
            let state = state.clone();
            async move { state.submit(&ConfigDraft::default()).await }
        });
        tokio::task::yield_now().await;
        assert!(state.controller.try_lock().is_err());

        let stop = tokio::spawn({
            let state = state.clone();
            async move { state.stop().await }
        });
        tokio::task::yield_now().await;
        drop(viewer);

        submit.await.unwrap().unwrap();
        let snapshot = stop.await.unwrap();
        assert_eq!(snapshot.phase, SessionPhase::Configuring);
        assert!(!state.viewer.lock().await.is_active());
        assert_eq!(device.opens.load(Ordering::SeqCst), 1);
        assert_eq!(device.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_select_camera_persists_and_swaps_device() {
        let dir = tempdir().unwrap();
        let first = MockDevice::new(Outcome::Live);
        let second = MockDevice::new(Outcome::Live);
        let state = state_with(&first).with_config_dir(dir.path().to_path_buf());

        state.submit(&ConfigDraft::default()).await.unwrap();
        let updated = state
            .select_camera(Some("2".to_string()), Box::new(second.clone()))
            .await
            .unwrap();

        assert_eq!(updated.preview.device_id.as_deref(), Some("2"));
        assert_eq!(state.settings(), updated);
        assert_eq!(load_settings(dir.path()).unwrap(), updated);
        assert_eq!(first.stops.load(Ordering::SeqCst), 1);
        assert_eq!(second.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_select_camera_save_failure_changes_nothing() {
        let dir = tempdir().unwrap();
        // A file where the config directory should be
        let blocked = dir.path().join("config");
        std::fs::write(&blocked, "").unwrap();

        let replacement = MockDevice::new(Outcome::Live);
        let state = state_with(&MockDevice::new(Outcome::Live)).with_config_dir(blocked);

        let err = state
            .select_camera(Some("1".to_string()), Box::new(replacement.clone()))
            .await
            .unwrap_err();
        assert_eq!(ErrorResponse::from(err).code, "SETTINGS_ERROR");
        assert_eq!(state.settings(), MonitorSettings::default());

        state.submit(&ConfigDraft::default()).await.unwrap();
        assert_eq!(replacement.opens.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_set_camera_count_command() {
        let draft = set_camera_count(new_draft(), 4);
        assert_eq!(draft.endpoints.len(), 4);
        assert_eq!(draft.endpoints[3].ordinal, 4);
    }

    #[test]
    fn test_set_camera_count_command_caps_huge_input() {
        let draft = set_camera_count(new_draft(), 1_000_000_000_000_000);
        assert_eq!(draft.camera_count, MAX_CAMERAS);
        assert_eq!(draft.endpoints.len(), MAX_CAMERAS);
    }
}
