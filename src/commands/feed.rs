//! Feed-related Tauri commands

use super::session::MonitorState;
use crate::capture::{list_cameras, CameraInfo, FeedView, NokhwaDevice};
use crate::settings::MonitorSettings;
use crate::utils::ErrorResponse;
use tauri::ipc::Response;
use tauri::State;

/// Get list of available cameras/webcams
#[tauri::command]
pub async fn get_cameras() -> Result<Vec<CameraInfo>, ErrorResponse> {
    tokio::task::spawn_blocking(list_cameras)
        .await
        .map_err(|e| ErrorResponse {
            code: "CAPTURE_ERROR".to_string(),
            message: format!("Camera enumeration failed: {}", e),
        })
}

/// Use another camera for the preview (`null` picks the first one)
#[tauri::command]
pub async fn select_camera(
    state: State<'_, MonitorState>,
    device_id: Option<String>,
) -> Result<MonitorSettings, ErrorResponse> {
    let device = NokhwaDevice::new(device_id.clone(), state.settings().preview.fps);
    state
        .select_camera(device_id, Box::new(device))
        .await
        .map_err(ErrorResponse::from)
}

/// Get the feed area contents (`null` while inactive)
#[tauri::command]
pub async fn get_feed(state: State<'_, MonitorState>) -> Result<Option<FeedView>, ErrorResponse> {
    Ok(state.viewer.lock().await.view())
}

/// Latest preview frame as PNG bytes; empty when no frame is available
#[tauri::command]
pub async fn get_feed_frame(state: State<'_, MonitorState>) -> Result<Response, ErrorResponse> {
    let png = state.viewer.lock().await.latest_frame_png()?;
    Ok(Response::new(png.unwrap_or_default()))
}
