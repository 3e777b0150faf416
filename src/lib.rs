//! FaceWatch - face recognition monitoring demo.
//!
//! This is the main library crate for the FaceWatch application.
//! It provides the Tauri application setup and all backend functionality.

pub mod capture;
pub mod commands;
pub mod session;
pub mod settings;
pub mod utils;

use anyhow::Context;
use commands::MonitorState;
use session::SessionEvent;
use tauri::{AppHandle, Emitter, Manager};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the event carrying [`SessionEvent`]s to the webview
pub const SESSION_EVENT: &str = "session-event";

/// Initialize the application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "facewatch_lib=debug,facewatch=debug,tauri=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting FaceWatch v{}", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .invoke_handler(tauri::generate_handler![
            // Session commands
            commands::session::new_draft,
            commands::session::set_camera_count,
            commands::session::submit_configuration,
            commands::session::stop_session,
            commands::session::get_session,
            commands::session::get_results,
            commands::session::get_settings,
            // Feed commands
            commands::feed::get_cameras,
            commands::feed::select_camera,
            commands::feed::get_feed,
            commands::feed::get_feed_frame,
        ])
        .setup(|app| {
            let (state, events) = init_state(app.handle())?;
            app.manage(state);

            tauri::async_runtime::spawn(forward_session_events(app.handle().clone(), events));
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

fn init_state(app: &AppHandle) -> anyhow::Result<(MonitorState, broadcast::Receiver<SessionEvent>)> {
    let config_dir = app
        .path()
        .app_config_dir()
        .context("Failed to resolve app config directory")?;

    let settings = match settings::load_settings(&config_dir) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Ignoring settings in {:?}: {}", config_dir, e);
            settings::MonitorSettings::default()
        }
    };

    tracing::debug!("Monitor settings: {:?}", settings);
    let state = MonitorState::new(settings).with_config_dir(config_dir);
    let events = state
        .controller
        .try_lock()
        .context("Session controller busy during setup")?
        .subscribe();

    Ok((state, events))
}

/// Relay controller events to the webview until the channel closes
async fn forward_session_events(app: AppHandle, mut events: broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Err(e) = app.emit(SESSION_EVENT, &event) {
                    tracing::warn!("Failed to emit {}: {}", SESSION_EVENT, e);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Dropped {} session events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
