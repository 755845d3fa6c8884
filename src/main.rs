#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows release builds

use anyhow::Context;
use skin_journal::{commands::*, AppState};
use tauri::Manager;
use tracing_subscriber::EnvFilter;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    tauri::Builder::new()
        .setup(|app| {
            let data_dir = tauri::api::path::app_local_data_dir(&app.config())
                .context("failed to resolve app data dir")?
                .join("skin-journal");
            let state = AppState::new(&data_dir)?;
            app.manage(state);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            navigate,
            get_session,
            update_intake,
            submit_intake,
            select_photo,
            run_analysis,
            get_report,
            get_note_editor,
            confirm_rewrite,
            save_note,
            delete_note,
            list_notes,
            get_contrast,
            get_user_info,
            export_notes
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
