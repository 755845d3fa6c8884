use std::path::PathBuf;

use serde::Deserialize;
use tauri::{AppHandle, Manager, State};

use crate::{
    error::AppError,
    flow::{FlowEvent, Page},
    intake::{DiagnosisForm, IntakeChange},
    report::ReportView,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SelectPhotoPayload {
    pub path: String,
}

/// Updates one field of the intake form.
#[tauri::command]
pub fn update_intake(state: State<AppState>, change: IntakeChange) -> Result<DiagnosisForm, String> {
    Ok(state.update_intake(change)?)
}

/// Validates the intake form and moves on to the face preparation page.
#[tauri::command]
pub fn submit_intake(state: State<AppState>) -> Result<Page, String> {
    Ok(state.navigate(FlowEvent::Next)?)
}

#[tauri::command]
pub fn select_photo(state: State<AppState>, payload: SelectPhotoPayload) -> Result<String, String> {
    Ok(state.select_photo(&PathBuf::from(payload.path))?)
}

/// Sends the photo and form to the analysis service. Resolves to `None` when
/// the user navigated away before the response arrived.
#[tauri::command]
pub async fn run_analysis(app: AppHandle) -> Result<Option<ReportView>, String> {
    tauri::async_runtime::spawn_blocking(move || {
        let state = app.state::<AppState>();
        state.run_analysis().map_err(String::from)
    })
    .await
    .map_err(|err| AppError::Message(format!("analysis task failed: {}", err)))?
}

/// Report for the most recent successful analysis, if any.
#[tauri::command]
pub fn get_report(state: State<AppState>) -> Option<ReportView> {
    state.report()
}
