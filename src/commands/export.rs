use std::path::PathBuf;

use serde::Deserialize;
use tauri::State;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportNotesPayload {
    pub destination: String,
}

/// Writes the whole diary to a CSV file and returns the number of notes written.
#[tauri::command]
pub fn export_notes(state: State<AppState>, payload: ExportNotesPayload) -> Result<usize, String> {
    let destination = PathBuf::from(payload.destination);
    Ok(state.export_notes(&destination)?)
}
