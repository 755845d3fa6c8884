use chrono::NaiveDate;
use serde::Deserialize;
use tauri::State;

use crate::{
    contrast::ContrastView,
    notes::{NoteDraft, NoteEditorView, NoteHistoryView},
    state::{today, AppState},
};

#[derive(Debug, Deserialize)]
pub struct DeleteNotePayload {
    pub date: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContrastPayload {
    pub selection: Option<usize>,
}

#[tauri::command]
pub fn get_note_editor(state: State<AppState>) -> NoteEditorView {
    state.note_editor(today())
}

/// Deletes today's note so the editor can write a fresh one.
#[tauri::command]
pub fn confirm_rewrite(state: State<AppState>) -> Result<NoteHistoryView, String> {
    Ok(state.confirm_rewrite(today())?)
}

/// Saves today's note together with a snapshot of the latest diagnosis.
#[tauri::command]
pub fn save_note(state: State<AppState>, draft: NoteDraft) -> Result<NoteHistoryView, String> {
    Ok(state.save_note(draft, today())?)
}

#[tauri::command]
pub fn delete_note(
    state: State<AppState>,
    payload: DeleteNotePayload,
) -> Result<NoteHistoryView, String> {
    Ok(state.delete_note(payload.date, today())?)
}

#[tauri::command]
pub fn list_notes(state: State<AppState>) -> NoteHistoryView {
    state.history(today())
}

#[tauri::command]
pub fn get_contrast(
    state: State<AppState>,
    payload: Option<ContrastPayload>,
) -> Result<ContrastView, String> {
    let selection = payload.unwrap_or_default().selection;
    Ok(state.contrast(today(), selection)?)
}
