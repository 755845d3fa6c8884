use serde::Deserialize;
use tauri::State;

use crate::{
    flow::{FlowEvent, Page},
    state::{AppState, SessionView},
};

#[derive(Debug, Deserialize)]
pub struct NavigatePayload {
    pub event: FlowEvent,
}

/// Applies a navigation event and returns the page to show.
#[tauri::command]
pub fn navigate(state: State<AppState>, payload: NavigatePayload) -> Result<Page, String> {
    Ok(state.navigate(payload.event)?)
}

/// Current page, intake form and analysis status.
#[tauri::command]
pub fn get_session(state: State<AppState>) -> SessionView {
    state.session()
}
