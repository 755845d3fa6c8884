use tauri::{AppHandle, Manager};

use crate::{error::AppError, state::{AppState, UserInfo}};

/// Anonymous user id and public IP. `refresh` performs a new IP lookup.
#[tauri::command]
pub async fn get_user_info(app: AppHandle, refresh: bool) -> Result<UserInfo, String> {
    tauri::async_runtime::spawn_blocking(move || {
        let state = app.state::<AppState>();
        if refresh {
            state.refresh_user_info()
        } else {
            state.user_info()
        }
    })
    .await
    .map_err(|err| AppError::Message(format!("user info task failed: {}", err)).into())
}
