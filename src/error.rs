use anyhow::Error;
use thiserror::Error;

use crate::{
    client::ClientError, contrast::SelectionOutOfRange, flow::FlowError, intake::IntakeError,
    notes::NoteError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Note(#[from] NoteError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Contrast(#[from] SelectionOutOfRange),
    #[error(transparent)]
    Other(#[from] Error),
}

impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}
