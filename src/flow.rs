//! Page flow as an explicit state machine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    DiagnosisForm,
    FacePrep,
    Upload,
    Processing,
    Result,
    NoteEdit,
    NoteHistory,
    Contrast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowEvent {
    StartDiagnosis,
    StartCompare,
    Next,
    Prev,
    AnalysisSucceeded,
    AnalysisFailed,
    WriteNote,
    NoteSaved,
    GoHome,
    GoNoteHistory,
    GoContrast,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no transition from {from:?} on {event:?}")]
pub struct FlowError {
    pub from: Page,
    pub event: FlowEvent,
}

impl Page {
    pub fn next(self, event: FlowEvent) -> Result<Page, FlowError> {
        use FlowEvent::*;
        use Page::*;

        let to = match (self, event) {
            // navigation bar, reachable from everywhere
            (_, GoHome) => Home,
            (_, GoNoteHistory) => NoteHistory,
            (_, GoContrast) => Contrast,

            (Home, StartDiagnosis) => DiagnosisForm,
            (Home, StartCompare) => Contrast,
            (DiagnosisForm, Next) => FacePrep,
            (DiagnosisForm, Prev) => Home,
            (FacePrep, Next) => Upload,
            (FacePrep, Prev) => DiagnosisForm,
            (Upload, Next) => Processing,
            (Upload, Prev) => FacePrep,
            (Processing, AnalysisSucceeded) => Result,
            (Processing, AnalysisFailed) => Upload,
            (Result, WriteNote) | (NoteHistory, WriteNote) => NoteEdit,
            (NoteEdit, NoteSaved) | (NoteEdit, Prev) => NoteHistory,
            (from, event) => return Err(FlowError { from, event }),
        };
        Ok(to)
    }
}
