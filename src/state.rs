use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    client::{image_mime, AnalysisClient, AnalysisRequest, Analyzer, ClientError},
    config::AppConfig,
    contrast::{build_contrast, ContrastView},
    error::AppError,
    export::export_notes,
    flow::{FlowEvent, Page},
    intake::{DiagnosisForm, IntakeChange},
    models::{NormalizedResult, SkinNote},
    normalizer::normalize_value,
    notes::{
        can_write_on, insert_note, remove_note, sleep_options, NoteDraft, NoteEditorView,
        NoteHistoryView, DEFAULT_SLEEP_HOURS, DEFAULT_STRESS_LEVEL,
    },
    report::ReportView,
    storage::LocalStore,
};

const STORE_DIR: &str = "store.db";

/// Calendar date notes are filed under.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Default)]
struct Session {
    page: Page,
    form: DiagnosisForm,
    photo: Option<PathBuf>,
    /// Raw response of the most recent successful analysis.
    latest: Option<Value>,
    next_ticket: u64,
    in_flight: Option<u64>,
    last_error: Option<String>,
    user_ip: Option<String>,
}

impl Session {
    fn transition(&mut self, event: FlowEvent) -> Result<Page, AppError> {
        let to = self.page.next(event)?;
        debug!(from = ?self.page, to = ?to, event = ?event, "page transition");
        self.page = to;
        Ok(to)
    }

    /// Sends the user back to the upload page with the message shown there.
    fn fail_analysis(&mut self, message: String) -> Result<Page, AppError> {
        self.in_flight = None;
        self.last_error = Some(message);
        self.transition(FlowEvent::AnalysisFailed)
    }

    fn latest_result(&self) -> Option<NormalizedResult> {
        self.latest.as_ref().map(normalize_value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub page: Page,
    pub form: DiagnosisForm,
    pub photo_url: Option<String>,
    pub has_result: bool,
    pub analysis_pending: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub user_id: String,
    pub user_ip: Option<String>,
}

/// Handle for one in-flight analysis; a response is only applied while its ticket is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket(u64);

pub struct AppState {
    store: LocalStore,
    analyzer: Box<dyn Analyzer>,
    user_id: String,
    session: Mutex<Session>,
}

impl AppState {
    /// Opens the store under `data_dir` and talks to the configured analysis service.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = AppConfig::load(data_dir)?;
        let client = AnalysisClient::new(config).context("failed to build analysis client")?;
        Self::with_analyzer(data_dir, Box::new(client))
    }

    pub fn with_analyzer(data_dir: &Path, analyzer: Box<dyn Analyzer>) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create app data dir {:?}", data_dir))?;
        let store = LocalStore::open(&data_dir.join(STORE_DIR))?;
        let user_id = store.user_id()?;
        let session = Session {
            photo: store.load_last_photo().map(PathBuf::from),
            latest: store.load_last_diagnosis(),
            ..Session::default()
        };
        info!(user = %user_id, restored_result = session.latest.is_some(), "app state ready");
        Ok(Self {
            store,
            analyzer,
            user_id,
            session: Mutex::new(session),
        })
    }

    pub fn session(&self) -> SessionView {
        let session = self.session.lock();
        SessionView {
            page: session.page,
            form: session.form.clone(),
            photo_url: session
                .photo
                .as_ref()
                .map(|path| path.to_string_lossy().to_string()),
            has_result: session.latest.is_some(),
            analysis_pending: session.in_flight.is_some(),
            last_error: session.last_error.clone(),
        }
    }

    /// Moves between pages on user input. Analysis and note events are driven
    /// by their own operations and cannot be sent here.
    pub fn navigate(&self, event: FlowEvent) -> Result<Page, AppError> {
        let mut session = self.session.lock();
        match (session.page, event) {
            (_, FlowEvent::AnalysisSucceeded | FlowEvent::AnalysisFailed | FlowEvent::NoteSaved) => {
                return Err(AppError::Message(format!(
                    "{:?} is raised by the application, not by navigation",
                    event
                )));
            }
            (Page::DiagnosisForm, FlowEvent::Next) => {
                session.form.validate()?;
            }
            (Page::Upload, FlowEvent::Next) => {
                return Err(AppError::Message(
                    "start the analysis to leave the upload page".into(),
                ));
            }
            _ => {}
        }
        let to = session.transition(event)?;
        session.last_error = None;
        Ok(to)
    }

    pub fn update_intake(&self, change: IntakeChange) -> Result<DiagnosisForm, AppError> {
        let mut session = self.session.lock();
        session.form.apply(change, today().year())?;
        Ok(session.form.clone())
    }

    /// Remembers the photo to analyse; it also becomes the default photo of the next note.
    pub fn select_photo(&self, path: &Path) -> Result<String, AppError> {
        if image_mime(path).is_none() {
            return Err(ClientError::UnsupportedPhoto(path.to_path_buf()).into());
        }
        if !path.is_file() {
            return Err(AppError::Message("Selected file no longer exists.".into()));
        }
        let reference = path.to_string_lossy().to_string();
        let mut session = self.session.lock();
        self.store.save_last_photo(&reference)?;
        session.photo = Some(path.to_path_buf());
        Ok(reference)
    }

    pub fn begin_analysis(&self) -> Result<(AnalysisTicket, AnalysisRequest), AppError> {
        let mut session = self.session.lock();
        if session.page != Page::Upload {
            return Err(AppError::Message(format!(
                "analysis can only start from the upload page (currently {:?})",
                session.page
            )));
        }
        let submission = session.form.validate()?;
        let photo_path = session
            .photo
            .clone()
            .ok_or_else(|| AppError::Message("사진을 먼저 업로드해주세요.".into()))?;
        session.transition(FlowEvent::Next)?;

        session.next_ticket += 1;
        let ticket = AnalysisTicket(session.next_ticket);
        session.in_flight = Some(ticket.0);
        session.last_error = None;

        let request = AnalysisRequest {
            photo_path,
            submission,
            user_id: self.user_id.clone(),
            user_ip: session.user_ip.clone().unwrap_or_default(),
        };
        info!(ticket = ticket.0, "analysis started");
        Ok((ticket, request))
    }

    /// Applies the outcome of an analysis. Returns `Ok(None)` when the
    /// response is stale: a newer request started or the user left the
    /// processing page.
    pub fn finish_analysis(
        &self,
        ticket: AnalysisTicket,
        outcome: Result<Value, ClientError>,
    ) -> Result<Option<ReportView>, AppError> {
        let mut session = self.session.lock();
        if session.in_flight != Some(ticket.0) || session.page != Page::Processing {
            warn!(
                ticket = ticket.0,
                page = ?session.page,
                "dropping analysis response that is no longer current"
            );
            if session.in_flight == Some(ticket.0) {
                session.in_flight = None;
            }
            return Ok(None);
        }
        session.in_flight = None;

        match outcome {
            Ok(raw) => {
                if let Err(err) = self.store.save_last_diagnosis(&raw) {
                    warn!(ticket = ticket.0, "analysis result could not be stored: {:#}", err);
                    session.fail_analysis(format!("분석 결과 저장 실패: {:#}", err))?;
                    return Err(err.into());
                }
                let report = ReportView::build(normalize_value(&raw));
                session.latest = Some(raw);
                session.transition(FlowEvent::AnalysisSucceeded)?;
                info!(ticket = ticket.0, "analysis applied");
                Ok(Some(report))
            }
            Err(err) => {
                warn!(ticket = ticket.0, "analysis failed: {}", err);
                session.fail_analysis(err.to_string())?;
                Err(err.into())
            }
        }
    }

    /// Runs a full analysis round trip. Blocks on the network call without holding the session lock.
    pub fn run_analysis(&self) -> Result<Option<ReportView>, AppError> {
        if self.session.lock().user_ip.is_none() {
            self.refresh_user_info();
        }
        let (ticket, request) = self.begin_analysis()?;
        let outcome = self.analyzer.analyze(&request);
        self.finish_analysis(ticket, outcome)
    }

    pub fn report(&self) -> Option<ReportView> {
        self.session
            .lock()
            .latest_result()
            .map(ReportView::build)
    }

    pub fn note_editor(&self, today: NaiveDate) -> NoteEditorView {
        let session = self.session.lock();
        let can_write_today = can_write_on(&self.store.load_notes(), today);
        NoteEditorView {
            today,
            can_write_today,
            needs_rewrite_confirmation: !can_write_today,
            default_photo_url: session
                .photo
                .as_ref()
                .map(|path| path.to_string_lossy().to_string()),
            has_diagnosis: session.latest.is_some(),
            default_stress_level: DEFAULT_STRESS_LEVEL,
            default_sleep_hours: DEFAULT_SLEEP_HOURS,
            sleep_options: sleep_options(),
        }
    }

    /// Discards today's note so it can be written again.
    pub fn confirm_rewrite(&self, today: NaiveDate) -> Result<NoteHistoryView, AppError> {
        let _session = self.session.lock();
        let mut notes = self.store.load_notes();
        if remove_note(&mut notes, today) {
            self.store.save_notes(&notes)?;
            info!(date = %today, "today's note removed for rewrite");
        }
        Ok(history_view(notes, today))
    }

    pub fn save_note(&self, draft: NoteDraft, today: NaiveDate) -> Result<NoteHistoryView, AppError> {
        let mut session = self.session.lock();
        if session.page != Page::NoteEdit {
            return Err(AppError::Message(format!(
                "notes can only be saved from the editor (currently {:?})",
                session.page
            )));
        }
        let mut notes = self.store.load_notes();
        let photo_url = session
            .photo
            .as_ref()
            .map(|path| path.to_string_lossy().to_string());
        let note = draft.into_note(today, photo_url, session.latest_result())?;
        insert_note(&mut notes, note)?;
        self.store.save_notes(&notes)?;
        session.transition(FlowEvent::NoteSaved)?;
        info!(date = %today, total = notes.len(), "skin note saved");
        Ok(history_view(notes, today))
    }

    pub fn delete_note(&self, date: NaiveDate, today: NaiveDate) -> Result<NoteHistoryView, AppError> {
        let _session = self.session.lock();
        let mut notes = self.store.load_notes();
        if remove_note(&mut notes, date) {
            self.store.save_notes(&notes)?;
            info!(date = %date, "skin note deleted");
        }
        Ok(history_view(notes, today))
    }

    pub fn history(&self, today: NaiveDate) -> NoteHistoryView {
        let _session = self.session.lock();
        history_view(self.store.load_notes(), today)
    }

    pub fn contrast(
        &self,
        today: NaiveDate,
        selection: Option<usize>,
    ) -> Result<ContrastView, AppError> {
        let session = self.session.lock();
        let current = session.latest_result();
        let notes = self.store.load_notes();
        Ok(build_contrast(current.as_ref(), &notes, today, selection)?)
    }

    pub fn user_info(&self) -> UserInfo {
        UserInfo {
            user_id: self.user_id.clone(),
            user_ip: self.session.lock().user_ip.clone(),
        }
    }

    /// Looks the public IP up again. Failures are recorded as a placeholder string.
    pub fn refresh_user_info(&self) -> UserInfo {
        let ip = self.analyzer.lookup_ip();
        self.session.lock().user_ip = Some(ip);
        self.user_info()
    }

    pub fn export_notes(&self, destination: &Path) -> Result<usize, AppError> {
        let notes = {
            let _session = self.session.lock();
            self.store.load_notes()
        };
        export_notes(destination, &notes)?;
        info!(path = ?destination, count = notes.len(), "notes exported");
        Ok(notes.len())
    }
}

fn history_view(notes: Vec<SkinNote>, today: NaiveDate) -> NoteHistoryView {
    NoteHistoryView {
        can_write_today: can_write_on(&notes, today),
        notes,
        today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_analysis_leaves_processing() {
        let mut session = Session {
            page: Page::Processing,
            in_flight: Some(4),
            ..Session::default()
        };
        let page = session
            .fail_analysis("분석 결과 저장 실패: disk full".into())
            .unwrap();
        assert_eq!(page, Page::Upload);
        assert_eq!(session.page, Page::Upload);
        assert_eq!(session.in_flight, None);
        assert_eq!(
            session.last_error.as_deref(),
            Some("분석 결과 저장 실패: disk full")
        );
        assert!(session.latest.is_none());
    }
}
