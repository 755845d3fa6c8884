//! Daily skin notes: drafting, validation and list semantics.
//!
//! The list holds at most one note per date and is kept newest-first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{NormalizedResult, SkinNote};

pub const DEFAULT_STRESS_LEVEL: u8 = 3;
pub const DEFAULT_SLEEP_HOURS: f64 = 7.0;
const SUMMARY_CHARS: usize = 100;

#[derive(Debug, Error, PartialEq)]
pub enum NoteError {
    #[error("오늘의 피부 상태를 기록해주세요.")]
    EmptyText,
    #[error("stress level {0} is outside 1..=5")]
    StressLevel(u8),
    #[error("sleep hours {0} must be a half-hour step between 0.5 and 12")]
    SleepHours(f64),
    #[error("a note for {0} already exists; confirm the rewrite first")]
    AlreadyWritten(NaiveDate),
}

pub fn stress_label(level: u8) -> Option<&'static str> {
    match level {
        1 => Some("매우 낮음"),
        2 => Some("낮음"),
        3 => Some("보통"),
        4 => Some("높음"),
        5 => Some("매우 높음"),
        _ => None,
    }
}

/// Selectable sleep durations: 0.5 to 12 hours in half-hour steps.
pub fn sleep_options() -> Vec<f64> {
    (1..=24).map(|half_hours| f64::from(half_hours) * 0.5).collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteDraft {
    pub text: String,
    pub stress_level: Option<u8>,
    pub sleep_hours: Option<f64>,
}

impl NoteDraft {
    pub fn into_note(
        self,
        date: NaiveDate,
        photo_url: Option<String>,
        diagnosis_data: Option<NormalizedResult>,
    ) -> Result<SkinNote, NoteError> {
        if self.text.trim().is_empty() {
            return Err(NoteError::EmptyText);
        }
        let stress_level = self.stress_level.unwrap_or(DEFAULT_STRESS_LEVEL);
        if stress_label(stress_level).is_none() {
            return Err(NoteError::StressLevel(stress_level));
        }
        let sleep_hours = self.sleep_hours.unwrap_or(DEFAULT_SLEEP_HOURS);
        if !sleep_options().contains(&sleep_hours) {
            return Err(NoteError::SleepHours(sleep_hours));
        }
        Ok(SkinNote {
            date,
            summary: summarize(&self.text),
            full_text: self.text,
            photo_url,
            stress_level,
            sleep_hours,
            diagnosis_data,
        })
    }
}

/// First hundred characters, with an ellipsis when the text was cut.
pub fn summarize(text: &str) -> String {
    let mut summary: String = text.chars().take(SUMMARY_CHARS).collect();
    if text.chars().count() > SUMMARY_CHARS {
        summary.push_str("...");
    }
    summary
}

pub fn can_write_on(notes: &[SkinNote], date: NaiveDate) -> bool {
    !notes.iter().any(|note| note.date == date)
}

/// Puts the note first. A date that already has a note must be cleared with
/// [`remove_note`] before it can be written again.
pub fn insert_note(notes: &mut Vec<SkinNote>, note: SkinNote) -> Result<(), NoteError> {
    if !can_write_on(notes, note.date) {
        return Err(NoteError::AlreadyWritten(note.date));
    }
    notes.insert(0, note);
    Ok(())
}

/// Returns whether a note was removed.
pub fn remove_note(notes: &mut Vec<SkinNote>, date: NaiveDate) -> bool {
    let before = notes.len();
    notes.retain(|note| note.date != date);
    notes.len() != before
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteHistoryView {
    pub notes: Vec<SkinNote>,
    pub can_write_today: bool,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteEditorView {
    pub today: NaiveDate,
    pub can_write_today: bool,
    /// Set when today's note exists and the user must confirm a rewrite.
    pub needs_rewrite_confirmation: bool,
    pub default_photo_url: Option<String>,
    pub has_diagnosis: bool,
    pub default_stress_level: u8,
    pub default_sleep_hours: f64,
    pub sleep_options: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn note(day: u32, text: &str) -> SkinNote {
        NoteDraft {
            text: text.to_string(),
            ..NoteDraft::default()
        }
        .into_note(date(day), None, None)
        .unwrap()
    }

    #[test]
    fn draft_defaults_and_validation() {
        let built = note(1, "dry around the chin");
        assert_eq!(built.stress_level, 3);
        assert_eq!(built.sleep_hours, 7.0);

        let blank = NoteDraft {
            text: "   ".into(),
            ..NoteDraft::default()
        };
        assert_eq!(blank.into_note(date(1), None, None), Err(NoteError::EmptyText));

        let stressed = NoteDraft {
            text: "ok".into(),
            stress_level: Some(6),
            sleep_hours: None,
        };
        assert_eq!(stressed.into_note(date(1), None, None), Err(NoteError::StressLevel(6)));

        let odd_sleep = NoteDraft {
            text: "ok".into(),
            stress_level: None,
            sleep_hours: Some(7.25),
        };
        assert_eq!(odd_sleep.into_note(date(1), None, None), Err(NoteError::SleepHours(7.25)));
    }

    #[test]
    fn summary_truncates_by_characters() {
        let long = "가".repeat(120);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), 103);
        assert!(summary.ends_with("..."));
        assert_eq!(summarize("short"), "short");
    }

    #[test]
    fn insert_keeps_newest_first_and_refuses_taken_dates() {
        let mut notes = vec![note(2, "second"), note(1, "first")];
        insert_note(&mut notes, note(3, "third")).unwrap();
        assert_eq!(
            insert_note(&mut notes, note(2, "second again")),
            Err(NoteError::AlreadyWritten(date(2)))
        );
        let texts: Vec<&str> = notes.iter().map(|n| n.full_text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);

        assert!(remove_note(&mut notes, date(2)));
        insert_note(&mut notes, note(2, "second again")).unwrap();
        assert_eq!(notes[0].full_text, "second again");
        assert_eq!(notes.len(), 3);
    }

    #[test]
    fn write_permission_tracks_todays_note() {
        let mut notes = vec![note(1, "first")];
        assert!(can_write_on(&notes, date(2)));
        insert_note(&mut notes, note(2, "today")).unwrap();
        assert!(!can_write_on(&notes, date(2)));
        assert!(remove_note(&mut notes, date(2)));
        assert!(!remove_note(&mut notes, date(2)));
        assert!(can_write_on(&notes, date(2)));
    }

    #[test]
    fn sleep_options_cover_half_hours() {
        let options = sleep_options();
        assert_eq!(options.first(), Some(&0.5));
        assert_eq!(options.last(), Some(&12.0));
        assert_eq!(options.len(), 24);
    }
}
