//! Side-by-side comparison of the latest diagnosis with a past note's diagnosis.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::{
    models::{DiagnosisSummary, NormalizedResult, SkinNote},
    report::{summary_rows, SummaryRow},
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("comparison index {index} is out of range ({available} notes with a diagnosis)")]
pub struct SelectionOutOfRange {
    pub index: usize,
    pub available: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisSide {
    pub date: NaiveDate,
    pub photo_url: Option<String>,
    pub summary: DiagnosisSummary,
    pub rows: Vec<SummaryRow>,
}

impl DiagnosisSide {
    fn new(date: NaiveDate, photo_url: Option<String>, summary: &DiagnosisSummary) -> Self {
        Self {
            date,
            photo_url,
            summary: summary.clone(),
            rows: summary_rows(summary),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContrastOption {
    pub index: usize,
    pub date: NaiveDate,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContrastView {
    pub current: Option<DiagnosisSide>,
    pub options: Vec<ContrastOption>,
    pub selected_index: Option<usize>,
    pub selected: Option<DiagnosisSide>,
    pub is_empty: bool,
}

/// Notes that carry a diagnosis snapshot, in list order.
fn comparable(notes: &[SkinNote]) -> Vec<(&SkinNote, &NormalizedResult)> {
    notes
        .iter()
        .filter_map(|note| note.diagnosis_data.as_ref().map(|data| (note, data)))
        .collect()
}

/// Builds the comparison. `selection` indexes the comparable notes and defaults to the first.
pub fn build_contrast(
    current: Option<&NormalizedResult>,
    notes: &[SkinNote],
    today: NaiveDate,
    selection: Option<usize>,
) -> Result<ContrastView, SelectionOutOfRange> {
    let candidates = comparable(notes);
    let selected_index = match selection {
        Some(index) if index >= candidates.len() => {
            return Err(SelectionOutOfRange {
                index,
                available: candidates.len(),
            })
        }
        Some(index) => Some(index),
        None if candidates.is_empty() => None,
        None => Some(0),
    };

    let selected = selected_index.map(|index| {
        let (note, data) = candidates[index];
        DiagnosisSide::new(note.date, note.photo_url.clone(), &data.summary)
    });
    let options = candidates
        .iter()
        .enumerate()
        .map(|(index, (note, _))| ContrastOption {
            index,
            date: note.date,
            summary: note.summary.clone(),
        })
        .collect();
    let current =
        current.map(|result| DiagnosisSide::new(today, result.image_url.clone(), &result.summary));

    Ok(ContrastView {
        is_empty: current.is_none() && candidates.is_empty(),
        current,
        options,
        selected_index,
        selected,
    })
}
