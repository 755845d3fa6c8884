use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use csv::WriterBuilder;

use crate::models::SkinNote;

const HEADER: [&str; 9] = [
    "date",
    "summary",
    "full_text",
    "stress_level",
    "sleep_hours",
    "photo_url",
    "best_elasticity",
    "worst_moisture",
    "best_pore",
];

pub fn write_notes_csv<W: Write>(writer: W, notes: &[SkinNote]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    writer
        .write_record(HEADER)
        .context("failed to write notes CSV header")?;
    for note in notes {
        let (elasticity, moisture, pore) = match &note.diagnosis_data {
            Some(data) => (
                data.summary.best_elasticity.grade.clone(),
                data.summary.worst_moisture.grade.clone(),
                data.summary.best_pore.grade.clone(),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        writer
            .write_record([
                note.date.to_string(),
                note.summary.clone(),
                note.full_text.clone(),
                note.stress_level.to_string(),
                note.sleep_hours.to_string(),
                note.photo_url.clone().unwrap_or_default(),
                elasticity,
                moisture,
                pore,
            ])
            .with_context(|| format!("failed to write notes CSV row for {}", note.date))?;
    }
    writer.flush().context("failed to flush notes CSV writer")
}

pub fn export_notes(path: &Path, notes: &[SkinNote]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create export dir {:?}", parent))?;
    }
    let file =
        fs::File::create(path).with_context(|| format!("failed to create export file {:?}", path))?;
    write_notes_csv(file, notes)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::NormalizedResult;

    #[test]
    fn writes_header_and_rows() {
        let notes = vec![SkinNote {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            summary: "tight, \"dry\" cheeks".into(),
            full_text: "tight, \"dry\" cheeks".into(),
            photo_url: None,
            stress_level: 4,
            sleep_hours: 6.5,
            diagnosis_data: Some(NormalizedResult::empty(None)),
        }];
        let mut out = Vec::new();
        write_notes_csv(&mut out, &notes).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HEADER.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some(r#"2026-10-19,"tight, ""dry"" cheeks","tight, ""dry"" cheeks",4,6.5,,N/A,N/A,N/A"#)
        );
    }
}
