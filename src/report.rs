//! View model for the diagnosis report page.

use serde::Serialize;

use crate::{
    disease::merge_disease_ranking,
    grade::NO_GRADE,
    metric::MetricLabel,
    models::{DiagnosisSummary, DiseaseScore, NormalizedResult, SummaryEntry},
    region::DEFAULT_REGION,
};

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub key: &'static str,
    pub label: &'static str,
    pub grade: String,
    pub region: String,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub result: NormalizedResult,
    pub diseases: Vec<DiseaseScore>,
    pub selected_region: String,
    /// Empty when the analysis produced no elasticity grade.
    pub summary_rows: Vec<SummaryRow>,
}

impl ReportView {
    pub fn build(result: NormalizedResult) -> Self {
        let diseases = merge_disease_ranking(&result.disease_ranking);
        let selected_region = result
            .regions()
            .next()
            .unwrap_or(DEFAULT_REGION)
            .to_string();
        let summary_rows = summary_rows(&result.summary);
        Self {
            result,
            diseases,
            selected_region,
            summary_rows,
        }
    }
}

pub fn summary_rows(summary: &DiagnosisSummary) -> Vec<SummaryRow> {
    if summary.best_elasticity.grade == NO_GRADE {
        return Vec::new();
    }
    let row = |key: &'static str, label: &'static str, metric: MetricLabel, entry: &SummaryEntry| SummaryRow {
        key,
        label,
        grade: entry.grade.clone(),
        region: entry.region.clone(),
        description: metric.describe(&entry.grade),
    };
    vec![
        row(
            "best_elasticity",
            "탄력 (최고)",
            MetricLabel::Elasticity,
            &summary.best_elasticity,
        ),
        row(
            "worst_moisture",
            "수분 (최저)",
            MetricLabel::Moisture,
            &summary.worst_moisture,
        ),
        row("best_pore", "모공 (최고)", MetricLabel::Pore, &summary.best_pore),
    ]
}
