use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    grade::{NO_GRADE, UNKNOWN_RANK},
    metric::MetricLabel,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Age {
    Years(u32),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub gender: String,
    pub age: Age,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseScore {
    pub name: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricLine {
    pub metric: MetricLabel,
    pub label: String,
    pub display_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMetrics {
    pub region: String,
    pub metrics: Vec<MetricLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub metric: MetricLabel,
    pub label: String,
    pub numeric_rank: f64,
    pub unit: String,
    pub display_grade: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionChart {
    pub region: String,
    pub bars: Vec<ChartBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub grade: String,
    pub region: String,
    pub numeric_rank: f64,
}

impl SummaryEntry {
    pub fn placeholder(numeric_rank: f64) -> Self {
        Self {
            grade: NO_GRADE.to_string(),
            region: NO_GRADE.to_string(),
            numeric_rank,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisSummary {
    pub best_elasticity: SummaryEntry,
    pub worst_moisture: SummaryEntry,
    pub best_pore: SummaryEntry,
}

impl Default for DiagnosisSummary {
    fn default() -> Self {
        Self {
            best_elasticity: SummaryEntry::placeholder(f64::from(UNKNOWN_RANK)),
            worst_moisture: SummaryEntry::placeholder(f64::from(-UNKNOWN_RANK)),
            best_pore: SummaryEntry::placeholder(f64::from(UNKNOWN_RANK)),
        }
    }
}

/// A raw metric key that no classification rule accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnclassifiedMetric {
    pub region: String,
    pub part_name: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub demographics: Demographics,
    pub disease_ranking: Vec<DiseaseScore>,
    pub region_metrics: Vec<RegionMetrics>,
    pub chart_series: Vec<RegionChart>,
    pub summary: DiagnosisSummary,
    #[serde(default)]
    pub unclassified: Vec<UnclassifiedMetric>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NormalizedResult {
    /// Placeholder result for missing or malformed input.
    pub fn empty(image_url: Option<String>) -> Self {
        Self {
            demographics: Demographics {
                gender: NO_GRADE.to_string(),
                age: Age::Label(NO_GRADE.to_string()),
            },
            disease_ranking: Vec::new(),
            region_metrics: Vec::new(),
            chart_series: Vec::new(),
            summary: DiagnosisSummary::default(),
            unclassified: Vec::new(),
            image_url,
        }
    }

    pub fn metrics_for(&self, region: &str) -> Option<&[MetricLine]> {
        self.region_metrics
            .iter()
            .find(|entry| entry.region == region)
            .map(|entry| entry.metrics.as_slice())
    }

    pub fn chart_for(&self, region: &str) -> Option<&[ChartBar]> {
        self.chart_series
            .iter()
            .find(|entry| entry.region == region)
            .map(|entry| entry.bars.as_slice())
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.chart_series.iter().map(|entry| entry.region.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinNote {
    pub date: NaiveDate,
    pub summary: String,
    pub full_text: String,
    pub photo_url: Option<String>,
    pub stress_level: u8,
    pub sleep_hours: f64,
    #[serde(default)]
    pub diagnosis_data: Option<NormalizedResult>,
}
