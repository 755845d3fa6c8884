//! Turns a raw skin-analysis response into grouped, averaged display data.
//!
//! The input is handled as an untyped JSON document. Missing or malformed
//! pieces degrade to placeholders instead of failing, since the output only
//! feeds display surfaces and note snapshots.

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    grade::{grade_to_rank, rank_to_grade, severity_class_rank, GradeColor, UNKNOWN_RANK},
    metric::{classify_metric, MetricLabel},
    models::{
        Age, ChartBar, Demographics, DiagnosisSummary, DiseaseScore, MetricLine, NormalizedResult,
        RegionChart, RegionMetrics, SummaryEntry, UnclassifiedMetric,
    },
    region::display_region,
    value_utils::{is_present, value_as_integer, value_display, value_to_text},
};

const UNKNOWN_LABEL: &str = "알 수 없음";
const SEVERITY_PREFIX: &str = "심각도";
const GRADE_UNIT: &str = "등급";
const DISEASE_SLOTS: [&str; 3] = ["top1", "top2", "top3"];

struct RankedValue {
    rank: i32,
    raw: String,
}

struct MetricGroup {
    label: MetricLabel,
    values: Vec<RankedValue>,
}

impl MetricGroup {
    fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return f64::from(UNKNOWN_RANK);
        }
        let total: i64 = self.values.iter().map(|value| i64::from(value.rank)).sum();
        total as f64 / self.values.len() as f64
    }
}

struct RegionGroups {
    region: String,
    groups: Vec<MetricGroup>,
}

impl RegionGroups {
    fn push(&mut self, label: MetricLabel, value: RankedValue) {
        match self.groups.iter_mut().find(|group| group.label == label) {
            Some(group) => group.values.push(value),
            None => self.groups.push(MetricGroup {
                label,
                values: vec![value],
            }),
        }
    }
}

pub fn normalize(raw: Option<&Value>) -> NormalizedResult {
    match raw {
        Some(value) => normalize_value(value),
        None => NormalizedResult::empty(None),
    }
}

pub fn normalize_value(raw: &Value) -> NormalizedResult {
    let image_url = raw
        .get("imageUrl")
        .and_then(Value::as_str)
        .map(str::to_string);
    let meta = raw.get("meta").and_then(Value::as_object);
    let parts = raw.get("parts_analysis").and_then(Value::as_array);
    let (Some(meta), Some(parts)) = (meta, parts) else {
        debug!("analysis response lacks meta or parts_analysis, using placeholders");
        return NormalizedResult::empty(image_url);
    };

    let mut unclassified = Vec::new();
    let regions = group_parts(parts, &mut unclassified);

    let mut result = NormalizedResult {
        demographics: demographics(meta),
        disease_ranking: disease_ranking(meta),
        region_metrics: Vec::new(),
        chart_series: Vec::new(),
        summary: DiagnosisSummary::default(),
        unclassified,
        image_url,
    };

    for region in regions {
        let mut metrics = Vec::with_capacity(region.groups.len());
        let mut bars = Vec::with_capacity(region.groups.len());
        for group in &region.groups {
            let mean = group.mean();
            let grade = rank_to_grade(mean);
            let color = GradeColor::for_rank(grade_to_rank(grade));

            let display_value = match group.values.first() {
                Some(first) if first.raw.starts_with(SEVERITY_PREFIX) => {
                    format!("{} (평균 {})", first.raw, grade)
                }
                _ => format!("평균 {} {}", GRADE_UNIT, grade),
            };
            metrics.push(MetricLine {
                metric: group.label,
                label: group.label.display_name().to_string(),
                display_value,
            });
            bars.push(ChartBar {
                metric: group.label,
                label: group.label.display_name().to_string(),
                numeric_rank: mean,
                unit: GRADE_UNIT.to_string(),
                display_grade: grade.to_string(),
                color: color.css().to_string(),
            });

            track_extremes(&mut result.summary, group.label, grade, &region.region, mean);
        }

        if !metrics.is_empty() {
            result.region_metrics.push(RegionMetrics {
                region: region.region.clone(),
                metrics,
            });
            result.chart_series.push(RegionChart {
                region: region.region,
                bars,
            });
        }
    }

    result
}

fn demographics(meta: &Map<String, Value>) -> Demographics {
    let gender = match meta.get("gender").and_then(Value::as_str) {
        Some("F") => "여성",
        Some("M") => "남성",
        _ => UNKNOWN_LABEL,
    };
    let age = match meta.get("age").filter(|value| is_present(value)) {
        Some(value) => value_as_integer(value)
            .and_then(|years| u32::try_from(years).ok())
            .map(Age::Years)
            .unwrap_or_else(|| Age::Label(value_display(value))),
        None => Age::Label(UNKNOWN_LABEL.to_string()),
    };
    Demographics {
        gender: gender.to_string(),
        age,
    }
}

fn disease_ranking(meta: &Map<String, Value>) -> Vec<DiseaseScore> {
    let Some(disease) = meta.get("disease").and_then(Value::as_object) else {
        return Vec::new();
    };
    DISEASE_SLOTS
        .iter()
        .filter_map(|slot| disease.get(*slot).filter(|entry| is_present(entry)))
        .map(|entry| DiseaseScore {
            name: entry
                .get("label")
                .and_then(value_to_text)
                .unwrap_or_default(),
            percent: round_tenth(entry.get("prob").and_then(Value::as_f64).unwrap_or(0.0) * 100.0),
        })
        .collect()
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn group_parts(parts: &[Value], unclassified: &mut Vec<UnclassifiedMetric>) -> Vec<RegionGroups> {
    let mut regions: Vec<RegionGroups> = Vec::new();

    for part in parts {
        let Some(part_name) = part.get("part_name").and_then(Value::as_str) else {
            debug!("skipping analysis part without a part_name");
            continue;
        };
        let region = display_region(part_name);
        let index = match regions.iter().position(|entry| entry.region == region) {
            Some(index) => index,
            None => {
                regions.push(RegionGroups {
                    region: region.to_string(),
                    groups: Vec::new(),
                });
                regions.len() - 1
            }
        };

        let empty = Map::new();
        let grades = part.get("grades").and_then(Value::as_object).unwrap_or(&empty);
        let classes = part.get("classes").and_then(Value::as_object).unwrap_or(&empty);
        let keys = grades
            .keys()
            .chain(classes.keys().filter(|key| !grades.contains_key(*key)));

        for key in keys {
            let grade_value = grades.get(key).filter(|value| is_present(value));
            let Some(label) = classify_metric(key, grade_value.is_some()) else {
                debug!(region, part = part_name, key = %key, "metric key matched no category");
                unclassified.push(UnclassifiedMetric {
                    region: region.to_string(),
                    part_name: part_name.to_string(),
                    key: key.clone(),
                });
                continue;
            };

            let ranked = if let Some(value) = grade_value {
                let text = value_display(value);
                RankedValue {
                    rank: grade_to_rank(&text),
                    raw: text,
                }
            } else if let Some(value) = classes.get(key) {
                let rank = value_as_integer(value)
                    .map(severity_class_rank)
                    .unwrap_or(UNKNOWN_RANK);
                RankedValue {
                    rank,
                    raw: format!(
                        "{} {} ({} {})",
                        SEVERITY_PREFIX,
                        value_display(value),
                        rank_to_grade(f64::from(rank)),
                        GRADE_UNIT
                    ),
                }
            } else {
                continue;
            };
            regions[index].push(label, ranked);
        }
    }

    regions
}

fn track_extremes(
    summary: &mut DiagnosisSummary,
    label: MetricLabel,
    grade: &str,
    region: &str,
    mean: f64,
) {
    let (slot, improves) = match label {
        MetricLabel::Elasticity => (&mut summary.best_elasticity, true),
        MetricLabel::Moisture => (&mut summary.worst_moisture, false),
        MetricLabel::Pore => (&mut summary.best_pore, true),
        _ => return,
    };
    let replace = if improves {
        mean > slot.numeric_rank
    } else {
        mean < slot.numeric_rank
    };
    if replace {
        *slot = SummaryEntry {
            grade: grade.to_string(),
            region: region.to_string(),
            numeric_rank: mean,
        };
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(parts: Value) -> Value {
        json!({
            "meta": {
                "gender": "F",
                "age": 29,
                "disease": {
                    "top1": {"label": "여드름", "prob": 0.82},
                    "top2": {"label": "정상", "prob": 0.10},
                    "top3": {"label": "주사", "prob": 0.05}
                }
            },
            "parts_analysis": parts
        })
    }

    #[test]
    fn severity_group_keeps_first_raw_text() {
        let raw = response(json!([
            {"part_name": "left_cheek", "grades": {}, "classes": {"cheek_pore": 2}},
            {"part_name": "right_cheek", "grades": {}, "classes": {"cheek_pore": 4}}
        ]));
        let result = normalize_value(&raw);
        let metrics = result.metrics_for("볼").expect("cheek region");
        assert_eq!(metrics.len(), 1);
        // class 2 -> 3, class 4 -> -1, mean 1.0 -> B0
        assert_eq!(metrics[0].display_value, "심각도 2 (A0 등급) (평균 B0)");
    }

    #[test]
    fn grade_wins_over_class_for_the_same_key() {
        let raw = response(json!([
            {
                "part_name": "chin",
                "grades": {"chin_sagging": "등급 C+"},
                "classes": {"chin_sagging": 1}
            }
        ]));
        let result = normalize_value(&raw);
        let bars = result.chart_for("턱").expect("chin region");
        assert_eq!(bars[0].numeric_rank, 0.0);
        assert_eq!(bars[0].display_grade, "C+");
        assert_eq!(bars[0].color, "#ffaa00");
        assert_eq!(result.metrics_for("턱").unwrap()[0].display_value, "평균 등급 C+");
    }

    #[test]
    fn empty_grade_falls_back_to_class() {
        let raw = response(json!([
            {"part_name": "chin", "grades": {"chin_sagging": ""}, "classes": {"chin_sagging": 5}}
        ]));
        let result = normalize_value(&raw);
        let metrics = result.metrics_for("턱").unwrap();
        assert_eq!(metrics[0].display_value, "심각도 5 (D0 등급) (평균 D0)");
    }

    #[test]
    fn unknown_severity_class_resolves_to_no_grade() {
        let raw = response(json!([
            {"part_name": "chin", "grades": {}, "classes": {"chin_dryness": 9}}
        ]));
        let result = normalize_value(&raw);
        let bars = result.chart_for("턱").unwrap();
        assert_eq!(bars[0].numeric_rank, -10.0);
        assert_eq!(bars[0].display_grade, "N/A");
        assert_eq!(bars[0].color, "var(--sub-text-color)");
    }

    #[test]
    fn unmatched_keys_land_in_unclassified() {
        let raw = response(json!([
            {
                "part_name": "forehead",
                "grades": {"forehead_redness": "A0", "forehead_moisture": "B0"},
                "classes": {"forehead_wrinkle": 3}
            }
        ]));
        let result = normalize_value(&raw);
        let keys: Vec<&str> = result.unclassified.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["forehead_redness", "forehead_wrinkle"]);
        assert_eq!(result.unclassified[0].region, "이마");
        assert_eq!(result.metrics_for("이마").unwrap().len(), 1);
    }

    #[test]
    fn region_without_metrics_is_omitted() {
        let raw = response(json!([
            {"part_name": "neck", "grades": {"neck_redness": "A0"}, "classes": {}},
            {"part_name": "forehead", "grades": {"forehead_elasticity": "A0"}, "classes": {}}
        ]));
        let result = normalize_value(&raw);
        assert!(result.metrics_for("neck").is_none());
        assert_eq!(result.regions().collect::<Vec<_>>(), vec!["이마"]);
    }

    #[test]
    fn labels_keep_first_seen_order() {
        let raw = response(json!([
            {
                "part_name": "left_cheek",
                "grades": {"cheek_moisture": "B0", "cheek_elasticity": "A0"},
                "classes": {"cheek_pigmentation": 1, "cheek_pore": 3}
            }
        ]));
        let result = normalize_value(&raw);
        let labels: Vec<&str> = result.metrics_for("볼").unwrap().iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["수분", "탄력", "색소", "모공"]);
    }

    #[test]
    fn summary_ties_keep_first_region() {
        let raw = response(json!([
            {"part_name": "forehead", "grades": {"forehead_elasticity": "A0", "forehead_moisture": "C0"}},
            {"part_name": "left_cheek", "grades": {"cheek_elasticity": "A0", "cheek_moisture": "C0"}},
            {"part_name": "chin", "grades": {"chin_moisture": "D0"}, "classes": {"chin_pore": 1}}
        ]));
        let result = normalize_value(&raw);
        assert_eq!(result.summary.best_elasticity.region, "이마");
        assert_eq!(result.summary.best_elasticity.grade, "A0");
        assert_eq!(result.summary.worst_moisture.region, "턱");
        assert_eq!(result.summary.worst_moisture.numeric_rank, -3.0);
        assert_eq!(result.summary.best_pore.grade, "A+");
    }

    #[test]
    fn demographics_fall_back_to_unknown() {
        let raw = json!({
            "meta": {"gender": "X", "age": 0},
            "parts_analysis": []
        });
        let result = normalize_value(&raw);
        assert_eq!(result.demographics.gender, "알 수 없음");
        assert_eq!(result.demographics.age, Age::Label("알 수 없음".into()));
        assert!(result.disease_ranking.is_empty());
    }

    #[test]
    fn non_integer_age_is_shown_as_given() {
        let age_of = |age: Value| {
            normalize_value(&json!({"meta": {"gender": "M", "age": age}, "parts_analysis": []}))
                .demographics
                .age
        };
        assert_eq!(age_of(json!("29")), Age::Label("29".into()));
        assert_eq!(age_of(json!(29.5)), Age::Label("29.5".into()));
        assert_eq!(age_of(json!(41)), Age::Years(41));
        assert_eq!(age_of(json!("")), Age::Label("알 수 없음".into()));
        assert_eq!(age_of(json!(null)), Age::Label("알 수 없음".into()));
    }

    #[test]
    fn image_url_survives_placeholder_path() {
        let raw = json!({"imageUrl": "file:///photo.jpg"});
        let result = normalize_value(&raw);
        assert_eq!(result.image_url.as_deref(), Some("file:///photo.jpg"));
        assert_eq!(result.demographics.gender, "N/A");
    }
}
