//! Metric categories and the rules that sort raw analysis keys into them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grade::grade_to_rank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricLabel {
    Elasticity,
    Moisture,
    Wrinkle,
    Pore,
    Pigmentation,
    Sagging,
    Dryness,
}

/// Whether a higher grade means more of something good or less of something bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Severity,
}

impl MetricLabel {
    pub const ALL: [MetricLabel; 7] = [
        MetricLabel::Elasticity,
        MetricLabel::Moisture,
        MetricLabel::Wrinkle,
        MetricLabel::Pore,
        MetricLabel::Pigmentation,
        MetricLabel::Sagging,
        MetricLabel::Dryness,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            MetricLabel::Elasticity => "탄력",
            MetricLabel::Moisture => "수분",
            MetricLabel::Wrinkle => "주름",
            MetricLabel::Pore => "모공",
            MetricLabel::Pigmentation => "색소",
            MetricLabel::Sagging => "처짐",
            MetricLabel::Dryness => "건조",
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        MetricLabel::ALL
            .iter()
            .copied()
            .find(|label| label.display_name() == name)
    }

    pub fn polarity(self) -> Polarity {
        match self {
            MetricLabel::Elasticity | MetricLabel::Moisture => Polarity::Positive,
            _ => Polarity::Severity,
        }
    }

    /// Interpretation sentence for a grade of this metric.
    pub fn describe(self, grade_text: &str) -> &'static str {
        let rank = grade_to_rank(grade_text);
        match self.polarity() {
            Polarity::Positive => match rank {
                r if r >= 3 => "매우 우수함: 평균 대비 월등히 좋은 상태입니다.",
                r if r >= 1 => "양호함: 평균 대비 좋은 상태입니다.",
                r if r >= 0 => "보통 수준: 평균적인 상태입니다.",
                r if r >= -1 => "주의 필요: 관리가 필요한 상태입니다.",
                r if r >= -3 => "심각: 전문적인 관리가 시급합니다.",
                _ => "데이터 부족",
            },
            Polarity::Severity => match rank {
                r if r >= 3 => "매우 우수함: 심각도가 거의 없어 깨끗한 상태입니다.",
                r if r >= 1 => "양호함: 평균 대비 심각도가 낮은 상태입니다.",
                r if r >= 0 => "보통 수준: 평균적인 심각도를 보입니다.",
                r if r >= -1 => "주의 필요: 눈에 띄게 심화될 수 있으니 관리가 필요합니다.",
                r if r >= -3 => "심각: 집중적인 관리 또는 상담이 시급합니다.",
                _ => "데이터 부족",
            },
        }
    }
}

impl fmt::Display for MetricLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Looks up the interpretation by the metric's display name.
pub fn describe_grade(grade_text: &str, metric_name: &str) -> &'static str {
    match MetricLabel::from_display_name(metric_name) {
        Some(label) => label.describe(grade_text),
        None => "해석 정보 없음",
    }
}

#[derive(Debug, Clone, Copy)]
enum KeyPattern {
    Contains(&'static str),
    Suffix(&'static str),
}

impl KeyPattern {
    fn matches(self, key: &str) -> bool {
        match self {
            KeyPattern::Contains(needle) => key.contains(needle),
            KeyPattern::Suffix(suffix) => key.ends_with(suffix),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricRule {
    pattern: KeyPattern,
    /// Rule only applies when the key carries a letter grade, not just a severity class.
    requires_grade: bool,
    label: MetricLabel,
}

impl MetricRule {
    const fn contains(needle: &'static str, label: MetricLabel) -> Self {
        Self {
            pattern: KeyPattern::Contains(needle),
            requires_grade: false,
            label,
        }
    }

    const fn suffix(suffix: &'static str, label: MetricLabel) -> Self {
        Self {
            pattern: KeyPattern::Suffix(suffix),
            requires_grade: false,
            label,
        }
    }

    const fn graded(mut self) -> Self {
        self.requires_grade = true;
        self
    }

    pub fn label(&self) -> MetricLabel {
        self.label
    }

    pub fn applies(&self, key: &str, has_grade: bool) -> bool {
        (!self.requires_grade || has_grade) && self.pattern.matches(key)
    }
}

/// Evaluated top to bottom; the first applicable rule decides the label.
pub const METRIC_RULES: [MetricRule; 7] = [
    MetricRule::contains("elasticity", MetricLabel::Elasticity),
    MetricRule::contains("moisture", MetricLabel::Moisture),
    MetricRule::contains("wrinkle", MetricLabel::Wrinkle).graded(),
    MetricRule::suffix("_pore", MetricLabel::Pore),
    MetricRule::suffix("_pigmentation", MetricLabel::Pigmentation),
    MetricRule::suffix("_sagging", MetricLabel::Sagging),
    MetricRule::suffix("_dryness", MetricLabel::Dryness),
];

pub fn classify_metric(key: &str, has_grade: bool) -> Option<MetricLabel> {
    METRIC_RULES
        .iter()
        .find(|rule| rule.applies(key, has_grade))
        .map(MetricRule::label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_substring_and_suffix() {
        assert_eq!(
            classify_metric("forehead_elasticity_R2", true),
            Some(MetricLabel::Elasticity)
        );
        assert_eq!(classify_metric("cheek_moisture", false), Some(MetricLabel::Moisture));
        assert_eq!(classify_metric("cheek_pore", false), Some(MetricLabel::Pore));
        assert_eq!(
            classify_metric("cheek_pigmentation", false),
            Some(MetricLabel::Pigmentation)
        );
        assert_eq!(classify_metric("chin_sagging", false), Some(MetricLabel::Sagging));
        assert_eq!(classify_metric("lip_dryness", false), Some(MetricLabel::Dryness));
    }

    #[test]
    fn first_rule_wins_when_patterns_overlap() {
        assert_eq!(
            classify_metric("moisture_elasticity", true),
            Some(MetricLabel::Elasticity)
        );
        assert_eq!(classify_metric("wrinkle_pore", true), Some(MetricLabel::Wrinkle));
    }

    #[test]
    fn wrinkle_needs_a_letter_grade() {
        assert_eq!(classify_metric("forehead_wrinkle", true), Some(MetricLabel::Wrinkle));
        assert_eq!(classify_metric("forehead_wrinkle", false), None);
        assert_eq!(classify_metric("wrinkle_pore", false), Some(MetricLabel::Pore));
    }

    #[test]
    fn suffix_rules_do_not_match_mid_key() {
        assert_eq!(classify_metric("pore_count", false), None);
        assert_eq!(classify_metric("cheek_pore_size", false), None);
        assert_eq!(classify_metric("redness", true), None);
    }

    #[test]
    fn descriptions_split_by_polarity() {
        assert_eq!(
            describe_grade("A+", "탄력"),
            "매우 우수함: 평균 대비 월등히 좋은 상태입니다."
        );
        assert_eq!(
            describe_grade("C0", "모공"),
            "주의 필요: 눈에 띄게 심화될 수 있으니 관리가 필요합니다."
        );
        assert_eq!(describe_grade("N/A", "수분"), "데이터 부족");
        assert_eq!(describe_grade("A+", "홍조"), "해석 정보 없음");
    }
}
