//! The eight-step grade scale and its numeric ranks.
//!
//! Grades run `A+ > A0 > B+ > B0 > C+ > C0 > D+ > D0` and map onto the ranks
//! `4..=-3`. Anything that does not contain a grade token ranks as
//! [`UNKNOWN_RANK`], which sits below every real grade.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Rank given to text that carries no recognizable grade.
pub const UNKNOWN_RANK: i32 = -10;

/// Placeholder shown wherever no grade can be resolved.
pub const NO_GRADE: &str = "N/A";

static GRADE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(A\+|A0|B\+|B0|C\+|C0|D\+|D0)").expect("grade pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A0")]
    A0,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B0")]
    B0,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C0")]
    C0,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D0")]
    D0,
}

impl Grade {
    /// Best to worst. `from_mean` relies on this order.
    pub const DESCENDING: [Grade; 8] = [
        Grade::APlus,
        Grade::A0,
        Grade::BPlus,
        Grade::B0,
        Grade::CPlus,
        Grade::C0,
        Grade::DPlus,
        Grade::D0,
    ];

    pub fn rank(self) -> i32 {
        match self {
            Grade::APlus => 4,
            Grade::A0 => 3,
            Grade::BPlus => 2,
            Grade::B0 => 1,
            Grade::CPlus => 0,
            Grade::C0 => -1,
            Grade::DPlus => -2,
            Grade::D0 => -3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A0 => "A0",
            Grade::BPlus => "B+",
            Grade::B0 => "B0",
            Grade::CPlus => "C+",
            Grade::C0 => "C0",
            Grade::DPlus => "D+",
            Grade::D0 => "D0",
        }
    }

    /// Pulls the first grade token out of free text such as
    /// `"백분위 80.6% / 등급 A+"`. Matching ignores case.
    pub fn extract(text: &str) -> Option<Grade> {
        let token = GRADE_TOKEN.find(text)?.as_str().to_uppercase();
        Grade::DESCENDING
            .iter()
            .copied()
            .find(|grade| grade.as_str() == token)
    }

    /// Resolves an averaged rank by scanning from the best grade downwards and
    /// taking the first whose rank the mean meets. A mean of 1.9 is `B0`, not `B+`.
    pub fn from_mean(mean: f64) -> Option<Grade> {
        Grade::DESCENDING
            .iter()
            .copied()
            .find(|grade| mean >= f64::from(grade.rank()))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn grade_to_rank(text: &str) -> i32 {
    Grade::extract(text)
        .map(Grade::rank)
        .unwrap_or(UNKNOWN_RANK)
}

pub fn rank_to_grade(mean: f64) -> &'static str {
    Grade::from_mean(mean)
        .map(Grade::as_str)
        .unwrap_or(NO_GRADE)
}

/// Severity classes run 1 (best) to 5 (worst). Ranks 2 and 0 have no class.
pub fn severity_class_rank(class: i64) -> i32 {
    match class {
        1 => 4,
        2 => 3,
        3 => 1,
        4 => -1,
        5 => -3,
        _ => UNKNOWN_RANK,
    }
}

/// Five display tiers used for chart bars and summary badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeColor {
    Accent,
    Blue,
    Orange,
    Red,
    Muted,
}

impl GradeColor {
    pub fn for_rank(rank: i32) -> Self {
        if rank >= 3 {
            GradeColor::Accent
        } else if rank >= 1 {
            GradeColor::Blue
        } else if rank >= 0 {
            GradeColor::Orange
        } else if rank >= -3 {
            GradeColor::Red
        } else {
            GradeColor::Muted
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            GradeColor::Accent => "var(--accent-color)",
            GradeColor::Blue => "#4c78d0",
            GradeColor::Orange => "#ffaa00",
            GradeColor::Red => "#d9534f",
            GradeColor::Muted => "var(--sub-text-color)",
        }
    }
}

pub fn grade_color(text: &str) -> GradeColor {
    GradeColor::for_rank(grade_to_rank(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_grade_round_trips_through_its_rank() {
        let mut seen = Vec::new();
        for grade in Grade::DESCENDING {
            let rank = grade_to_rank(grade.as_str());
            assert!(!seen.contains(&rank), "rank {} assigned twice", rank);
            seen.push(rank);
            assert_eq!(rank_to_grade(f64::from(rank)), grade.as_str());
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![-3, -2, -1, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn extracts_grade_embedded_in_text() {
        assert_eq!(grade_to_rank("백분위 80.6% / 등급 A+"), 4);
        assert_eq!(grade_to_rank("등급 c0"), -1);
        assert_eq!(grade_to_rank("d+"), -2);
    }

    #[test]
    fn unrecognized_text_is_sentinel() {
        assert_eq!(grade_to_rank(""), UNKNOWN_RANK);
        assert_eq!(grade_to_rank("excellent"), UNKNOWN_RANK);
        assert_eq!(grade_to_rank("E+"), UNKNOWN_RANK);
    }

    #[test]
    fn mean_resolves_to_grade_below() {
        assert_eq!(rank_to_grade(1.9), "B0");
        assert_eq!(rank_to_grade(2.5), "B+");
        assert_eq!(rank_to_grade(-0.5), "C0");
        assert_eq!(rank_to_grade(4.0), "A+");
        assert_eq!(rank_to_grade(7.0), "A+");
    }

    #[test]
    fn mean_below_scale_has_no_grade() {
        assert_eq!(rank_to_grade(-3.5), NO_GRADE);
        assert_eq!(rank_to_grade(f64::from(UNKNOWN_RANK)), NO_GRADE);
        assert_eq!(Grade::from_mean(f64::NAN), None);
    }

    #[test]
    fn severity_classes_skip_ranks_two_and_zero() {
        assert_eq!(rank_to_grade(f64::from(severity_class_rank(1))), "A+");
        assert_eq!(rank_to_grade(f64::from(severity_class_rank(5))), "D0");
        let ranks: Vec<i32> = (1..=5).map(severity_class_rank).collect();
        assert!(!ranks.contains(&2));
        assert!(!ranks.contains(&0));
        assert_eq!(severity_class_rank(0), UNKNOWN_RANK);
        assert_eq!(severity_class_rank(6), UNKNOWN_RANK);
    }

    #[test]
    fn color_tiers_follow_rank_thresholds() {
        assert_eq!(grade_color("A0"), GradeColor::Accent);
        assert_eq!(grade_color("B0"), GradeColor::Blue);
        assert_eq!(grade_color("C+"), GradeColor::Orange);
        assert_eq!(grade_color("D0"), GradeColor::Red);
        assert_eq!(grade_color(NO_GRADE), GradeColor::Muted);
        assert_eq!(GradeColor::Muted.css(), "var(--sub-text-color)");
    }
}
