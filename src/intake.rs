//! The short questionnaire filled in before a photo is analysed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_BIRTH_YEAR: i32 = 1940;

pub const CONCERNS: [&str; 12] = [
    "주름",
    "칙칙함",
    "기미/잡티",
    "모공",
    "피지 과다",
    "민감성",
    "탄력저하",
    "각질",
    "다크서클",
    "건조",
    "여드름",
    "홍조",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Wording the analysis endpoint expects.
    pub fn api_label(self) -> &'static str {
        match self {
            Gender::Female => "여성",
            Gender::Male => "남성",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum IntakeError {
    #[error("성별, 출생년도, 출생월은 필수 선택 사항입니다.")]
    Incomplete,
    #[error("birth year {0} is outside 1940..={1}")]
    BirthYear(i32, i32),
    #[error("birth month {0} is outside 1..=12")]
    BirthMonth(u32),
    #[error("unknown concern tag {0:?}")]
    UnknownConcern(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum IntakeChange {
    Gender(Gender),
    BirthYear(i32),
    BirthMonth(u32),
    /// Adds the tag if absent, removes it if present.
    Concern(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisForm {
    pub gender: Option<Gender>,
    pub birth_year: Option<i32>,
    pub birth_month: Option<u32>,
    pub concerns: Vec<String>,
}

impl DiagnosisForm {
    pub fn apply(&mut self, change: IntakeChange, current_year: i32) -> Result<(), IntakeError> {
        match change {
            IntakeChange::Gender(gender) => self.gender = Some(gender),
            IntakeChange::BirthYear(year) => {
                if !(MIN_BIRTH_YEAR..=current_year).contains(&year) {
                    return Err(IntakeError::BirthYear(year, current_year));
                }
                self.birth_year = Some(year);
            }
            IntakeChange::BirthMonth(month) => {
                if !(1..=12).contains(&month) {
                    return Err(IntakeError::BirthMonth(month));
                }
                self.birth_month = Some(month);
            }
            IntakeChange::Concern(tag) => {
                if !CONCERNS.contains(&tag.as_str()) {
                    return Err(IntakeError::UnknownConcern(tag));
                }
                if let Some(pos) = self.concerns.iter().position(|c| *c == tag) {
                    self.concerns.remove(pos);
                } else {
                    self.concerns.push(tag);
                }
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<Submission, IntakeError> {
        match (self.gender, self.birth_year, self.birth_month) {
            (Some(gender), Some(birth_year), Some(birth_month)) => Ok(Submission {
                gender,
                birth_year,
                birth_month,
                concerns: self.concerns.clone(),
            }),
            _ => Err(IntakeError::Incomplete),
        }
    }
}

/// A completed form, ready to be sent with the photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub gender: Gender,
    pub birth_year: i32,
    pub birth_month: u32,
    pub concerns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concerns_toggle() {
        let mut form = DiagnosisForm::default();
        form.apply(IntakeChange::Concern("모공".into()), 2026).unwrap();
        form.apply(IntakeChange::Concern("홍조".into()), 2026).unwrap();
        form.apply(IntakeChange::Concern("모공".into()), 2026).unwrap();
        assert_eq!(form.concerns, vec!["홍조".to_string()]);
    }

    #[test]
    fn rejects_out_of_range_and_unknown_values() {
        let mut form = DiagnosisForm::default();
        assert_eq!(
            form.apply(IntakeChange::BirthYear(1939), 2026),
            Err(IntakeError::BirthYear(1939, 2026))
        );
        assert_eq!(
            form.apply(IntakeChange::BirthMonth(13), 2026),
            Err(IntakeError::BirthMonth(13))
        );
        assert!(matches!(
            form.apply(IntakeChange::Concern("tan".into()), 2026),
            Err(IntakeError::UnknownConcern(_))
        ));
        assert_eq!(form, DiagnosisForm::default());
    }

    #[test]
    fn validate_requires_gender_year_and_month() {
        let mut form = DiagnosisForm::default();
        form.apply(IntakeChange::Gender(Gender::Female), 2026).unwrap();
        form.apply(IntakeChange::BirthYear(1995), 2026).unwrap();
        assert_eq!(form.validate(), Err(IntakeError::Incomplete));
        form.apply(IntakeChange::BirthMonth(4), 2026).unwrap();
        let submission = form.validate().unwrap();
        assert_eq!(submission.gender.api_label(), "여성");
        assert_eq!(submission.birth_month, 4);
    }

    #[test]
    fn change_payload_shape() {
        let change: IntakeChange =
            serde_json::from_str(r#"{"field":"birth_year","value":1990}"#).unwrap();
        assert!(matches!(change, IntakeChange::BirthYear(1990)));
    }
}
