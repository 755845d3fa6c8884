//! Skin-diagnosis journal: analysis normalization, diary notes and the page
//! flow behind the desktop front-end.

pub mod client;
pub mod config;
pub mod contrast;
pub mod disease;
pub mod error;
pub mod export;
pub mod flow;
pub mod grade;
pub mod intake;
pub mod metric;
pub mod models;
pub mod normalizer;
pub mod notes;
pub mod region;
pub mod report;
pub mod state;
pub mod storage;
pub mod value_utils;

#[cfg(feature = "desktop")]
pub mod commands;

pub use grade::{grade_to_rank, rank_to_grade, severity_class_rank, Grade};
pub use models::NormalizedResult;
pub use normalizer::{normalize, normalize_value};
pub use state::AppState;
