use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Coarse education category inferred from keyword presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "PhD")]
    Phd,
    Master,
    Bachelor,
    #[serde(rename = "Not specified")]
    NotSpecified,
}

impl EducationLevel {
    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::Phd => "PhD",
            EducationLevel::Master => "Master",
            EducationLevel::Bachelor => "Bachelor",
            EducationLevel::NotSpecified => "Not specified",
        }
    }

    /// Points this level contributes to the overall score.
    pub fn points(self) -> f64 {
        match self {
            EducationLevel::Phd => 10.0,
            EducationLevel::Master => 7.0,
            EducationLevel::Bachelor => 4.0,
            EducationLevel::NotSpecified => 0.0,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "PhD" => EducationLevel::Phd,
            "Master" => EducationLevel::Master,
            "Bachelor" => EducationLevel::Bachelor,
            _ => EducationLevel::NotSpecified,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One persisted resume evaluation. Rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubmissionRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub filename: String,
    pub score: f64,
    /// Matched skills, comma-joined.
    pub matches: String,
    pub years_experience: i64,
    pub education: String,
    pub job_description: String,
    pub created_at: DateTime<Utc>,
}

impl SubmissionRow {
    pub fn matched_skills(&self) -> Vec<String> {
        if self.matches.is_empty() {
            return Vec::new();
        }
        self.matches.split(',').map(String::from).collect()
    }

    pub fn education_level(&self) -> EducationLevel {
        EducationLevel::from_label(&self.education)
    }
}

/// Fields written by a single insert; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub filename: String,
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub years_experience: u32,
    pub education: EducationLevel,
    pub job_description: String,
}
