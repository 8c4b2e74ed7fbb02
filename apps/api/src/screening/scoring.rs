//! Heuristic resume scoring.
//!
//! `AppState` holds an `Arc<dyn ResumeScorer>`; `HeuristicScorer` is the only
//! backend.
//!
//! | component | weight | rule |
//! |---|---|---|
//! | skills | 70 | matched / required |
//! | years | 30 | linear up to 10 years |
//! | education | 10 | PhD 10, Master 7, Bachelor 4 |
//!
//! The total is capped at 100 and rounded to one decimal.

use serde::Serialize;

use crate::models::submission::EducationLevel;
use crate::screening::attributes::{find_education, find_years_of_experience};

pub const SKILLS_WEIGHT: f64 = 70.0;
pub const YEARS_WEIGHT: f64 = 30.0;
pub const YEARS_CAP: u32 = 10;
pub const MAX_SCORE: f64 = 100.0;

/// Outcome of scoring one resume text against a skill list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub score: f64,
    /// Lowercased, trimmed skills found in the text, in request order.
    pub matched_skills: Vec<String>,
    pub years: u32,
    pub education: EducationLevel,
}

pub trait ResumeScorer: Send + Sync {
    fn score(&self, text: &str, required_skills: &[String]) -> ScoreReport;
}

/// Regex/substring scorer. Deterministic, never fails.
pub struct HeuristicScorer;

impl ResumeScorer for HeuristicScorer {
    fn score(&self, text: &str, required_skills: &[String]) -> ScoreReport {
        score_resume(text, required_skills)
    }
}

pub fn score_resume(text: &str, required_skills: &[String]) -> ScoreReport {
    let text_lower = text.to_lowercase();
    let skills: Vec<String> = required_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    // Plain containment: "go" matches inside "mango".
    let matched_skills: Vec<String> = skills
        .iter()
        .filter(|s| text_lower.contains(s.as_str()))
        .cloned()
        .collect();

    let years = find_years_of_experience(text);
    let education = find_education(text);

    let total = skills_score(matched_skills.len(), skills.len())
        + years_score(years)
        + education.points();

    ScoreReport {
        score: round_one_decimal(total.min(MAX_SCORE)),
        matched_skills,
        years,
        education,
    }
}

fn skills_score(matched: usize, required: usize) -> f64 {
    if required == 0 {
        return 0.0;
    }
    matched as f64 / required as f64 * SKILLS_WEIGHT
}

fn years_score(years: u32) -> f64 {
    f64::from(years.min(YEARS_CAP)) / f64::from(YEARS_CAP) * YEARS_WEIGHT
}

/// Half-to-even at the first decimal: 26.25 becomes 26.2, 26.75 becomes 26.8.
fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}
