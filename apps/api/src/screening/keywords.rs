//! Fallback skill list derived from a free-text job description.
//!
//! A token heuristic, not keyword extraction: the first ten alphabetic
//! tokens (`+` and `#` allowed, so `C++` and `C#` survive) that are not
//! stopwords.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_DERIVED_SKILLS: usize = 10;

const STOPWORDS: &[&str] = &["and", "or", "the", "with", "to", "for", "of", "in", "on", "a", "an"];

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z+#]{2,}").expect("token pattern"));

pub fn derive_skills(job_description: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(job_description)
        .map(|m| m.as_str())
        .filter(|w| !STOPWORDS.contains(&w.to_lowercase().as_str()))
        .take(MAX_DERIVED_SKILLS)
        .map(String::from)
        .collect()
}

/// Splits a comma-separated skills field, trimming and dropping blanks.
pub fn parse_skill_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
