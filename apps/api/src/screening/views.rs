use askama::Template;

use crate::models::submission::SubmissionRow;

/// Skills pre-filled in the submission form.
pub const DEFAULT_SKILLS: &str = "Python, Flask, SQL, REST, Docker, AWS";

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage<'a> {
    pub default_skills: &'a str,
    pub allowed_extensions: String,
    pub flash: Option<String>,
}

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultPage<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub score: f64,
    pub matched_skills: &'a [String],
    pub years: u32,
    pub education: &'a str,
    pub filename: &'a str,
    pub timestamp: String,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminPage {
    pub rows: Vec<SubmissionRow>,
}
