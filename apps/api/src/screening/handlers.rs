//! Axum route handlers for resume submission, download and the admin listing.

use askama::Template;
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::{AppError, SubmissionRejection};
use crate::models::submission::NewSubmission;
use crate::screening::extract::{extract_text, DocumentKind};
use crate::screening::keywords::{derive_skills, parse_skill_list};
use crate::screening::upload::{extension_of, stored_filename};
use crate::screening::views::{AdminPage, IndexPage, ResultPage, DEFAULT_SKILLS};
use crate::state::AppState;

const FLASH_COOKIE: &str = "flash";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// A file part of the submission form.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// The multipart submission form, typed at the boundary.
///
/// Text fields default to empty and are trimmed. `resume` is `None` when no
/// file part was sent or the browser sent an empty filename.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub name: String,
    pub email: String,
    pub job_description: String,
    pub skills: Option<String>,
    pub resume: Option<UploadedFile>,
}

#[async_trait]
impl<S> FromRequest<S> for SubmissionForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let mut form = SubmissionForm::default();
        while let Some(field) = multipart.next_field().await? {
            match field.name().unwrap_or("") {
                "name" => form.name = field.text().await?.trim().to_string(),
                "email" => form.email = field.text().await?.trim().to_string(),
                "job_description" => {
                    form.job_description = field.text().await?.trim().to_string()
                }
                "skills" => {
                    let raw = field.text().await?;
                    let raw = raw.trim();
                    form.skills = (!raw.is_empty()).then(|| raw.to_string());
                }
                "resume" => {
                    let filename = field.file_name().unwrap_or("").to_string();
                    let data = field.bytes().await?;
                    if !filename.is_empty() {
                        form.resume = Some(UploadedFile { filename, data });
                    }
                }
                other => debug!("Ignoring unexpected form field '{other}'"),
            }
        }
        Ok(form)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Renders the submission form and consumes any pending flash message.
pub async fn handle_index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), AppError> {
    let flash = jar.get(FLASH_COOKIE).map(|c| c.value().to_string());
    let jar = if flash.is_some() {
        jar.remove(Cookie::build(FLASH_COOKIE).path("/"))
    } else {
        jar
    };

    let page = IndexPage {
        default_skills: DEFAULT_SKILLS,
        allowed_extensions: state.config.allowed_extensions_label(),
        flash,
    };
    Ok((jar, Html(page.render()?)))
}

/// POST /submit
///
/// Validates the upload, stores it, extracts text, scores it and records the
/// outcome. Validation failures redirect to `/` with a flash message and
/// write nothing to the store.
pub async fn handle_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    form: SubmissionForm,
) -> Result<Response, AppError> {
    let Some(upload) = form.resume else {
        return Ok(reject(jar, SubmissionRejection::MissingFile));
    };

    let kind = extension_of(&upload.filename)
        .and_then(|ext| DocumentKind::from_extension(&ext))
        .filter(|kind| state.config.allowed_extensions.contains(kind));
    let Some(kind) = kind else {
        return Ok(reject(
            jar,
            SubmissionRejection::UnsupportedFileType {
                allowed: state.config.allowed_extensions_label(),
            },
        ));
    };

    let now = Utc::now();
    let filename = stored_filename(&upload.filename, now);
    let path = state.uploads.save(&filename, &upload.data).await?;

    let text = extract_text(&path, kind).await;
    if text.trim().is_empty() {
        warn!("No text extracted from {filename}, discarding upload");
        state.uploads.remove(&path).await;
        return Ok(reject(jar, SubmissionRejection::ExtractionFailed));
    }

    let skills = match form.skills.as_deref() {
        Some(raw) => parse_skill_list(raw),
        None => Vec::new(),
    };
    let skills = if skills.is_empty() {
        let derived = derive_skills(&form.job_description);
        debug!("No skills supplied, derived from job description: {derived:?}");
        derived
    } else {
        skills
    };

    let report = state.scorer.score(&text, &skills);

    state
        .store
        .insert(&NewSubmission {
            name: form.name.clone(),
            email: form.email.clone(),
            filename: filename.clone(),
            score: report.score,
            matched_skills: report.matched_skills.clone(),
            years_experience: report.years,
            education: report.education,
            job_description: form.job_description.clone(),
        })
        .await?;

    info!(
        "Scored {filename}: {} ({} of {} skills, {} years, {})",
        report.score,
        report.matched_skills.len(),
        skills.len(),
        report.years,
        report.education
    );

    let page = ResultPage {
        name: &form.name,
        email: &form.email,
        score: report.score,
        matched_skills: &report.matched_skills,
        years: report.years,
        education: report.education.label(),
        filename: &filename,
        timestamp: now.format("%Y-%m-%d %H:%M UTC").to_string(),
    };
    Ok(Html(page.render()?).into_response())
}

/// GET /uploads/:filename
///
/// Returns a stored upload as an attachment.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state
        .uploads
        .read(&filename)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Upload {filename} not found")))?;

    let content_type = match extension_of(&filename)
        .as_deref()
        .and_then(DocumentKind::from_extension)
    {
        Some(DocumentKind::Pdf) => "application/pdf",
        Some(DocumentKind::Docx) => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        None => "application/octet-stream",
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// GET /admin
///
/// Lists every stored submission, most recent first.
pub async fn handle_admin(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let rows = state.store.list_all().await?;
    Ok(Html(AdminPage { rows }.render()?))
}

fn reject(jar: SignedCookieJar, rejection: SubmissionRejection) -> Response {
    info!("Submission rejected: {rejection}");
    let cookie = Cookie::build((FLASH_COOKIE, rejection.to_string()))
        .path("/")
        .http_only(true);
    (jar.add(cookie), Redirect::to("/")).into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
