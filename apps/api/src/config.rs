use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::screening::extract::DocumentKind;

/// Signing secret used when `APP_SECRET` is unset outside production.
/// Anyone who knows it can forge flash cookies; never deploy with it.
pub const DEV_SECRET: &str = "screener-dev-secret-change-me-in-production-0000";

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub allowed_extensions: Vec<DocumentKind>,
    pub max_upload_bytes: usize,
    pub secret: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let secret = match std::env::var("APP_SECRET") {
            Ok(s) => s,
            Err(_) if production => {
                bail!("Required environment variable 'APP_SECRET' is not set (APP_ENV=production)")
            }
            Err(_) => DEV_SECRET.to_string(),
        };
        if secret.len() < 32 {
            bail!("APP_SECRET must be at least 32 bytes long");
        }

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://resumes.db?mode=rwc".to_string()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            allowed_extensions: parse_extensions(
                &std::env::var("ALLOWED_EXTENSIONS").unwrap_or_else(|_| "pdf,docx".to_string()),
            )?,
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            secret,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.secret == DEV_SECRET
    }

    /// Human-readable allow-list, e.g. `pdf, docx`.
    pub fn allowed_extensions_label(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|k| k.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn parse_extensions(raw: &str) -> Result<Vec<DocumentKind>> {
    let mut kinds = Vec::new();
    for ext in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let kind = DocumentKind::from_extension(ext)
            .with_context(|| format!("ALLOWED_EXTENSIONS: unsupported extension '{ext}'"))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        bail!("ALLOWED_EXTENSIONS must name at least one of: pdf, docx");
    }
    Ok(kinds)
}
