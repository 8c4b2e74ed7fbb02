use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::config::Config;
use crate::screening::scoring::ResumeScorer;
use crate::screening::store::SubmissionStore;
use crate::screening::upload::UploadDir;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: SubmissionStore,
    pub uploads: UploadDir,
    /// Pluggable scorer. Default: HeuristicScorer.
    pub scorer: Arc<dyn ResumeScorer>,
    pub config: Config,
    /// Signs the flash-message cookie; derived from `config.secret`.
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

#[cfg(test)]
pub async fn test_state(upload_root: &std::path::Path, max_upload_bytes: usize) -> AppState {
    use crate::config::DEV_SECRET;
    use crate::screening::extract::DocumentKind;
    use crate::screening::scoring::HeuristicScorer;

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        upload_dir: upload_root.to_path_buf(),
        allowed_extensions: vec![DocumentKind::Pdf, DocumentKind::Docx],
        max_upload_bytes,
        secret: DEV_SECRET.to_string(),
        port: 0,
        rust_log: "debug".to_string(),
    };
    let uploads = UploadDir::new(upload_root);
    uploads.ensure_exists().await.unwrap();

    AppState {
        store: SubmissionStore::new(crate::db::memory_pool().await),
        uploads,
        scorer: Arc::new(HeuristicScorer),
        cookie_key: Key::derive_from(config.secret.as_bytes()),
        config,
    }
}
