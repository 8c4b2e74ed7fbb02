//! Storage of uploaded resume files on local disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::fs;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

static UNSAFE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("filename pattern"));

/// Reduces a client-supplied filename to `[A-Za-z0-9_.-]`.
///
/// Accented letters are decomposed (NFKD) to their ASCII base, remaining
/// non-ASCII characters are dropped, path separators become spaces, runs of
/// whitespace become a single `_`, and leading/trailing `.`/`_` are stripped,
/// so the result can never name a parent directory.
pub fn sanitize_filename(raw: &str) -> String {
    let ascii: String = raw
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_CHARS_RE
        .replace_all(&joined, "")
        .trim_matches(|c: char| c == '.' || c == '_')
        .to_string()
}

/// `<YYYYmmddHHMMSS>_<original>`, sanitized.
pub fn stored_filename(original: &str, now: DateTime<Utc>) -> String {
    sanitize_filename(&format!("{}_{}", now.format("%Y%m%d%H%M%S"), original))
}

/// Lowercased extension of `filename`, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Directory holding uploaded files, addressed by sanitized filename.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn ensure_exists(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root).await?;
        info!("Upload directory ready at {}", self.root.display());
        Ok(())
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Writes `data` under `filename` and returns the full path.
    pub async fn save(&self, filename: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.path_of(filename);
        fs::write(&path, data).await?;
        debug!("Stored upload {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }

    pub async fn remove(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            debug!("Could not remove {}: {e}", path.display());
        }
    }

    /// Reads a stored file. Returns `None` when the name is not a plain
    /// sanitized filename or the file does not exist.
    pub async fn read(&self, filename: &str) -> std::io::Result<Option<Vec<u8>>> {
        if filename.is_empty() || sanitize_filename(filename) != filename {
            return Ok(None);
        }
        match fs::read(self.path_of(filename)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename(r"C:\Users\me\cv.pdf"), "C_Users_me_cv.pdf");
    }

    #[test]
    fn test_sanitize_whitespace_and_unicode() {
        assert_eq!(sanitize_filename("My  Résumé 2024.docx"), "My_Resume_2024.docx");
    }

    #[test]
    fn test_sanitize_never_contains_separators() {
        for raw in ["a/b", "a\\b", "/", "..", "...//..", "x/../y.pdf", "x\u{FF0F}..\u{FF0F}y.pdf"] {
            let s = sanitize_filename(raw);
            assert!(!s.contains('/') && !s.contains('\\'), "{raw:?} -> {s:?}");
            assert!(!s.starts_with('.'), "{raw:?} -> {s:?}");
        }
    }

    #[test]
    fn test_stored_filename_prefix() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(stored_filename("jane doe.pdf", now), "20240309140507_jane_doe.pdf");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("cv.PDF").as_deref(), Some("pdf"));
        assert_eq!(extension_of("archive.tar.docx").as_deref(), Some("docx"));
        assert_eq!(extension_of("README"), None);
    }

    #[tokio::test]
    async fn test_save_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path());
        uploads.save("cv.pdf", b"%PDF").await.unwrap();

        assert_eq!(uploads.read("cv.pdf").await.unwrap(), Some(b"%PDF".to_vec()));
        assert_eq!(uploads.read("missing.pdf").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_refuses_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path().join("uploads"));
        uploads.ensure_exists().await.unwrap();
        tokio::fs::write(dir.path().join("secret.txt"), b"x").await.unwrap();

        assert_eq!(uploads.read("../secret.txt").await.unwrap(), None);
    }
}
