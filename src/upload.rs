use axum::body::Bytes;
use axum::extract::Multipart;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::DocumentKind;
use crate::language::{SourceLanguage, DEFAULT_SOURCE_LANG};

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").unwrap());

/// Make a client-supplied filename safe to use as a single path component.
///
/// Non-ASCII characters are dropped, separators and whitespace become `_`,
/// anything outside `[A-Za-z0-9._-]` is removed and leading/trailing dots and
/// underscores are stripped. The result may be empty.
pub fn sanitize_filename(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let safe = UNSAFE_CHARS.replace_all(&joined, "");
    safe.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// The uploaded `file` part, buffered in memory until validation passes
#[derive(Debug)]
pub struct FilePart {
    pub filename: String,
    pub bytes: Bytes,
}

impl FilePart {
    /// Classify on the sanitized name. When sanitizing loses the extension
    /// (`नेपाली.pdf` becomes `pdf`) the raw name is used, minus trailing
    /// dots and whitespace.
    pub fn kind(&self) -> DocumentKind {
        if DocumentKind::from_filename(&sanitize_filename(&self.filename)) == DocumentKind::Pdf {
            return DocumentKind::Pdf;
        }
        DocumentKind::from_filename(
            self.filename
                .trim_end_matches(|c: char| c == '.' || c.is_whitespace()),
        )
    }
}

/// Raw multipart fields of an extraction request
#[derive(Debug, Default)]
pub struct UploadForm {
    pub source_lang: Option<String>,
    pub file: Option<FilePart>,
}

impl UploadForm {
    /// Read every field before validating anything, so the outcome does not
    /// depend on the order of parts on the wire.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(|n| n.to_string());
            match name.as_deref() {
                Some("source_lang") if form.source_lang.is_none() => {
                    form.source_lang = Some(field.text().await?);
                }
                Some("file") if form.file.is_none() => {
                    // A part without a filename attribute is a plain form field
                    let Some(filename) = field.file_name().map(|n| n.to_string()) else {
                        debug!("Ignoring 'file' part without a filename");
                        continue;
                    };
                    let bytes = field.bytes().await?;
                    form.file = Some(FilePart { filename, bytes });
                }
                other => {
                    debug!("Ignoring multipart field {:?}", other);
                }
            }
        }

        Ok(form)
    }

    /// Check language, presence of the file and its filename, in that order
    pub fn validate(self) -> Result<(SourceLanguage, FilePart), AppError> {
        let language: SourceLanguage = self
            .source_lang
            .as_deref()
            .unwrap_or(DEFAULT_SOURCE_LANG)
            .parse()?;

        let file = self.file.ok_or(AppError::MissingFile)?;
        if file.filename.is_empty() {
            return Err(AppError::EmptyFilename);
        }

        Ok((language, file))
    }
}

/// Directory that holds uploads for the duration of a single request
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Write the upload under a unique per-request name.
    ///
    /// The returned guard owns the file; it is deleted on `remove()` or,
    /// failing that, when the guard is dropped.
    pub async fn save(&self, file: &FilePart) -> std::io::Result<SavedUpload> {
        let safe = sanitize_filename(&file.filename);
        let safe = if safe.is_empty() { "upload".to_string() } else { safe };
        let stored_name = format!("{}_{}", Uuid::new_v4().simple(), safe);

        let upload = SavedUpload {
            path: self.dir.join(stored_name),
            kind: file.kind(),
            removed: false,
        };
        // On failure the guard drops here and removes any partial write
        tokio::fs::write(&upload.path, &file.bytes).await?;
        debug!("Saved upload {} ({} bytes)", upload.path.display(), file.bytes.len());
        Ok(upload)
    }
}

/// A saved upload that is removed exactly once
#[derive(Debug)]
pub struct SavedUpload {
    path: PathBuf,
    kind: DocumentKind,
    removed: bool,
}

impl SavedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Delete the file now
    pub async fn remove(mut self) {
        self.removed = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!("Removed upload {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for SavedUpload {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed upload {} on drop", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload {}: {}", self.path.display(), e),
        }
    }
}
