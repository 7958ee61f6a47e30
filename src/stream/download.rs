//! Format download via an external downloader (curl by default)
//!
//! The user picks one format from the full list; its MIME type decides the
//! file extension and the title decides the file name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{mime_essence, VideoFormat, VideoRecord};
use crate::stream::process::{Invocation, ProcessError, ProcessRunner, StdioMode};

/// Errors from downloading a format
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no file extension known for MIME type '{0}'")]
    UnknownMimeType(String),
    #[error("format {index} does not exist ({available} formats available)")]
    NoSuchFormat { index: usize, available: usize },
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// MIME type to file extension lookup
///
/// Catalog formats use container types that system tables often map to
/// odd extensions (`audio/webm` → `.weba`), so the common ones are seeded
/// explicitly and take priority over the `mime_guess` registry.
#[derive(Debug, Clone)]
pub struct MimeTable {
    seeded: HashMap<String, String>,
}

impl Default for MimeTable {
    fn default() -> Self {
        let mut table = Self {
            seeded: HashMap::new(),
        };
        table.insert("audio/webm", ".webm");
        table.insert("video/webm", ".webm");
        table.insert("audio/mp4", ".mp4");
        table.insert("video/mp4", ".mp4");
        table
    }
}

impl MimeTable {
    /// `ext` includes the leading dot
    fn insert(&mut self, mime: &str, ext: &str) {
        self.seeded
            .insert(mime.trim().to_ascii_lowercase(), ext.to_string());
    }

    /// Extension (with dot) for a MIME type, parameters ignored
    pub fn extension_for(&self, mime_type: &str) -> Option<String> {
        let essence = mime_essence(mime_type);
        if essence.is_empty() {
            return None;
        }

        if let Some(ext) = self.seeded.get(&essence) {
            return Some(ext.clone());
        }

        mime_guess::get_mime_extensions_str(&essence)
            .and_then(|exts| exts.first())
            .map(|ext| format!(".{}", ext))
    }
}

/// Replace characters that would turn a title into a path
pub fn sanitize_file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    let trimmed = stem.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        "video".to_string()
    } else {
        trimmed.to_string()
    }
}

/// External downloader settings
#[derive(Debug, Clone)]
pub struct Downloader {
    program: String,
    output_dir: PathBuf,
    mime_table: MimeTable,
}

impl Downloader {
    pub fn new(program: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            output_dir: output_dir.into(),
            mime_table: MimeTable::default(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Destination path for a format: `<dir>/<title><ext>`
    pub fn target_path(
        &self,
        video: &VideoRecord,
        format: &VideoFormat,
    ) -> Result<PathBuf, DownloadError> {
        let ext = self
            .mime_table
            .extension_for(&format.essence())
            .ok_or_else(|| DownloadError::UnknownMimeType(format.mime_type.clone()))?;
        let file_name = format!("{}{}", sanitize_file_stem(&video.title), ext);
        Ok(self.output_dir.join(file_name))
    }

    /// Downloader command line
    ///
    /// Redirects are followed, and an HTTP error status makes the
    /// downloader exit non-zero instead of saving the error page.
    pub fn invocation(&self, url: &str, target: &Path) -> Invocation {
        Invocation::new(&self.program)
            .arg(url)
            .args(["-L", "--fail", "--create-dirs", "-o"])
            .arg(target.to_string_lossy())
            .stdio(StdioMode::OutputOnly)
    }

    /// Download format `format_index` of `video`
    ///
    /// Nothing is spawned (and no file written) when the format does not
    /// exist or its MIME type has no known extension.
    pub async fn download<R>(
        &self,
        video: &VideoRecord,
        format_index: usize,
        runner: &R,
    ) -> Result<PathBuf, DownloadError>
    where
        R: ProcessRunner + ?Sized,
    {
        let format = video
            .formats
            .get(format_index)
            .ok_or(DownloadError::NoSuchFormat {
                index: format_index,
                available: video.formats.len(),
            })?;

        let target = self.target_path(video, format)?;
        tracing::info!(
            video = %video.id,
            mime = %format.mime_type,
            target = %target.display(),
            downloader = %self.program,
            "downloading"
        );

        if let Err(e) = runner
            .run_checked(&self.invocation(&format.url, &target))
            .await
        {
            // Never leave a partial file behind
            let _ = tokio::fs::remove_file(&target).await;
            return Err(e.into());
        }
        Ok(target)
    }
}
