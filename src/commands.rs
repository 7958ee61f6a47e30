//! CLI Command Handlers
//!
//! Implements the scriptable subcommands on top of a [`Session`].
//! Each handler takes CLI args and Output, returns ExitCode.

use std::path::Path;

use crate::api::LookupError;
use crate::cli::{
    ConfigCmd, DownloadCmd, DownloadResponse, ExitCode, FormatRow, FormatsCmd, InfoCmd, Output,
    PlayCmd, PlayRow, SearchCmd,
};
use crate::config::Config;
use crate::models::{render_listing, Catalog, VideoRecord};
use crate::queue::PlaybackQueue;
use crate::session::{DrainEvent, Session, SessionError};
use crate::stream::{ProcessRunner, Resolution};

/// Map a session error onto the exit code scripts see
pub fn exit_code_for(err: &SessionError) -> ExitCode {
    match err {
        SessionError::NoCatalog | SessionError::NoSuchResult { .. } => ExitCode::InvalidArgs,
        SessionError::Lookup(LookupError::NotFound) => ExitCode::InvalidArgs,
        SessionError::Lookup(e) if e.is_network() => ExitCode::NetworkError,
        SessionError::Lookup(_) => ExitCode::Error,
        SessionError::Download(_) => ExitCode::DownloadFailed,
    }
}

/// Format rows for display, optionally audio only
pub fn format_rows(video: &VideoRecord, audio_only: bool) -> Vec<FormatRow> {
    video
        .formats
        .iter()
        .enumerate()
        .filter(|(_, f)| !audio_only || f.is_audio())
        .map(|(index, f)| FormatRow {
            index,
            mime_type: f.mime_type.clone(),
            quality: f.quality_label.clone(),
            audio: f.is_audio(),
        })
        .collect()
}

/// First `limit` catalog entries
pub fn top_results(catalog: &Catalog, limit: usize) -> Vec<&VideoRecord> {
    catalog.iter().take(limit).collect()
}

/// Render format rows as `<n> <type> <quality>` lines
pub fn render_formats(rows: &[FormatRow]) -> String {
    rows.iter()
        .map(|r| format!("{} {} {}", r.index, r.mime_type, r.quality))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd<R: ProcessRunner>(
    cmd: SearchCmd,
    session: &mut Session<R>,
    output: &Output,
) -> ExitCode {
    output.info(format!("Searching for: {}", cmd.query));

    match session.search(&cmd.query).await {
        Ok(catalog) => {
            let results = top_results(catalog, cmd.limit);
            let text = render_listing(results.iter().copied());
            if let Err(e) = output.print_or_text(&results, &text) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Search failed: {}", e), exit_code_for(&e)),
    }
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd<R: ProcessRunner>(
    cmd: InfoCmd,
    session: &Session<R>,
    output: &Output,
) -> ExitCode {
    output.info(format!("Getting info for: {}", cmd.id));

    match session.fetch(&cmd.id).await {
        Ok(video) => {
            if let Err(e) = output.print_or_text(&video, &video.details()) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Info failed: {}", e), exit_code_for(&e)),
    }
}

// =============================================================================
// Formats Command
// =============================================================================

pub async fn formats_cmd<R: ProcessRunner>(
    cmd: FormatsCmd,
    session: &Session<R>,
    output: &Output,
) -> ExitCode {
    match session.fetch(&cmd.id).await {
        Ok(video) => {
            let rows = format_rows(&video, cmd.audio_only);
            if rows.is_empty() {
                return output.error("No formats available", ExitCode::NoFormats);
            }
            if let Err(e) = output.print_or_text(&rows, &render_formats(&rows)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Format lookup failed: {}", e), exit_code_for(&e)),
    }
}

// =============================================================================
// Play Command
// =============================================================================

pub async fn play_cmd<R: ProcessRunner>(
    cmd: PlayCmd,
    session: &Session<R>,
    output: &Output,
) -> ExitCode {
    // Ids are queued as bare records; the drain fetches their formats
    let queue: PlaybackQueue = cmd
        .ids
        .into_iter()
        .map(|id| VideoRecord {
            title: id.clone(),
            id,
            ..Default::default()
        })
        .collect();

    let mut rows = Vec::new();
    let summary = session
        .drain(queue, |event| match event {
            DrainEvent::Starting { video, .. } => output.info(format!("Playing {}", video.id)),
            DrainEvent::LookupFailed { video, error } => {
                output.warn(format!("{}: {}", video.id, error));
                rows.push(PlayRow {
                    id: video.id.clone(),
                    title: video.title.clone(),
                    status: "lookup_failed",
                    format_index: None,
                    attempts: 0,
                });
            }
            DrainEvent::Finished { video, resolution } => {
                let (status, format_index) = match resolution {
                    Resolution::Played { format_index, .. } => ("played", Some(*format_index)),
                    Resolution::NoEligibleFormats => ("no_audio_formats", None),
                    Resolution::Exhausted { .. } => ("all_formats_failed", None),
                };
                if !resolution.is_played() {
                    output.warn(format!("{}: could not be played ({})", video.title, status));
                }
                rows.push(PlayRow {
                    id: video.id.clone(),
                    title: video.title.clone(),
                    status,
                    format_index,
                    attempts: resolution.attempts(),
                });
            }
        })
        .await;

    if output.json {
        if let Err(e) = output.print(&rows) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    }

    if summary.played == summary.total() {
        ExitCode::Success
    } else if summary.lookup_failed > 0 && summary.played + summary.unplayable == 0 {
        ExitCode::NetworkError
    } else {
        ExitCode::NoFormats
    }
}

// =============================================================================
// Download Command
// =============================================================================

pub async fn download_cmd<R: ProcessRunner>(
    cmd: DownloadCmd,
    session: &Session<R>,
    output: &Output,
) -> ExitCode {
    let video = match session.fetch(&cmd.id).await {
        Ok(video) => video,
        Err(e) => return output.error(format!("Lookup failed: {}", e), exit_code_for(&e)),
    };

    if let Some(format) = video.formats.get(cmd.format) {
        output.info(format.mime_type.as_str());
    }
    output.info(format!(
        "Downloading into {}",
        session.downloader().output_dir().display()
    ));

    match session.download(&video, cmd.format).await {
        Ok(path) => {
            let response = DownloadResponse {
                status: "downloaded",
                id: video.id.clone(),
                path: path.display().to_string(),
            };
            let text = format!("Saved {}", response.path);
            if let Err(e) = output.print_or_text(&response, &text) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Download failed: {}", e), exit_code_for(&e)),
    }
}

// =============================================================================
// Config Command
// =============================================================================

/// Print the effective settings; with `--save`, write them to `path`
/// (or the default location)
pub fn config_cmd(
    cmd: ConfigCmd,
    effective: &Config,
    path: Option<&Path>,
    output: &Output,
) -> ExitCode {
    let text = match toml::to_string_pretty(effective) {
        Ok(text) => text,
        Err(e) => return output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    };
    if let Err(e) = output.print_or_text(effective, text.trim_end()) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }

    if cmd.save {
        let saved = match path {
            Some(path) => effective.save_to(path).map(|_| path.to_path_buf()),
            None => effective.save(),
        };
        match saved {
            Ok(path) => output.info(format!("Saved config to {}", path.display())),
            Err(e) => {
                return output.error(format!("Could not save config: {}", e), ExitCode::Error)
            }
        }
    }

    ExitCode::Success
}
