//! Adaptive format resolution
//!
//! A video offers several independently encoded streams. Playback walks the
//! audio streams in the order the catalog returned them and stops at the
//! first one the player exits cleanly on.

use crate::models::{VideoFormat, VideoRecord};
use crate::stream::player::LocalPlayer;
use crate::stream::process::ProcessRunner;

/// One failed playback attempt
#[derive(Debug, Clone, PartialEq)]
pub struct FailedAttempt {
    /// Position of the format in `VideoRecord::formats`
    pub format_index: usize,
    pub format: VideoFormat,
    pub reason: String,
}

/// How resolving a single video ended
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The player exited cleanly on this format
    Played {
        format_index: usize,
        format: VideoFormat,
        failed: Vec<FailedAttempt>,
    },
    /// The video has no audio formats at all
    NoEligibleFormats,
    /// Every audio format was tried and none played
    Exhausted { failed: Vec<FailedAttempt> },
}

impl Resolution {
    pub fn is_played(&self) -> bool {
        matches!(self, Resolution::Played { .. })
    }

    /// Number of player processes launched
    pub fn attempts(&self) -> usize {
        match self {
            Resolution::Played { failed, .. } => failed.len() + 1,
            Resolution::NoEligibleFormats => 0,
            Resolution::Exhausted { failed } => failed.len(),
        }
    }
}

/// Play the first working audio format of `video`
///
/// Each attempt blocks until the player exits. A format that fails is never
/// retried; the next eligible one is tried instead.
pub async fn play<R>(video: &VideoRecord, player: &LocalPlayer, runner: &R) -> Resolution
where
    R: ProcessRunner + ?Sized,
{
    let mut failed = Vec::new();
    let mut eligible = 0usize;

    for (format_index, format) in video.audio_formats() {
        eligible += 1;

        let invocation = player.invocation(&format.url);
        tracing::info!(
            video = %video.id,
            format_index,
            mime = %format.mime_type,
            "trying format"
        );

        let reason = match runner.run(&invocation).await {
            Ok(outcome) if outcome.is_success() => {
                return Resolution::Played {
                    format_index,
                    format: format.clone(),
                    failed,
                };
            }
            Ok(outcome) => outcome.to_string(),
            Err(e) => e.to_string(),
        };

        tracing::warn!(
            video = %video.id,
            format_index,
            %reason,
            "format failed, trying next"
        );
        failed.push(FailedAttempt {
            format_index,
            format: format.clone(),
            reason,
        });
    }

    if eligible == 0 {
        Resolution::NoEligibleFormats
    } else {
        Resolution::Exhausted { failed }
    }
}
