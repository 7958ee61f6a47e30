//! Playback and download infrastructure
//!
//! - Process: the seam every external program is launched through
//! - Player: mpv/VLC command construction
//! - Resolver: audio format fallback for playback
//! - Download: MIME-to-extension mapping and the curl downloader

pub mod download;
pub mod player;
pub mod process;
pub mod resolver;

pub use download::{DownloadError, Downloader, MimeTable};
pub use player::{LocalPlayer, PlayerType};
pub use process::{ExitOutcome, Invocation, ProcessError, ProcessRunner, StdioMode, SystemRunner};
pub use resolver::{FailedAttempt, Resolution};
