//! CLI - Command Line Interface for invidplay
//!
//! Without a subcommand the interactive session starts. Subcommands mirror
//! the interactive commands for scripting; their output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Interactive session
//! invidplay
//!
//! # Scripted use
//! invidplay search "daft punk" --json
//! invidplay formats dQw4w9WgXcQ
//! invidplay download dQw4w9WgXcQ --format 3
//! invidplay play dQw4w9WgXcQ 9bZkp7q19f0
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Catalog service unreachable or returned garbage
    NetworkError = 3,
    /// Player binary missing
    PlayerNotFound = 4,
    /// No format could be played
    NoFormats = 5,
    /// Download failed
    DownloadFailed = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// invidplay - search Invidious, play audio in mpv, download with curl
///
/// Run without arguments for the interactive session.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "invidplay",
    version,
    author = "Gorka & Hermes",
    about = "Search Invidious and play or download results",
    long_about = "Search an Invidious instance, queue results by number or range \
                  and play their audio streams in an external player.\n\n\
                  Run without arguments to start the interactive session.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  invidplay                               Interactive session\n\
                  invidplay search \"daft punk\"            Search for videos\n\
                  invidplay play dQw4w9WgXcQ              Play a video's audio\n\
                  invidplay download dQw4w9WgXcQ -f 2     Download format 2\n\
                  invidplay -p \"mpv --no-video\" config --save  Remember a player"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Player command line (default: $INVIDPLAY_PLAYER_CMD, config, mpv)
    #[arg(long, short = 'p', global = true)]
    pub player: Option<String>,

    /// Invidious instance base URL
    #[arg(long, short = 'I', global = true)]
    pub instance: Option<String>,

    /// Directory for downloaded files
    #[arg(long, short = 'o', global = true)]
    pub download_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for interactive mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }

    /// Whether this invocation launches the player
    pub fn needs_player(&self) -> bool {
        matches!(self.command, None | Some(Command::Play(_)))
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for videos
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Show details for a video
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// List the adaptive formats of a video
    #[command(visible_alias = "f")]
    Formats(FormatsCmd),

    /// Play the audio of one or more videos, in order
    #[command(visible_alias = "pl")]
    Play(PlayCmd),

    /// Download one format of a video
    #[command(visible_alias = "d")]
    Download(DownloadCmd),

    /// Show the effective settings, optionally saving them
    Config(ConfigCmd),
}

/// Search videos by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Show the details of a video
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// Video ID (e.g., dQw4w9WgXcQ)
    #[arg(required = true)]
    pub id: String,
}

/// List adaptive formats
#[derive(Args, Debug)]
pub struct FormatsCmd {
    /// Video ID
    #[arg(required = true)]
    pub id: String,

    /// Only list audio formats (the ones playback uses)
    #[arg(long, short = 'a')]
    pub audio_only: bool,
}

/// Play videos by ID
#[derive(Args, Debug)]
pub struct PlayCmd {
    /// Video IDs, played in the order given
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

/// Download a format of a video
#[derive(Args, Debug)]
pub struct DownloadCmd {
    /// Video ID
    #[arg(required = true)]
    pub id: String,

    /// Format index as listed by `formats`
    #[arg(long, short = 'f', required = true)]
    pub format: usize,
}

/// Show or save the resolved configuration
#[derive(Args, Debug, Clone, Copy)]
pub struct ConfigCmd {
    /// Write the effective settings to the config file
    #[arg(long)]
    pub save: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// One format row as shown to the user
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatRow {
    pub index: usize,
    pub mime_type: String,
    pub quality: String,
    pub audio: bool,
}

/// Result of playing one video
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayRow {
    pub id: String,
    pub title: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_index: Option<usize>,
    pub attempts: usize,
}

/// Download success response
#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub status: &'static str,
    pub id: String,
    pub path: String,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Plain interactive output
    pub fn interactive(quiet: bool) -> Self {
        Self { json: false, quiet }
    }

    /// Print success data as JSON
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print data as JSON, or the given text for humans
    pub fn print_or_text<T: Serialize>(&self, data: T, text: &str) -> anyhow::Result<()> {
        if self.json {
            self.print(data)
        } else {
            println!("{}", text);
            Ok(())
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print a recoverable problem (never suppressed in text mode)
    pub fn warn(&self, msg: impl std::fmt::Display) {
        if !self.json {
            eprintln!("{}", msg);
        }
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
