//! invidplay - terminal client for Invidious
//!
//! Search a video catalog, pick results by number or range, and play their
//! audio streams in an external player or download a chosen format.
//!
//! # Modules
//!
//! - `models` - Videos, adaptive formats and the catalog
//! - `selection` - `2-5,8` style selection expressions
//! - `queue` - FIFO playback queue
//! - `stream` - Player, format resolution, downloads, process seam
//! - `api` - Invidious client
//! - `session` - State carried between commands and the playback loop
//! - `command` / `repl` - Interactive front end
//! - `cli` / `commands` - Scriptable front end

pub mod api;
pub mod cli;
pub mod command;
pub mod commands;
pub mod config;
pub mod models;
pub mod queue;
pub mod repl;
pub mod selection;
pub mod session;
pub mod stream;

// Re-export commonly used types
pub use models::{Catalog, VideoFormat, VideoRecord};
pub use queue::PlaybackQueue;
pub use selection::{expand, parse_range, Expansion, ParseError, RangeError, SelectionError};
pub use session::{DrainEvent, DrainSummary, Session, SessionError};
pub use stream::{
    DownloadError, Downloader, LocalPlayer, ProcessError, ProcessRunner, Resolution, SystemRunner,
};

pub use api::{InvidiousClient, LookupError};
