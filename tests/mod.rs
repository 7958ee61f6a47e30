//! Integration tests for invidplay
//!
//! Tests are organized by component:
//! - selection_test: Range parsing and selection expansion
//! - queue_test: FIFO playback queue
//! - resolver_test: Audio format fallback against a scripted player
//! - download_test: Target naming and downloader invocation
//! - invidious_test: Invidious client against a mock server
//! - session_test: Search -> select -> queue -> drain, interactive loop
//! - commands_test: Scriptable subcommands and their exit codes
//! - cli_test: Argument parsing and JSON output
//!
//! Shared helpers live in `common/`.

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
