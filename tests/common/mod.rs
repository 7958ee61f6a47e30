//! Shared test helpers

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;

use async_trait::async_trait;
use invidplay::stream::{ExitOutcome, Invocation, ProcessRunner};
use invidplay::{VideoFormat, VideoRecord};

/// Process runner that records every invocation instead of spawning
///
/// An invocation fails when any of its arguments is in `failing`, and
/// cannot be spawned when any is in `missing`.
#[derive(Default)]
pub struct ScriptedRunner {
    failing: HashSet<String>,
    missing: HashSet<String>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, arg: &str) -> Self {
        self.failing.insert(arg.to_string());
        self
    }

    pub fn missing(mut self, arg: &str) -> Self {
        self.missing.insert(arg.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Last argument of each call (the stream URL for players)
    pub fn urls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| c.args.last().cloned())
            .collect()
    }
}

#[async_trait(?Send)]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ExitOutcome> {
        self.calls.borrow_mut().push(invocation.clone());
        if invocation.args.iter().any(|a| self.missing.contains(a)) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "program not found",
            ));
        }
        if invocation.args.iter().any(|a| self.failing.contains(a)) {
            Ok(ExitOutcome::failure(1))
        } else {
            Ok(ExitOutcome::success())
        }
    }
}

pub fn audio(url: &str) -> VideoFormat {
    VideoFormat::new(url, "audio/webm; codecs=\"opus\"", "AUDIO_QUALITY_MEDIUM")
}

pub fn video_only(url: &str) -> VideoFormat {
    VideoFormat::new(url, "video/mp4; codecs=\"avc1.4d401f\"", "720p")
}

pub fn record(id: &str, formats: Vec<VideoFormat>) -> VideoRecord {
    VideoRecord {
        id: id.to_string(),
        title: format!("Title {}", id),
        formats,
        ..Default::default()
    }
}
