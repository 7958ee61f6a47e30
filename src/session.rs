//! Session state and the playback loop
//!
//! A [`Session`] owns everything that lives between two commands: the
//! current catalog, the catalog client, the player and the downloader.
//! Interactive and scripted front ends both drive it.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::{InvidiousClient, LookupError};
use crate::models::{Catalog, VideoRecord};
use crate::queue::PlaybackQueue;
use crate::selection::{self, Expansion};
use crate::stream::resolver::{self, Resolution};
use crate::stream::{DownloadError, Downloader, LocalPlayer, ProcessRunner};

/// Errors surfaced by session commands
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Before using this function, you have to search something with /name")]
    NoCatalog,
    #[error("result {index} does not exist ({size} results)")]
    NoSuchResult { index: usize, size: usize },
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Progress notifications while a queue drains
#[derive(Debug)]
pub enum DrainEvent<'a> {
    /// About to fetch and play this entry
    Starting {
        position: usize,
        remaining: usize,
        video: &'a VideoRecord,
    },
    /// Formats could not be fetched, entry skipped
    LookupFailed {
        video: &'a VideoRecord,
        error: &'a LookupError,
    },
    /// Format resolution finished for this entry
    Finished {
        video: &'a VideoRecord,
        resolution: &'a Resolution,
    },
}

/// Totals after a queue has been drained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub played: usize,
    pub unplayable: usize,
    pub lookup_failed: usize,
}

impl DrainSummary {
    pub fn total(&self) -> usize {
        self.played + self.unplayable + self.lookup_failed
    }
}

/// State carried across commands
pub struct Session<R> {
    client: InvidiousClient,
    catalog: Catalog,
    player: LocalPlayer,
    downloader: Downloader,
    runner: R,
}

impl<R: ProcessRunner> Session<R> {
    pub fn new(
        client: InvidiousClient,
        player: LocalPlayer,
        downloader: Downloader,
        runner: R,
    ) -> Self {
        Self {
            client,
            catalog: Catalog::default(),
            player,
            downloader,
            runner,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn player(&self) -> &LocalPlayer {
        &self.player
    }

    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Swap in a new catalog, discarding the old one
    ///
    /// Index selections computed against the previous catalog are no
    /// longer meaningful after this call.
    pub fn replace_catalog(&mut self, catalog: Catalog) -> &Catalog {
        tracing::debug!(
            old = self.catalog.len(),
            new = catalog.len(),
            "replacing catalog"
        );
        self.catalog = catalog;
        &self.catalog
    }

    /// Run a search and make its results the catalog
    ///
    /// On failure the previous catalog is kept.
    pub async fn search(&mut self, query: &str) -> Result<&Catalog, SessionError> {
        let results = self.client.search(query).await?;
        Ok(self.replace_catalog(results.into()))
    }

    /// Catalog entry by index
    pub fn entry(&self, index: usize) -> Result<&VideoRecord, SessionError> {
        if self.catalog.is_empty() {
            return Err(SessionError::NoCatalog);
        }
        self.catalog.get(index).ok_or(SessionError::NoSuchResult {
            index,
            size: self.catalog.len(),
        })
    }

    /// Fetch the full record (with formats) for a catalog entry
    pub async fn fetch_entry(&self, index: usize) -> Result<VideoRecord, SessionError> {
        let id = self.entry(index)?.id.clone();
        Ok(self.client.video(&id).await?)
    }

    /// Fetch a full record by video id
    pub async fn fetch(&self, id: &str) -> Result<VideoRecord, SessionError> {
        Ok(self.client.video(id).await?)
    }

    /// Expand a selection expression and queue the matching entries
    pub fn queue_selection(&self, expr: &str) -> (PlaybackQueue, Expansion) {
        let expansion = selection::expand(expr, self.catalog.len());
        let queue = PlaybackQueue::enqueue_all(&expansion.indices, &self.catalog);
        (queue, expansion)
    }

    /// Resolve and play one record that already carries its formats
    pub async fn play_record(&self, video: &VideoRecord) -> Resolution {
        resolver::play(video, &self.player, &self.runner).await
    }

    /// Play every queued entry in order, blocking until the queue is empty
    ///
    /// Entries without formats (search results) are fetched first. A
    /// failed lookup or an unplayable entry never stops the drain.
    pub async fn drain<F>(&self, mut queue: PlaybackQueue, mut observe: F) -> DrainSummary
    where
        F: FnMut(DrainEvent<'_>),
    {
        let mut summary = DrainSummary::default();
        let mut position = 0;

        while let Some(queued) = queue.dequeue() {
            observe(DrainEvent::Starting {
                position,
                remaining: queue.len(),
                video: &queued,
            });
            position += 1;

            let video = if queued.formats.is_empty() {
                match self.client.video(&queued.id).await {
                    Ok(video) => video,
                    Err(error) => {
                        tracing::warn!(video = %queued.id, error = %error, "lookup failed");
                        observe(DrainEvent::LookupFailed {
                            video: &queued,
                            error: &error,
                        });
                        summary.lookup_failed += 1;
                        continue;
                    }
                }
            } else {
                queued
            };

            let resolution = self.play_record(&video).await;
            if resolution.is_played() {
                summary.played += 1;
            } else {
                summary.unplayable += 1;
            }
            observe(DrainEvent::Finished {
                video: &video,
                resolution: &resolution,
            });
        }

        summary
    }

    /// Download one format of a fetched record
    pub async fn download(
        &self,
        video: &VideoRecord,
        format_index: usize,
    ) -> Result<PathBuf, SessionError> {
        Ok(self
            .downloader
            .download(video, format_index, &self.runner)
            .await?)
    }
}
