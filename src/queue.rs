//! Playback queue
//!
//! FIFO of video snapshots built once per selection and drained one
//! record at a time by the playback loop.

use std::collections::VecDeque;

use crate::models::{render_listing, Catalog, VideoRecord};

/// Ordered queue of videos waiting to be played
#[derive(Debug, Clone, Default)]
pub struct PlaybackQueue {
    items: VecDeque<VideoRecord>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue from expanded selection indices
    ///
    /// Records are cloned, so the queue is unaffected by a later catalog
    /// replacement. Indices must come from an expansion against this same
    /// catalog; any that do not resolve are dropped with a warning.
    pub fn enqueue_all(indices: &[usize], catalog: &Catalog) -> Self {
        let mut queue = Self::new();
        for &index in indices {
            match catalog.get(index) {
                Some(video) => queue.push(video.clone()),
                None => tracing::warn!(index, "selection index not in catalog, skipping"),
            }
        }
        queue
    }

    /// Append a record at the back
    pub fn push(&mut self, video: VideoRecord) {
        self.items.push_back(video);
    }

    /// Remove and return the record at the front
    pub fn dequeue(&mut self) -> Option<VideoRecord> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Read-only view in playback order, for printing the queue
    pub fn iter(&self) -> impl Iterator<Item = &VideoRecord> {
        self.items.iter()
    }

    pub fn listing(&self) -> String {
        render_listing(self.iter())
    }
}

impl FromIterator<VideoRecord> for PlaybackQueue {
    fn from_iter<I: IntoIterator<Item = VideoRecord>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: id.to_uppercase(),
            ..Default::default()
        }
    }

    #[test]
    fn test_enqueue_skips_unknown_index() {
        let catalog = Catalog::new(vec![video("a")]);
        let queue = PlaybackQueue::enqueue_all(&[0, 5], &catalog);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_listing_numbers_from_zero() {
        let queue: PlaybackQueue = vec![video("a"), video("b")].into_iter().collect();
        let listing = queue.listing();
        assert!(listing.contains("  0 A"));
        assert!(listing.contains("  1 B"));
    }
}
