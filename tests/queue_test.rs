//! Playback queue tests

mod common;

use common::{audio, record};
use invidplay::{Catalog, PlaybackQueue};

#[test]
fn test_fifo_order() {
    let mut queue = PlaybackQueue::new();
    queue.push(record("a", vec![]));
    queue.push(record("b", vec![]));
    queue.push(record("c", vec![]));

    assert_eq!(queue.dequeue().map(|v| v.id), Some("a".to_string()));
    assert_eq!(queue.dequeue().map(|v| v.id), Some("b".to_string()));
    assert_eq!(queue.dequeue().map(|v| v.id), Some("c".to_string()));
    assert!(queue.dequeue().is_none());
    assert!(queue.is_empty());
}

#[test]
fn test_enqueue_all_follows_selection_order() {
    let catalog = Catalog::new(vec![
        record("a", vec![]),
        record("b", vec![]),
        record("c", vec![]),
    ]);

    let mut queue = PlaybackQueue::enqueue_all(&[2, 0, 2], &catalog);
    assert_eq!(queue.len(), 3);

    let ids: Vec<String> = std::iter::from_fn(|| queue.dequeue()).map(|v| v.id).collect();
    assert_eq!(ids, vec!["c", "a", "c"]);
}

#[test]
fn test_queue_is_a_snapshot_of_the_catalog() {
    let mut catalog = Catalog::new(vec![record("a", vec![audio("http://a")])]);
    let mut queue = PlaybackQueue::enqueue_all(&[0], &catalog);

    // A new search replaces the catalog wholesale
    catalog = Catalog::new(vec![record("z", vec![])]);
    assert_eq!(catalog.len(), 1);

    let video = queue.dequeue().unwrap();
    assert_eq!(video.id, "a");
    assert_eq!(video.formats.len(), 1);
}

#[test]
fn test_iter_does_not_consume() {
    let catalog = Catalog::new(vec![record("a", vec![]), record("b", vec![])]);
    let queue = PlaybackQueue::enqueue_all(&[0, 1], &catalog);

    assert_eq!(queue.iter().count(), 2);
    assert_eq!(queue.len(), 2);
}
