//! Format resolution tests
//!
//! Playback walks audio formats in order and stops at the first one the
//! player exits cleanly on. No real processes are spawned.

mod common;

use common::{audio, record, video_only, ScriptedRunner};
use invidplay::stream::resolver::play;
use invidplay::stream::{LocalPlayer, StdioMode};
use invidplay::Resolution;

#[tokio::test]
async fn test_skips_video_and_falls_back_to_next_audio() {
    let video = record(
        "abc",
        vec![
            video_only("http://video"),
            audio("http://audio-a"),
            audio("http://audio-b"),
            audio("http://audio-c"),
        ],
    );
    let runner = ScriptedRunner::new().failing("http://audio-a");

    let resolution = play(&video, &LocalPlayer::mpv(), &runner).await;

    assert_eq!(runner.urls(), vec!["http://audio-a", "http://audio-b"]);
    match resolution {
        Resolution::Played {
            format_index,
            format,
            failed,
        } => {
            assert_eq!(format_index, 2);
            assert_eq!(format.url, "http://audio-b");
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].format_index, 1);
            assert_eq!(failed[0].reason, "exit status 1");
        }
        other => panic!("Expected Played, got {:?}", other),
    }
}

#[tokio::test]
async fn test_first_success_stops_resolution() {
    let video = record("abc", vec![audio("http://a"), audio("http://b")]);
    let runner = ScriptedRunner::new();

    let resolution = play(&video, &LocalPlayer::mpv(), &runner).await;

    assert!(resolution.is_played());
    assert_eq!(resolution.attempts(), 1);
    assert_eq!(runner.urls(), vec!["http://a"]);
}

#[tokio::test]
async fn test_all_audio_failing_is_exhausted() {
    let video = record(
        "abc",
        vec![audio("http://a"), video_only("http://v"), audio("http://b")],
    );
    let runner = ScriptedRunner::new()
        .failing("http://a")
        .failing("http://b");

    let resolution = play(&video, &LocalPlayer::mpv(), &runner).await;

    match resolution {
        Resolution::Exhausted { failed } => {
            let indices: Vec<usize> = failed.iter().map(|f| f.format_index).collect();
            assert_eq!(indices, vec![0, 2]);
        }
        other => panic!("Expected Exhausted, got {:?}", other),
    }
    // Each format is tried exactly once
    assert_eq!(runner.calls().len(), 2);
}

#[tokio::test]
async fn test_video_only_record_has_no_eligible_formats() {
    let video = record("abc", vec![video_only("http://v1"), video_only("http://v2")]);
    let runner = ScriptedRunner::new();

    let resolution = play(&video, &LocalPlayer::mpv(), &runner).await;

    assert_eq!(resolution, Resolution::NoEligibleFormats);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_spawn_error_advances_like_a_failure() {
    let video = record("abc", vec![audio("http://a"), audio("http://b")]);
    let runner = ScriptedRunner::new().missing("http://a");

    let resolution = play(&video, &LocalPlayer::mpv(), &runner).await;

    assert!(resolution.is_played());
    assert_eq!(resolution.attempts(), 2);
}

#[tokio::test]
async fn test_player_gets_terminal_and_extra_args() {
    let video = record("abc", vec![audio("http://a")]);
    let runner = ScriptedRunner::new();
    let player = LocalPlayer::from_command_line("mpv --no-video").unwrap();

    play(&video, &player, &runner).await;

    let calls = runner.calls();
    assert_eq!(calls[0].program, "mpv");
    assert_eq!(calls[0].args, vec!["--no-video", "http://a"]);
    assert_eq!(calls[0].stdio, StdioMode::Inherit);
}
