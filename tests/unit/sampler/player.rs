use super::*;
use crate::sampler::source::SweepSource;

fn small_spec() -> SampleSpec {
    SampleSpec {
        base_width: 8,
        scale: 1.0,
        char_aspect: 0.55,
    }
}

fn loaded_player() -> AsciiPlayer {
    let mut player = AsciiPlayer::new(small_spec(), Palette::basic());
    player.load(Box::new(SweepSource::new(160, 90, 10.0).unwrap()));
    player
}

#[test]
fn target_dims_apply_scale_aspect_and_char_correction() {
    let spec = SampleSpec::default();
    // 160x90 source: 120 * (90/160) * 0.55 = 37.125 -> 37 rows.
    assert_eq!(spec.target_dims(160, 90), (120, 37));

    let half = SampleSpec::with_scale(0.5);
    // 60 * 0.5625 * 0.55 = 18.5625 -> 18 rows.
    assert_eq!(half.target_dims(160, 90), (60, 18));

    // Degenerate scales still produce a usable grid.
    assert_eq!(SampleSpec::with_scale(0.0).target_dims(160, 90), (1, 1));
}

#[test]
fn player_without_a_source_rejects_requests() {
    let mut player = AsciiPlayer::new(small_spec(), Palette::basic());
    assert!(!player.has_source());
    assert_eq!(player.start().unwrap_err(), Rejection::NoSource);
    assert_eq!(player.commit_seek(1.0).unwrap_err(), Rejection::NoSource);
    assert_eq!(player.tick(0.1), None);
    assert!(!player.resume());
    assert_eq!(player.position_label(), "00:00 / 00:00");
}

#[test]
fn start_renders_the_first_frame_at_target_dims() {
    let mut player = loaded_player();
    let frame = player.start().unwrap();

    // 8 wide, floor(8 * 0.5625 * 0.55) = 2 rows.
    assert_eq!((frame.width, frame.height), (8, 2));
    assert_eq!(player.target_dims(), (8, 2));
    let lines: Vec<&str> = frame.text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.chars().count() == 8));
    assert!(player.is_playing());
    assert_eq!(player.position_sec(), 0.0);
}

#[test]
fn tick_advances_while_playing_and_stops_at_the_end() {
    let mut player = loaded_player();
    player.start().unwrap();

    assert!(player.tick(1.0).is_some());
    assert_eq!(player.position_sec(), 1.0);
    assert_eq!(player.position_label(), "00:01 / 00:10");

    // A giant tick clamps at the duration and playback stops there.
    assert!(player.tick(100.0).is_some());
    assert_eq!(player.position_sec(), 10.0);
    assert!(!player.is_playing());
    assert_eq!(player.tick(1.0), None);
}

#[test]
fn pause_suppresses_ticks_until_resume() {
    let mut player = loaded_player();
    player.start().unwrap();
    player.pause();
    assert_eq!(player.tick(1.0), None);
    assert_eq!(player.position_sec(), 0.0);

    assert!(player.resume());
    assert!(player.tick(1.0).is_some());
    assert_eq!(player.position_sec(), 1.0);
}

#[test]
fn commit_seek_clamps_pauses_and_renders_once() {
    let mut player = loaded_player();
    player.start().unwrap();

    player.commit_seek(-5.0).unwrap();
    assert_eq!(player.position_sec(), 0.0);
    assert!(!player.is_playing());

    player.commit_seek(99.0).unwrap();
    assert_eq!(player.position_sec(), 10.0);

    // Same instant, same frame: sampling is deterministic.
    let a = player.commit_seek(3.0).unwrap();
    let b = player.commit_seek(3.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn label_reports_the_pending_target_while_seeking() {
    let mut player = loaded_player();
    player.start().unwrap();
    assert!(player.tick(2.0).is_some());
    assert_eq!(player.position_label(), "00:02 / 00:10");

    player.begin_seek();
    assert!(player.is_seeking());
    player.preview_seek(7.4);
    assert_eq!(player.position_label(), "00:07 / 00:10");
    // The authoritative position has not moved yet.
    assert_eq!(player.position_sec(), 2.0);

    player.commit_seek(7.4).unwrap();
    assert!(!player.is_seeking());
    assert!((player.position_sec() - 7.4).abs() < 1e-9);
    assert_eq!(player.position_label(), "00:07 / 00:10");
}

#[test]
fn load_resets_position_and_recomputes_dims() {
    let mut player = loaded_player();
    player.start().unwrap();
    assert!(player.tick(5.0).is_some());

    player.load(Box::new(SweepSource::new(100, 100, 4.0).unwrap()));
    assert_eq!(player.position_sec(), 0.0);
    assert!(!player.is_playing());
    // Square source: floor(8 * 1.0 * 0.55) = 4 rows.
    assert_eq!(player.target_dims(), (8, 4));
    assert_eq!(player.position_label(), "00:00 / 00:04");
}

#[test]
fn frames_use_palette_symbols_only() {
    let mut player = loaded_player();
    let frame = player.start().unwrap();
    let allowed = "@%#*+=-:. \n";
    assert!(frame.text.chars().all(|c| allowed.contains(c)));
}
