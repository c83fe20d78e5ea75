//! Render-time envelope evaluation over a compiled Timeline.

use std::collections::BTreeMap;

use scenecast_audio::{
    clip_volume, crossfade_mul, ducking_intervals, resolve_gains, segments_for_clip,
};
use scenecast_compiler::{bgm_asset_id, compile, CompileInputs};
use scenecast_script::BgmPreset;
use scenecast_timeline::Timeline;

use crate::support::*;

/// Two 2-second lines with 1-second pauses, talk-preset BGM over a
/// 120-frame file: talking [0,60) and [90,150), total 180 frames.
fn compiled_timeline() -> Timeline {
    let mut script = script(
        30.0,
        1.0,
        vec![scene(
            "s0",
            vec![dialogue("a", "first line"), dialogue("a", "second line")],
        )],
    );
    script.video.bgm = Some({
        let mut bgm = video_bgm("bgm/main.mp3");
        bgm.preset = Some(BgmPreset::Talk);
        bgm
    });

    let mut durations = BTreeMap::new();
    durations.insert(bgm_asset_id("bgm/main.mp3"), 120);
    let inputs = CompileInputs {
        audio_manifest: vec![
            manifest_entry("s0:0", "audio/001.wav", 2.0),
            manifest_entry("s0:1", "audio/002.wav", 2.0),
        ],
        bgm_duration_frames: durations,
        ..Default::default()
    };
    compile(&script, &inputs).unwrap()
}

#[test]
fn ducking_intervals_follow_character_track() {
    let timeline = compiled_timeline();
    let clip = &timeline.bgm_clips().unwrap()[0];
    let ducks = ducking_intervals(
        timeline.character_clips().unwrap(),
        clip,
        timeline.meta.total_frames,
    );
    // The 30-frame pause exceeds the 11-frame merge gap, so the two lines
    // stay separate intervals.
    assert_eq!(ducks.len(), 2);
    assert_eq!((ducks[0].start, ducks[0].end), (0, 60));
    assert_eq!((ducks[1].start, ducks[1].end), (90, 150));
}

#[test]
fn envelope_ducks_while_talking_and_recovers() {
    let timeline = compiled_timeline();
    let clip = &timeline.bgm_clips().unwrap()[0];
    let ducks = ducking_intervals(
        timeline.character_clips().unwrap(),
        clip,
        timeline.meta.total_frames,
    );
    let ladder = resolve_gains(clip, None);

    // Mid-line: ducked to talk gain (≈ -20 dB total here).
    let talking = clip_volume(clip, None, 45, &ducks);
    assert!((talking - ladder.talk).abs() < 1e-9);
    assert!((ladder.talk - 0.1).abs() < 1e-3);

    // Mid-pause, past the release window: idle-boosted.
    let idle = clip_volume(clip, None, 75, &ducks);
    assert!((idle - ladder.idle).abs() < 1e-9);
    assert!(idle > talking);
    assert!(idle <= ladder.max);
}

#[test]
fn attack_ramp_descends_into_second_line() {
    let timeline = compiled_timeline();
    let clip = &timeline.bgm_clips().unwrap()[0];
    let ducks = ducking_intervals(
        timeline.character_clips().unwrap(),
        clip,
        timeline.meta.total_frames,
    );

    // The second line starts at frame 90; attack is 3 frames.
    let v3 = clip_volume(clip, None, 87, &ducks);
    let v2 = clip_volume(clip, None, 88, &ducks);
    let v1 = clip_volume(clip, None, 89, &ducks);
    let v0 = clip_volume(clip, None, 90, &ducks);
    assert!(v3 >= v2 && v2 >= v1 && v1 >= v0);
}

#[test]
fn fade_in_silences_the_first_frame() {
    let timeline = compiled_timeline();
    let clip = &timeline.bgm_clips().unwrap()[0];
    let ducks = ducking_intervals(
        timeline.character_clips().unwrap(),
        clip,
        timeline.meta.total_frames,
    );
    assert_eq!(clip.fade_in_frames, 30);
    assert_eq!(clip_volume(clip, None, 0, &ducks), 0.0);
    let ramping = clip_volume(clip, None, 10, &ducks);
    let later = clip_volume(clip, None, 40, &ducks);
    assert!(ramping > 0.0 && ramping < later);
}

#[test]
fn loop_segments_cover_clip_and_crossfade_sums_to_one() {
    let timeline = compiled_timeline();
    let clip = &timeline.bgm_clips().unwrap()[0];
    let asset = &timeline.assets.bgm.as_ref().unwrap()[&clip.asset_id];

    let segments = segments_for_clip(clip, asset.duration_frames);
    // A 180-frame clip over a 120-frame file: two passes.
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].audio_start_frame, 0);
    assert_eq!(segments[1].clip_offset, 120);
    // Default loop crossfade at 30 fps is 8 frames of overlap.
    let x = segments[0].fade_out_frames;
    assert_eq!(x, 8);
    assert_eq!(segments[1].fade_in_frames, x);
    assert_eq!(segments[0].duration, 128);

    // P7: across the seam, outgoing + incoming multipliers sum to one.
    for frame in 120..128 {
        let sum = crossfade_mul(&segments[0], frame) + crossfade_mul(&segments[1], frame);
        assert!((sum - 1.0).abs() <= 1.0 / x as f64 + 1e-9);
    }
}

#[test]
fn loudness_gain_scales_the_envelope() {
    let mut script = script(30.0, 0.0, vec![scene("s0", vec![dialogue("a", "hi")])]);
    script.video.bgm = Some(video_bgm("quiet.mp3"));

    let asset_id = bgm_asset_id("quiet.mp3");
    let mut loudness = BTreeMap::new();
    loudness.insert(asset_id.clone(), 6.0);
    let inputs = CompileInputs {
        audio_manifest: vec![manifest_entry("s0:0", "audio/001.wav", 1.0)],
        bgm_loudness_gain_db: loudness,
        ..Default::default()
    };
    let timeline = compile(&script, &inputs).unwrap();
    let clip = &timeline.bgm_clips().unwrap()[0];
    let gain_db = timeline.assets.bgm.as_ref().unwrap()[&asset_id].loudness_gain_db;

    let plain = resolve_gains(clip, None);
    let normalized = resolve_gains(clip, gain_db);
    assert!(normalized.base > plain.base);
}
