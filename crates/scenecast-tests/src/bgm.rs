//! End-to-end BGM planning scenarios: presets, crossfade, continuity.

use std::collections::BTreeMap;

use scenecast_compiler::{bgm_asset_id, compile, CompileInputs};
use scenecast_script::{BgmPreset, BgmSettings, SceneBgmOverride};
use scenecast_timeline::Timeline;

use crate::support::*;

fn bgm_clips(timeline: &Timeline) -> &[scenecast_timeline::BgmClip] {
    timeline.bgm_clips().expect("timeline has a bgm track")
}

// ── E4: single scene, talk preset, defaults applied ────────────

#[test]
fn talk_preset_defaults() {
    let mut script = script(30.0, 0.5, vec![scene("s0", vec![dialogue("a", "hi")])]);
    script.video.bgm = Some({
        let mut bgm = video_bgm("bgm/main.mp3");
        bgm.preset = Some(BgmPreset::Talk);
        bgm
    });

    let asset_id = bgm_asset_id("bgm/main.mp3");
    let mut durations = BTreeMap::new();
    durations.insert(asset_id.clone(), 900);
    let inputs = CompileInputs {
        audio_manifest: vec![manifest_entry("s0:0", "audio/001.wav", 2.0)],
        bgm_duration_frames: durations,
        ..Default::default()
    };

    let timeline = compile(&script, &inputs).unwrap();
    assert_eq!(timeline.meta.total_frames, 75);

    let clips = bgm_clips(&timeline);
    assert_eq!(clips.len(), 1);
    let clip = &clips[0];
    assert_eq!(clip.asset_id, asset_id);
    assert_eq!((clip.start, clip.duration), (0, 75));
    assert!(clip.looping);
    assert_eq!(clip.fade_in_frames, 30);
    assert_eq!(clip.fade_out_frames, 30);
    assert_eq!(clip.volume_db, Some(-12.0));
    assert_eq!(clip.max_gain_db, Some(-3.0));
    assert_eq!(clip.idle_boost_db, Some(3.0));

    let ducking = clip.ducking.as_ref().unwrap();
    assert!(ducking.enabled);
    assert_eq!(ducking.duck_delta_db, Some(-8.0));
    assert_eq!(ducking.attack_frames, 3);
    assert_eq!(ducking.release_frames, 8);
    assert_eq!(ducking.merge_gap_frames, Some(11));
    assert_eq!(ducking.min_hold_frames, Some(18));

    let asset = &timeline.assets.bgm.as_ref().unwrap()[&asset_id];
    assert_eq!(asset.src, "bgm/main.mp3");
    assert_eq!(asset.duration_frames, Some(900));
}

// ── E5: two scenes, src change, crossfade ──────────────────────

#[test]
fn src_change_crossfade() {
    let mut script = script(
        30.0,
        0.5,
        vec![
            scene("s0", vec![dialogue("a", "first")]),
            scene_with_bgm(
                "s1",
                SceneBgmOverride {
                    src: Some("b.mp3".to_string()),
                    transition_sec: Some(1.0),
                    ..Default::default()
                },
                vec![dialogue_with_pause("a", "second", 0.0)],
            ),
        ],
    );
    script.video.bgm = Some(video_bgm("a.mp3"));

    let inputs = CompileInputs {
        audio_manifest: vec![
            manifest_entry("s0:0", "audio/001.wav", 2.0),
            manifest_entry("s1:0", "audio/002.wav", 1.0),
        ],
        ..Default::default()
    };

    let timeline = compile(&script, &inputs).unwrap();
    // Scene spans: [0, 75) and [75, 105).
    assert_eq!(timeline.meta.total_frames, 105);

    let clips = bgm_clips(&timeline);
    assert_eq!(clips.len(), 2);

    let (out, inc) = (&clips[0], &clips[1]);
    assert_eq!(out.asset_id, bgm_asset_id("a.mp3"));
    assert_eq!((out.start, out.duration), (0, 105));
    assert_eq!(out.transition_out_frames, Some(30));
    assert_eq!(out.fade_in_frames, 30);
    assert_eq!(out.fade_out_frames, 1);

    assert_eq!(inc.asset_id, bgm_asset_id("b.mp3"));
    assert_eq!((inc.start, inc.duration), (75, 30));
    assert_eq!(inc.transition_in_frames, Some(30));
    assert_eq!(inc.audio_offset_frames, Some(0));
    assert_eq!(inc.fade_in_frames, 1);
    assert_eq!(inc.fade_out_frames, 30);

    // Both files appear in the asset table.
    let assets = timeline.assets.bgm.as_ref().unwrap();
    assert_eq!(assets.len(), 2);
}

// ── E6: same src, settings change, continuous playback ─────────

fn e6_script(first_scene_voice_sec: f64) -> (CompileInputs, scenecast_script::Script) {
    let mut script = script(
        30.0,
        0.0,
        vec![
            scene("s0", vec![dialogue("a", "first")]),
            scene_with_bgm(
                "s1",
                SceneBgmOverride {
                    settings: BgmSettings {
                        volume_db: Some(-6.0),
                        ..Default::default()
                    },
                    ..Default::default()
                },
                vec![dialogue("a", "second")],
            ),
        ],
    );
    script.video.bgm = Some(video_bgm("a.mp3"));

    let mut durations = BTreeMap::new();
    durations.insert(bgm_asset_id("a.mp3"), 300);
    let inputs = CompileInputs {
        audio_manifest: vec![
            manifest_entry("s0:0", "audio/001.wav", first_scene_voice_sec),
            manifest_entry("s1:0", "audio/002.wav", 2.0),
        ],
        bgm_duration_frames: durations,
        ..Default::default()
    };
    (inputs, script)
}

#[test]
fn settings_change_continues_playback() {
    let (inputs, script) = e6_script(2.0);
    let timeline = compile(&script, &inputs).unwrap();
    // Spans [0, 60) and [60, 120).
    assert_eq!(timeline.meta.total_frames, 120);

    let clips = bgm_clips(&timeline);
    assert_eq!(clips.len(), 2);
    assert_eq!(clips[0].asset_id, clips[1].asset_id);
    assert_eq!(clips[0].audio_offset_frames, None);
    assert_eq!(clips[0].volume_db, Some(-12.0));
    assert_eq!((clips[1].start, clips[1].duration), (60, 60));
    assert_eq!(clips[1].audio_offset_frames, Some(60));
    assert_eq!(clips[1].volume_db, Some(-6.0));
}

#[test]
fn settings_change_offset_wraps_past_file_end() {
    // First scene runs 12 s = 360 frames; the 300-frame file wraps.
    let (inputs, script) = e6_script(12.0);
    let timeline = compile(&script, &inputs).unwrap();

    let clips = bgm_clips(&timeline);
    assert_eq!(clips[1].start, 360);
    assert_eq!(clips[1].audio_offset_frames, Some(360 % 300));
}

// ── Asset id keys the probe maps ───────────────────────────────

#[test]
fn loudness_map_lands_on_asset() {
    let mut script = script(30.0, 0.0, vec![scene("s0", vec![dialogue("a", "hi")])]);
    script.video.bgm = Some(video_bgm("a.mp3"));

    let asset_id = bgm_asset_id("a.mp3");
    let mut loudness = BTreeMap::new();
    loudness.insert(asset_id.clone(), 2.5);
    let inputs = CompileInputs {
        audio_manifest: vec![manifest_entry("s0:0", "audio/001.wav", 1.0)],
        bgm_loudness_gain_db: loudness,
        ..Default::default()
    };

    let timeline = compile(&script, &inputs).unwrap();
    let asset = &timeline.assets.bgm.as_ref().unwrap()[&asset_id];
    assert_eq!(asset.loudness_gain_db, Some(2.5));
    // No duration probe: the clip must not claim to loop.
    assert!(!bgm_clips(&timeline)[0].looping);
}
