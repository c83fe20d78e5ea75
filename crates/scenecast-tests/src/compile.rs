//! End-to-end compile scenarios: dialogue layout, binding, fallbacks.

use scenecast_compiler::{compile, compile_with_warnings, CompileInputs};
use scenecast_core::CompileWarning;
use scenecast_timeline::{Track, TIMELINE_VERSION};

use crate::support::*;

// ── E1: single dialogue, no pause, no BGM ──────────────────────

#[test]
fn single_dialogue_layout() {
    let script = script(30.0, 0.0, vec![scene("s0", vec![dialogue("a", "hi")])]);
    let inputs = CompileInputs {
        audio_manifest: vec![manifest_entry("s0:0", "audio/001.wav", 1.0)],
        ..Default::default()
    };

    let timeline = compile(&script, &inputs).unwrap();

    assert_eq!(timeline.version, TIMELINE_VERSION);
    assert_eq!(timeline.meta.total_frames, 30);

    let asset = &timeline.assets.audio["audio_001"];
    assert_eq!(asset.src, "audio/001.wav");
    assert_eq!(asset.duration_frames, 30);

    let Track::Audio { clips } = &timeline.tracks[0] else {
        panic!("expected audio track first");
    };
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].asset_id, "audio_001");
    assert_eq!((clips[0].start, clips[0].duration), (0, 30));

    let Track::Subtitle { clips } = &timeline.tracks[1] else {
        panic!("expected subtitle track second");
    };
    assert_eq!(clips.len(), 1);
    assert_eq!((clips[0].start, clips[0].duration), (0, 30));
    assert_eq!(clips[0].text, "hi");

    let character = timeline.character_clips().unwrap();
    assert_eq!(character.len(), 1);
    assert_eq!((character[0].start, character[0].duration), (0, 30));
    assert_eq!(character[0].character_id, "a");
    assert!(character[0].state.is_talking);
}

// ── E2: duplicate text binds by key, not text ──────────────────

#[test]
fn duplicate_text_binds_by_key() {
    let script = script(
        30.0,
        0.0,
        vec![scene("s0", vec![dialogue("a", "ok"), dialogue("a", "ok")])],
    );
    let manifest = vec![
        manifest_entry("s0:0", "audio/001.wav", 0.5),
        manifest_entry("s0:1", "audio/002.wav", 0.7),
    ];
    let inputs = CompileInputs {
        audio_manifest: manifest.clone(),
        ..Default::default()
    };

    let timeline = compile(&script, &inputs).unwrap();
    let Track::Audio { clips } = &timeline.tracks[0] else {
        panic!("expected audio track");
    };
    assert_eq!(clips[0].duration, 15);
    assert_eq!(clips[1].duration, 21);

    // Permuting manifest entries with distinct keys changes nothing (P5).
    let swapped = CompileInputs {
        audio_manifest: manifest.into_iter().rev().collect(),
        ..Default::default()
    };
    let a = compile(&script, &inputs).unwrap().to_json().unwrap();
    let b = compile(&script, &swapped).unwrap().to_json().unwrap();
    assert_eq!(a, b);
}

// ── E3: missing voice falls back, still validates ──────────────

#[test]
fn missing_voice_falls_back() {
    let script = script(30.0, 0.0, vec![scene("s0", vec![dialogue("a", "hi")])]);
    let output = compile_with_warnings(&script, &CompileInputs::default()).unwrap();

    let asset = &output.timeline.assets.audio["audio_001"];
    assert_eq!(asset.src, "audio/001.wav");
    assert_eq!(asset.duration_frames, 60);
    assert_eq!(output.timeline.meta.total_frames, 60);
    assert!(matches!(
        output.warnings.as_slice(),
        [CompileWarning::UnboundAudio { .. }]
    ));

    // The emitted document still validates on re-ingress.
    let json = output.timeline.to_json().unwrap();
    assert!(scenecast_timeline::Timeline::from_json(&json).is_ok());
}

// ── Track layout invariants across a longer script ─────────────

#[test]
fn tracks_are_monotonic_and_contiguous() {
    let script = script(
        30.0,
        0.5,
        vec![
            scene("s0", vec![dialogue("a", "one"), dialogue("b", "two")]),
            scene("s1", vec![dialogue("a", "three")]),
        ],
    );
    let inputs = CompileInputs {
        audio_manifest: vec![
            manifest_entry("s0:0", "audio/001.wav", 1.0),
            manifest_entry("s0:1", "audio/002.wav", 1.5),
            manifest_entry("s1:0", "audio/003.wav", 0.4),
        ],
        ..Default::default()
    };

    let timeline = compile(&script, &inputs).unwrap();

    // P2: total is the sum of voice + pause per block.
    // (30+15) + (45+15) + (12+15) = 132.
    assert_eq!(timeline.meta.total_frames, 132);

    // P3: audio and subtitle clips are laid out back to back.
    let Track::Subtitle { clips } = &timeline.tracks[1] else {
        panic!("expected subtitle track");
    };
    let mut cursor = 0;
    for clip in clips {
        assert_eq!(clip.start, cursor);
        cursor += clip.duration;
    }
    assert_eq!(cursor, 132);

    // P4: each block with a pause yields a talking clip then an idle clip.
    let character = timeline.character_clips().unwrap();
    assert_eq!(character.len(), 6);
    for pair in character.chunks(2) {
        assert!(pair[0].state.is_talking);
        assert!(!pair[1].state.is_talking);
        assert_eq!(pair[1].start, pair[0].start + pair[0].duration);
        assert_eq!(pair[0].character_id, pair[1].character_id);
    }
}

#[test]
fn explicit_audio_key_rebinds() {
    let mut scenes = vec![scene("s0", vec![dialogue("a", "hi")])];
    if let scenecast_script::Block::Dialogue(d) = &mut scenes[0].blocks[0] {
        d.audio_key = Some("retake:7".to_string());
    }
    let script = script(30.0, 0.0, scenes);
    let inputs = CompileInputs {
        audio_manifest: vec![
            manifest_entry("s0:0", "audio/001.wav", 1.0),
            manifest_entry("retake:7", "audio/777.wav", 2.0),
        ],
        ..Default::default()
    };

    let timeline = compile(&script, &inputs).unwrap();
    assert_eq!(timeline.assets.audio["audio_001"].src, "audio/777.wav");
    assert_eq!(timeline.meta.total_frames, 60);
}

#[test]
fn file_name_binding_wins() {
    let mut scenes = vec![scene("s0", vec![dialogue("a", "hi")])];
    if let scenecast_script::Block::Dialogue(d) = &mut scenes[0].blocks[0] {
        d.file_name = Some("take2.wav".to_string());
    }
    let script = script(30.0, 0.0, scenes);
    let inputs = CompileInputs {
        audio_manifest: vec![
            manifest_entry("s0:0", "audio/001.wav", 1.0),
            manifest_entry("unrelated", "voices/take2.wav", 3.0),
        ],
        ..Default::default()
    };

    let timeline = compile(&script, &inputs).unwrap();
    assert_eq!(timeline.assets.audio["audio_001"].src, "voices/take2.wav");
    assert_eq!(timeline.meta.total_frames, 90);
}
