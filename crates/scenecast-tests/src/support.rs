//! Shared builders for integration tests.

use std::collections::BTreeMap;

use scenecast_script::{
    AudioManifestEntry, BgmConfig, Block, CastMember, DialogueBlock, Scene, SceneBgmOverride,
    SceneStyle, Script, VideoSettings, VoiceSettings,
};

pub fn script(fps: f64, default_pause_sec: f64, scenes: Vec<Scene>) -> Script {
    let mut cast = BTreeMap::new();
    for speaker in ["a", "b"] {
        cast.insert(
            speaker.to_string(),
            CastMember {
                voice: VoiceSettings {
                    engine: "voicevox".to_string(),
                    speaker_id: 3,
                },
                assets: None,
            },
        );
    }
    Script {
        version: "0.1".to_string(),
        video: VideoSettings {
            fps,
            width: 1920,
            height: 1080,
            default_pause_sec,
            bgm: None,
            audio_profile: None,
        },
        cast,
        scenes,
    }
}

pub fn scene(id: &str, blocks: Vec<Block>) -> Scene {
    Scene {
        id: id.to_string(),
        style: None,
        blocks,
    }
}

pub fn scene_with_bgm(id: &str, bgm: SceneBgmOverride, blocks: Vec<Block>) -> Scene {
    Scene {
        id: id.to_string(),
        style: Some(SceneStyle {
            bg: None,
            subtitle_style: None,
            bgm: Some(bgm),
        }),
        blocks,
    }
}

pub fn dialogue(speaker: &str, text: &str) -> Block {
    Block::Dialogue(DialogueBlock {
        speaker: speaker.to_string(),
        text: text.to_string(),
        pause_sec: None,
        id: None,
        audio_key: None,
        file_name: None,
    })
}

pub fn dialogue_with_pause(speaker: &str, text: &str, pause_sec: f64) -> Block {
    Block::Dialogue(DialogueBlock {
        speaker: speaker.to_string(),
        text: text.to_string(),
        pause_sec: Some(pause_sec),
        id: None,
        audio_key: None,
        file_name: None,
    })
}

pub fn manifest_entry(key: &str, src: &str, seconds: f64) -> AudioManifestEntry {
    AudioManifestEntry {
        audio_key: key.to_string(),
        speaker_id: 3,
        text: "hi".to_string(),
        audio_src: src.to_string(),
        duration_in_seconds: seconds,
        file_name: None,
    }
}

pub fn video_bgm(src: &str) -> BgmConfig {
    BgmConfig {
        src: src.to_string(),
        preset: None,
        settings: Default::default(),
    }
}
