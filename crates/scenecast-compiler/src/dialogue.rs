//! The dialogue block rule.
//!
//! One dialogue block becomes one audio asset and clip (the voice), one
//! subtitle clip (voice plus pause), one talking character clip, and an
//! idle character clip when the pause is non-empty. A block with no
//! manifest match degrades to a two-second placeholder so the Timeline
//! stays renderable.

use scenecast_core::{sec_to_frames, CompileWarning, Frames};
use scenecast_script::{AudioManifestEntry, DialogueBlock, Scene, Script};
use scenecast_timeline::{
    AudioAsset, AudioClip, CharacterClip, CharacterState, SubtitleClip,
};
use smallvec::{smallvec, SmallVec};
use tracing::warn;

use crate::binder::{bind_entry, expected_audio_key};

/// Placeholder voice duration when a block has no manifest match (seconds).
const FALLBACK_VOICE_SEC: f64 = 2.0;

/// Everything the compiler needs to place one block.
pub struct BlockContext<'a> {
    pub script: &'a Script,
    pub scene: &'a Scene,
    pub manifest: &'a [AudioManifestEntry],
    /// Frame cursor at the block's start.
    pub current_frame: Frames,
    /// Block index within the scene.
    pub block_index: usize,
    /// Block index across the whole script.
    pub global_block_index: usize,
}

/// The clips and asset one dialogue block contributes.
pub struct DialogueEmission {
    pub audio_asset_id: String,
    pub asset: AudioAsset,
    pub audio_clip: AudioClip,
    pub subtitle_clip: SubtitleClip,
    pub character_clips: SmallVec<[CharacterClip; 2]>,
    /// Voice plus pause; the compiler advances its cursor by this.
    pub total_duration_frames: Frames,
}

/// Apply the dialogue rule to one block.
pub fn emit_dialogue(
    ctx: &BlockContext<'_>,
    block: &DialogueBlock,
    warnings: &mut Vec<CompileWarning>,
) -> DialogueEmission {
    let fps = ctx.script.video.fps;
    let expected_key = expected_audio_key(&ctx.scene.id, ctx.block_index);

    if !ctx.script.cast.contains_key(&block.speaker) {
        let warning = CompileWarning::UnknownSpeaker {
            scene_id: ctx.scene.id.clone(),
            speaker: block.speaker.clone(),
        };
        warn!("{warning}");
        warnings.push(warning);
    }

    let bound = bind_entry(ctx.manifest, block, &expected_key)
        .filter(|entry| entry.duration_in_seconds > 0.0);
    let (duration_frames, audio_src) = match bound {
        Some(entry) => (
            sec_to_frames(entry.duration_in_seconds, fps),
            entry.audio_src.clone(),
        ),
        None => {
            let warning = CompileWarning::UnboundAudio {
                scene_id: ctx.scene.id.clone(),
                block_index: ctx.block_index,
                audio_key: block.audio_key.clone().unwrap_or(expected_key),
            };
            warn!("{warning}");
            warnings.push(warning);
            (
                sec_to_frames(FALLBACK_VOICE_SEC, fps),
                format!("audio/{:03}.wav", ctx.global_block_index + 1),
            )
        }
    };

    let pause_sec = block
        .pause_sec
        .unwrap_or(ctx.script.video.default_pause_sec);
    let pause_frames = sec_to_frames(pause_sec, fps);
    let total_duration_frames = duration_frames + pause_frames;

    let start = ctx.current_frame;
    let audio_asset_id = format!("audio_{:03}", ctx.global_block_index + 1);

    let mut character_clips: SmallVec<[CharacterClip; 2]> = smallvec![CharacterClip {
        start,
        duration: duration_frames,
        character_id: block.speaker.clone(),
        state: CharacterState { is_talking: true },
    }];
    if pause_frames > 0 {
        character_clips.push(CharacterClip {
            start: start + duration_frames,
            duration: pause_frames,
            character_id: block.speaker.clone(),
            state: CharacterState { is_talking: false },
        });
    }

    DialogueEmission {
        asset: AudioAsset {
            src: audio_src,
            duration_frames,
        },
        audio_clip: AudioClip {
            asset_id: audio_asset_id.clone(),
            start,
            duration: duration_frames,
        },
        subtitle_clip: SubtitleClip {
            start,
            duration: total_duration_frames,
            text: block.text.clone(),
        },
        character_clips,
        total_duration_frames,
        audio_asset_id,
    }
}
