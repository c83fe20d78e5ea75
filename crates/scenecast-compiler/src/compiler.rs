//! The compiler driver.
//!
//! A single deterministic pass: validate the Script, walk scenes and blocks
//! advancing the frame cursor, hand the recorded scene spans to the BGM
//! planner, assemble the Timeline, and validate it before returning.

use std::collections::BTreeMap;

use scenecast_core::{CompileWarning, Frames, Result, ScenecastError};
use scenecast_script::{validate_script, AudioManifestEntry, Block, Script};
use scenecast_timeline::{
    AssetTable, AudioAsset, AudioClip, CharacterClip, SubtitleClip, Timeline, TimelineMeta, Track,
    TIMELINE_VERSION,
};

use crate::dialogue::{emit_dialogue, BlockContext};
use crate::planner::{plan_bgm, SceneSpan};

/// External inputs to a compile: the voice manifest plus the media probe's
/// per-asset duration and loudness-gain maps (keyed by BGM asset id).
#[derive(Debug, Clone, Default)]
pub struct CompileInputs {
    pub audio_manifest: Vec<AudioManifestEntry>,
    pub bgm_duration_frames: BTreeMap<String, Frames>,
    pub bgm_loudness_gain_db: BTreeMap<String, f64>,
}

/// A compiled Timeline plus the warnings gathered along the way.
#[derive(Debug)]
pub struct CompileOutput {
    pub timeline: Timeline,
    pub warnings: Vec<CompileWarning>,
}

/// Compile a Script into a Timeline.
///
/// The single entry point of the core. Fails only on structural problems
/// (an invalid Script, an unknown block type, or — indicating a compiler
/// bug — an invalid emitted Timeline); everything data-driven degrades to a
/// warning.
pub fn compile(script: &Script, inputs: &CompileInputs) -> Result<Timeline> {
    compile_with_warnings(script, inputs).map(|output| output.timeline)
}

/// Compile, also returning the collected warnings.
pub fn compile_with_warnings(script: &Script, inputs: &CompileInputs) -> Result<CompileOutput> {
    validate_script(script)?;

    let mut warnings: Vec<CompileWarning> = Vec::new();
    let mut audio_assets: BTreeMap<String, AudioAsset> = BTreeMap::new();
    let mut audio_clips: Vec<AudioClip> = Vec::new();
    let mut subtitle_clips: Vec<SubtitleClip> = Vec::new();
    let mut character_clips: Vec<CharacterClip> = Vec::new();
    let mut scene_spans: Vec<SceneSpan<'_>> = Vec::new();

    let mut cursor: Frames = 0;
    let mut global_block_index = 0usize;

    for scene in &script.scenes {
        let scene_start = cursor;
        for (block_index, block) in scene.blocks.iter().enumerate() {
            match block {
                Block::Dialogue(dialogue) => {
                    let ctx = BlockContext {
                        script,
                        scene,
                        manifest: &inputs.audio_manifest,
                        current_frame: cursor,
                        block_index,
                        global_block_index,
                    };
                    let emission = emit_dialogue(&ctx, dialogue, &mut warnings);
                    audio_assets.insert(emission.audio_asset_id, emission.asset);
                    audio_clips.push(emission.audio_clip);
                    subtitle_clips.push(emission.subtitle_clip);
                    character_clips.extend(emission.character_clips);
                    cursor += emission.total_duration_frames;
                    global_block_index += 1;
                }
                Block::Unknown(_) => {
                    return Err(ScenecastError::UnknownBlockType(
                        block.type_tag().to_string(),
                    ));
                }
            }
        }
        scene_spans.push(SceneSpan {
            scene,
            start_frame: scene_start,
            end_frame: cursor,
        });
    }

    let mut tracks = vec![
        Track::Audio { clips: audio_clips },
        Track::Subtitle {
            clips: subtitle_clips,
        },
        Track::Character {
            clips: character_clips,
        },
    ];
    let mut bgm_assets = None;

    if let Some(video_bgm) = &script.video.bgm {
        let plan = plan_bgm(
            video_bgm,
            &scene_spans,
            cursor,
            script.video.fps,
            &inputs.bgm_duration_frames,
            &inputs.bgm_loudness_gain_db,
            &mut warnings,
        );
        if !plan.clips.is_empty() {
            tracks.push(Track::Bgm { clips: plan.clips });
        }
        if !plan.assets.is_empty() {
            bgm_assets = Some(plan.assets);
        }
    }

    let timeline = Timeline {
        version: TIMELINE_VERSION.to_string(),
        meta: TimelineMeta {
            fps: script.video.fps,
            width: script.video.width,
            height: script.video.height,
            total_frames: cursor,
        },
        assets: AssetTable {
            audio: audio_assets,
            bgm: bgm_assets,
        },
        tracks,
    };
    scenecast_timeline::validate_timeline(&timeline)?;

    Ok(CompileOutput { timeline, warnings })
}
