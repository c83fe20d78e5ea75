//! The BGM track planner.
//!
//! Walks the compiled scene spans and emits the fewest clips that honor the
//! per-scene resolved configuration:
//! - Same configuration as the previous scene: extend the open clip.
//! - Same file, different settings: split at the boundary and carry the
//!   playback position forward via `audio_offset_frames`, so the music
//!   keeps playing through the settings change.
//! - Different file: crossfade — the outgoing clip is extended past the
//!   boundary and both clips carry the transition length.
//!
//! Only the first clip fades in and only the last fades out; every other
//! boundary fade is one frame so a sustained bed is not re-faded at splits.

use std::collections::{BTreeMap, BTreeSet};

use scenecast_core::{sec_to_frames, CompileWarning, Frames};
use scenecast_script::{BgmConfig, Scene};
use scenecast_timeline::{BgmAsset, BgmClip};
use tracing::warn;

use crate::resolve::{bgm_asset_id, config_key, resolve_bgm_config, ResolvedBgmConfig};

/// The frame range one scene occupies on the timeline.
pub struct SceneSpan<'a> {
    pub scene: &'a Scene,
    pub start_frame: Frames,
    pub end_frame: Frames,
}

/// The planner's output: the BGM track's clips and the assets they use.
#[derive(Debug, Default)]
pub struct BgmPlan {
    pub clips: Vec<BgmClip>,
    pub assets: BTreeMap<String, BgmAsset>,
}

/// A clip under construction, with the configuration that opened it.
struct OpenClip {
    clip: BgmClip,
    cfg: ResolvedBgmConfig,
    key: String,
}

/// Plan the BGM track for a compiled script.
pub fn plan_bgm(
    video_bgm: &BgmConfig,
    spans: &[SceneSpan<'_>],
    total_frames: Frames,
    fps: f64,
    duration_map: &BTreeMap<String, Frames>,
    loudness_map: &BTreeMap<String, f64>,
    warnings: &mut Vec<CompileWarning>,
) -> BgmPlan {
    Planner {
        fps,
        duration_map,
        loudness_map,
        plan: BgmPlan::default(),
        playback_pos: BTreeMap::new(),
        warned_missing: BTreeSet::new(),
        warnings,
    }
    .run(video_bgm, spans, total_frames)
}

struct Planner<'a> {
    fps: f64,
    duration_map: &'a BTreeMap<String, Frames>,
    loudness_map: &'a BTreeMap<String, f64>,
    plan: BgmPlan,
    /// Accumulated frames played, per asset.
    playback_pos: BTreeMap<String, Frames>,
    warned_missing: BTreeSet<String>,
    warnings: &'a mut Vec<CompileWarning>,
}

impl Planner<'_> {
    fn run(
        mut self,
        video_bgm: &BgmConfig,
        spans: &[SceneSpan<'_>],
        total_frames: Frames,
    ) -> BgmPlan {
        // A script with no scenes still gets its configured bed over the
        // full length, with both edge fades on the single clip.
        if spans.is_empty() {
            if total_frames == 0 {
                return self.plan;
            }
            let cfg = resolve_bgm_config(video_bgm, None);
            let asset_id = bgm_asset_id(&cfg.src);
            self.ensure_asset(&asset_id, &cfg.src);
            let mut clip = self.open_clip(&cfg, &asset_id, 0, total_frames, None);
            clip.fade_in_frames = cfg.fade_in_frames(self.fps);
            clip.fade_out_frames = cfg.fade_out_frames(self.fps);
            self.push(clip);
            return self.plan;
        }

        let mut open: Option<OpenClip> = None;

        for span in spans {
            let cfg = resolve_bgm_config(video_bgm, span.scene.bgm_override());
            let key = config_key(&cfg);
            let asset_id = bgm_asset_id(&cfg.src);
            self.ensure_asset(&asset_id, &cfg.src);

            open = Some(match open.take() {
                None => {
                    let mut first =
                        self.open_clip(&cfg, &asset_id, span.start_frame, span.end_frame, None);
                    first.fade_in_frames = cfg.fade_in_frames(self.fps);
                    OpenClip {
                        clip: first,
                        cfg,
                        key,
                    }
                }
                Some(mut current) if current.key == key => {
                    current.clip.duration = span.end_frame - current.clip.start;
                    current
                }
                Some(mut current) if current.clip.asset_id == asset_id => {
                    // Same file, new settings: split at the boundary and
                    // keep the playback position running.
                    current.clip.duration = span.start_frame - current.clip.start;
                    self.advance(&current.clip);
                    self.push(current.clip);

                    let position = self.playback_pos.get(&asset_id).copied().unwrap_or(0);
                    let offset = wrap_playback_position(
                        position,
                        &cfg,
                        self.fps,
                        self.duration_map.get(&asset_id).copied(),
                    );
                    let clip = self.open_clip(
                        &cfg,
                        &asset_id,
                        span.start_frame,
                        span.end_frame,
                        Some(offset),
                    );
                    OpenClip { clip, cfg, key }
                }
                Some(mut current) => {
                    // New file: crossfade across the boundary.
                    let transition_frames = cfg.transition_frames(self.fps);
                    current.clip.duration =
                        span.start_frame + transition_frames - current.clip.start;
                    current.clip.transition_out_frames = Some(transition_frames);
                    self.advance(&current.clip);
                    self.push(current.clip);

                    let mut clip = self.open_clip(
                        &cfg,
                        &asset_id,
                        span.start_frame,
                        span.end_frame,
                        Some(0),
                    );
                    clip.transition_in_frames = Some(transition_frames);
                    OpenClip { clip, cfg, key }
                }
            });
        }

        if let Some(mut last) = open {
            last.clip.fade_out_frames = last.cfg.fade_out_frames(self.fps);
            self.advance(&last.clip);
            self.push(last.clip);
        }

        self.plan
    }

    fn ensure_asset(&mut self, asset_id: &str, src: &str) {
        if self.plan.assets.contains_key(asset_id) {
            return;
        }
        let asset = BgmAsset {
            src: src.to_string(),
            duration_frames: self.duration_map.get(asset_id).copied(),
            loudness_gain_db: self.loudness_map.get(asset_id).map(|db| db.clamp(-12.0, 12.0)),
        };
        self.plan.assets.insert(asset_id.to_string(), asset);
    }

    /// Build a clip from a resolved configuration. Edge fades default to
    /// one frame; the caller widens them on the first and last clips.
    fn open_clip(
        &mut self,
        cfg: &ResolvedBgmConfig,
        asset_id: &str,
        start: Frames,
        end: Frames,
        audio_offset_frames: Option<Frames>,
    ) -> BgmClip {
        let has_duration = self.duration_map.contains_key(asset_id);
        if cfg.looping && !has_duration && self.warned_missing.insert(asset_id.to_string()) {
            let warning = CompileWarning::MissingBgmDuration {
                asset_id: asset_id.to_string(),
                src: cfg.src.clone(),
            };
            warn!("{warning}");
            self.warnings.push(warning);
        }

        BgmClip {
            asset_id: asset_id.to_string(),
            start,
            duration: end - start,
            audio_offset_frames,
            volume_db: cfg.volume_db,
            volume: cfg.volume,
            max_gain_db: Some(cfg.max_gain_db),
            fade_in_frames: 1,
            fade_out_frames: 1,
            looping: cfg.looping && has_duration,
            loop_start_frames: cfg.loop_start_frames(self.fps),
            loop_end_frames: cfg.loop_end_frames(self.fps),
            loop_crossfade_frames: Some(sec_to_frames(cfg.loop_crossfade_sec, self.fps)),
            idle_boost_db: Some(cfg.idle_boost_db),
            ducking: cfg.clip_ducking(self.fps),
            transition_in_frames: None,
            transition_out_frames: None,
        }
    }

    fn advance(&mut self, clip: &BgmClip) {
        *self
            .playback_pos
            .entry(clip.asset_id.clone())
            .or_insert(0) += clip.duration;
    }

    /// Zero-length scenes can leave a zero-length clip behind; drop it
    /// rather than emit an invalid clip.
    fn push(&mut self, clip: BgmClip) {
        if clip.duration > 0 {
            self.plan.clips.push(clip);
        }
    }
}

/// Where playback stands within the audio file after `position` frames have
/// played, honoring the loop window.
///
/// With an unknown file duration the position passes through untouched (the
/// renderer resolves it). With looping off it saturates at the file end.
/// An invalid loop window degrades to wrapping over the whole file.
pub fn wrap_playback_position(
    position: Frames,
    cfg: &ResolvedBgmConfig,
    fps: f64,
    audio_duration: Option<Frames>,
) -> Frames {
    let Some(duration) = audio_duration else {
        return position;
    };
    if !cfg.looping {
        return position.min(duration);
    }
    let loop_start = cfg.loop_start_frames(fps).unwrap_or(0);
    let loop_end = cfg.loop_end_frames(fps).unwrap_or(duration);
    if loop_end <= loop_start || loop_end > duration {
        return if duration > 0 {
            position % duration
        } else {
            position
        };
    }
    let window = loop_end - loop_start;
    if position < loop_start {
        position
    } else {
        loop_start + ((position - loop_start) % window)
    }
}
