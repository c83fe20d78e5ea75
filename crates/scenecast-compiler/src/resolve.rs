//! Resolving BGM configuration.
//!
//! Per scene, the planner needs one fully concrete configuration. It is
//! merged in ascending precedence: built-in defaults ← named preset ←
//! video-level explicit fields ← scene-override explicit fields. Only the
//! nested ducking object merges deep; everything else replaces wholesale.

use scenecast_core::{sec_to_frames, Frames};
use scenecast_script::{BgmConfig, BgmPreset, BgmSettings, DuckingSettings, SceneBgmOverride};
use scenecast_timeline::defaults::*;
use scenecast_timeline::BgmDucking;
use serde::Serialize;

/// A fully resolved per-scene BGM configuration. Field order is the
/// canonical serialization order used for change detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBgmConfig {
    pub src: String,
    pub volume_db: Option<f64>,
    pub volume: Option<f64>,
    pub max_gain_db: f64,
    pub fade_in_sec: f64,
    pub fade_out_sec: f64,
    pub looping: bool,
    pub loop_start_sec: Option<f64>,
    pub loop_end_sec: Option<f64>,
    pub loop_crossfade_sec: f64,
    pub idle_boost_db: f64,
    pub ducking: ResolvedDucking,
    /// Crossfade length when the source changes entering this scene.
    pub transition_sec: f64,
}

/// Resolved ducking parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDucking {
    pub enabled: bool,
    pub duck_delta_db: Option<f64>,
    pub duck_volume_db: Option<f64>,
    pub duck_volume: Option<f64>,
    pub attack_sec: f64,
    pub release_sec: f64,
    pub merge_gap_sec: f64,
    pub min_hold_sec: f64,
}

impl ResolvedBgmConfig {
    fn with_defaults(src: String) -> Self {
        Self {
            src,
            volume_db: None,
            volume: None,
            max_gain_db: DEFAULT_MAX_GAIN_DB,
            fade_in_sec: DEFAULT_FADE_IN_SEC,
            fade_out_sec: DEFAULT_FADE_OUT_SEC,
            looping: true,
            loop_start_sec: None,
            loop_end_sec: None,
            loop_crossfade_sec: DEFAULT_LOOP_CROSSFADE_SEC,
            idle_boost_db: DEFAULT_IDLE_BOOST_DB,
            ducking: ResolvedDucking {
                enabled: false,
                duck_delta_db: None,
                duck_volume_db: None,
                duck_volume: None,
                attack_sec: DEFAULT_ATTACK_SEC,
                release_sec: DEFAULT_RELEASE_SEC,
                merge_gap_sec: DEFAULT_MERGE_GAP_SEC,
                min_hold_sec: DEFAULT_MIN_HOLD_SEC,
            },
            transition_sec: DEFAULT_TRANSITION_SEC,
        }
    }

    pub fn fade_in_frames(&self, fps: f64) -> Frames {
        sec_to_frames(self.fade_in_sec, fps).max(1)
    }

    pub fn fade_out_frames(&self, fps: f64) -> Frames {
        sec_to_frames(self.fade_out_sec, fps).max(1)
    }

    pub fn transition_frames(&self, fps: f64) -> Frames {
        sec_to_frames(self.transition_sec, fps).max(1)
    }

    pub fn loop_start_frames(&self, fps: f64) -> Option<Frames> {
        self.loop_start_sec.map(|s| sec_to_frames(s, fps))
    }

    pub fn loop_end_frames(&self, fps: f64) -> Option<Frames> {
        self.loop_end_sec.map(|s| sec_to_frames(s, fps))
    }

    /// The clip-level ducking block, when ducking is enabled.
    pub fn clip_ducking(&self, fps: f64) -> Option<BgmDucking> {
        if !self.ducking.enabled {
            return None;
        }
        let d = &self.ducking;
        Some(BgmDucking {
            enabled: true,
            duck_delta_db: d.duck_delta_db,
            duck_volume_db: d.duck_volume_db,
            duck_volume: d.duck_volume,
            attack_frames: sec_to_frames(d.attack_sec, fps),
            release_frames: sec_to_frames(d.release_sec, fps),
            merge_gap_frames: Some(sec_to_frames(d.merge_gap_sec, fps)),
            min_hold_frames: Some(sec_to_frames(d.min_hold_sec, fps)),
        })
    }
}

/// Resolve the configuration for one scene.
///
/// `src` comes from the scene override when present, else the video config;
/// the preset likewise.
pub fn resolve_bgm_config(
    video: &BgmConfig,
    scene: Option<&SceneBgmOverride>,
) -> ResolvedBgmConfig {
    let src = scene
        .and_then(|s| s.src.clone())
        .unwrap_or_else(|| video.src.clone());
    let mut cfg = ResolvedBgmConfig::with_defaults(src);

    let preset = scene.and_then(|s| s.preset).or(video.preset);
    if let Some(preset) = preset {
        apply_preset(&mut cfg, preset);
    }
    apply_settings(&mut cfg, &video.settings);
    if let Some(scene) = scene {
        apply_settings(&mut cfg, &scene.settings);
        if let Some(t) = scene.transition_sec {
            cfg.transition_sec = t;
        }
    }

    // Fill the precedence fallbacks once everything explicit is in.
    if cfg.volume_db.is_none() && cfg.volume.is_none() {
        cfg.volume_db = Some(DEFAULT_BASE_DB);
    }
    let d = &mut cfg.ducking;
    if d.enabled && d.duck_delta_db.is_none() && d.duck_volume_db.is_none() && d.duck_volume.is_none()
    {
        d.duck_delta_db = Some(DEFAULT_DUCK_DELTA_DB);
    }

    cfg
}

fn apply_preset(cfg: &mut ResolvedBgmConfig, preset: BgmPreset) {
    match preset {
        BgmPreset::Talk => {
            cfg.ducking.enabled = true;
        }
        BgmPreset::Calm => {
            cfg.volume_db = Some(-18.0);
            cfg.idle_boost_db = 2.0;
            cfg.ducking.enabled = true;
            cfg.ducking.attack_sec = 0.20;
            cfg.ducking.release_sec = 0.50;
        }
        BgmPreset::Hype => {
            cfg.volume_db = Some(-10.0);
            cfg.idle_boost_db = 4.0;
            cfg.ducking.enabled = true;
            cfg.ducking.duck_delta_db = Some(-6.0);
            cfg.ducking.attack_sec = 0.05;
            cfg.ducking.release_sec = 0.15;
        }
        BgmPreset::None => {}
    }
}

fn apply_settings(cfg: &mut ResolvedBgmConfig, settings: &BgmSettings) {
    if let Some(v) = settings.volume_db {
        cfg.volume_db = Some(v);
    }
    if let Some(v) = settings.volume {
        cfg.volume = Some(v);
    }
    if let Some(v) = settings.max_gain_db {
        cfg.max_gain_db = v;
    }
    if let Some(v) = settings.fade_in_sec {
        cfg.fade_in_sec = v;
    }
    if let Some(v) = settings.fade_out_sec {
        cfg.fade_out_sec = v;
    }
    if let Some(v) = settings.looping {
        cfg.looping = v;
    }
    if let Some(v) = settings.loop_start_sec {
        cfg.loop_start_sec = Some(v);
    }
    if let Some(v) = settings.loop_end_sec {
        cfg.loop_end_sec = Some(v);
    }
    if let Some(v) = settings.loop_crossfade_sec {
        cfg.loop_crossfade_sec = v;
    }
    if let Some(v) = settings.idle_boost_db {
        cfg.idle_boost_db = v;
    }
    if let Some(d) = &settings.ducking {
        apply_ducking(&mut cfg.ducking, d);
    }
}

fn apply_ducking(cfg: &mut ResolvedDucking, d: &DuckingSettings) {
    // Writing a ducking object without an explicit flag enables ducking.
    cfg.enabled = d.enabled.unwrap_or(true);
    if let Some(v) = d.duck_delta_db {
        cfg.duck_delta_db = Some(v);
    }
    if let Some(v) = d.duck_volume_db {
        cfg.duck_volume_db = Some(v);
    }
    if let Some(v) = d.duck_volume {
        cfg.duck_volume = Some(v);
    }
    if let Some(v) = d.attack_sec {
        cfg.attack_sec = v;
    }
    if let Some(v) = d.release_sec {
        cfg.release_sec = v;
    }
    if let Some(v) = d.merge_gap_sec {
        cfg.merge_gap_sec = v;
    }
    if let Some(v) = d.min_hold_sec {
        cfg.min_hold_sec = v;
    }
}

/// Canonical serialization of a resolved configuration, used to detect
/// per-scene changes. Struct field order is fixed, so equal configurations
/// produce equal keys.
pub fn config_key(cfg: &ResolvedBgmConfig) -> String {
    serde_json::to_string(cfg).expect("resolved BGM config is always serializable")
}

/// Deterministic BGM asset id: a 32-bit DJB2 fold of the source path.
///
/// Distinct sources map to distinct ids for all practical inputs; two clips
/// share an id exactly when they play the same file.
pub fn bgm_asset_id(src: &str) -> String {
    let mut hash: u32 = 5381;
    for byte in src.as_bytes() {
        hash = hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(*byte as u32);
    }
    format!("bgm_{hash:08x}")
}
