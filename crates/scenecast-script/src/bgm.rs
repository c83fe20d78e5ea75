//! Background-music configuration as authored in a Script.
//!
//! `BgmConfig` (video level) and `SceneBgmOverride` (scene level) share one
//! optional-field settings block; the compiler's resolver merges
//! defaults ← preset ← video ← scene into a fully concrete configuration.

use serde::{Deserialize, Serialize};

/// Named BGM treatment presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BgmPreset {
    /// Narration-first: ducking enabled with the standard windows.
    Talk,
    /// Quieter bed, slower ducking ramps.
    Calm,
    /// Louder bed, shallow fast ducking.
    Hype,
    /// Neutral defaults, no ducking.
    None,
}

/// Video-level BGM configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgmConfig {
    /// Audio file path or URL.
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<BgmPreset>,
    #[serde(flatten)]
    pub settings: BgmSettings,
}

/// Scene-level BGM override: every field optional, plus the crossfade
/// duration used when the source file changes at this scene's boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneBgmOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<BgmPreset>,
    /// Crossfade length when `src` changes entering this scene (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_sec: Option<f64>,
    #[serde(flatten)]
    pub settings: BgmSettings,
}

/// The optional settings shared by video-level config and scene overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgmSettings {
    /// Base volume in decibels; takes precedence over `volume`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_db: Option<f64>,
    /// Base volume as linear gain in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Output ceiling in decibels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gain_db: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out_sec: Option<f64>,
    /// Whether the file loops when shorter than its clip.
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_start_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_end_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_crossfade_sec: Option<f64>,
    /// Extra gain while nobody is talking (decibels).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_boost_db: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ducking: Option<DuckingSettings>,
}

/// Ducking configuration: attenuate BGM while a speaker is talking.
///
/// Writing a `ducking` object without an explicit `enabled` field enables
/// ducking; `enabled: false` turns it off while keeping the tuning around.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuckingSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Attenuation relative to the base volume (decibels, ≤ 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duck_delta_db: Option<f64>,
    /// Absolute talking-time volume (decibels).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duck_volume_db: Option<f64>,
    /// Talking-time volume as a fraction of the base volume in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duck_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_sec: Option<f64>,
    /// Talking intervals closer than this are merged (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_gap_sec: Option<f64>,
    /// Minimum ducked duration once triggered (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_hold_sec: Option<f64>,
}
