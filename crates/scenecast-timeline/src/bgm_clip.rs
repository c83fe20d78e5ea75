//! The BGM clip: one contiguous span of background music with its fully
//! resolved playback configuration.
//!
//! All time fields are frames. Continuous playback across configuration
//! splits is expressed by `audio_offset_frames`; crossfade at a source
//! change by the `transition_*_frames` pair on the outgoing and incoming
//! clips.

use scenecast_core::Frames;
use serde::{Deserialize, Serialize};

/// Default constants shared by the compiler and the volume envelope.
pub mod defaults {
    /// Base volume when neither `volumeDb` nor `volume` is set.
    pub const DEFAULT_BASE_DB: f64 = -12.0;
    /// Output ceiling.
    pub const DEFAULT_MAX_GAIN_DB: f64 = -3.0;
    /// Gain added while nobody is talking.
    pub const DEFAULT_IDLE_BOOST_DB: f64 = 3.0;
    /// Ducking attenuation relative to base volume.
    pub const DEFAULT_DUCK_DELTA_DB: f64 = -8.0;
    pub const DEFAULT_ATTACK_SEC: f64 = 0.10;
    pub const DEFAULT_RELEASE_SEC: f64 = 0.25;
    pub const DEFAULT_MERGE_GAP_SEC: f64 = 0.35;
    pub const DEFAULT_MIN_HOLD_SEC: f64 = 0.60;
    pub const DEFAULT_LOOP_CROSSFADE_SEC: f64 = 0.25;
    pub const DEFAULT_FADE_IN_SEC: f64 = 1.0;
    pub const DEFAULT_FADE_OUT_SEC: f64 = 1.0;
    /// Crossfade length when the BGM source changes between scenes.
    pub const DEFAULT_TRANSITION_SEC: f64 = 1.0;
}

/// A background-music clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgmClip {
    /// Key into `assets.bgm`.
    pub asset_id: String,
    pub start: Frames,
    pub duration: Frames,
    /// Playback position within the audio file at clip start. Set when the
    /// clip continues an earlier same-asset run; absent on a fresh start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_offset_frames: Option<Frames>,
    /// Base volume in decibels; takes precedence over `volume`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_db: Option<f64>,
    /// Base volume as linear gain in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gain_db: Option<f64>,
    pub fade_in_frames: Frames,
    pub fade_out_frames: Frames,
    /// Whether the renderer loops the file over this clip's span.
    #[serde(rename = "loop")]
    pub looping: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_start_frames: Option<Frames>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_end_frames: Option<Frames>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_crossfade_frames: Option<Frames>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_boost_db: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ducking: Option<BgmDucking>,
    /// Crossfade-in at a source change; equals the outgoing clip's
    /// `transition_out_frames`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_in_frames: Option<Frames>,
    /// Crossfade-out at a source change, over the clip's final frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_out_frames: Option<Frames>,
}

/// Resolved ducking parameters carried on a BGM clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgmDucking {
    pub enabled: bool,
    /// First-present of the three volume keys wins in the envelope:
    /// `duck_delta_db`, then `duck_volume_db`, then `duck_volume`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duck_delta_db: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duck_volume_db: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duck_volume: Option<f64>,
    pub attack_frames: Frames,
    pub release_frames: Frames,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_gap_frames: Option<Frames>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_hold_frames: Option<Frames>,
}

impl BgmClip {
    /// First frame past the end of this clip.
    #[inline]
    pub fn end(&self) -> Frames {
        self.start + self.duration
    }
}
