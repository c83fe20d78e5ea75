//! Timeline document types.

use std::collections::BTreeMap;

use scenecast_core::{Frames, Result, ScenecastError};
use serde::{Deserialize, Serialize};

use crate::bgm_clip::BgmClip;

/// Schema version literal accepted and emitted by this build.
pub const TIMELINE_VERSION: &str = "0.1";

/// The frame-precise edit plan produced by the compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Schema version (literal "0.1").
    pub version: String,
    pub meta: TimelineMeta,
    pub assets: AssetTable,
    /// Ordered tracks: audio, subtitle, character, then BGM when present.
    pub tracks: Vec<Track>,
}

impl Timeline {
    /// Serialize to pretty JSON.
    ///
    /// Asset tables are ordered maps, so equal Timelines serialize to equal
    /// bytes.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ScenecastError::Serialization(format!("failed to serialize timeline: {e}"))
        })
    }

    /// Parse and validate a Timeline from JSON.
    pub fn from_json(data: &str) -> Result<Self> {
        let timeline: Timeline = serde_json::from_str(data)
            .map_err(|e| ScenecastError::InvalidTimeline(format!("malformed timeline: {e}")))?;
        crate::validate::validate_timeline(&timeline)?;
        Ok(timeline)
    }

    /// The character track's clips, if the track exists.
    pub fn character_clips(&self) -> Option<&[CharacterClip]> {
        self.tracks.iter().find_map(|t| match t {
            Track::Character { clips } => Some(clips.as_slice()),
            _ => None,
        })
    }

    /// The BGM track's clips, if the track exists.
    pub fn bgm_clips(&self) -> Option<&[BgmClip]> {
        self.tracks.iter().find_map(|t| match t {
            Track::Bgm { clips } => Some(clips.as_slice()),
            _ => None,
        })
    }
}

/// Timeline-wide metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMeta {
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    /// Total length; equals the frame cursor after the last emitted block.
    pub total_frames: Frames,
}

/// Asset tables, keyed by deterministic ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetTable {
    /// Voice clips, one per dialogue block.
    pub audio: BTreeMap<String, AudioAsset>,
    /// Background-music files, keyed by src hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm: Option<BTreeMap<String, BgmAsset>>,
}

/// A voice audio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAsset {
    pub src: String,
    pub duration_frames: Frames,
}

/// A background-music file, with probe results when available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgmAsset {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_frames: Option<Frames>,
    /// Loudness-normalization gain from the media probe (dB, in [-12, +12]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loudness_gain_db: Option<f64>,
}

/// A track: a tagged, ordered list of clips of one kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Track {
    Audio { clips: Vec<AudioClip> },
    Subtitle { clips: Vec<SubtitleClip> },
    Character { clips: Vec<CharacterClip> },
    Bgm { clips: Vec<BgmClip> },
}

impl Track {
    /// The serialized `type` tag of this track.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Audio { .. } => "audio",
            Self::Subtitle { .. } => "subtitle",
            Self::Character { .. } => "character",
            Self::Bgm { .. } => "bgm",
        }
    }
}

/// A voice clip on the audio track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioClip {
    /// Key into `assets.audio`.
    pub asset_id: String,
    pub start: Frames,
    pub duration: Frames,
}

/// A subtitle spanning a dialogue block's voice plus its pause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleClip {
    pub start: Frames,
    pub duration: Frames,
    pub text: String,
}

/// A character appearance with its talking state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterClip {
    pub start: Frames,
    pub duration: Frames,
    pub character_id: String,
    pub state: CharacterState,
}

/// Renderer-facing character state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterState {
    pub is_talking: bool,
}
