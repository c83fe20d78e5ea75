//! Script document types.

use std::collections::BTreeMap;

use scenecast_core::{Result, ScenecastError};
use serde::{Deserialize, Serialize};

use crate::bgm::{BgmConfig, SceneBgmOverride};

/// Schema version literal accepted and emitted by this build.
pub const SCRIPT_VERSION: &str = "0.1";

/// The authored description of a narrated video.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Schema version (literal "0.1").
    pub version: String,
    /// Video-wide settings.
    pub video: VideoSettings,
    /// Speaker id → cast member.
    #[serde(default)]
    pub cast: BTreeMap<String, CastMember>,
    /// Ordered scenes; insertion order determines on-screen order.
    pub scenes: Vec<Scene>,
}

impl Script {
    /// Parse and validate a Script from JSON.
    ///
    /// The version literal is checked before the shape so an unsupported
    /// version yields a targeted error rather than a field-level one.
    pub fn from_json(data: &str) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_str(data)
            .map_err(|e| ScenecastError::InvalidScript(format!("invalid JSON: {e}")))?;

        match raw.get("version").and_then(|v| v.as_str()) {
            Some(SCRIPT_VERSION) => {}
            Some(other) => {
                return Err(ScenecastError::InvalidScript(format!(
                    "unsupported script version '{other}' (expected '{SCRIPT_VERSION}')"
                )))
            }
            None => {
                return Err(ScenecastError::InvalidScript(
                    "missing version field".to_string(),
                ))
            }
        }

        let script: Script = serde_json::from_value(raw)
            .map_err(|e| ScenecastError::InvalidScript(format!("malformed script: {e}")))?;
        crate::validate::validate_script(&script)?;
        Ok(script)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScenecastError::Serialization(format!("failed to serialize script: {e}")))
    }
}

/// Video-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSettings {
    /// Frames per second (> 0).
    pub fps: f64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Pause appended after each dialogue block unless overridden (seconds).
    #[serde(default)]
    pub default_pause_sec: f64,
    /// Video-level background music.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm: Option<BgmConfig>,
    /// Loudness targets handed to the media-probe collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_profile: Option<AudioProfile>,
}

/// Loudness normalization targets for BGM analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioProfile {
    pub bgm_target_lufs: f64,
    pub bgm_target_lra: f64,
    pub true_peak_db: f64,
}

/// A cast member: voice settings plus optional asset locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub voice: VoiceSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<CastAssets>,
}

/// Voice-engine binding for a cast member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSettings {
    /// Voice engine identifier (currently only "voicevox").
    pub engine: String,
    /// Engine-specific speaker id.
    pub speaker_id: u32,
}

/// On-disk asset locations for a cast member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastAssets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<String>,
}

/// A scene: an id, optional styling, and an ordered run of blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<SceneStyle>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Scene {
    /// The scene's BGM override, if any.
    pub fn bgm_override(&self) -> Option<&SceneBgmOverride> {
        self.style.as_ref().and_then(|s| s.bgm.as_ref())
    }
}

/// Per-scene styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm: Option<SceneBgmOverride>,
}

/// The smallest addressable unit of a Script.
///
/// Tagged union on `type`. Only dialogue exists today; an unrecognized tag
/// is preserved opaquely at ingress so the compiler can reject it as a
/// fatal `UnknownBlockType` instead of silently dropping frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Dialogue(DialogueBlock),
    #[serde(untagged)]
    Unknown(serde_json::Value),
}

impl Block {
    /// The serialized `type` tag of this block.
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Dialogue(_) => "dialogue",
            Self::Unknown(value) => value
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or("<missing type>"),
        }
    }
}

/// One spoken line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueBlock {
    /// Speaker id; looked up in the cast table.
    pub speaker: String,
    /// The spoken text (non-empty).
    pub text: String,
    /// Pause after the voice clip, overriding the video default (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_sec: Option<f64>,
    /// Author-assigned block id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Explicit audio key, overriding the derived `sceneId:blockIndex`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_key: Option<String>,
    /// Explicit voice file name; binds by audioSrc substring match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}
