//! The audio manifest: the voice engine's list of pre-generated clips.
//!
//! An out-of-band input, not part of the Script. Dialogue blocks bind to
//! entries by stable key (`sceneId:blockIndex`) or explicit file name —
//! never by text, since duplicate lines share texts.

use scenecast_core::{Result, ScenecastError};
use serde::{Deserialize, Serialize};

/// One pre-generated voice clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioManifestEntry {
    /// Stable binding key, `sceneId:blockIndex`.
    pub audio_key: String,
    /// Voice-engine speaker id the clip was generated with.
    pub speaker_id: u32,
    /// The text that was synthesized. Informational only; never used for
    /// binding.
    pub text: String,
    /// Path of the generated audio file.
    pub audio_src: String,
    /// Measured clip duration (≥ 0).
    pub duration_in_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Parse a manifest from its JSON array form.
pub fn manifest_from_json(data: &str) -> Result<Vec<AudioManifestEntry>> {
    serde_json::from_str(data)
        .map_err(|e| ScenecastError::InvalidScript(format!("malformed audio manifest: {e}")))
}
