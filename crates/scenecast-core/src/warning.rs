//! Compile warnings.
//!
//! Recoverable, data-driven problems the compiler degrades around instead of
//! aborting. Each warning is logged at the emission site and collected on
//! the compile output so callers and tests can inspect them.

use std::fmt;

/// A recoverable problem encountered during compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileWarning {
    /// A dialogue block had no manifest match; a 2-second placeholder clip
    /// with a synthesized file name was emitted instead.
    UnboundAudio {
        scene_id: String,
        block_index: usize,
        audio_key: String,
    },
    /// A dialogue block's speaker is not present in the cast table.
    UnknownSpeaker { scene_id: String, speaker: String },
    /// A BGM clip wants to loop but the duration map has no entry for its
    /// asset; looping is disabled for clips referencing it.
    MissingBgmDuration { asset_id: String, src: String },
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundAudio {
                scene_id,
                block_index,
                audio_key,
            } => write!(
                f,
                "no voice clip bound for block {block_index} of scene '{scene_id}' \
                 (audio key '{audio_key}'); using 2s placeholder"
            ),
            Self::UnknownSpeaker { scene_id, speaker } => {
                write!(f, "speaker '{speaker}' in scene '{scene_id}' is not in the cast")
            }
            Self::MissingBgmDuration { asset_id, src } => write!(
                f,
                "no duration known for BGM asset {asset_id} ('{src}'); looping disabled"
            ),
        }
    }
}
