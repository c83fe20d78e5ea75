//! Scenecast Script - the authored input document
//!
//! A Script is the declarative description of a narrated video:
//! - Video settings (frame rate, resolution, default pause, BGM)
//! - A cast table mapping speaker ids to voice settings
//! - Ordered scenes of dialogue blocks
//!
//! Scripts are JSON documents (camelCase keys, version literal "0.1"),
//! validated at ingress. The audio manifest — the voice engine's list of
//! pre-generated clips — is modeled here too since it shares the Script's
//! ingress path.

pub mod bgm;
pub mod manifest;
pub mod script;
pub mod validate;

pub use bgm::{BgmConfig, BgmPreset, BgmSettings, DuckingSettings, SceneBgmOverride};
pub use manifest::AudioManifestEntry;
pub use script::{
    AudioProfile, Block, CastAssets, CastMember, DialogueBlock, Scene, SceneStyle, Script,
    VideoSettings, VoiceSettings, SCRIPT_VERSION,
};
pub use validate::validate_script;
