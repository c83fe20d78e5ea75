//! Scenecast Timeline - the frame-precise edit plan
//!
//! A Timeline is the compiler's output: asset tables plus ordered tracks of
//! clips, every position and duration an integer frame count. It is a JSON
//! document (camelCase keys, version literal "0.1") validated at egress and
//! consumed by a downstream renderer.

pub mod bgm_clip;
pub mod timeline;
pub mod validate;

pub use bgm_clip::{defaults, BgmClip, BgmDucking};
pub use timeline::{
    AssetTable, AudioAsset, AudioClip, BgmAsset, CharacterClip, CharacterState, SubtitleClip,
    Timeline, TimelineMeta, Track, TIMELINE_VERSION,
};
pub use validate::validate_timeline;
