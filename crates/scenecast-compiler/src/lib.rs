//! Scenecast Compiler - deterministic Script-to-Timeline compilation
//!
//! The compiler walks a validated Script scene by scene, binds dialogue
//! blocks to pre-generated voice clips, lays out audio / subtitle /
//! character tracks on the integer frame grid, plans the BGM track, and
//! emits a validated Timeline. The output is a pure function of the inputs:
//! no clocks, no randomness.

pub mod binder;
pub mod compiler;
pub mod dialogue;
pub mod planner;
pub mod resolve;

pub use compiler::{compile, compile_with_warnings, CompileInputs, CompileOutput};
pub use planner::{plan_bgm, BgmPlan, SceneSpan};
pub use resolve::{bgm_asset_id, config_key, resolve_bgm_config, ResolvedBgmConfig};
