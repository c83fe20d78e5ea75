//! Scenecast Audio - render-time BGM gain computation
//!
//! Everything here is a pure function of the Timeline:
//! - Talking-interval extraction and anti-wobble stabilization
//! - Loop-segment generation with crossfade overlap
//! - The per-frame volume envelope (base/idle/talk selection,
//!   attack/release smoothing, fades, transitions, loop crossfade)

pub mod envelope;
pub mod intervals;
pub mod segments;

pub use envelope::{clip_volume, crossfade_mul, resolve_gains, segment_volume, GainLadder};
pub use intervals::{ducking_intervals, stabilize, talking_intervals, FrameInterval};
pub use segments::{loop_segments, segments_for_clip, LoopSegment};
