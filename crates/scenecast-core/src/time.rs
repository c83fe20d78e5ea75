//! The integer frame grid.
//!
//! Frame positions are the canonical time unit of a Timeline. Second-valued
//! inputs (voice durations, pauses, fades) are converted exactly once at
//! ingress via `ceil(seconds × fps)` and stay integral from then on.

/// A frame count or frame position on the timeline grid.
pub type Frames = u64;

/// Convert seconds to frames, rounding up to the next whole frame.
///
/// Negative or non-finite inputs map to zero frames.
#[inline]
pub fn sec_to_frames(seconds: f64, fps: f64) -> Frames {
    if !seconds.is_finite() || !fps.is_finite() || seconds <= 0.0 || fps <= 0.0 {
        return 0;
    }
    (seconds * fps).ceil() as Frames
}

/// Convert a frame count back to seconds.
#[inline]
pub fn frames_to_sec(frames: Frames, fps: f64) -> f64 {
    if fps <= 0.0 {
        return 0.0;
    }
    frames as f64 / fps
}
