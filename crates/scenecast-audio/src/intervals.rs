//! Talking intervals and anti-wobble stabilization.
//!
//! The envelope evaluates nearest-interval distances, which requires the
//! ducking intervals to be sorted and pairwise disjoint. Stabilization
//! guarantees that, and additionally prevents rapid envelope toggling:
//! short talking bursts are held for a minimum duration, and bursts
//! separated by small gaps are merged into one.

use scenecast_core::Frames;
use scenecast_timeline::{BgmClip, CharacterClip};

/// A half-open frame interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInterval {
    pub start: Frames,
    pub end: Frames,
}

impl FrameInterval {
    #[inline]
    pub fn new(start: Frames, end: Frames) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, frame: Frames) -> bool {
        frame >= self.start && frame < self.end
    }
}

/// Extract raw talking intervals from a character track.
pub fn talking_intervals(clips: &[CharacterClip]) -> Vec<FrameInterval> {
    clips
        .iter()
        .filter(|c| c.state.is_talking)
        .map(|c| FrameInterval::new(c.start, c.start + c.duration))
        .collect()
}

/// Stabilize talking intervals: minimum hold, then gap merging.
///
/// Each interval is first extended to at least `min_hold` frames (capped at
/// `max_end`), then intervals whose gap is at most `merge_gap` are folded
/// into one. The result is sorted and pairwise disjoint, and the operation
/// is idempotent.
pub fn stabilize(
    mut intervals: Vec<FrameInterval>,
    merge_gap: Frames,
    min_hold: Frames,
    max_end: Frames,
) -> Vec<FrameInterval> {
    intervals.sort_by_key(|iv| iv.start);

    let mut result: Vec<FrameInterval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        let held_end = (max_end).min(iv.end.max(iv.start + min_hold));
        let iv = FrameInterval::new(iv.start, held_end);
        match result.last_mut() {
            Some(last) if iv.start <= last.end + merge_gap => {
                last.end = last.end.max(iv.end);
            }
            _ => result.push(iv),
        }
    }
    result
}

/// The ducking intervals for one BGM clip: the character track's talking
/// intervals stabilized with the clip's merge-gap and min-hold windows.
pub fn ducking_intervals(
    character_clips: &[CharacterClip],
    clip: &BgmClip,
    total_frames: Frames,
) -> Vec<FrameInterval> {
    let (merge_gap, min_hold) = clip
        .ducking
        .as_ref()
        .map(|d| {
            (
                d.merge_gap_frames.unwrap_or(0),
                d.min_hold_frames.unwrap_or(0),
            )
        })
        .unwrap_or((0, 0));
    stabilize(
        talking_intervals(character_clips),
        merge_gap,
        min_hold,
        total_frames,
    )
}
