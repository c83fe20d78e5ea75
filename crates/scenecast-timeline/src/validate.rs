//! Structural validation of emitted Timelines.
//!
//! The compiler validates its own output before returning it; a failure
//! here is a compiler bug, not a data problem. Also usable standalone on
//! deserialized Timeline documents.

use scenecast_core::{Frames, Result, ScenecastError};

use crate::timeline::{Timeline, Track, TIMELINE_VERSION};

fn invalid(msg: impl Into<String>) -> ScenecastError {
    ScenecastError::InvalidTimeline(msg.into())
}

/// Validate a Timeline's structure.
///
/// Checks the version literal, track ordering, clip ordering and overlap
/// rules, asset references, and the totalFrames bound. BGM clips are
/// allowed to overlap (source-change crossfades) but must stay in start
/// order.
pub fn validate_timeline(timeline: &Timeline) -> Result<()> {
    if timeline.version != TIMELINE_VERSION {
        return Err(invalid(format!(
            "unsupported timeline version '{}' (expected '{TIMELINE_VERSION}')",
            timeline.version
        )));
    }
    if !(timeline.meta.fps > 0.0) || !timeline.meta.fps.is_finite() {
        return Err(invalid(format!(
            "meta.fps must be > 0, got {}",
            timeline.meta.fps
        )));
    }

    let expected_order: &[&str] = &["audio", "subtitle", "character", "bgm"];
    let tags: Vec<&str> = timeline.tracks.iter().map(Track::type_tag).collect();
    let mut cursor = 0usize;
    for tag in &tags {
        match expected_order[cursor..].iter().position(|t| t == tag) {
            Some(offset) => cursor += offset + 1,
            None => {
                return Err(invalid(format!(
                    "tracks out of order: got [{}], expected a subsequence of [{}]",
                    tags.join(", "),
                    expected_order.join(", ")
                )))
            }
        }
    }

    let total = timeline.meta.total_frames;
    for track in &timeline.tracks {
        match track {
            Track::Audio { clips } => {
                let spans: Vec<(Frames, Frames)> =
                    clips.iter().map(|c| (c.start, c.duration)).collect();
                check_sequential(&spans, total, "audio")?;
                for clip in clips {
                    if !timeline.assets.audio.contains_key(&clip.asset_id) {
                        return Err(invalid(format!(
                            "audio clip references unknown asset '{}'",
                            clip.asset_id
                        )));
                    }
                }
            }
            Track::Subtitle { clips } => {
                let spans: Vec<(Frames, Frames)> =
                    clips.iter().map(|c| (c.start, c.duration)).collect();
                check_sequential(&spans, total, "subtitle")?;
            }
            Track::Character { clips } => {
                let spans: Vec<(Frames, Frames)> =
                    clips.iter().map(|c| (c.start, c.duration)).collect();
                check_sequential(&spans, total, "character")?;
            }
            Track::Bgm { clips } => {
                let bgm_assets = timeline.assets.bgm.as_ref();
                let mut prev_start: Option<Frames> = None;
                for clip in clips {
                    if clip.duration == 0 {
                        return Err(invalid(format!(
                            "bgm clip at frame {} has zero duration",
                            clip.start
                        )));
                    }
                    if let Some(prev) = prev_start {
                        if clip.start < prev {
                            return Err(invalid(format!(
                                "bgm clips out of order at frame {}",
                                clip.start
                            )));
                        }
                    }
                    prev_start = Some(clip.start);
                    let known = bgm_assets.is_some_and(|a| a.contains_key(&clip.asset_id));
                    if !known {
                        return Err(invalid(format!(
                            "bgm clip references unknown asset '{}'",
                            clip.asset_id
                        )));
                    }
                }
            }
        }
    }

    if let Some(bgm_assets) = &timeline.assets.bgm {
        for (id, asset) in bgm_assets {
            if asset.duration_frames == Some(0) {
                return Err(invalid(format!("bgm asset '{id}' has zero duration")));
            }
            if let Some(db) = asset.loudness_gain_db {
                if !(-12.0..=12.0).contains(&db) {
                    return Err(invalid(format!(
                        "bgm asset '{id}' loudnessGainDb {db} outside [-12, +12]"
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Non-overlapping, in-order, positive-duration clips that end within the
/// timeline.
fn check_sequential(spans: &[(Frames, Frames)], total: Frames, track: &str) -> Result<()> {
    let mut prev_end: Frames = 0;
    for &(start, duration) in spans {
        if duration == 0 {
            return Err(invalid(format!(
                "{track} clip at frame {start} has zero duration"
            )));
        }
        if start < prev_end {
            return Err(invalid(format!(
                "{track} clip at frame {start} overlaps the previous clip (ends {prev_end})"
            )));
        }
        let end = start + duration;
        if end > total {
            return Err(invalid(format!(
                "{track} clip ends at frame {end}, past totalFrames {total}"
            )));
        }
        prev_end = end;
    }
    Ok(())
}
