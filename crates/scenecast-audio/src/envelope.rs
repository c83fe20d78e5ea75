//! The per-frame BGM volume envelope.
//!
//! A pure function of (clip configuration, ducking intervals, frame). The
//! gain ladder picks between base, idle-boosted, and ducked gain; nearest-
//! interval distances drive the attack/release ramps; fades, source-change
//! transitions, and loop-segment crossfades multiply on top; the result is
//! clamped to the clip's ceiling.

use scenecast_core::gain::db_to_gain;
use scenecast_core::Frames;
use scenecast_timeline::defaults::*;
use scenecast_timeline::BgmClip;

use crate::intervals::FrameInterval;
use crate::segments::LoopSegment;

/// The three steady-state gains plus the output ceiling, in linear gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainLadder {
    /// Gain while talking state is ambiguous (ramps anchor to this).
    pub base: f64,
    /// Gain while nobody is talking.
    pub idle: f64,
    /// Gain while a speaker is talking.
    pub talk: f64,
    /// Output ceiling.
    pub max: f64,
}

/// Resolve a clip's gain ladder.
///
/// Base volume: `volumeDb` if set, else `volume`, else the default bed
/// level; multiplied by the asset's loudness-normalization gain when known.
pub fn resolve_gains(clip: &BgmClip, loudness_gain_db: Option<f64>) -> GainLadder {
    let mut base = match (clip.volume_db, clip.volume) {
        (Some(db), _) => db_to_gain(db),
        (None, Some(v)) => v.clamp(0.0, 1.0),
        (None, None) => db_to_gain(DEFAULT_BASE_DB),
    };
    if let Some(db) = loudness_gain_db {
        base *= db_to_gain(db);
    }

    let idle = base * db_to_gain(clip.idle_boost_db.unwrap_or(DEFAULT_IDLE_BOOST_DB));

    let talk = match &clip.ducking {
        Some(d) if d.enabled => {
            if let Some(delta) = d.duck_delta_db {
                base * db_to_gain(delta.clamp(-60.0, 0.0))
            } else if let Some(db) = d.duck_volume_db {
                db_to_gain(db)
            } else if let Some(v) = d.duck_volume {
                base * v.clamp(0.0, 1.0)
            } else {
                base * db_to_gain(DEFAULT_DUCK_DELTA_DB)
            }
        }
        _ => base,
    };

    let max = db_to_gain(clip.max_gain_db.unwrap_or(DEFAULT_MAX_GAIN_DB));

    GainLadder {
        base,
        idle,
        talk,
        max,
    }
}

/// Select the envelope gain for one frame: talk inside a ducking interval,
/// idle far from any, with linear attack/release ramps near boundaries.
fn envelope_gain(
    ladder: &GainLadder,
    clip: &BgmClip,
    global_frame: Frames,
    ducks: &[FrameInterval],
) -> f64 {
    if ducks.iter().any(|iv| iv.contains(global_frame)) {
        return ladder.talk;
    }

    let (attack, release) = clip
        .ducking
        .as_ref()
        .map(|d| (d.attack_frames.max(1), d.release_frames.max(1)))
        .unwrap_or((1, 1));

    // Distance to the nearest upcoming interval start and the nearest past
    // interval end.
    let to_next = ducks
        .iter()
        .filter(|iv| iv.start > global_frame)
        .map(|iv| iv.start - global_frame)
        .min();
    let since_prev = ducks
        .iter()
        .filter(|iv| iv.end <= global_frame)
        .map(|iv| global_frame - iv.end)
        .min();

    if let Some(d) = to_next {
        if d <= attack {
            let t = 1.0 - d as f64 / attack as f64;
            return ladder.idle - (ladder.idle - ladder.talk) * t;
        }
    }
    if let Some(d) = since_prev {
        let upcoming_within_attack = to_next.is_some_and(|n| n <= attack);
        if d < release && !upcoming_within_attack {
            return ladder.talk + (ladder.idle - ladder.talk) * (d as f64 / release as f64);
        }
    }
    ladder.idle
}

/// Linear ramp-in multiplier over the first `window` frames.
#[inline]
fn head_mul(pos: Frames, window: Frames) -> f64 {
    if window == 0 || pos >= window {
        1.0
    } else {
        pos as f64 / window as f64
    }
}

/// Linear ramp-out multiplier over the last `window` frames of `duration`.
#[inline]
fn tail_mul(pos: Frames, duration: Frames, window: Frames) -> f64 {
    if window == 0 {
        return 1.0;
    }
    let remaining = duration.saturating_sub(pos);
    if remaining >= window {
        1.0
    } else {
        remaining as f64 / window as f64
    }
}

/// Clip-level volume at `local_frame` (no loop-segment crossfade).
///
/// Returns a gain in `[0, maxGain]`.
pub fn clip_volume(
    clip: &BgmClip,
    loudness_gain_db: Option<f64>,
    local_frame: Frames,
    ducks: &[FrameInterval],
) -> f64 {
    let ladder = resolve_gains(clip, loudness_gain_db);
    let g = envelope_gain(&ladder, clip, clip.start + local_frame, ducks);

    let fade_in = head_mul(local_frame, clip.fade_in_frames);
    let fade_out = tail_mul(local_frame, clip.duration, clip.fade_out_frames);
    let transition_in = head_mul(local_frame, clip.transition_in_frames.unwrap_or(0));
    let transition_out = tail_mul(
        local_frame,
        clip.duration,
        clip.transition_out_frames.unwrap_or(0),
    );

    (g * fade_in * fade_out * transition_in * transition_out).clamp(0.0, ladder.max)
}

/// The loop-segment crossfade multiplier at a clip-local frame.
///
/// Zero outside the segment; ramps in over the segment's head and out over
/// its tail. Overlapping segments' multipliers sum to one across the seam.
pub fn crossfade_mul(segment: &LoopSegment, local_frame: Frames) -> f64 {
    let Some(pos) = local_frame.checked_sub(segment.clip_offset) else {
        return 0.0;
    };
    if pos >= segment.duration {
        return 0.0;
    }
    head_mul(pos, segment.fade_in_frames) * tail_mul(pos, segment.duration, segment.fade_out_frames)
}

/// Volume of one loop segment at a clip-local frame: the clip-level
/// envelope with the segment's crossfade applied on top.
pub fn segment_volume(
    clip: &BgmClip,
    loudness_gain_db: Option<f64>,
    segment: &LoopSegment,
    local_frame: Frames,
    ducks: &[FrameInterval],
) -> f64 {
    let ladder = resolve_gains(clip, loudness_gain_db);
    let g = envelope_gain(&ladder, clip, clip.start + local_frame, ducks);

    let fade_in = head_mul(local_frame, clip.fade_in_frames);
    let fade_out = tail_mul(local_frame, clip.duration, clip.fade_out_frames);
    let transition_in = head_mul(local_frame, clip.transition_in_frames.unwrap_or(0));
    let transition_out = tail_mul(
        local_frame,
        clip.duration,
        clip.transition_out_frames.unwrap_or(0),
    );
    let crossfade = crossfade_mul(segment, local_frame);

    (g * fade_in * fade_out * transition_in * transition_out * crossfade).clamp(0.0, ladder.max)
}
