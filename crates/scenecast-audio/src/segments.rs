//! Loop-segment generation.
//!
//! A looping BGM clip is rendered as a run of overlapping segments, each
//! playing one pass over the file's loop window. Adjacent segments overlap
//! by the crossfade length; the envelope's per-segment crossfade
//! multipliers sum to one across the overlap, so the seam is inaudible.

use scenecast_core::Frames;
use scenecast_timeline::BgmClip;

/// One span of a BGM clip playing a specific region of the audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSegment {
    /// Offset of this segment from the clip's start.
    pub clip_offset: Frames,
    /// Segment length, including the crossfade overlap into the next
    /// segment (absent on the last segment).
    pub duration: Frames,
    /// Playback position within the audio file at segment start.
    pub audio_start_frame: Frames,
    /// Crossfade-in length; zero on the first segment.
    pub fade_in_frames: Frames,
    /// Crossfade-out length; zero on the last segment.
    pub fade_out_frames: Frames,
}

impl LoopSegment {
    fn single(duration: Frames) -> Self {
        Self {
            clip_offset: 0,
            duration,
            audio_start_frame: 0,
            fade_in_frames: 0,
            fade_out_frames: 0,
        }
    }
}

/// Generate the loop segments covering a clip of `clip_duration` frames over
/// an audio file of `audio_duration` frames.
///
/// The first segment plays the file from the top through the loop end; each
/// later segment replays the loop window. An out-of-range or empty window
/// silently falls back to looping the whole file.
pub fn loop_segments(
    clip_duration: Frames,
    audio_duration: Frames,
    loop_start: Option<Frames>,
    loop_end: Option<Frames>,
    crossfade: Option<Frames>,
) -> Vec<LoopSegment> {
    let (loop_start, loop_end) = effective_window(audio_duration, loop_start, loop_end);
    let window = loop_end - loop_start;
    if window == 0 {
        return vec![LoopSegment::single(clip_duration.min(audio_duration))];
    }
    let crossfade = crossfade.unwrap_or(0).min(window / 2);

    let mut segments = Vec::new();
    let mut clip_offset: Frames = 0;
    let mut is_first = true;
    while clip_offset < clip_duration {
        let audio_start = if is_first { 0 } else { loop_start };
        let pass_len = if is_first { loop_end } else { window };
        let remaining = clip_duration - clip_offset;
        let seg_duration = pass_len.min(remaining);
        if seg_duration == 0 {
            break;
        }
        let is_last = clip_offset + seg_duration >= clip_duration;
        segments.push(LoopSegment {
            clip_offset,
            duration: seg_duration + if is_last { 0 } else { crossfade },
            audio_start_frame: audio_start,
            fade_in_frames: if is_first { 0 } else { crossfade },
            fade_out_frames: if is_last { 0 } else { crossfade },
        });
        clip_offset += seg_duration;
        is_first = false;
    }
    segments
}

/// Segments for a compiled BGM clip given the asset duration, if known.
///
/// Non-looping clips (or clips whose asset duration is unknown) render as
/// one plain segment.
pub fn segments_for_clip(clip: &BgmClip, audio_duration: Option<Frames>) -> Vec<LoopSegment> {
    match audio_duration {
        Some(audio_duration) if clip.looping => loop_segments(
            clip.duration,
            audio_duration,
            clip.loop_start_frames,
            clip.loop_end_frames,
            clip.loop_crossfade_frames,
        ),
        Some(audio_duration) => vec![LoopSegment::single(clip.duration.min(audio_duration))],
        None => vec![LoopSegment::single(clip.duration)],
    }
}

/// The effective loop window `[start, end)`, falling back to the whole file
/// when the configured window is empty or out of range.
fn effective_window(
    audio_duration: Frames,
    loop_start: Option<Frames>,
    loop_end: Option<Frames>,
) -> (Frames, Frames) {
    let start = loop_start.unwrap_or(0);
    let end = loop_end.unwrap_or(audio_duration);
    if end <= start || end > audio_duration {
        (0, audio_duration)
    } else {
        (start, end)
    }
}
