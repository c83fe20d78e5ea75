//! Structural validation of Script documents.
//!
//! Runs at ingress, before compilation. Only structural corruption fails
//! here; data-level problems with safe fallbacks (unbound audio, unknown
//! speakers) are left for the compiler to warn about.

use scenecast_core::{Result, ScenecastError};

use crate::bgm::{BgmSettings, DuckingSettings};
use crate::script::{Block, Script, SCRIPT_VERSION};

/// Supported voice engine identifier.
const VOICE_ENGINE: &str = "voicevox";

fn invalid(msg: impl Into<String>) -> ScenecastError {
    ScenecastError::InvalidScript(msg.into())
}

/// Validate a Script's structure.
pub fn validate_script(script: &Script) -> Result<()> {
    if script.version != SCRIPT_VERSION {
        return Err(invalid(format!(
            "unsupported script version '{}' (expected '{SCRIPT_VERSION}')",
            script.version
        )));
    }

    let video = &script.video;
    if !(video.fps > 0.0) || !video.fps.is_finite() {
        return Err(invalid(format!("video.fps must be > 0, got {}", video.fps)));
    }
    if video.width == 0 || video.height == 0 {
        return Err(invalid(format!(
            "video resolution must be non-zero, got {}x{}",
            video.width, video.height
        )));
    }
    if !(video.default_pause_sec >= 0.0) {
        return Err(invalid(format!(
            "video.defaultPauseSec must be >= 0, got {}",
            video.default_pause_sec
        )));
    }
    if let Some(bgm) = &video.bgm {
        if bgm.src.is_empty() {
            return Err(invalid("video.bgm.src must be non-empty"));
        }
        validate_bgm_settings(&bgm.settings, "video.bgm")?;
    }

    for (speaker, member) in &script.cast {
        if member.voice.engine != VOICE_ENGINE {
            return Err(invalid(format!(
                "cast['{speaker}'].voice.engine must be '{VOICE_ENGINE}', got '{}'",
                member.voice.engine
            )));
        }
    }

    if script.scenes.is_empty() {
        return Err(invalid("script must contain at least one scene"));
    }

    for scene in &script.scenes {
        if scene.id.is_empty() {
            return Err(invalid("scene id must be non-empty"));
        }
        if let Some(bgm) = scene.bgm_override() {
            if let Some(src) = &bgm.src {
                if src.is_empty() {
                    return Err(invalid(format!(
                        "scene '{}' bgm.src must be non-empty when present",
                        scene.id
                    )));
                }
            }
            if let Some(t) = bgm.transition_sec {
                if !(t >= 0.0) {
                    return Err(invalid(format!(
                        "scene '{}' bgm.transitionSec must be >= 0, got {t}",
                        scene.id
                    )));
                }
            }
            validate_bgm_settings(&bgm.settings, &format!("scene '{}' bgm", scene.id))?;
        }
        for (index, block) in scene.blocks.iter().enumerate() {
            // Unknown block types pass validation; the compiler rejects them
            // with a targeted UnknownBlockType error at dispatch.
            if let Block::Dialogue(d) = block {
                if d.text.is_empty() {
                    return Err(invalid(format!(
                        "block {index} of scene '{}' has empty text",
                        scene.id
                    )));
                }
                if let Some(p) = d.pause_sec {
                    if !(p >= 0.0) {
                        return Err(invalid(format!(
                            "block {index} of scene '{}' has negative pauseSec {p}",
                            scene.id
                        )));
                    }
                }
            }
        }
    }

    Ok(())
}

fn validate_bgm_settings(settings: &BgmSettings, at: &str) -> Result<()> {
    for (name, value) in [
        ("fadeInSec", settings.fade_in_sec),
        ("fadeOutSec", settings.fade_out_sec),
        ("loopStartSec", settings.loop_start_sec),
        ("loopEndSec", settings.loop_end_sec),
        ("loopCrossfadeSec", settings.loop_crossfade_sec),
    ] {
        if let Some(v) = value {
            if !(v >= 0.0) {
                return Err(invalid(format!("{at}.{name} must be >= 0, got {v}")));
            }
        }
    }
    if let Some(v) = settings.volume {
        if !(0.0..=1.0).contains(&v) {
            return Err(invalid(format!("{at}.volume must be in [0, 1], got {v}")));
        }
    }
    if let Some(ducking) = &settings.ducking {
        validate_ducking(ducking, at)?;
    }
    Ok(())
}

fn validate_ducking(ducking: &DuckingSettings, at: &str) -> Result<()> {
    for (name, value) in [
        ("attackSec", ducking.attack_sec),
        ("releaseSec", ducking.release_sec),
        ("mergeGapSec", ducking.merge_gap_sec),
        ("minHoldSec", ducking.min_hold_sec),
    ] {
        if let Some(v) = value {
            if !(v >= 0.0) {
                return Err(invalid(format!("{at}.ducking.{name} must be >= 0, got {v}")));
            }
        }
    }
    if let Some(v) = ducking.duck_volume {
        if !(0.0..=1.0).contains(&v) {
            return Err(invalid(format!(
                "{at}.ducking.duckVolume must be in [0, 1], got {v}"
            )));
        }
    }
    Ok(())
}
