//! Binding dialogue blocks to audio-manifest entries.
//!
//! Binding order: explicit file name (equal to or a substring of an entry's
//! audioSrc), then audio key (the block's explicit key, falling back to the
//! derived `sceneId:blockIndex`). Never by text — duplicate lines share
//! texts, and a text match would bind them interchangeably.

use scenecast_script::{AudioManifestEntry, DialogueBlock};

/// The derived binding key for a block at `block_index` within a scene.
pub fn expected_audio_key(scene_id: &str, block_index: usize) -> String {
    format!("{scene_id}:{block_index}")
}

/// Find the manifest entry a dialogue block binds to, if any.
pub fn bind_entry<'m>(
    manifest: &'m [AudioManifestEntry],
    block: &DialogueBlock,
    expected_key: &str,
) -> Option<&'m AudioManifestEntry> {
    if let Some(file_name) = &block.file_name {
        if let Some(entry) = manifest
            .iter()
            .find(|e| e.audio_src.contains(file_name.as_str()))
        {
            return Some(entry);
        }
    }
    let key = block.audio_key.as_deref().unwrap_or(expected_key);
    manifest.iter().find(|e| e.audio_key == key)
}
