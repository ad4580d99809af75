// ============================================================
// Layer 4 — Captioned Clip Adapter (archive-backed)
// ============================================================
// Captioned clips whose visual features live in one shared
// safetensors archive. Clip ids in the corpus carry a fixed-length
// time-window suffix the archive keys do not:
//
//   corpus id:   "Ptf_2VRj-V0_000122_000132"
//   archive key: "Ptf_2VRj-V0"              (14-char suffix stripped)
//
// The full feature sequence is used; nothing is sliced or
// subsampled. Caption handling lives in captions.rs.

use std::{path::PathBuf, sync::Arc};

use anyhow::{ensure, Context, Result};

use crate::data::adapters::captions::{build_clip_groups, read_clip_file, CaptionOptions};
use crate::data::bounds::{LengthBounds, LoadTally};
use crate::domain::record::CandidateGroup;
use crate::domain::traits::{CorpusAdapter, TextEncoder};
use crate::infra::feature_archive::FeatureArchive;

/// Default length of the time-window suffix on clip ids.
pub const CLIP_SUFFIX_LEN: usize = 14;

pub struct ClipArchiveAdapter {
    archive:    Arc<FeatureArchive>,
    suffix_len: usize,
    captions:   CaptionOptions,
    bounds:     LengthBounds,
}

impl ClipArchiveAdapter {
    pub fn new(
        archive:    Arc<FeatureArchive>,
        suffix_len: usize,
        captions:   CaptionOptions,
        bounds:     LengthBounds,
    ) -> Self {
        Self { archive, suffix_len, captions, bounds }
    }
}

/// Strip the last `suffix_len` characters of a clip id.
pub fn archive_key(clip_id: &str, suffix_len: usize) -> Result<&str> {
    let count = clip_id.chars().count();
    ensure!(
        count > suffix_len,
        "Clip id '{clip_id}' is not longer than its {suffix_len}-character suffix"
    );
    let cut = clip_id
        .char_indices()
        .nth(count - suffix_len)
        .map(|(i, _)| i)
        .unwrap_or(clip_id.len());
    Ok(&clip_id[..cut])
}

impl CorpusAdapter for ClipArchiveAdapter {
    fn name(&self) -> &'static str {
        "clip-archive"
    }

    fn load(&self, files: &[PathBuf], tokenizer: &dyn TextEncoder) -> Result<Vec<CandidateGroup>> {
        let mut groups = Vec::new();

        for path in files {
            let clips     = read_clip_file(path)?;
            let mut tally = LoadTally::default();

            for (idx, clip) in clips.iter().enumerate() {
                let key = archive_key(&clip.clip_id, self.suffix_len)
                    .with_context(|| format!("{}: item {}", path.display(), idx))?;
                let visual = self
                    .archive
                    .frames(key)
                    .with_context(|| format!("{}: item {} ('{}')", path.display(), idx, clip.clip_id))?;

                groups.extend(build_clip_groups(
                    visual, clip, tokenizer, self.captions, self.bounds, &mut tally,
                )?);
            }

            tracing::info!(
                "Loaded '{}': {} clips, {} pairs kept, {} dropped",
                path.display(),
                clips.len(),
                tally.kept,
                tally.dropped
            );
        }

        Ok(groups)
    }
}
