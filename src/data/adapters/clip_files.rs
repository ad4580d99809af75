// ============================================================
// Layer 4 — Captioned Clip Adapter (file-backed)
// ============================================================
// Same corpus format as the archive-backed adapter, but every
// clip's features come from its own .npy file, named after the
// full clip id (no suffix stripping).
//
// Offline-extracted features are denser than the archive's, so
// the loaded sequence is subsampled to every `frame_stride`-th
// frame before the length filter sees it:
//
//   frames 0..1200, stride 4 → frames 0, 4, 8, ... (300 frames)

use std::path::PathBuf;

use anyhow::{Context, Result};
use ndarray::{Array2, Axis, Slice};

use crate::data::adapters::captions::{build_clip_groups, read_clip_file, CaptionOptions};
use crate::data::bounds::{LengthBounds, LoadTally};
use crate::domain::record::CandidateGroup;
use crate::domain::traits::{CorpusAdapter, TextEncoder};
use crate::infra::clip_store::ClipStore;

/// Default subsampling stride for file-backed clip features.
pub const FRAME_STRIDE: usize = 4;

pub struct ClipFilesAdapter {
    store:        ClipStore,
    frame_stride: usize,
    captions:     CaptionOptions,
    bounds:       LengthBounds,
}

impl ClipFilesAdapter {
    /// A stride of zero is treated as one (no subsampling).
    pub fn new(
        store:        ClipStore,
        frame_stride: usize,
        captions:     CaptionOptions,
        bounds:       LengthBounds,
    ) -> Self {
        Self { store, frame_stride: frame_stride.max(1), captions, bounds }
    }
}

/// Every `stride`-th row, starting with the first.
pub fn subsample(frames: &Array2<f32>, stride: usize) -> Array2<f32> {
    let step = stride.max(1) as isize;
    frames.slice_axis(Axis(0), Slice::new(0, None, step)).to_owned()
}

impl CorpusAdapter for ClipFilesAdapter {
    fn name(&self) -> &'static str {
        "clip-files"
    }

    fn load(&self, files: &[PathBuf], tokenizer: &dyn TextEncoder) -> Result<Vec<CandidateGroup>> {
        let mut groups = Vec::new();

        for path in files {
            let clips     = read_clip_file(path)?;
            let mut tally = LoadTally::default();

            for (idx, clip) in clips.iter().enumerate() {
                let raw = self
                    .store
                    .load(&clip.clip_id)
                    .with_context(|| format!("{}: item {}", path.display(), idx))?;
                let visual = subsample(&raw, self.frame_stride);

                groups.extend(build_clip_groups(
                    visual, clip, tokenizer, self.captions, self.bounds, &mut tally,
                )?);
            }

            tracing::info!(
                "Loaded '{}' from '{}': {} clips, {} pairs kept, {} dropped",
                path.display(),
                self.store.dir().display(),
                clips.len(),
                tally.kept,
                tally.dropped
            );
        }

        Ok(groups)
    }
}
