// ============================================================
// Layer 4 — Alignment Corpus Adapter
// ============================================================
// Movie-description alignment data. Each line of a label file
// is one JSON object naming a movie, a time window, and the
// sentence pair spoken/described in that window:
//
//   {"movie": "tt0120338", "ext_timestamps": [12.4, 17.9],
//    "en_sentence": "...", "zh_sentence": "..."}
//
// The movie's dense per-frame features come from a shared
// FeatureArchive opened once for the whole corpus. Timestamps are
// coarse units (seconds); the archive is sampled at
// `frames_per_unit` frames per unit (5 by default), so
//
//   frames = archive[movie][trunc(5 * 12.4) .. trunc(5 * 17.9)]
//          = archive[movie][62 .. 89]
//
// One sentence pair per record; there are no candidate groups.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::bounds::{encode_wrapped, LengthBounds, LoadTally};
use crate::domain::record::{CandidateGroup, TokenPair};
use crate::domain::traits::{CorpusAdapter, TextEncoder};
use crate::infra::feature_archive::FeatureArchive;

/// Archive frames per corpus time unit.
pub const FRAMES_PER_UNIT: f64 = 5.0;

/// One line of an alignment label file.
#[derive(Debug, Clone, Deserialize)]
struct AlignmentLabel {
    #[serde(rename = "movie")]
    media_id: String,
    #[serde(rename = "ext_timestamps")]
    window:   (f64, f64),
    #[serde(rename = "en_sentence")]
    source:   String,
    #[serde(rename = "zh_sentence")]
    target:   String,
}

pub struct AlignmentAdapter {
    archive:         Arc<FeatureArchive>,
    frames_per_unit: f64,
    bounds:          LengthBounds,
}

impl AlignmentAdapter {
    pub fn new(archive: Arc<FeatureArchive>, frames_per_unit: f64, bounds: LengthBounds) -> Self {
        Self { archive, frames_per_unit, bounds }
    }
}

/// Timestamp → frame index, truncating toward zero.
/// Negative (and NaN) results clamp to frame 0.
pub fn frame_index(timestamp: f64, frames_per_unit: f64) -> usize {
    let frame = (frames_per_unit * timestamp).trunc();
    if frame > 0.0 { frame as usize } else { 0 }
}

impl CorpusAdapter for AlignmentAdapter {
    fn name(&self) -> &'static str {
        "alignment"
    }

    fn load(&self, files: &[PathBuf], tokenizer: &dyn TextEncoder) -> Result<Vec<CandidateGroup>> {
        let mut groups = Vec::new();

        for path in files {
            let file = File::open(path)
                .with_context(|| format!("Cannot open label file '{}'", path.display()))?;
            let mut tally = LoadTally::default();

            for (idx, line) in BufReader::new(file).lines().enumerate() {
                let line = line.with_context(|| format!("{}:{}", path.display(), idx + 1))?;
                if line.trim().is_empty() {
                    continue;
                }

                let label: AlignmentLabel = serde_json::from_str(&line)
                    .with_context(|| format!("{}:{}: malformed label", path.display(), idx + 1))?;

                let start  = frame_index(label.window.0, self.frames_per_unit);
                let end    = frame_index(label.window.1, self.frames_per_unit);
                let visual = self
                    .archive
                    .slice_frames(&label.media_id, start..end)
                    .with_context(|| format!("{}:{}", path.display(), idx + 1))?;

                let source = encode_wrapped(tokenizer, &label.source)?;
                let target = encode_wrapped(tokenizer, &label.target)?;

                let ok = self.bounds.admits_visual(visual.nrows())
                    && self.bounds.admits_pair(&source, &target);
                tally.record(ok);

                if ok {
                    groups.push(CandidateGroup::single(
                        Some(Arc::new(visual)),
                        TokenPair::new(source, target),
                    ));
                }
            }

            tracing::info!(
                "Loaded '{}': {} records kept, {} dropped",
                path.display(),
                tally.kept,
                tally.dropped
            );
        }

        Ok(groups)
    }
}
