// ============================================================
// Layer 4 — Captioned Clip Helpers
// ============================================================
// Logic shared by the two captioned-clip adapters. They differ
// only in where a clip's visual sequence comes from; the caption
// handling below is identical:
//
//   1. keep the last `captions_per_clip` captions of each language
//   2. tokenise each language in one bulk call, wrap in BOS/EOS
//   3. zip source and target positionally (shorter side wins)
//   4. length-filter every pair against the shared visual sequence
//   5. emit groups according to CandidateMode
//
// Corpus file format: one JSON array for the whole file.
//
//   [
//     { "videoID": "...", "enCap": ["..", ..], "chCap": ["..", ..] },
//     ...
//   ]

use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use anyhow::{Context, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::data::bounds::{encode_wrapped_batch, LengthBounds, LoadTally};
use crate::domain::record::{CandidateGroup, TokenPair};
use crate::domain::traits::TextEncoder;

/// Default number of trailing captions kept per language.
pub const CAPTIONS_PER_CLIP: usize = 5;

/// How a clip's surviving caption pairs become dataset entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateMode {
    /// One single-pair group per caption pair. Every pair is seen
    /// once per epoch and resolution is a no-op.
    #[default]
    Explode,
    /// One group per clip holding all surviving pairs; a fresh
    /// pair is drawn on every access.
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionOptions {
    pub captions_per_clip: usize,
    pub mode:              CandidateMode,
}

impl Default for CaptionOptions {
    fn default() -> Self {
        Self { captions_per_clip: CAPTIONS_PER_CLIP, mode: CandidateMode::Explode }
    }
}

/// One entry of a captioned-clip corpus file.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionedClip {
    #[serde(rename = "videoID")]
    pub clip_id:         String,
    #[serde(rename = "enCap")]
    pub source_captions: Vec<String>,
    #[serde(rename = "chCap")]
    pub target_captions: Vec<String>,
}

/// Parse a whole captioned-clip corpus file.
pub fn read_clip_file(path: &Path) -> Result<Vec<CaptionedClip>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open corpus file '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Malformed captioned-clip corpus '{}'", path.display()))
}

/// The last `n` entries of `items` (all of them if there are fewer).
pub fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// Turn one clip and its captions into dataset entries.
///
/// Every caption pair is counted in `tally`, whether it is kept or
/// dropped. A clip whose visual sequence fails the bound drops all
/// of its pairs without tokenising them.
pub fn build_clip_groups(
    visual:    Array2<f32>,
    clip:      &CaptionedClip,
    tokenizer: &dyn TextEncoder,
    options:   CaptionOptions,
    bounds:    LengthBounds,
    tally:     &mut LoadTally,
) -> Result<Vec<CandidateGroup>> {
    let sources = last_n(&clip.source_captions, options.captions_per_clip);
    let targets = last_n(&clip.target_captions, options.captions_per_clip);
    let n_pairs = sources.len().min(targets.len());

    if !bounds.admits_visual(visual.nrows()) {
        tally.dropped += n_pairs;
        tracing::debug!(
            "Clip '{}' dropped: {} frames outside bounds",
            clip.clip_id,
            visual.nrows()
        );
        return Ok(Vec::new());
    }

    let sources = encode_wrapped_batch(tokenizer, sources)?;
    let targets = encode_wrapped_batch(tokenizer, targets)?;

    let mut kept = Vec::with_capacity(n_pairs);
    for (source, target) in sources.into_iter().zip(targets) {
        let ok = bounds.admits_pair(&source, &target);
        tally.record(ok);
        if ok {
            kept.push(TokenPair::new(source, target));
        }
    }

    if kept.is_empty() {
        if n_pairs > 0 {
            tracing::warn!("Clip '{}' kept no caption pair", clip.clip_id);
        }
        return Ok(Vec::new());
    }

    let visual = Arc::new(visual);
    let groups = match options.mode {
        CandidateMode::Explode => kept
            .into_iter()
            .map(|pair| CandidateGroup::single(Some(visual.clone()), pair))
            .collect(),
        CandidateMode::Group => CandidateGroup::new(Some(visual), kept).into_iter().collect(),
    };

    Ok(groups)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{words, WordEncoder};

    fn clip(n_src: usize, n_tgt: usize) -> CaptionedClip {
        CaptionedClip {
            clip_id:         "clip".into(),
            source_captions: (0..n_src).map(|i| words(i + 1)).collect(),
            target_captions: (0..n_tgt).map(|i| words(i + 1)).collect(),
        }
    }

    #[test]
    fn test_last_n() {
        let v = [1, 2, 3, 4, 5, 6, 7];
        assert_eq!(last_n(&v, 5), &[3, 4, 5, 6, 7]);
        assert_eq!(last_n(&v[..2], 5), &[1, 2]);
    }

    #[test]
    fn test_seven_captions_keep_last_five_as_one_group() {
        let enc     = WordEncoder::default();
        let options = CaptionOptions { mode: CandidateMode::Group, ..Default::default() };
        let mut t   = LoadTally::default();

        let groups = build_clip_groups(
            Array2::zeros((4, 2)), &clip(7, 7), &enc, options, LengthBounds::default(), &mut t,
        )
        .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].candidate_count(), 5);
        // Captions 3..=7 survive: 3 words + BOS/EOS is the shortest
        assert_eq!(groups[0].pairs()[0].source.len(), 5);
        assert_eq!(groups[0].pairs()[4].source.len(), 9);
        assert_eq!(t, LoadTally { kept: 5, dropped: 0 });
    }

    #[test]
    fn test_explode_shares_visual() {
        let enc    = WordEncoder::default();
        let mut t  = LoadTally::default();
        let groups = build_clip_groups(
            Array2::zeros((4, 2)), &clip(3, 3), &enc,
            CaptionOptions::default(), LengthBounds::default(), &mut t,
        )
        .unwrap();

        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.candidate_count() == 1));
        let first = groups[0].visual().unwrap();
        assert!(groups.iter().all(|g| Arc::ptr_eq(first, g.visual().unwrap())));
    }

    #[test]
    fn test_uneven_caption_lists_zip_to_shorter() {
        let enc    = WordEncoder::default();
        let mut t  = LoadTally::default();
        let groups = build_clip_groups(
            Array2::zeros((4, 2)), &clip(5, 2), &enc,
            CaptionOptions::default(), LengthBounds::default(), &mut t,
        )
        .unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_long_pairs_filtered_individually() {
        let enc    = WordEncoder::default();
        let mut t  = LoadTally::default();
        // Max text length 5 admits captions of up to 3 words
        let bounds = LengthBounds::new(300, 5);
        let groups = build_clip_groups(
            Array2::zeros((4, 2)), &clip(5, 5), &enc,
            CaptionOptions::default(), bounds, &mut t,
        )
        .unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(t, LoadTally { kept: 3, dropped: 2 });
    }

    #[test]
    fn test_empty_visual_drops_whole_clip() {
        let enc    = WordEncoder::default();
        let mut t  = LoadTally::default();
        let groups = build_clip_groups(
            Array2::zeros((0, 2)), &clip(5, 5), &enc,
            CaptionOptions::default(), LengthBounds::default(), &mut t,
        )
        .unwrap();
        assert!(groups.is_empty());
        assert_eq!(t.dropped, 5);
        assert!(enc.recorded_batches().is_empty());
    }
}
