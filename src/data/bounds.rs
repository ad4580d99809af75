// ============================================================
// Layer 4 — Length Bounds and Marker Wrapping
// ============================================================
// Shared normalisation helpers used by every corpus adapter:
//
//   wrap / encode_wrapped → BOS + ids + EOS
//   LengthBounds          → the one filter every adapter applies
//   LoadTally             → kept / dropped counters for logging
//
// A record survives ingestion only if
//   1 <= len(source) <= max_text_len
//   1 <= len(target) <= max_text_len
//   1 <= len(visual) <= max_video_len   (when visual is present)
//
// Anything else is dropped silently at load time and counted.

use anyhow::Result;

use crate::domain::traits::TextEncoder;

/// Longest visual sequence a record may carry.
pub const MAX_VIDEO_LEN: usize = 300;

/// Longest wrapped token sequence a record may carry.
pub const MAX_TEXT_LEN: usize = 300;

/// Inclusive upper bounds applied to every record at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub max_video_len: usize,
    pub max_text_len:  usize,
}

impl Default for LengthBounds {
    fn default() -> Self {
        Self {
            max_video_len: MAX_VIDEO_LEN,
            max_text_len:  MAX_TEXT_LEN,
        }
    }
}

impl LengthBounds {
    pub fn new(max_video_len: usize, max_text_len: usize) -> Self {
        Self { max_video_len, max_text_len }
    }

    pub fn admits_text(&self, ids: &[u32]) -> bool {
        (1..=self.max_text_len).contains(&ids.len())
    }

    pub fn admits_visual(&self, frames: usize) -> bool {
        (1..=self.max_video_len).contains(&frames)
    }

    /// Both sides of a text pair fit.
    pub fn admits_pair(&self, source: &[u32], target: &[u32]) -> bool {
        self.admits_text(source) && self.admits_text(target)
    }
}

/// BOS + ids + EOS
pub fn wrap(ids: &[u32], bos: u32, eos: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(ids.len() + 2);
    out.push(bos);
    out.extend_from_slice(ids);
    out.push(eos);
    out
}

/// Encode one sentence and wrap it in the tokenizer's markers.
pub fn encode_wrapped(tokenizer: &dyn TextEncoder, text: &str) -> Result<Vec<u32>> {
    let ids = tokenizer.encode(text)?;
    Ok(wrap(&ids, tokenizer.bos_id(), tokenizer.eos_id()))
}

/// Bulk form of `encode_wrapped`; output order matches `texts`.
pub fn encode_wrapped_batch(tokenizer: &dyn TextEncoder, texts: &[String]) -> Result<Vec<Vec<u32>>> {
    let (bos, eos) = (tokenizer.bos_id(), tokenizer.eos_id());
    let encoded    = tokenizer.encode_batch(texts)?;
    anyhow::ensure!(
        encoded.len() == texts.len(),
        "tokenizer returned {} sequences for {} inputs",
        encoded.len(),
        texts.len()
    );
    Ok(encoded.iter().map(|ids| wrap(ids, bos, eos)).collect())
}

/// Kept / dropped counters for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadTally {
    pub kept:    usize,
    pub dropped: usize,
}

impl LoadTally {
    pub fn record(&mut self, kept: bool) {
        if kept {
            self.kept += 1;
        } else {
            self.dropped += 1;
        }
    }

    pub fn merge(&mut self, other: LoadTally) {
        self.kept    += other.kept;
        self.dropped += other.dropped;
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::WordEncoder;

    #[test]
    fn test_wrap_adds_markers() {
        assert_eq!(wrap(&[7, 8], 2, 3), vec![2, 7, 8, 3]);
        assert_eq!(wrap(&[], 2, 3), vec![2, 3]);
    }

    #[test]
    fn test_text_bounds_are_inclusive() {
        let b = LengthBounds::new(10, 4);
        assert!(b.admits_text(&[2, 5, 5, 3]));
        assert!(!b.admits_text(&[2, 5, 5, 5, 3]));
        assert!(!b.admits_text(&[]));
    }

    #[test]
    fn test_visual_bounds_reject_empty() {
        let b = LengthBounds::default();
        assert!(!b.admits_visual(0));
        assert!(b.admits_visual(1));
        assert!(b.admits_visual(MAX_VIDEO_LEN));
        assert!(!b.admits_visual(MAX_VIDEO_LEN + 1));
    }

    #[test]
    fn test_encode_wrapped_batch_preserves_order() {
        let enc   = WordEncoder::default();
        let texts = vec!["a bb".to_string(), "ccc".to_string()];
        let out   = encode_wrapped_batch(&enc, &texts).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].len(), 4);
        assert_eq!(out[1].len(), 3);
        for seq in &out {
            assert_eq!(seq.first(), Some(&2));
            assert_eq!(seq.last(), Some(&3));
        }
    }

    #[test]
    fn test_tally_counts() {
        let mut t = LoadTally::default();
        t.record(true);
        t.record(false);
        t.record(true);
        t.merge(LoadTally { kept: 1, dropped: 1 });
        assert_eq!(t, LoadTally { kept: 3, dropped: 2 });
    }
}
