// ============================================================
// Layer 3 — Record Domain Types
// ============================================================
// The uniform shapes every corpus is normalised into:
//
//   TokenPair        — one (source, target) token id pair
//   CandidateGroup   — a shared visual sequence + one or more pairs
//   TranslationItem  — what a single dataset access hands out
//
// Visual sequences are stored as Arc<Array2<f32>> with shape
// [frames, width]. Several groups exploded from the same clip
// point at the same allocation instead of copying the features.
//
// Reference: Rust Book §5 (Structs), §15 (Rc/Arc)

use std::sync::Arc;

use ndarray::Array2;
use rand::{seq::SliceRandom, Rng};

/// Visual feature sequence, shape [frames, width].
pub type VisualFeatures = Arc<Array2<f32>>;

/// One tokenised sentence pair, both sides wrapped in BOS ... EOS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub source: Vec<u32>,
    pub target: Vec<u32>,
}

impl TokenPair {
    pub fn new(source: Vec<u32>, target: Vec<u32>) -> Self {
        Self { source, target }
    }
}

/// A resolved uniform record: optional visual sequence plus one
/// source/target pair. This is the item type of the burn Dataset.
#[derive(Debug, Clone)]
pub struct TranslationItem {
    pub visual: Option<VisualFeatures>,
    pub source: Vec<u32>,
    pub target: Vec<u32>,
}

impl TranslationItem {
    /// Number of visual frames, or None when the modality is absent.
    pub fn visual_len(&self) -> Option<usize> {
        self.visual.as_ref().map(|v| v.nrows())
    }
}

/// A visual sequence shared by a non-empty list of candidate pairs.
///
/// Immutable once built. `resolve` picks one pair per call and
/// never touches the group itself.
#[derive(Debug, Clone)]
pub struct CandidateGroup {
    visual: Option<VisualFeatures>,
    pairs:  Vec<TokenPair>,
}

impl CandidateGroup {
    /// Build a group. Returns None when `pairs` is empty, so an
    /// empty group can never exist.
    pub fn new(visual: Option<VisualFeatures>, pairs: Vec<TokenPair>) -> Option<Self> {
        if pairs.is_empty() {
            return None;
        }
        Some(Self { visual, pairs })
    }

    /// Convenience constructor for the common one-pair case.
    pub fn single(visual: Option<VisualFeatures>, pair: TokenPair) -> Self {
        Self { visual, pairs: vec![pair] }
    }

    pub fn visual(&self) -> Option<&VisualFeatures> {
        self.visual.as_ref()
    }

    pub fn pairs(&self) -> &[TokenPair] {
        &self.pairs
    }

    pub fn candidate_count(&self) -> usize {
        self.pairs.len()
    }

    /// Pick one pair uniformly at random and return it as a flat item.
    ///
    /// Singleton groups resolve to their only pair without drawing
    /// from `rng`, so they are fully deterministic.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> TranslationItem {
        let pair = if self.pairs.len() == 1 {
            &self.pairs[0]
        } else {
            // Non-empty by construction, choose() only fails on empty slices
            self.pairs.choose(rng).unwrap_or(&self.pairs[0])
        };

        TranslationItem {
            visual: self.visual.clone(),
            source: pair.source.clone(),
            target: pair.target.clone(),
        }
    }
}
