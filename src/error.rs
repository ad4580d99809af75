// ============================================================
// Collation Errors
// ============================================================
// Contract violations raised while padding and collating a batch.
// Loading paths use anyhow; these get a typed enum because the
// batcher and its tests need to tell the cases apart.

use thiserror::Error;

/// Errors that can occur while assembling a rectangular batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// An observed length exceeds the pad length handed to the mask builder.
    #[error("sequence {index} has length {len}, longer than pad length {pad_len}")]
    MaskOverflow {
        /// Row in the batch.
        index: usize,
        /// Observed length.
        len: usize,
        /// Pad length the mask was requested for.
        pad_len: usize,
    },

    /// Some items carry visual features and some do not.
    #[error("mixed-modality batch: {with_visual} items with visual features, {without_visual} without")]
    MixedModality {
        /// Items with a visual sequence.
        with_visual: usize,
        /// Items without one.
        without_visual: usize,
    },

    /// Visual sequences in one batch disagree on embedding width.
    #[error("visual feature width mismatch at item {index}: expected {expected}, got {actual}")]
    WidthMismatch {
        /// Offending row.
        index: usize,
        /// Width of the first item.
        expected: usize,
        /// Width of the offending item.
        actual: usize,
    },

    /// Collation was asked to build a batch from zero items.
    #[error("cannot collate an empty batch")]
    EmptyBatch,
}
