// ============================================================
// Layer 4 — Rectangular Padding
// ============================================================
// Turns a batch of variable-length sequences into one
// rectangular block plus a validity mask.
//
//   token ids:        N sequences → [N, L]          padded with PAD
//   visual features:  N sequences → [N, L, width]   padded with 0.0
//
// L is always the longest sequence in the batch, so the mask
// builder can never overflow when called from here.
//
// Inputs are only read. The output block is allocated once and
// filled row by row, so no zero-vector is ever shared between
// padded positions.
//
// Reference: Burn Book §4 (Batcher)
//            ndarray documentation (slicing, assign)

use ndarray::{s, Array2, Array3};

use crate::data::masking::generate_mask;
use crate::error::BatchError;

/// Reserved padding id for token sequences.
pub const PAD_ID: u32 = 0;

/// Padded token ids for one text column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedIds {
    /// Row-major [batch_size, pad_len] ids
    pub ids:     Vec<Vec<u32>>,
    /// [batch_size, pad_len] 1/0 mask
    pub mask:    Vec<Vec<u8>>,
    pub pad_len: usize,
}

impl PaddedIds {
    pub fn batch_size(&self) -> usize {
        self.ids.len()
    }
}

/// Padded visual features for the visual column.
#[derive(Debug, Clone)]
pub struct PaddedFeatures {
    /// [batch_size, pad_len, width]
    pub values:  Array3<f32>,
    /// [batch_size, pad_len] 1/0 mask
    pub mask:    Vec<Vec<u8>>,
    pub pad_len: usize,
}

impl PaddedFeatures {
    pub fn width(&self) -> usize {
        self.values.dim().2
    }
}

/// Right-pad every sequence to the longest one with `pad`.
pub fn pad_ids<S: AsRef<[u32]>>(seqs: &[S], pad: u32) -> Result<PaddedIds, BatchError> {
    if seqs.is_empty() {
        return Err(BatchError::EmptyBatch);
    }

    let lens: Vec<usize> = seqs.iter().map(|s| s.as_ref().len()).collect();
    let pad_len          = lens.iter().copied().max().unwrap_or(0);
    let mask             = generate_mask(pad_len, &lens)?;

    let ids = seqs
        .iter()
        .map(|s| {
            let s       = s.as_ref();
            let mut row = Vec::with_capacity(pad_len);
            row.extend_from_slice(s);
            row.resize(pad_len, pad);
            row
        })
        .collect();

    Ok(PaddedIds { ids, mask, pad_len })
}

/// Right-pad [frames, width] sequences with zero vectors.
///
/// Every sequence must share the width of the first one.
pub fn pad_features<S: AsRef<Array2<f32>>>(seqs: &[S]) -> Result<PaddedFeatures, BatchError> {
    let first = seqs.first().ok_or(BatchError::EmptyBatch)?.as_ref();
    let width = first.ncols();

    let mut lens = Vec::with_capacity(seqs.len());
    for (index, seq) in seqs.iter().enumerate() {
        let seq = seq.as_ref();
        if seq.ncols() != width {
            return Err(BatchError::WidthMismatch {
                index,
                expected: width,
                actual:   seq.ncols(),
            });
        }
        lens.push(seq.nrows());
    }

    let pad_len = lens.iter().copied().max().unwrap_or(0);
    let mask    = generate_mask(pad_len, &lens)?;

    // Zero-filled block; each row's prefix is overwritten with its frames
    let mut values = Array3::<f32>::zeros((seqs.len(), pad_len, width));
    for (i, seq) in seqs.iter().enumerate() {
        let seq = seq.as_ref();
        values.slice_mut(s![i, ..seq.nrows(), ..]).assign(seq);
    }

    Ok(PaddedFeatures { values, mask, pad_len })
}
