// ============================================================
// Layer 4 — Sequence Masking
// ============================================================
// Builds the validity grid that travels with every padded field.
//
//   lens    = [3, 1, 2], pad_len = 3
//   mask    = [[1, 1, 1],
//              [1, 0, 0],
//              [1, 1, 0]]
//
// Position (i, j) is 1 iff j < lens[i]. Callers pass
// pad_len = max(lens), so an overflow means the caller padded
// against the wrong batch and is reported as MaskOverflow.

use crate::error::BatchError;

/// Build an N × pad_len mask of 1 (real) / 0 (padding).
pub fn generate_mask(pad_len: usize, lens: &[usize]) -> Result<Vec<Vec<u8>>, BatchError> {
    lens.iter()
        .enumerate()
        .map(|(index, &len)| {
            if len > pad_len {
                return Err(BatchError::MaskOverflow { index, len, pad_len });
            }
            let mut row = vec![1u8; len];
            row.resize(pad_len, 0);
            Ok(row)
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_marks_prefix_valid() {
        let mask = generate_mask(3, &[3, 1, 2]).unwrap();
        assert_eq!(mask, vec![vec![1, 1, 1], vec![1, 0, 0], vec![1, 1, 0]]);
    }

    #[test]
    fn test_mask_overflow_is_an_error() {
        let err = generate_mask(2, &[1, 3]).unwrap_err();
        assert_eq!(err, BatchError::MaskOverflow { index: 1, len: 3, pad_len: 2 });
    }

    #[test]
    fn test_empty_batch_gives_empty_mask() {
        assert!(generate_mask(4, &[]).unwrap().is_empty());
    }
}
