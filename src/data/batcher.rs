// ============================================================
// Layer 4 — Translation Batcher
// ============================================================
// Turns a Vec<TranslationItem> into GPU-ready tensors.
//
// Collation happens in two steps:
//
//   1. collate()  — backend-free. Splits the items into three
//                   columns and pads each one independently:
//
//        visual  → [N, Lv, width] + [N, Lv] mask  (or absent)
//        source  → [N, Ls]        + [N, Ls] mask
//        target  → [N, Lt]        + [N, Lt] mask
//
//   2. Batcher::batch() — copies the padded columns into Burn
//                   tensors on the batcher's device.
//
// The visual column is skipped when no item has features. A
// batch where only some items have them is a misconfigured
// dataset and fails with MixedModality.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::padding::{pad_features, pad_ids, PaddedFeatures, PaddedIds, PAD_ID};
use crate::domain::record::{TranslationItem, VisualFeatures};
use crate::error::BatchError;

// ─── Collation ────────────────────────────────────────────────────────────────
/// A padded batch before it is turned into tensors.
#[derive(Debug, Clone)]
pub struct CollatedBatch {
    pub visual: Option<PaddedFeatures>,
    pub source: PaddedIds,
    pub target: PaddedIds,
}

impl CollatedBatch {
    pub fn batch_size(&self) -> usize {
        self.source.batch_size()
    }
}

/// Pad the three columns of `items` independently.
///
/// Items are only read; collation never filters or re-tokenises.
pub fn collate(items: &[TranslationItem]) -> Result<CollatedBatch, BatchError> {
    if items.is_empty() {
        return Err(BatchError::EmptyBatch);
    }

    let visuals: Vec<&VisualFeatures> = items.iter().filter_map(|i| i.visual.as_ref()).collect();
    let visual = match visuals.len() {
        0 => None,
        n if n == items.len() => Some(pad_features(&visuals)?),
        n => {
            return Err(BatchError::MixedModality {
                with_visual:    n,
                without_visual: items.len() - n,
            })
        }
    };

    let sources: Vec<&[u32]> = items.iter().map(|i| i.source.as_slice()).collect();
    let targets: Vec<&[u32]> = items.iter().map(|i| i.target.as_slice()).collect();

    Ok(CollatedBatch {
        visual,
        source: pad_ids(&sources, PAD_ID)?,
        target: pad_ids(&targets, PAD_ID)?,
    })
}

// ─── TranslationBatch ─────────────────────────────────────────────────────────
/// A batch ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
#[derive(Debug, Clone)]
pub struct TranslationBatch<B: Backend> {
    /// Visual features — shape: [batch_size, visual_len, width]
    pub visual: Option<Tensor<B, 3>>,

    /// 1 = real frame, 0 = padding — shape: [batch_size, visual_len]
    pub visual_mask: Option<Tensor<B, 2, Int>>,

    /// Source token ids — shape: [batch_size, source_len]
    pub source: Tensor<B, 2, Int>,

    /// 1 = real token, 0 = padding — shape: [batch_size, source_len]
    pub source_mask: Tensor<B, 2, Int>,

    /// Target token ids — shape: [batch_size, target_len]
    pub target: Tensor<B, 2, Int>,

    /// 1 = real token, 0 = padding — shape: [batch_size, target_len]
    pub target_mask: Tensor<B, 2, Int>,
}

// ─── TranslationBatcher ───────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the right
/// GPU/CPU.
#[derive(Clone, Debug)]
pub struct TranslationBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TranslationBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Collate and convert, reporting contract violations instead
    /// of panicking.
    pub fn try_batch(&self, items: &[TranslationItem]) -> Result<TranslationBatch<B>, BatchError> {
        let collated = collate(items)?;
        Ok(self.to_tensors(collated))
    }

    fn to_tensors(&self, collated: CollatedBatch) -> TranslationBatch<B> {
        let (source, source_mask) = self.id_tensors(&collated.source);
        let (target, target_mask) = self.id_tensors(&collated.target);

        let (visual, visual_mask) = match collated.visual {
            Some(v) => {
                let (n, len, width) = v.values.dim();
                let flat: Vec<f32> = v.values.into_raw_vec();
                let values = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
                    .reshape([n, len, width]);
                (Some(values), Some(self.mask_tensor(&v.mask, len)))
            }
            None => (None, None),
        };

        TranslationBatch { visual, visual_mask, source, source_mask, target, target_mask }
    }

    fn id_tensors(&self, padded: &PaddedIds) -> (Tensor<B, 2, Int>, Tensor<B, 2, Int>) {
        // Burn uses i32 for Int tensor input
        let flat: Vec<i32> = padded
            .ids
            .iter()
            .flat_map(|row| row.iter().map(|&x| x as i32))
            .collect();

        let ids = Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([padded.batch_size(), padded.pad_len]);

        (ids, self.mask_tensor(&padded.mask, padded.pad_len))
    }

    fn mask_tensor(&self, mask: &[Vec<u8>], pad_len: usize) -> Tensor<B, 2, Int> {
        let flat: Vec<i32> = mask
            .iter()
            .flat_map(|row| row.iter().map(|&m| m as i32))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([mask.len(), pad_len])
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// The DataLoader calls .batch(items) with each mini-batch of samples.
// The trait cannot return an error, so a contract violation here is
// fatal: it means the dataset mixes incompatible sources.
impl<B: Backend> Batcher<TranslationItem, TranslationBatch<B>> for TranslationBatcher<B> {
    fn batch(&self, items: Vec<TranslationItem>) -> TranslationBatch<B> {
        match self.try_batch(&items) {
            Ok(batch) => batch,
            Err(e)    => panic!("cannot collate batch of {} items: {e}", items.len()),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use ndarray::Array2;
    use std::sync::Arc;

    type TestBackend = NdArray;

    fn text_item(source: Vec<u32>, target: Vec<u32>) -> TranslationItem {
        TranslationItem { visual: None, source, target }
    }

    fn visual_item(frames: usize) -> TranslationItem {
        TranslationItem {
            visual: Some(Arc::new(Array2::from_elem((frames, 2), 1.0))),
            source: vec![2, 9, 3],
            target: vec![2, 3],
        }
    }

    #[test]
    fn test_collate_text_only_skips_visual() {
        let items = vec![
            text_item(vec![2, 4, 3], vec![2, 3]),
            text_item(vec![2, 3], vec![2, 5, 6, 7, 3]),
        ];
        let batch = collate(&items).unwrap();

        assert!(batch.visual.is_none());
        assert_eq!(batch.source.pad_len, 3);
        assert_eq!(batch.target.pad_len, 5);
        assert_eq!(batch.source.ids[1], vec![2, 3, 0]);
        assert_eq!(batch.target.mask[0], vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_collate_visual_lengths_5_3_7() {
        let items = vec![visual_item(5), visual_item(3), visual_item(7)];
        let batch = collate(&items).unwrap();

        let visual = batch.visual.unwrap();
        assert_eq!(visual.values.dim(), (3, 7, 2));
        assert_eq!(visual.mask[0], vec![1, 1, 1, 1, 1, 0, 0]);
        assert_eq!(visual.mask[1], vec![1, 1, 1, 0, 0, 0, 0]);
        assert_eq!(visual.mask[2], vec![1; 7]);
    }

    #[test]
    fn test_mixed_modality_fails() {
        let items = vec![visual_item(4), text_item(vec![2, 3], vec![2, 3])];
        assert_eq!(
            collate(&items).unwrap_err(),
            BatchError::MixedModality { with_visual: 1, without_visual: 1 }
        );
    }

    #[test]
    fn test_empty_batch_fails() {
        assert_eq!(collate(&[]).unwrap_err(), BatchError::EmptyBatch);
    }

    #[test]
    fn test_collate_leaves_items_untouched() {
        let items  = vec![visual_item(2), visual_item(4)];
        let before = items.iter().map(|i| i.visual_len()).collect::<Vec<_>>();
        let _      = collate(&items).unwrap();
        assert_eq!(items.iter().map(|i| i.visual_len()).collect::<Vec<_>>(), before);
        assert_eq!(items[0].source, vec![2, 9, 3]);
    }

    #[test]
    fn test_batcher_builds_tensors() {
        let device  = Default::default();
        let batcher = TranslationBatcher::<TestBackend>::new(device);
        let batch   = batcher.batch(vec![visual_item(5), visual_item(3)]);

        let visual = batch.visual.unwrap();
        assert_eq!(visual.dims(), [2, 5, 2]);

        let mask: Vec<i64> = batch.visual_mask.unwrap().into_data().to_vec().unwrap();
        assert_eq!(mask, vec![1, 1, 1, 1, 1, 1, 1, 1, 0, 0]);

        let values: Vec<f32> = visual.into_data().to_vec().unwrap();
        // Second item: 3 real frames then 2 zero frames
        assert_eq!(&values[10..16], &[1.0; 6]);
        assert_eq!(&values[16..], &[0.0; 4]);

        assert_eq!(batch.source.dims(), [2, 3]);
        assert_eq!(batch.target_mask.dims(), [2, 2]);
    }

    #[test]
    fn test_batcher_text_only_has_no_visual_tensors() {
        let batcher = TranslationBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(vec![
            text_item(vec![2, 7, 7, 3], vec![2, 3]),
            text_item(vec![2, 3], vec![2, 8, 3]),
        ]);

        assert!(batch.visual.is_none());
        assert!(batch.visual_mask.is_none());

        let source: Vec<i64> = batch.source.into_data().to_vec().unwrap();
        assert_eq!(source, vec![2, 7, 7, 3, 2, 3, 0, 0]);
        let target_mask: Vec<i64> = batch.target_mask.into_data().to_vec().unwrap();
        assert_eq!(target_mask, vec![1, 1, 0, 1, 1, 1]);
    }

    #[test]
    #[should_panic(expected = "mixed-modality")]
    fn test_batcher_panics_on_mixed_modality() {
        let batcher = TranslationBatcher::<TestBackend>::new(Default::default());
        let _ = batcher.batch(vec![visual_item(2), text_item(vec![2, 3], vec![2, 3])]);
    }

    #[test]
    fn test_try_batch_reports_instead_of_panicking() {
        let batcher = TranslationBatcher::<TestBackend>::new(Default::default());
        assert!(batcher.try_batch(&[]).is_err());
    }
}
