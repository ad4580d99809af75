// Shared fixtures for the data-layer tests.

use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use ndarray::{Array2, Array3};
use safetensors::{tensor::TensorView, Dtype};

use crate::domain::traits::TextEncoder;

/// Word-level encoder: one id per whitespace-separated word.
///
/// Ids are derived from the word bytes so the same text always
/// encodes the same way. Every bulk call records its size.
#[derive(Default)]
pub struct WordEncoder {
    pub batch_sizes: Mutex<Vec<usize>>,
}

impl WordEncoder {
    pub fn recorded_batches(&self) -> Vec<usize> {
        self.batch_sizes.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl TextEncoder for WordEncoder {
    fn bos_id(&self) -> u32 {
        2
    }

    fn eos_id(&self) -> u32 {
        3
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text
            .split_whitespace()
            .map(|w| 4 + w.bytes().map(u32::from).sum::<u32>() % 1000)
            .collect())
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<u32>>> {
        if let Ok(mut sizes) = self.batch_sizes.lock() {
            sizes.push(texts.len());
        }
        texts.iter().map(|t| self.encode(t)).collect()
    }
}

/// `n` words separated by spaces.
pub fn words(n: usize) -> String {
    vec!["w"; n].join(" ")
}

/// Frames whose rows are filled with their own index, so slices
/// can be checked by value.
pub fn indexed_frames(frames: usize, width: usize) -> Array2<f32> {
    Array2::from_shape_fn((frames, width), |(r, _)| r as f32)
}

/// Write a safetensors archive with one F32 tensor per key.
pub fn write_archive(path: &Path, entries: &[(&str, Array2<f32>)]) {
    let bytes: Vec<(String, Vec<u8>, Vec<usize>)> = entries
        .iter()
        .map(|(k, a)| {
            let data: Vec<u8> = a.iter().flat_map(|v| v.to_le_bytes()).collect();
            (k.to_string(), data, vec![a.nrows(), a.ncols()])
        })
        .collect();

    let views: Vec<(String, TensorView<'_>)> = bytes
        .iter()
        .map(|(k, data, shape)| {
            (k.clone(), TensorView::new(Dtype::F32, shape.clone(), data).unwrap())
        })
        .collect();

    safetensors::serialize_to_file(views, &None, path).unwrap();
}

/// Write one clip feature file with the leading batch axis.
pub fn write_clip(dir: &Path, clip_id: &str, frames: &Array2<f32>) {
    let with_batch: Array3<f32> = frames.clone().insert_axis(ndarray::Axis(0));
    ndarray_npy::write_npy(dir.join(format!("{clip_id}.npy")), &with_batch).unwrap();
}
