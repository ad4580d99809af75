// ============================================================
// Layer 6 — Feature Archive
// ============================================================
// Read-only, key-addressed store of dense per-item features.
//
// On disk the archive is a single safetensors file. Every key is
// one 2-D F32 tensor with shape [frames, width]:
//
//   "tt0120338" → [183_412, 768]
//   "tt0133093" → [150_220, 768]
//
// The whole file is read into memory once when the archive is
// opened. Opening also indexes every key's byte offset and
// shape, so later lookups never re-parse the header.
//
// Rows are stored row-major, so a contiguous frame range is a
// contiguous byte range and can be copied out without touching
// the rest of the tensor.
//
// Reference: safetensors crate documentation
//            Rust Book §8 (HashMap)

use std::{collections::HashMap, fs, ops::Range, path::Path};

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use safetensors::{Dtype, SafeTensors};

const F32_BYTES: usize = std::mem::size_of::<f32>();

/// Where one key's rows live inside the in-memory file.
#[derive(Debug, Clone, Copy)]
struct Entry {
    offset: usize,
    frames: usize,
    width:  usize,
}

pub struct FeatureArchive {
    bytes:   Vec<u8>,
    entries: HashMap<String, Entry>,
}

impl FeatureArchive {
    /// Read and index a safetensors archive.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path  = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Cannot read feature archive '{}'", path.display()))?;

        let entries = index_entries(&bytes)
            .with_context(|| format!("Invalid feature archive '{}'", path.display()))?;

        tracing::info!(
            "Opened feature archive '{}' ({} keys, {} MiB)",
            path.display(),
            entries.len(),
            bytes.len() / (1024 * 1024)
        );

        Ok(Self { bytes, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of frames stored under `key`.
    pub fn frame_count(&self, key: &str) -> Result<usize> {
        Ok(self.entry(key)?.frames)
    }

    /// The full [frames, width] array stored under `key`.
    pub fn frames(&self, key: &str) -> Result<Array2<f32>> {
        let entry = self.entry(key)?;
        self.copy_rows(key, entry, 0..entry.frames)
    }

    /// Rows `range` of `key`, clamped to the stored frame count.
    ///
    /// Mirrors half-open slice semantics: an out-of-range or
    /// inverted window yields zero rows rather than an error.
    pub fn slice_frames(&self, key: &str, range: Range<usize>) -> Result<Array2<f32>> {
        let entry = self.entry(key)?;
        let end   = range.end.min(entry.frames);
        let start = range.start.min(end);
        self.copy_rows(key, entry, start..end)
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        match self.entries.get(key) {
            Some(e) => Ok(*e),
            None    => bail!("Key '{key}' not found in feature archive"),
        }
    }

    fn copy_rows(&self, key: &str, entry: Entry, rows: Range<usize>) -> Result<Array2<f32>> {
        let row_bytes = entry.width * F32_BYTES;
        let start     = entry.offset + rows.start * row_bytes;
        let end       = entry.offset + rows.end * row_bytes;

        // Safetensors stores little-endian; decoding per element avoids
        // any alignment assumption on the in-memory buffer
        let values: Vec<f32> = self.bytes[start..end]
            .chunks_exact(F32_BYTES)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Array2::from_shape_vec((rows.len(), entry.width), values)
            .with_context(|| format!("Shape mismatch reading '{key}'"))
    }
}

/// Parse the header once and remember each tensor's location.
fn index_entries(bytes: &[u8]) -> Result<HashMap<String, Entry>> {
    let tensors = SafeTensors::deserialize(bytes)?;
    let base    = bytes.as_ptr() as usize;

    let mut entries = HashMap::new();
    for (name, view) in tensors.tensors() {
        if view.dtype() != Dtype::F32 {
            bail!("Tensor '{name}' has dtype {:?}, expected F32", view.dtype());
        }
        let (frames, width) = match view.shape() {
            [frames, width] => (*frames, *width),
            other           => bail!("Tensor '{name}' has shape {other:?}, expected [frames, width]"),
        };

        let offset = view.data().as_ptr() as usize - base;
        entries.insert(name, Entry { offset, frames, width });
    }

    Ok(entries)
}
