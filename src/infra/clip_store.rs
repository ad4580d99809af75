// ============================================================
// Layer 6 — Clip Feature Store
// ============================================================
// A directory of individually addressable feature files, one
// NumPy .npy file per clip:
//
//   clips/
//     -0Ue2Ylsjdk_000021_000031.npy   shape (1, frames, width)
//     -1CEVKeAyA8_000009_000019.npy   shape (1, frames, width)
//
// Files are loaded whole. The leading batch axis is dropped so
// callers always receive a [frames, width] array.
//
// Reference: ndarray-npy crate documentation

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use ndarray::{Array2, Array3, Axis};

#[derive(Debug, Clone)]
pub struct ClipStore {
    dir: PathBuf,
}

impl ClipStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the feature file for `clip_id`.
    pub fn path_for(&self, clip_id: &str) -> PathBuf {
        self.dir.join(format!("{clip_id}.npy"))
    }

    /// Load `<dir>/<clip_id>.npy` and drop its first axis.
    pub fn load(&self, clip_id: &str) -> Result<Array2<f32>> {
        let path = self.path_for(clip_id);
        let raw: Array3<f32> = ndarray_npy::read_npy(&path)
            .with_context(|| format!("Cannot read clip features '{}'", path.display()))?;

        ensure!(
            raw.len_of(Axis(0)) >= 1,
            "Clip features '{}' have an empty leading axis",
            path.display()
        );

        Ok(raw.index_axis_move(Axis(0), 0))
    }
}
