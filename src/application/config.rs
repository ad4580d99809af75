// ============================================================
// Layer 2 — Data Configuration
// ============================================================
// Every constant and adapter parameter the pipeline depends on,
// in one serialisable struct. Defaults reproduce the reference
// setup; a JSON file can override any subset of fields:
//
//   { "max_text_len": 200, "candidate_mode": "group" }
//
// Missing fields fall back to their defaults via #[serde(default)].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::data::adapters::{
    alignment::FRAMES_PER_UNIT,
    captions::{CaptionOptions, CandidateMode, CAPTIONS_PER_CLIP},
    clip_archive::CLIP_SUFFIX_LEN,
    clip_files::FRAME_STRIDE,
    parallel_text::ENCODE_GROUP_SIZE,
};
use crate::data::bounds::{LengthBounds, MAX_TEXT_LEN, MAX_VIDEO_LEN};
use crate::data::splitter::RANDOM_SEED;
use crate::infra::tokenizer_store::{BOS_ID, EOS_ID};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Longest visual sequence kept at load time
    pub max_video_len:     usize,
    /// Longest wrapped token sequence kept at load time
    pub max_text_len:      usize,
    pub bos_id:            u32,
    pub eos_id:            u32,
    /// Seed for loader shuffling and train/validation splits
    pub seed:              u64,
    /// Alignment corpus: archive frames per timestamp unit
    pub frames_per_unit:   f64,
    /// Captioned clips: trailing captions kept per language
    pub captions_per_clip: usize,
    pub candidate_mode:    CandidateMode,
    /// Archive-backed clips: characters stripped from the clip id
    pub clip_suffix_len:   usize,
    /// File-backed clips: keep every n-th frame
    pub frame_stride:      usize,
    /// Parallel text: sentence pairs per tokenizer call
    pub encode_group_size: usize,
    pub batch_size:        usize,
    pub num_workers:       usize,
    /// Fraction of records kept for training when splitting
    pub train_fraction:    Option<f64>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            max_video_len:     MAX_VIDEO_LEN,
            max_text_len:      MAX_TEXT_LEN,
            bos_id:            BOS_ID,
            eos_id:            EOS_ID,
            seed:              RANDOM_SEED,
            frames_per_unit:   FRAMES_PER_UNIT,
            captions_per_clip: CAPTIONS_PER_CLIP,
            candidate_mode:    CandidateMode::Explode,
            clip_suffix_len:   CLIP_SUFFIX_LEN,
            frame_stride:      FRAME_STRIDE,
            encode_group_size: ENCODE_GROUP_SIZE,
            batch_size:        32,
            num_workers:       1,
            train_fraction:    None,
        }
    }
}

impl DataConfig {
    pub fn bounds(&self) -> LengthBounds {
        LengthBounds::new(self.max_video_len, self.max_text_len)
    }

    pub fn caption_options(&self) -> CaptionOptions {
        CaptionOptions {
            captions_per_clip: self.captions_per_clip,
            mode:              self.candidate_mode,
        }
    }

    /// Read a JSON config file; absent fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config '{}'", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config '{}'", path.display()))?;
        tracing::debug!("Loaded data config from '{}'", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Cannot write config '{}'", path.display()))?;
        tracing::info!("Data config saved to '{}'", path.display());
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_reference_constants() {
        let cfg = DataConfig::default();
        assert_eq!((cfg.max_video_len, cfg.max_text_len), (300, 300));
        assert_eq!((cfg.bos_id, cfg.eos_id), (2, 3));
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.captions_per_clip, 5);
        assert_eq!(cfg.frame_stride, 4);
        assert_eq!(cfg.encode_group_size, 100);
        assert_eq!(cfg.clip_suffix_len, 14);
    }

    #[test]
    fn test_partial_file_overrides_only_given_fields() {
        let dir  = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "max_text_len": 128, "candidate_mode": "group" }"#).unwrap();

        let cfg = DataConfig::from_file(&path).unwrap();
        assert_eq!(cfg.max_text_len, 128);
        assert_eq!(cfg.candidate_mode, CandidateMode::Group);
        assert_eq!(cfg.max_video_len, 300);
    }

    #[test]
    fn test_save_then_load() {
        let dir  = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let cfg  = DataConfig { frame_stride: 2, ..Default::default() };
        cfg.save(&path).unwrap();
        assert_eq!(DataConfig::from_file(&path).unwrap(), cfg);
    }
}
