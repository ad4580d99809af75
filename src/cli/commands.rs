// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `inspect` and `config`
// and all their configurable flags.
//
// Flags given on the command line override values from the
// optional --config JSON file, which in turn override defaults.
//
// Reference: Rust Book §12 (Building a CLI Program)

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::config::DataConfig;
use crate::application::inspect_use_case::{CorpusKind, InspectRequest};
use crate::data::adapters::CandidateMode;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a corpus, report what survived filtering, and stream a few batches
    Inspect(InspectArgs),

    /// Print (or write) the default data configuration as JSON
    Config(ConfigArgs),
}

/// Corpus families understood by `inspect`.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CorpusArg {
    /// JSON-lines movie alignment labels + dense movie archive
    Alignment,
    /// JSON captioned clips + clip feature archive
    ClipArchive,
    /// JSON captioned clips + one .npy file per clip
    ClipFiles,
    /// Tab-separated parallel sentences
    ParallelText,
}

impl From<CorpusArg> for CorpusKind {
    fn from(a: CorpusArg) -> Self {
        match a {
            CorpusArg::Alignment    => CorpusKind::Alignment,
            CorpusArg::ClipArchive  => CorpusKind::ClipArchive,
            CorpusArg::ClipFiles    => CorpusKind::ClipFiles,
            CorpusArg::ParallelText => CorpusKind::ParallelText,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Corpus family of the input files
    #[arg(long, value_enum)]
    pub corpus: CorpusArg,

    /// Corpus files, loaded in the given order
    #[arg(long, num_args = 1.., required = true)]
    pub files: Vec<PathBuf>,

    /// HuggingFace tokenizer.json
    #[arg(long)]
    pub tokenizer: PathBuf,

    /// Safetensors feature archive (alignment / clip-archive corpora)
    #[arg(long)]
    pub archive: Option<PathBuf>,

    /// Directory of <clip id>.npy files (clip-files corpora)
    #[arg(long)]
    pub clip_dir: Option<PathBuf>,

    /// JSON data config; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Items per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Number of batches to stream after loading
    #[arg(long, default_value_t = 4)]
    pub max_batches: usize,

    /// Fraction of records kept for training; the rest is held out
    #[arg(long)]
    pub train_fraction: Option<f64>,

    /// Keep all captions of a clip in one group and pick one per access
    #[arg(long)]
    pub group_candidates: bool,
}

impl InspectArgs {
    /// Merge file config and flags into an application request.
    /// This is the boundary between Layer 1 and Layer 2 —
    /// the application layer never sees clap types.
    pub fn into_request(self) -> Result<InspectRequest> {
        let mut config = match &self.config {
            Some(path) => DataConfig::from_file(path)?,
            None       => DataConfig::default(),
        };

        if let Some(n) = self.batch_size {
            config.batch_size = n;
        }
        if self.train_fraction.is_some() {
            config.train_fraction = self.train_fraction;
        }
        if self.group_candidates {
            config.candidate_mode = CandidateMode::Group;
        }

        Ok(InspectRequest {
            corpus:      self.corpus.into(),
            files:       self.files,
            tokenizer:   self.tokenizer,
            archive:     self.archive,
            clip_dir:    self.clip_dir,
            max_batches: self.max_batches,
            config,
        })
    }
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Write to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}
