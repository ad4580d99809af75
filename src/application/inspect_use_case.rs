// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Runs the whole data pipeline exactly as a training run would,
// minus the model:
//
//   Step 1: Load the tokenizer           (Layer 6 - infra)
//   Step 2: Open feature stores          (Layer 6 - infra)
//   Step 3: Run the corpus adapter       (Layer 4 - data)
//   Step 4: Summarise surviving records  (Layer 4 - data)
//   Step 5: Optional seeded split        (Layer 4 - data)
//   Step 6: Stream batches through Burn  (Layer 4 - data)
//
// Useful for checking a corpus/archive pairing before a long
// training job, and for seeing the batch shapes it will produce.

use anyhow::{Context, Result};
use burn::{
    backend::NdArray,
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    prelude::*,
};
use std::{path::PathBuf, sync::Arc};

use crate::application::config::DataConfig;
use crate::data::{
    adapters::{AlignmentAdapter, ClipArchiveAdapter, ClipFilesAdapter, ParallelTextAdapter},
    batcher::TranslationBatcher,
    dataset::TranslationDataset,
    splitter::split_train_val,
};
use crate::domain::traits::CorpusAdapter;
use crate::infra::{
    clip_store::ClipStore,
    feature_archive::FeatureArchive,
    tokenizer_store::TokenizerStore,
};

type InspectBackend = NdArray;

/// Which corpus family the input files belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusKind {
    Alignment,
    ClipArchive,
    ClipFiles,
    ParallelText,
}

#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub corpus:      CorpusKind,
    pub files:       Vec<PathBuf>,
    pub tokenizer:   PathBuf,
    pub archive:     Option<PathBuf>,
    pub clip_dir:    Option<PathBuf>,
    pub max_batches: usize,
    pub config:      DataConfig,
}

/// Length statistics over the loaded records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusSummary {
    pub records:        usize,
    pub candidates:     usize,
    pub has_visual:     bool,
    pub max_visual_len: usize,
    pub max_source_len: usize,
    pub max_target_len: usize,
}

/// Shape of one streamed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchShape {
    pub visual: Option<[usize; 3]>,
    pub source: [usize; 2],
    pub target: [usize; 2],
}

#[derive(Debug, Clone)]
pub struct InspectReport {
    pub summary:          CorpusSummary,
    pub train_records:    usize,
    pub held_out_records: usize,
    pub batches:          Vec<BatchShape>,
}

pub struct InspectUseCase {
    request: InspectRequest,
}

impl InspectUseCase {
    pub fn new(request: InspectRequest) -> Self {
        Self { request }
    }

    pub fn execute(&self) -> Result<InspectReport> {
        let req = &self.request;
        let cfg = &req.config;

        // ── Step 1: Tokenizer ─────────────────────────────────────────────────
        let tokenizer = TokenizerStore::new(&req.tokenizer).load(cfg.bos_id, cfg.eos_id)?;

        // ── Step 2 + 3: Adapter and load ──────────────────────────────────────
        let adapter = build_adapter(req)?;
        let dataset = TranslationDataset::load(adapter.as_ref(), &req.files, &tokenizer)?;

        // ── Step 4: Summary ───────────────────────────────────────────────────
        let summary = summarize(&dataset);
        tracing::info!("Corpus summary: {:?}", summary);

        // ── Step 5: Optional split ────────────────────────────────────────────
        let (train, held_out) = match cfg.train_fraction {
            Some(fraction) => {
                let (train, val) = split_train_val(dataset.into_groups(), fraction, cfg.seed);
                (TranslationDataset::new(train), val.len())
            }
            None => (dataset, 0),
        };
        let train_records = train.len();

        // ── Step 6: Stream batches ────────────────────────────────────────────
        let batches = stream_batches(train, cfg, req.max_batches);

        Ok(InspectReport { summary, train_records, held_out_records: held_out, batches })
    }
}

/// Build the adapter for `req.corpus`, opening whichever feature
/// store it needs.
fn build_adapter(req: &InspectRequest) -> Result<Box<dyn CorpusAdapter>> {
    let cfg = &req.config;

    let adapter: Box<dyn CorpusAdapter> = match req.corpus {
        CorpusKind::Alignment => {
            let archive = open_archive(req)?;
            Box::new(AlignmentAdapter::new(archive, cfg.frames_per_unit, cfg.bounds()))
        }
        CorpusKind::ClipArchive => {
            let archive = open_archive(req)?;
            Box::new(ClipArchiveAdapter::new(
                archive,
                cfg.clip_suffix_len,
                cfg.caption_options(),
                cfg.bounds(),
            ))
        }
        CorpusKind::ClipFiles => {
            let dir = req
                .clip_dir
                .as_ref()
                .context("--clip-dir is required for file-backed clip corpora")?;
            Box::new(ClipFilesAdapter::new(
                ClipStore::new(dir),
                cfg.frame_stride,
                cfg.caption_options(),
                cfg.bounds(),
            ))
        }
        CorpusKind::ParallelText => {
            Box::new(ParallelTextAdapter::new(cfg.encode_group_size, cfg.bounds()))
        }
    };

    Ok(adapter)
}

fn open_archive(req: &InspectRequest) -> Result<Arc<FeatureArchive>> {
    let path = req
        .archive
        .as_ref()
        .context("--archive is required for archive-backed corpora")?;
    Ok(Arc::new(FeatureArchive::open(path)?))
}

/// Longest sequences over every candidate of every record.
pub fn summarize(dataset: &TranslationDataset) -> CorpusSummary {
    let mut summary = CorpusSummary {
        records:    dataset.len(),
        candidates: dataset.candidate_count(),
        has_visual: dataset.has_visual().unwrap_or(false),
        ..Default::default()
    };

    for group in dataset.groups() {
        if let Some(v) = group.visual() {
            summary.max_visual_len = summary.max_visual_len.max(v.nrows());
        }
        for pair in group.pairs() {
            summary.max_source_len = summary.max_source_len.max(pair.source.len());
            summary.max_target_len = summary.max_target_len.max(pair.target.len());
        }
    }

    summary
}

/// Pull up to `max_batches` batches through a Burn DataLoader and
/// record their shapes.
fn stream_batches(dataset: TranslationDataset, cfg: &DataConfig, max_batches: usize) -> Vec<BatchShape> {
    let device  = <InspectBackend as Backend>::Device::default();
    let batcher = TranslationBatcher::<InspectBackend>::new(device);

    let loader = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size.max(1))
        .shuffle(cfg.seed)
        .num_workers(cfg.num_workers.max(1))
        .build(dataset);

    loader
        .iter()
        .take(max_batches)
        .enumerate()
        .map(|(i, batch)| {
            let shape = BatchShape {
                visual: batch.visual.as_ref().map(|v| v.dims()),
                source: batch.source.dims(),
                target: batch.target.dims(),
            };
            tracing::debug!("Batch {}: {:?}", i, shape);
            shape
        })
        .collect()
}
