// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw corpus files all the
// way to padded tensor batches.
//
// The pipeline flows in this order:
//
//   corpus files (+ feature archive / clip files)
//       │
//       ▼
//   CorpusAdapter       → parse, tokenise, wrap, length-filter
//       │
//       ▼
//   TranslationDataset  → Burn Dataset; resolves one candidate
//       │                  pair per access
//       ▼
//   TranslationBatcher  → Burn Batcher; pads + masks each column
//       │
//       ▼
//   DataLoader          → feeds batches to the training loop
//
// Filtering happens once, in the adapters. Nothing downstream
// drops or rewrites records.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Bulk-tokenisation accumulator for line-oriented corpora
pub mod accumulator;

/// The four corpus adapters
pub mod adapters;

/// Implements Burn's Batcher trait: collation into tensors
pub mod batcher;

/// Length bounds, BOS/EOS wrapping, load counters
pub mod bounds;

/// Implements Burn's Dataset trait over candidate groups
pub mod dataset;

/// Validity masks for padded sequences
pub mod masking;

/// Rectangular padding of ids and feature sequences
pub mod padding;

/// Seeded train/validation split
pub mod splitter;

#[cfg(test)]
pub mod test_support;
