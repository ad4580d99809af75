// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Adapters to the external artefacts the pipeline reads:
//
//   feature_archive.rs — key-addressed safetensors archive of
//                        dense [frames, width] features, read
//                        into memory once and sliced on demand
//
//   clip_store.rs      — directory of per-clip .npy feature files
//
//   tokenizer_store.rs — HuggingFace tokenizer.json loader that
//                        exposes the TextEncoder trait
//
// Nothing here knows about padding or batching.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Safetensors-backed feature archive
pub mod feature_archive;

/// Per-clip .npy feature files
pub mod clip_store;

/// Tokenizer loading
pub mod tokenizer_store;
