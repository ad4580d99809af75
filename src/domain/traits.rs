// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Two seams separate the batching core from the outside world:
//
//   TextEncoder    — anything that turns text into token ids
//                    and knows the reserved BOS/EOS markers
//   CorpusAdapter  — anything that reads one corpus family and
//                    produces filtered, tokenised CandidateGroups
//
// The four corpus adapters each implement CorpusAdapter on
// their own; nothing is shared through inheritance. The
// application layer only sees the trait.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::record::CandidateGroup;

// ─── TextEncoder ──────────────────────────────────────────────────────────────
/// Tokenizer capability consumed by the adapters.
///
/// Implementations must be deterministic, and the marker ids must
/// not collide with PAD (0) or UNK (1).
///
/// Implementations:
///   - HfTextEncoder → HuggingFace tokenizer.json
///   - test encoders → deterministic word-level stand-ins
pub trait TextEncoder: Send + Sync {
    /// Reserved begin-of-sequence id.
    fn bos_id(&self) -> u32;

    /// Reserved end-of-sequence id.
    fn eos_id(&self) -> u32;

    /// Encode one sentence, without markers.
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Encode many sentences at once, preserving order.
    /// The default simply loops; real tokenizers override it.
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<u32>>> {
        texts.iter().map(|t| self.encode(t)).collect()
    }
}

// ─── CorpusAdapter ────────────────────────────────────────────────────────────
/// Reads one corpus family and normalises it into CandidateGroups.
///
/// Loading is eager: by the time `load` returns, every record has
/// been tokenised and length-filtered, and nothing is deferred to
/// access time.
pub trait CorpusAdapter {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Load every file, in order, into one flat collection.
    fn load(&self, files: &[PathBuf], tokenizer: &dyn TextEncoder) -> Result<Vec<CandidateGroup>>;
}
