// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads a HuggingFace tokenizer.json and exposes it through the
// TextEncoder trait the corpus adapters depend on.
//
// The tokenizer is an external, pre-built artefact: this crate
// never trains or edits a vocabulary. It only checks that the
// configured BOS/EOS markers do not collide with the reserved
// PAD (0) and UNK (1) ids.
//
// Reference: tokenizers crate documentation

use anyhow::{ensure, Context, Result};
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

use crate::data::padding::PAD_ID;
use crate::domain::traits::TextEncoder;

/// Reserved unknown-token id. Only the tokenizer side uses it.
pub const UNK_ID: u32 = 1;
/// Default begin-of-sequence marker.
pub const BOS_ID: u32 = 2;
/// Default end-of-sequence marker.
pub const EOS_ID: u32 = 3;

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the tokenizer file and attach the marker ids.
    pub fn load(&self, bos_id: u32, eos_id: u32) -> Result<HfTextEncoder> {
        let inner = Tokenizer::from_file(&self.path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", self.path.display(), e
            ))?;

        tracing::info!(
            "Loaded tokenizer '{}' (vocab_size={}, bos={}, eos={})",
            self.path.display(),
            inner.get_vocab_size(true),
            bos_id,
            eos_id
        );

        HfTextEncoder::new(inner, bos_id, eos_id)
    }
}

/// HuggingFace tokenizer plus fixed BOS/EOS ids.
pub struct HfTextEncoder {
    inner:  Tokenizer,
    bos_id: u32,
    eos_id: u32,
}

impl HfTextEncoder {
    pub fn new(inner: Tokenizer, bos_id: u32, eos_id: u32) -> Result<Self> {
        check_markers(bos_id, eos_id)?;
        Ok(Self { inner, bos_id, eos_id })
    }

    pub fn inner(&self) -> &Tokenizer {
        &self.inner
    }
}

impl TextEncoder for HfTextEncoder {
    fn bos_id(&self) -> u32 {
        self.bos_id
    }

    fn eos_id(&self) -> u32 {
        self.eos_id
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let enc = self
            .inner
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        Ok(enc.get_ids().to_vec())
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<u32>>> {
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let encs = self
            .inner
            .encode_batch(inputs, false)
            .map_err(|e| anyhow::anyhow!("Batch tokenisation error: {e}"))
            .with_context(|| format!("while encoding {} sentences", texts.len()))?;
        Ok(encs.iter().map(|e| e.get_ids().to_vec()).collect())
    }
}

/// Marker ids must be distinct from each other and from PAD/UNK.
pub fn check_markers(bos_id: u32, eos_id: u32) -> Result<()> {
    for (name, id) in [("bos", bos_id), ("eos", eos_id)] {
        ensure!(
            id != PAD_ID && id != UNK_ID,
            "{name} id {id} collides with a reserved id (PAD={PAD_ID}, UNK={UNK_ID})"
        );
    }
    ensure!(bos_id != eos_id, "bos and eos ids must differ (both are {bos_id})");
    Ok(())
}
