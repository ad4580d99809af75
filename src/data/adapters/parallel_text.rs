// ============================================================
// Layer 4 — Parallel Text Adapter
// ============================================================
// Text-only parallel corpora, one tab-separated sentence pair
// per line:
//
//   A man is walking.\t一个男人在走路。
//
// Raw pairs are queued in a PendingPairs accumulator and handed
// to the tokenizer a group at a time (100 pairs by default). The
// partial group left at the end of each file is flushed once.
//
// Records carry no visual sequence.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};

use crate::data::accumulator::{PendingPairs, RawPair};
use crate::data::bounds::{encode_wrapped_batch, LengthBounds, LoadTally};
use crate::domain::record::{CandidateGroup, TokenPair};
use crate::domain::traits::{CorpusAdapter, TextEncoder};

/// Default number of sentence pairs per tokenizer call.
pub const ENCODE_GROUP_SIZE: usize = 100;

pub struct ParallelTextAdapter {
    group_size: usize,
    bounds:     LengthBounds,
}

impl ParallelTextAdapter {
    pub fn new(group_size: usize, bounds: LengthBounds) -> Self {
        Self { group_size, bounds }
    }

    /// Tokenise one group and keep the pairs that fit.
    fn encode_group(
        &self,
        group:     Vec<RawPair>,
        tokenizer: &dyn TextEncoder,
        out:       &mut Vec<CandidateGroup>,
        tally:     &mut LoadTally,
    ) -> Result<()> {
        let (sources, targets): (Vec<String>, Vec<String>) = group.into_iter().unzip();
        let sources = encode_wrapped_batch(tokenizer, &sources)?;
        let targets = encode_wrapped_batch(tokenizer, &targets)?;

        for (source, target) in sources.into_iter().zip(targets) {
            let ok = self.bounds.admits_pair(&source, &target);
            tally.record(ok);
            if ok {
                out.push(CandidateGroup::single(None, TokenPair::new(source, target)));
            }
        }
        Ok(())
    }
}

/// Split a line into exactly two tab-separated columns.
fn split_pair(line: &str) -> Option<(&str, &str)> {
    let mut cols = line.split('\t');
    match (cols.next(), cols.next(), cols.next()) {
        (Some(src), Some(tgt), None) => Some((src, tgt)),
        _ => None,
    }
}

impl CorpusAdapter for ParallelTextAdapter {
    fn name(&self) -> &'static str {
        "parallel-text"
    }

    fn load(&self, files: &[PathBuf], tokenizer: &dyn TextEncoder) -> Result<Vec<CandidateGroup>> {
        let mut groups = Vec::new();

        for path in files {
            let file = File::open(path)
                .with_context(|| format!("Cannot open parallel corpus '{}'", path.display()))?;

            let mut pending = PendingPairs::new(self.group_size);
            let mut tally   = LoadTally::default();

            for (idx, line) in BufReader::new(file).lines().enumerate() {
                let line = line.with_context(|| format!("{}:{}", path.display(), idx + 1))?;
                if line.is_empty() {
                    continue;
                }

                let Some((src, tgt)) = split_pair(&line) else {
                    bail!("{}:{}: expected two tab-separated columns", path.display(), idx + 1);
                };

                if let Some(group) = pending.add(src.to_string(), tgt.to_string()) {
                    self.encode_group(group, tokenizer, &mut groups, &mut tally)?;
                }
            }

            if let Some(group) = pending.flush() {
                self.encode_group(group, tokenizer, &mut groups, &mut tally)?;
            }

            tracing::info!(
                "Loaded '{}': {} pairs kept, {} dropped",
                path.display(),
                tally.kept,
                tally.dropped
            );
        }

        Ok(groups)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{words, WordEncoder};
    use tempfile::TempDir;

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("a b\tc"), Some(("a b", "c")));
        assert_eq!(split_pair("no tab"), None);
        assert_eq!(split_pair("a\tb\tc"), None);
    }

    #[test]
    fn test_250_lines_encode_in_groups_of_100_100_50() {
        let dir    = TempDir::new().unwrap();
        let corpus = dir.path().join("opus.tsv");

        // Lines 10 and 200 exceed the text bound after wrapping
        let lines: Vec<String> = (0..250)
            .map(|i| {
                let src = if i == 10 || i == 200 { words(299) } else { words(1 + i % 7) };
                format!("{src}\t{}", words(2))
            })
            .collect();
        std::fs::write(&corpus, lines.join("\n") + "\n").unwrap();

        let enc     = WordEncoder::default();
        let adapter = ParallelTextAdapter::new(ENCODE_GROUP_SIZE, LengthBounds::default());
        let groups  = adapter.load(&[corpus], &enc).unwrap();

        assert_eq!(groups.len(), 248);
        // Source and target are encoded separately per group
        assert_eq!(enc.recorded_batches(), vec![100, 100, 100, 100, 50, 50]);

        for g in &groups {
            assert!(g.visual().is_none());
            let p = &g.pairs()[0];
            assert!(p.source.len() <= 300 && p.target.len() <= 300);
            assert_eq!((p.source[0], *p.source.last().unwrap()), (2, 3));
        }
    }

    #[test]
    fn test_each_file_flushes_its_own_tail() {
        let dir = TempDir::new().unwrap();
        let a   = dir.path().join("a.tsv");
        let b   = dir.path().join("b.tsv");
        std::fs::write(&a, "x\ty\nx\ty\nx\ty\n").unwrap();
        std::fs::write(&b, "p\tq\n").unwrap();

        let enc     = WordEncoder::default();
        let adapter = ParallelTextAdapter::new(2, LengthBounds::default());
        let groups  = adapter.load(&[a, b], &enc).unwrap();

        assert_eq!(groups.len(), 4);
        assert_eq!(enc.recorded_batches(), vec![2, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn test_line_without_tab_aborts_load() {
        let dir    = TempDir::new().unwrap();
        let corpus = dir.path().join("bad.tsv");
        std::fs::write(&corpus, "fine\tline\nbroken line\n").unwrap();

        let adapter = ParallelTextAdapter::new(ENCODE_GROUP_SIZE, LengthBounds::default());
        let err     = adapter.load(&[corpus], &WordEncoder::default()).unwrap_err();
        assert!(err.to_string().contains(":2:"));
    }
}
