// ============================================================
// Layer 4 — Pending Pair Accumulator
// ============================================================
// Collects raw (source, target) sentence pairs until a full
// group is available, so the tokenizer is called once per group
// instead of once per sentence.
//
//   add(..)  → Some(group) each time `group_size` pairs are queued
//   flush()  → whatever is left, once the input is exhausted
//
// With group_size = 100 and 250 input lines the caller sees
// groups of 100, 100 and then 50 from the final flush.

/// Raw sentence pair, not yet tokenised.
pub type RawPair = (String, String);

#[derive(Debug)]
pub struct PendingPairs {
    group_size: usize,
    pending:    Vec<RawPair>,
}

impl PendingPairs {
    /// A group size of zero is treated as one.
    pub fn new(group_size: usize) -> Self {
        let group_size = group_size.max(1);
        Self { group_size, pending: Vec::with_capacity(group_size) }
    }

    /// Queue a pair. Returns the full group once it reaches `group_size`.
    pub fn add(&mut self, source: String, target: String) -> Option<Vec<RawPair>> {
        self.pending.push((source, target));
        if self.pending.len() >= self.group_size {
            Some(self.take())
        } else {
            None
        }
    }

    /// Hand back the partial group, if any.
    pub fn flush(&mut self) -> Option<Vec<RawPair>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.take())
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn take(&mut self) -> Vec<RawPair> {
        std::mem::replace(&mut self.pending, Vec::with_capacity(self.group_size))
    }
}
