// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the system
// works with: token pairs, candidate groups, resolved items,
// and the two seams (tokenizer, corpus adapter).
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Token pairs, candidate groups and resolved items
pub mod record;

// Core abstractions (traits) that other layers implement
pub mod traits;
