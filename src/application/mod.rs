// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal.
//
// Rules for this layer:
//   - No padding or tokenisation logic here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination and configuration
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Serialisable data configuration
pub mod config;

// Load a corpus and stream batches through Burn
pub mod inspect_use_case;
