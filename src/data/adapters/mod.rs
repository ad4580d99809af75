// ============================================================
// Layer 4 — Corpus Adapters
// ============================================================
// One CorpusAdapter implementation per corpus family:
//
//   AlignmentAdapter     — JSON lines + dense movie archive (sliced)
//   ClipArchiveAdapter   — JSON array + clip archive (whole clip)
//   ClipFilesAdapter     — JSON array + one .npy per clip (subsampled)
//   ParallelTextAdapter  — TSV sentence pairs, no visual modality
//
// All four tokenise with BOS/EOS markers and apply the same
// LengthBounds filter once, at load time.

/// Movie-description alignment corpus
pub mod alignment;

/// Caption handling shared by both clip adapters
pub mod captions;

/// Captioned clips backed by a feature archive
pub mod clip_archive;

/// Captioned clips backed by per-clip .npy files
pub mod clip_files;

/// Tab-separated parallel text
pub mod parallel_text;

pub use alignment::AlignmentAdapter;
pub use captions::{CandidateMode, CaptionOptions};
pub use clip_archive::ClipArchiveAdapter;
pub use clip_files::ClipFilesAdapter;
pub use parallel_text::ParallelTextAdapter;
