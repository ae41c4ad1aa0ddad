// External-sort deduplication engine
pub mod external_sort;

// Comparison strategies and the line/constant leaves they share
pub mod compare;
pub mod constants;
pub mod line;

// Contrasting bounded-buffer strategy
pub mod naive;

pub mod utils;

// Re-export main types for convenience
pub use compare::{comparator_for, Comparator, Lexicographic, RecordId};
pub use external_sort::{sift, SiftConfig, SiftProcessor, SiftStats};
pub use line::Line;
