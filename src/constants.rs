/// Maximum number of distinct lines buffered in memory before a chunk is
/// sorted and spilled to disk.
pub const CHUNK_SIZE: usize = 5000;

pub const MIN_CHUNK_SIZE: usize = 1;
pub const MAX_CHUNK_SIZE: usize = 10_000_000;

pub const IO_BUFFER_SIZE_BYTES: usize = 64 * 1024;
pub const OUTPUT_BUFFER_SIZE_BYTES: usize = 512 * 1024;

pub const TEMP_DIR_PREFIX: &str = "line-sift-";
pub const CHUNK_FILE_PREFIX: &str = "chunk-";
pub const CHUNK_FILE_EXTENSION: &str = ".txt";

pub const CSV_FIELD_SEPARATOR: char = ',';
pub const CSV_EXTENSION: &str = "csv";

/// In-memory window of the naive bounded-buffer strategy, matching the
/// deliberately tiny window the contrast implementation ships with.
pub const NAIVE_STORE_CAPACITY: usize = 10;
