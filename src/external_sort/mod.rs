pub mod chunk;
pub mod heap;
pub mod merger;


pub use chunk::{ChunkFile, ChunkWriter};
pub use heap::{HeapEntry, MinHeap};
pub use merger::{ChunkMerger, MergeSource, MergeStats};

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tempfile::TempDir;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite};
use tracing::{debug, info};

use crate::compare::Comparator;
use crate::constants::{CHUNK_SIZE, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE, TEMP_DIR_PREFIX};
use crate::line::Line;

#[derive(Debug, Clone)]
pub struct SiftConfig {
    /// Distinct lines buffered before a chunk is spilled.
    pub chunk_size: usize,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }
}

impl SiftConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size < MIN_CHUNK_SIZE || self.chunk_size > MAX_CHUNK_SIZE {
            anyhow::bail!(
                "chunk size must be between {} and {} lines",
                MIN_CHUNK_SIZE,
                MAX_CHUNK_SIZE
            );
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SiftStats {
    pub total_lines: usize,
    pub unique_lines: usize,
    pub duplicates_removed: usize,
    pub chunks_created: usize,
    pub processing_time_ms: u64,
}

/// Drives one dedupe run: partitions the input into sorted spill files, then
/// k-way merges them into the output, emitting each distinct line once in
/// comparator order.
///
/// The processor owns a per-run temp directory with a randomized name; the
/// merge deletes each chunk file on completion and the directory itself is
/// removed when the processor drops, errors included.
pub struct SiftProcessor<'a> {
    config: SiftConfig,
    comparator: &'a dyn Comparator,
    temp_dir: TempDir,
}

impl<'a> SiftProcessor<'a> {
    pub fn new(comparator: &'a dyn Comparator, config: SiftConfig) -> Result<Self> {
        config.validate()?;
        let temp_dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir()
            .context("failed to create temp directory for spill files")?;
        Ok(Self {
            config,
            comparator,
            temp_dir,
        })
    }

    /// Where this run's spill files live.
    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub async fn process<R, W>(&self, input: R, output: &mut W) -> Result<SiftStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let start = Instant::now();
        let mut stats = SiftStats::default();

        let mut chunk_writer =
            ChunkWriter::new(self.comparator, self.config.chunk_size, self.temp_dir.path());
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            stats.total_lines += 1;
            chunk_writer.push(Line::new(line)).await?;
        }

        let chunks = chunk_writer.finish().await?;
        stats.chunks_created = chunks.len();
        debug!(
            lines = stats.total_lines,
            chunks = stats.chunks_created,
            "partition phase complete"
        );

        let merge = ChunkMerger::new(self.comparator)
            .merge(&chunks, output)
            .await?;
        stats.unique_lines = merge.lines_written;
        stats.duplicates_removed = stats.total_lines - stats.unique_lines;
        stats.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            unique = stats.unique_lines,
            duplicates = stats.duplicates_removed,
            "merge phase complete"
        );

        Ok(stats)
    }
}

/// Convenience entry point for one-shot runs.
pub async fn sift<R, W>(
    input: R,
    output: &mut W,
    comparator: &dyn Comparator,
    config: SiftConfig,
) -> Result<SiftStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let processor = SiftProcessor::new(comparator, config)?;
    processor.process(input, output).await
}
