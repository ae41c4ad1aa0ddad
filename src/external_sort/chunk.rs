use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::compare::Comparator;
use crate::constants::{CHUNK_FILE_EXTENSION, CHUNK_FILE_PREFIX, IO_BUFFER_SIZE_BYTES};
use crate::line::Line;

/// One sorted spill file: the persisted form of a chunk, plus how many
/// lines it holds.
#[derive(Debug)]
pub struct ChunkFile {
    pub path: PathBuf,
    pub lines: usize,
}

/// Buffers incoming lines up to a fixed number of distinct entries, then
/// sorts the batch under the active comparator and spills it to a chunk
/// file in the run's temp directory.
///
/// The buffer is a set, so duplicates within one chunk never reach disk.
/// An empty buffer is never spilled; zero input lines produce zero chunks.
pub struct ChunkWriter<'a> {
    comparator: &'a dyn Comparator,
    capacity: usize,
    temp_dir: PathBuf,
    buffer: HashSet<Line>,
    chunks: Vec<ChunkFile>,
}

impl<'a> ChunkWriter<'a> {
    pub fn new(comparator: &'a dyn Comparator, capacity: usize, temp_dir: &Path) -> Self {
        Self {
            comparator,
            capacity,
            temp_dir: temp_dir.to_path_buf(),
            buffer: HashSet::with_capacity(capacity),
            chunks: Vec::new(),
        }
    }

    /// Accepts one input line. Spills the buffer once it reaches capacity.
    pub async fn push(&mut self, line: Line) -> Result<()> {
        self.buffer.insert(line);
        if self.buffer.len() >= self.capacity {
            self.spill().await?;
        }
        Ok(())
    }

    /// Flushes the final (possibly partial) buffer and hands back every
    /// chunk written during this partition pass.
    pub async fn finish(mut self) -> Result<Vec<ChunkFile>> {
        if !self.buffer.is_empty() {
            self.spill().await?;
        }
        Ok(self.chunks)
    }

    async fn spill(&mut self) -> Result<()> {
        let mut lines: Vec<Line> = self.buffer.drain().collect();
        lines.sort_by(|a, b| self.comparator.compare(a, b));

        let path = self.temp_dir.join(format!(
            "{}{}{}",
            CHUNK_FILE_PREFIX,
            self.chunks.len(),
            CHUNK_FILE_EXTENSION
        ));

        let file = File::create(&path)
            .await
            .with_context(|| format!("failed to create chunk file {}", path.display()))?;
        let mut writer = BufWriter::with_capacity(IO_BUFFER_SIZE_BYTES, file);

        for line in &lines {
            writer.write_all(line.as_str().as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;

        tracing::debug!(chunk = self.chunks.len(), lines = lines.len(), "spilled chunk");

        self.chunks.push(ChunkFile {
            path,
            lines: lines.len(),
        });
        Ok(())
    }
}
