use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::compare::Comparator;
use crate::constants::IO_BUFFER_SIZE_BYTES;
use crate::external_sort::chunk::ChunkFile;
use crate::external_sort::heap::{HeapEntry, MinHeap};
use crate::line::Line;

/// Sequential read cursor over one spilled chunk. Its only operation is
/// "next line or exhausted".
pub struct MergeSource {
    path: PathBuf,
    lines: tokio::io::Lines<BufReader<File>>,
}

impl MergeSource {
    pub async fn open(chunk: &ChunkFile) -> Result<Self> {
        let file = File::open(&chunk.path)
            .await
            .with_context(|| format!("failed to open chunk file {}", chunk.path.display()))?;
        let reader = BufReader::with_capacity(IO_BUFFER_SIZE_BYTES, file);
        Ok(Self {
            path: chunk.path.clone(),
            lines: reader.lines(),
        })
    }

    pub async fn next_line(&mut self) -> Result<Option<Line>> {
        let line = self
            .lines
            .next_line()
            .await
            .with_context(|| format!("failed to read from chunk file {}", self.path.display()))?;
        Ok(line.map(Line::new))
    }
}

/// Counts produced by one merge pass.
#[derive(Debug, Default)]
pub struct MergeStats {
    pub lines_written: usize,
    pub duplicates_dropped: usize,
}

/// Fans the sorted chunks back into one stream. A min-heap holds the current
/// head of every live source; popping it always yields the globally smallest
/// not-yet-emitted line, so the output is non-decreasing and comparing
/// against the single last-emitted line is enough to drop every duplicate.
pub struct ChunkMerger<'a> {
    comparator: &'a dyn Comparator,
}

impl<'a> ChunkMerger<'a> {
    pub fn new(comparator: &'a dyn Comparator) -> Self {
        Self { comparator }
    }

    pub async fn merge<W>(&self, chunks: &[ChunkFile], output: &mut W) -> Result<MergeStats>
    where
        W: AsyncWrite + Unpin,
    {
        let mut stats = MergeStats::default();
        if chunks.is_empty() {
            return Ok(stats);
        }

        let mut sources = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            sources.push(MergeSource::open(chunk).await?);
        }

        let comparator = self.comparator;
        let mut heap = MinHeap::with_capacity(sources.len(), |a: &HeapEntry, b: &HeapEntry| {
            comparator.compare(&a.line, &b.line)
        });

        // Chunks are never empty, so every source seeds one entry.
        for (source, reader) in sources.iter_mut().enumerate() {
            if let Some(line) = reader.next_line().await? {
                heap.push(HeapEntry { line, source });
            }
        }

        let mut last_emitted: Option<Line> = None;
        while let Some(HeapEntry { line, source }) = heap.pop() {
            let is_duplicate = match &last_emitted {
                Some(last) => self.comparator.compare(&line, last) == Ordering::Equal,
                None => false,
            };

            if is_duplicate {
                stats.duplicates_dropped += 1;
            } else {
                output.write_all(line.as_str().as_bytes()).await?;
                output.write_all(b"\n").await?;
                stats.lines_written += 1;
                last_emitted = Some(line);
            }

            // Advance whichever source produced the popped line; an
            // exhausted source just drops out of the frontier.
            if let Some(next) = sources[source].next_line().await? {
                heap.push(HeapEntry { line: next, source });
            }
        }

        output.flush().await?;

        for chunk in chunks {
            tokio::fs::remove_file(&chunk.path)
                .await
                .with_context(|| format!("failed to remove chunk file {}", chunk.path.display()))?;
        }

        Ok(stats)
    }
}
