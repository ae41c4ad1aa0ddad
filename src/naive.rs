//! Bounded-buffer linear-scan deduplication, kept as a contrast to the
//! external-sort engine. No sorting and no heap: membership is an in-memory
//! window of recent lines plus a full scan of a spill file holding
//! everything evicted from that window. Output keeps input order, but every
//! membership check rereads the spill file, so cost degrades toward
//! O(file size) per line as the spill grows.

use anyhow::{Context, Result};
use std::collections::HashSet;
use tempfile::NamedTempFile;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::constants::NAIVE_STORE_CAPACITY;
use crate::line::Line;

/// Set of seen lines backed by a capacity-bounded in-memory window and an
/// append-only spill file. The spill file is a `NamedTempFile`, so it is
/// removed on every exit path when the store drops.
pub struct SpillStore {
    capacity: usize,
    window: HashSet<Line>,
    spill: NamedTempFile,
}

impl SpillStore {
    pub fn create(capacity: usize) -> Result<Self> {
        let spill = tempfile::Builder::new()
            .prefix("line-sift-store-")
            .suffix(".txt")
            .tempfile()
            .context("failed to create spill file for naive store")?;
        Ok(Self {
            capacity,
            window: HashSet::with_capacity(capacity),
            spill,
        })
    }

    /// True if `line` was inserted at any point, however long ago: the spill
    /// file is scanned before the window, so eviction never loses a line.
    pub async fn contains(&self, line: &Line) -> Result<bool> {
        let file = File::open(self.spill.path()).await?;
        let mut lines = BufReader::new(file).lines();
        while let Some(candidate) = lines.next_line().await? {
            if candidate == line.as_str() {
                return Ok(true);
            }
        }
        Ok(self.window.contains(line))
    }

    pub async fn insert(&mut self, line: Line) -> Result<()> {
        self.window.insert(line);
        if self.window.len() > self.capacity {
            self.flush().await?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(self.spill.path())
            .await?;
        for line in self.window.drain() {
            file.write_all(line.as_str().as_bytes()).await?;
            file.write_all(b"\n").await?;
        }
        file.flush().await?;
        Ok(())
    }
}

/// Streams `input` to `output`, emitting each line the first time it is
/// seen. Unlike the external-sort engine this preserves input order and
/// compares by exact text only.
pub async fn sift_naive<R, W>(input: R, output: &mut W, capacity: usize) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut store = SpillStore::create(capacity)?;
    let mut written = 0;

    let mut lines = input.lines();
    while let Some(text) = lines.next_line().await? {
        let line = Line::new(text);
        if !store.contains(&line).await? {
            output.write_all(line.as_str().as_bytes()).await?;
            output.write_all(b"\n").await?;
            written += 1;
        }
        store.insert(line).await?;
    }

    output.flush().await?;
    Ok(written)
}

/// [`sift_naive`] with the stock window size.
pub async fn sift_naive_default<R, W>(input: R, output: &mut W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    sift_naive(input, output, NAIVE_STORE_CAPACITY).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_remembers_evicted_lines() {
        // Capacity 2 forces evictions to the spill file almost immediately.
        let mut store = SpillStore::create(2).unwrap();
        for text in ["a", "b", "c", "d", "e"] {
            store.insert(Line::new(text)).await.unwrap();
        }

        for text in ["a", "b", "c", "d", "e"] {
            assert!(store.contains(&Line::new(text)).await.unwrap(), "lost {text}");
        }
        assert!(!store.contains(&Line::new("f")).await.unwrap());
    }

    #[test]
    fn test_spill_file_removed_on_drop() {
        let store = SpillStore::create(2).unwrap();
        let path = store.spill.path().to_path_buf();
        assert!(path.exists());
        drop(store);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_naive_dedupe_preserves_input_order() {
        let input = b"pear\napple\npear\nplum\napple\npear\n" as &[u8];
        let mut output = Vec::new();

        let written = sift_naive(input, &mut output, 2).await.unwrap();

        assert_eq!(written, 3);
        assert_eq!(String::from_utf8(output).unwrap(), "pear\napple\nplum\n");
    }

    #[tokio::test]
    async fn test_naive_dedupe_empty_input() {
        let input = b"" as &[u8];
        let mut output = Vec::new();

        let written = sift_naive_default(input, &mut output).await.unwrap();

        assert_eq!(written, 0);
        assert!(output.is_empty());
    }
}
