//! Chunked CSV reading with per-chunk statistics.
//!
//! [`ChunkedStatsReader`] walks a CSV file in windows of at most `chunk_size`
//! data rows and pairs every window with its [`StatsSnapshot`]. The file is
//! opened lazily on the first read and a single cursor is kept for the rest of
//! the walk, so each row is parsed exactly once.

use std::fmt::Display;
use std::fs::File;
use std::path::{Path, PathBuf};

use chunkstats_core::calculations::summarize_window;
use chunkstats_core::error::{ChunkStatsError, Result};
use chunkstats_core::models::{StatsSnapshot, Window};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::window::{build_window, dedupe_headers};

/// Upper bound on the row buffer reserved before a chunk is read.
const MAX_PREALLOCATED_ROWS: usize = 1024;

/// Progress of the underlying file cursor.
enum Cursor {
    /// Nothing has been read yet; the file is not open.
    Pending,
    Open {
        reader: csv::Reader<File>,
        headers: Vec<String>,
    },
    /// End of data reached or a read failed. Terminal.
    Finished,
}

// ── ChunkedStatsReader ────────────────────────────────────────────────────────

/// Forward-only reader yielding `(Window, StatsSnapshot)` pairs.
pub struct ChunkedStatsReader {
    path: PathBuf,
    chunk_size: usize,
    chunk_index: usize,
    rows_read: usize,
    cursor: Cursor,
}

impl ChunkedStatsReader {
    /// Create a reader over the CSV file at `path`.
    ///
    /// `chunk_size` may be any integer type; zero, negative or out-of-range
    /// values fail with [`ChunkStatsError::InvalidConfiguration`]. No I/O
    /// happens here: a missing file is reported by the first read.
    pub fn new<P, N>(path: P, chunk_size: N) -> Result<Self>
    where
        P: Into<PathBuf>,
        N: TryInto<usize> + Display + Copy,
    {
        let size: usize = chunk_size.try_into().map_err(|_| {
            ChunkStatsError::InvalidConfiguration(format!(
                "chunk size must be a positive integer, got {}",
                chunk_size
            ))
        })?;
        if size == 0 {
            return Err(ChunkStatsError::InvalidConfiguration(
                "chunk size must be a positive integer, got 0".to_string(),
            ));
        }

        Ok(Self {
            path: path.into(),
            chunk_size: size,
            chunk_index: 0,
            rows_read: 0,
            cursor: Cursor::Pending,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Index of the next window to be produced.
    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    /// Whether the sequence has ended, normally or through an error.
    pub fn is_finished(&self) -> bool {
        matches!(self.cursor, Cursor::Finished)
    }

    /// Read the next window and compute its statistics.
    ///
    /// Returns `Ok(None)` once the source is exhausted, and on every call
    /// after that. A failed read leaves the reader finished as well.
    pub fn next_window(&mut self) -> Result<Option<(Window, StatsSnapshot)>> {
        match self.read_records() {
            Ok(Some((headers, records))) => {
                let window = build_window(self.chunk_index, self.rows_read, &headers, &records);
                let snapshot = summarize_window(&window);

                debug!(
                    "Chunk {} from {}: {} rows, {} numeric columns",
                    self.chunk_index,
                    self.path.display(),
                    window.len(),
                    snapshot.len()
                );

                self.chunk_index += 1;
                self.rows_read += window.len();
                Ok(Some((window, snapshot)))
            }
            Ok(None) => {
                if !self.is_finished() {
                    debug!(
                        "Source {} exhausted after {} chunks ({} rows)",
                        self.path.display(),
                        self.chunk_index,
                        self.rows_read
                    );
                }
                self.cursor = Cursor::Finished;
                Ok(None)
            }
            Err(e) => {
                warn!("Failed to read chunk {}: {}", self.chunk_index, e);
                self.cursor = Cursor::Finished;
                Err(e)
            }
        }
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    /// Pull up to `chunk_size` raw records from the cursor, opening the file
    /// first if needed. `None` means no rows were left.
    fn read_records(&mut self) -> Result<Option<(Vec<String>, Vec<StringRecord>)>> {
        if matches!(self.cursor, Cursor::Pending) {
            self.cursor = self.open()?;
        }

        let Cursor::Open { reader, headers } = &mut self.cursor else {
            return Ok(None);
        };

        // Huge chunk sizes mean "everything"; grow on demand past this.
        let mut records = Vec::with_capacity(self.chunk_size.min(MAX_PREALLOCATED_ROWS));
        let mut record = StringRecord::new();
        while records.len() < self.chunk_size {
            let more = reader
                .read_record(&mut record)
                .map_err(|e| ChunkStatsError::source_unavailable(&self.path, e))?;
            if !more {
                break;
            }
            records.push(record.clone());
        }

        if records.is_empty() {
            return Ok(None);
        }
        Ok(Some((headers.clone(), records)))
    }

    fn open(&self) -> Result<Cursor> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| ChunkStatsError::source_unavailable(&self.path, e))?;

        let headers = dedupe_headers(
            reader
                .headers()
                .map_err(|e| ChunkStatsError::source_unavailable(&self.path, e))?
                .iter()
                .map(str::to_string)
                .collect(),
        );

        if headers.is_empty() {
            return Err(ChunkStatsError::source_unavailable(
                &self.path,
                "no header row",
            ));
        }

        debug!(
            "Opened {} with {} columns",
            self.path.display(),
            headers.len()
        );
        Ok(Cursor::Open { reader, headers })
    }
}

impl Iterator for ChunkedStatsReader {
    type Item = Result<(Window, StatsSnapshot)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }
        self.next_window().transpose()
    }
}

impl std::iter::FusedIterator for ChunkedStatsReader {}

// ── Tests ─────────────────────────────────────────────────────────────────────
