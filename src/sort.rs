//! External sort (§4.5): bounded in-memory buffer, spill runs to disk,
//! k-way merge on completion.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;
use tempfile::{Builder as TempFileBuilder, NamedTempFile};

use crate::config::EngineConfig;
use crate::error::Error;
use crate::row::Row;
use crate::source::RowStream;

fn sort_rows(buf: &mut [Row], keys: &[String]) -> Result<(), Error> {
    let mut err = None;
    buf.sort_by(|a, b| {
        if err.is_some() {
            return Ordering::Equal;
        }
        match a.cmp_by_keys(b, keys) {
            Ok(o) => o,
            Err(e) => {
                err = Some(e);
                Ordering::Equal
            }
        }
    });
    if let Some(e) = err {
        return Err(e);
    }
    Ok(())
}

struct SpillFile {
    file: NamedTempFile,
}

impl SpillFile {
    fn write(dir: &Path, rows: &[Row]) -> Result<Self, Error> {
        let mut file = TempFileBuilder::new()
            .prefix("tabflow-sort-")
            .suffix(".jsonl")
            .tempfile_in(dir)
            .map_err(|e| Error::io(dir.to_path_buf(), e))?;
        {
            let mut writer = BufWriter::new(&mut file);
            for row in rows {
                let json = crate::io::jsonl::row_to_json(row);
                serde_json::to_writer(&mut writer, &json)
                    .map_err(|e| Error::Parse(e.to_string()))?;
                writer
                    .write_all(b"\n")
                    .map_err(|e| Error::io(dir.to_path_buf(), e))?;
            }
            writer.flush().map_err(|e| Error::io(dir.to_path_buf(), e))?;
        }
        debug!("sort: spilled {} rows to {}", rows.len(), file.path().display());
        Ok(SpillFile { file })
    }

    fn open_reader(&self) -> Result<Box<dyn Iterator<Item = Result<Row, Error>> + Send>, Error> {
        let path = self.file.path().to_path_buf();
        let reader = File::open(&path).map_err(|e| Error::io(path.clone(), e))?;
        Ok(crate::io::jsonl::lines(BufReader::new(reader), path))
    }
}

struct HeapEntry {
    row: Row,
    keys: std::sync::Arc<Vec<String>>,
    source: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.row.cmp_by_keys(&other.row, &self.keys).unwrap_or(Ordering::Equal) == Ordering::Equal
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the smallest key first.
        other
            .row
            .cmp_by_keys(&self.row, &self.keys)
            .unwrap_or(Ordering::Equal)
    }
}

/// Materializes `input` sorted ascending by `keys`, spilling to disk in
/// bounded-size runs per `config.spill_threshold`, then k-way merging
/// every run (plus any in-memory residue) lazily.
///
/// The draining, spilling, and merge setup below is itself deferred to
/// the returned stream's first `next()` call (see `ExternalSort`), not
/// performed here: a `Sort` operator must not touch its upstream or the
/// filesystem until the caller actually pulls a row.
pub fn external_sort(input: RowStream, keys: Vec<String>, config: &EngineConfig) -> RowStream {
    Box::new(ExternalSort {
        state: ExternalSortState::Pending {
            input,
            keys: std::sync::Arc::new(keys),
            config: config.clone(),
        },
    })
}

/// Drains `input` into bounded-size sorted runs, spilling each to disk
/// once `config.spill_threshold` is reached, and returns a stream over
/// the result: either the in-memory residue directly (no spills) or a
/// lazy k-way merge of every spill run plus the residue.
fn build_sorted_stream(
    input: RowStream,
    keys: std::sync::Arc<Vec<String>>,
    config: EngineConfig,
) -> Box<dyn Iterator<Item = Result<Row, Error>> + Send> {
    let threshold = config.spill_threshold.max(1);
    let dir = config.temp_dir.unwrap_or_else(std::env::temp_dir);

    let mut buffer: Vec<Row> = Vec::with_capacity(threshold.min(1 << 16));
    let mut spills: Vec<SpillFile> = Vec::new();

    for item in input {
        match item {
            Ok(row) => buffer.push(row),
            Err(e) => return Box::new(std::iter::once(Err(e))),
        }
        if buffer.len() >= threshold {
            if let Err(e) = sort_rows(&mut buffer, &keys) {
                return Box::new(std::iter::once(Err(e)));
            }
            match SpillFile::write(&dir, &buffer) {
                Ok(spill) => spills.push(spill),
                Err(e) => return Box::new(std::iter::once(Err(e))),
            }
            buffer.clear();
        }
    }
    if let Err(e) = sort_rows(&mut buffer, &keys) {
        return Box::new(std::iter::once(Err(e)));
    }

    if spills.is_empty() {
        // No spills: everything fit in memory, stream straight out.
        return Box::new(buffer.into_iter().map(Ok));
    }

    debug!(
        "sort: merging {} spill run(s) plus {} in-memory row(s)",
        spills.len(),
        buffer.len()
    );

    let mut streams: Vec<Box<dyn Iterator<Item = Result<Row, Error>> + Send>> = Vec::new();
    for spill in spills {
        match spill.open_reader() {
            Ok(reader) => streams.push(Box::new(SpillOwning { _spill: spill, inner: reader })),
            Err(e) => return Box::new(std::iter::once(Err(e))),
        }
    }
    streams.push(Box::new(buffer.into_iter().map(Ok)));

    Box::new(KWayMerge::new(streams, keys))
}

enum ExternalSortState {
    Pending {
        input: RowStream,
        keys: std::sync::Arc<Vec<String>>,
        config: EngineConfig,
    },
    Ready(Box<dyn Iterator<Item = Result<Row, Error>> + Send>),
}

/// Lazy wrapper around `build_sorted_stream`: holds its inputs untouched
/// until the first `next()` call, matching every other operator stream
/// in this crate (`flat_map` for `Map`, `Peekable` for `Reduce`/`Join`).
struct ExternalSort {
    state: ExternalSortState,
}

impl Iterator for ExternalSort {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let ExternalSortState::Pending { .. } = self.state {
            let ExternalSortState::Pending { input, keys, config } =
                std::mem::replace(&mut self.state, ExternalSortState::Ready(Box::new(std::iter::empty())))
            else {
                unreachable!()
            };
            self.state = ExternalSortState::Ready(build_sorted_stream(input, keys, config));
        }
        let ExternalSortState::Ready(inner) = &mut self.state else {
            unreachable!()
        };
        inner.next()
    }
}

/// Ties a spill file's lifetime to the reader drawing from it, so the
/// temp file is removed once the reader (and thus the merge) is done
/// with it, even on early cancellation by drop.
struct SpillOwning {
    _spill: SpillFile,
    inner: Box<dyn Iterator<Item = Result<Row, Error>> + Send>,
}

impl Iterator for SpillOwning {
    type Item = Result<Row, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

struct KWayMerge {
    streams: Vec<Box<dyn Iterator<Item = Result<Row, Error>> + Send>>,
    heap: BinaryHeap<HeapEntry>,
    keys: std::sync::Arc<Vec<String>>,
    initialized: bool,
    errored: bool,
}

impl KWayMerge {
    fn new(streams: Vec<Box<dyn Iterator<Item = Result<Row, Error>> + Send>>, keys: std::sync::Arc<Vec<String>>) -> Self {
        KWayMerge {
            streams,
            heap: BinaryHeap::new(),
            keys,
            initialized: false,
            errored: false,
        }
    }

    fn pull(&mut self, source: usize) -> Option<Result<Row, Error>> {
        self.streams[source].next()
    }
}

impl Iterator for KWayMerge {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.errored {
            return None;
        }
        if !self.initialized {
            self.initialized = true;
            for i in 0..self.streams.len() {
                match self.pull(i) {
                    Some(Ok(row)) => self.heap.push(HeapEntry { row, keys: self.keys.clone(), source: i }),
                    Some(Err(e)) => {
                        self.errored = true;
                        return Some(Err(e));
                    }
                    None => {}
                }
            }
        }

        let entry = self.heap.pop()?;
        match self.pull(entry.source) {
            Some(Ok(row)) => self.heap.push(HeapEntry { row, keys: self.keys.clone(), source: entry.source }),
            Some(Err(e)) => {
                self.errored = true;
                return Some(Err(e));
            }
            None => {}
        }
        Some(Ok(entry.row))
    }
}
