use crate::error::{Result, TraceError};
use crate::record::TraceRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;

/// Records of one pass over a trace, in trace order.
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<TraceRecord>> + 'a>;

/// A trace that can be replayed from the start once per analysis pass.
pub trait TraceSource {
    /// Human readable origin, used in log lines
    fn describe(&self) -> String;

    /// Start a fresh pass over every record
    fn replay(&self) -> Result<RecordIter<'_>>;
}

/// Decode one JSON Lines entry. Blank lines and `#` comments yield `None`.
/// `line` is 1-based and only used for error reporting.
pub fn decode_line(line: usize, text: &str) -> Result<Option<TraceRecord>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| TraceError::Decode { line, source })
}

/// Trace stored on disk; every pass re-opens the file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Open the trace once up front so an unreadable file fails before any
    /// pass starts.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        File::open(&path).map_err(|err| TraceError::io(&path, err))?;
        log::debug!("opened trace {}", path.display());
        Ok(Self { path })
    }
}

impl TraceSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn replay(&self) -> Result<RecordIter<'_>> {
        let file = File::open(&self.path).map_err(|err| TraceError::io(&self.path, err))?;
        let reader = BufReader::new(file);

        let iter = reader
            .lines()
            .enumerate()
            .filter_map(move |(idx, line)| match line {
                Ok(text) => decode_line(idx + 1, &text).transpose(),
                Err(err) => Some(Err(TraceError::io(&self.path, err))),
            });
        Ok(Box::new(iter))
    }
}

/// Trace held in memory. Used for stdin, where the stream cannot be re-read.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<TraceRecord>,
}

impl MemorySource {
    /// Decode a whole JSON Lines document.
    pub fn parse(text: &str) -> Result<Self> {
        let mut records = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if let Some(record) = decode_line(idx + 1, line)? {
                records.push(record);
            }
        }
        Ok(Self { records })
    }

    /// Buffer everything `reader` yields. `origin` names the stream in errors.
    pub fn from_reader(mut reader: impl Read, origin: &str) -> Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|err| TraceError::io(origin, err))?;
        Self::parse(&text)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TraceSource for MemorySource {
    fn describe(&self) -> String {
        format!("<memory: {} records>", self.records.len())
    }

    fn replay(&self) -> Result<RecordIter<'_>> {
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}
