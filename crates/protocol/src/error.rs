use std::path::PathBuf;
use thiserror::Error;

/// Result type for trace decoding operations
pub type Result<T> = std::result::Result<T, TraceError>;

/// Host-level failures. Any of these aborts the analysis before aggregation.
#[derive(Error, Debug)]
pub enum TraceError {
    /// The trace could not be opened or read
    #[error("failed to read trace {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line is not a valid trace record
    #[error("invalid trace record at line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The trace has no template instantiation events at all
    #[error("trace contains no template instantiation events (was template tracing enabled?)")]
    MissingEvents,
}

impl TraceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
