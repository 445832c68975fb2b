use inspector_protocol::{BranchRecord, NodeId, SymbolKey};
use inspector_ranking::Ranked;
use serde::Serialize;
use std::time::Duration;

/// Node identity of a hierarchy's root. All aggregation is keyed by it.
pub type RootKey = NodeId;

/// One delivered branch: every node from the root down to the closing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEvent {
    /// Root first, closing node last
    pub path: Vec<NodeId>,

    /// Self duration of the closing node
    pub duration: Duration,

    /// Translation unit that owns the root
    pub source_file: String,

    /// Stable symbol key of the root, if the trace recorded one
    pub root_symbol: Option<SymbolKey>,
}

impl PathEvent {
    pub fn new(path: Vec<NodeId>, duration: Duration) -> Self {
        Self {
            path,
            duration,
            source_file: String::new(),
            root_symbol: None,
        }
    }

    pub fn with_source_file(mut self, file: impl Into<String>) -> Self {
        self.source_file = file.into();
        self
    }

    pub fn with_root_symbol(mut self, key: SymbolKey) -> Self {
        self.root_symbol = Some(key);
        self
    }

    pub fn root(&self) -> Option<RootKey> {
        self.path.first().copied()
    }

    pub fn current(&self) -> Option<NodeId> {
        self.path.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// True for the stop event of the root itself
    pub fn closes_root(&self) -> bool {
        self.path.len() == 1
    }

    /// Key used to join display names; the root node id when no symbol key
    /// was recorded.
    pub fn symbol_key(&self) -> Option<SymbolKey> {
        self.root_symbol.or_else(|| self.root().map(SymbolKey::from))
    }
}

impl From<&BranchRecord> for PathEvent {
    fn from(record: &BranchRecord) -> Self {
        Self {
            path: record.path.clone(),
            duration: record.duration(),
            source_file: record.file().to_string(),
            root_symbol: record.root_symbol,
        }
    }
}

/// Statistics of one closed hierarchy. Never mutated by the correlator once
/// handed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootAggregate {
    pub root_key: RootKey,
    pub symbol_key: SymbolKey,

    /// Unset until a matching name record is seen
    pub display_name: Option<String>,

    pub source_file: String,

    /// Duration of the root's own instantiation, which spans the hierarchy
    #[serde(rename = "duration_ms", serialize_with = "serialize_duration_ms")]
    pub total_duration: Duration,

    /// Instantiations counted once each, root included
    pub distinct_nodes: usize,

    pub max_depth: usize,
}

impl RootAggregate {
    pub fn duration_ms(&self) -> u128 {
        self.total_duration.as_millis()
    }

    pub fn display_name_or_blank(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }
}

impl Ranked for RootAggregate {
    type Key = Duration;

    fn rank_key(&self) -> Duration {
        self.total_duration
    }
}

fn serialize_duration_ms<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
