use crate::ids::{NodeId, SymbolKey};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One line of a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceRecord {
    /// Stop of an instantiation, with the full root-to-node branch
    InstantiationBranch(BranchRecord),

    /// Display name of a symbol, delivered independently of branches
    SymbolName(NameRecord),

    /// Any record kind this version does not understand
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRecord {
    /// Node ids from the hierarchy root (index 0) to the closing node
    pub path: Vec<NodeId>,

    /// Self duration of the closing node
    pub duration_ns: u64,

    /// Symbol key of the root specialization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_symbol: Option<SymbolKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_object: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub key: SymbolKey,
    pub name: String,
}

impl BranchRecord {
    pub fn duration(&self) -> Duration {
        Duration::from_nanos(self.duration_ns)
    }

    /// Source path of the translation unit, or the output object path when
    /// no source path was recorded.
    pub fn file(&self) -> &str {
        non_empty(self.source_file.as_deref())
            .or_else(|| non_empty(self.output_object.as_deref()))
            .unwrap_or("")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
