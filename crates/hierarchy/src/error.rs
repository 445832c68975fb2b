use thiserror::Error;

pub type Result<T> = std::result::Result<T, HierarchyError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// The event is skipped; aggregation of every other root continues.
    #[error("Malformed path event: {0}")]
    MalformedPathEvent(String),
}

impl HierarchyError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPathEvent(msg.into())
    }
}
