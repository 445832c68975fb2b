//! # Inspector Hierarchy
//!
//! Aggregates recursively expanding instantiation hierarchies from events that
//! carry the whole root-to-node path instead of a single parent/child edge.
//!
//! ## Architecture
//!
//! ```text
//! PathEvent [root, .., current]
//!     │
//!     ├──> Correlator
//!     │      ├─ look up / create the open aggregate for path[0]
//!     │      ├─ VisitedSet: walk path backward, stop at first marked node
//!     │      ├─ track max depth
//!     │      └─ path of length 1: close, flush visited set, hand off
//!     │
//!     ├──> NameResolver
//!     │      └─ symbol key -> display name, any arrival order
//!     │
//!     └──> RootAggregate (closed, immutable) ──> TopK selector
//! ```
//!
//! Work across a stream is bounded by the number of distinct nodes plus the
//! number of events: every redelivered ancestor chain is cut off at its first
//! already-counted node.
//!
//! ## Example
//!
//! ```rust
//! use inspector_hierarchy::{Correlator, PathEvent};
//! use inspector_protocol::NodeId;
//! use std::time::Duration;
//!
//! let mut correlator = Correlator::new();
//! let (a, b) = (NodeId(1), NodeId(2));
//!
//! correlator.observe(&PathEvent::new(vec![a, b], Duration::from_millis(4))).unwrap();
//! correlator.observe(&PathEvent::new(vec![a, b], Duration::from_millis(4))).unwrap();
//! let closed = correlator
//!     .observe(&PathEvent::new(vec![a], Duration::from_millis(50)))
//!     .unwrap()
//!     .expect("root closed");
//!
//! assert_eq!(closed.distinct_nodes, 2);
//! assert_eq!(closed.max_depth, 2);
//! ```

mod correlator;
mod error;
mod names;
mod types;
mod visited;

pub use correlator::{Correlator, CorrelatorStats, Finished, Progress};
pub use error::{HierarchyError, Result};
pub use names::{NameResolver, NameSnapshot};
pub use types::{PathEvent, RootAggregate, RootKey};
pub use visited::VisitedSet;
