//! # Inspector Protocol
//!
//! Wire-level vocabulary shared by the template-inspector crates: node and
//! symbol identifiers, the JSON Lines trace records, and replayable trace
//! sources that let the analysis pipeline run more than one pass.
//!
//! ## Trace format
//!
//! ```text
//! # comment lines and blank lines are ignored
//! {"kind":"instantiation_branch","path":[1,2],"duration_ns":4000,"root_symbol":77,"source_file":"a.cpp"}
//! {"kind":"symbol_name","key":77,"name":"Foo<int>"}
//! ```
//!
//! ## Example
//!
//! ```rust
//! use inspector_protocol::{MemorySource, TraceRecord, TraceSource};
//!
//! let source = MemorySource::parse(
//!     r#"{"kind":"symbol_name","key":7,"name":"Foo<int>"}"#,
//! ).unwrap();
//!
//! let records: Vec<TraceRecord> = source
//!     .replay()
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(records.len(), 1);
//! ```

mod error;
mod ids;
mod record;
mod source;

pub use error::{Result, TraceError};
pub use ids::{NodeId, SymbolKey};
pub use record::{BranchRecord, NameRecord, TraceRecord};
pub use source::{decode_line, FileSource, MemorySource, RecordIter, TraceSource};
