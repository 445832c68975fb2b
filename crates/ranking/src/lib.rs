//! # Inspector Ranking
//!
//! Keeps the K largest items of an unbounded stream without sorting it.
//!
//! ```text
//! offer(item) ──> held < K ? ──yes──> push
//!                     │
//!                     no
//!                     │
//!                     └──> key >= held minimum ? ──yes──> evict minimum, push
//!                                    │
//!                                    no ──> discard
//! ```
//!
//! Both insert and evict are O(log K) on a min-heap.
//!
//! ## Example
//!
//! ```rust
//! use inspector_ranking::{Ranked, TopK};
//!
//! struct Job(u64);
//!
//! impl Ranked for Job {
//!     type Key = u64;
//!     fn rank_key(&self) -> u64 {
//!         self.0
//!     }
//! }
//!
//! let mut top = TopK::new(2);
//! for cost in [100, 50, 200, 10] {
//!     top.offer(Job(cost));
//! }
//! let kept: Vec<u64> = top.drain().into_iter().map(|job| job.0).collect();
//! assert_eq!(kept, vec![200, 100]);
//! ```

mod top_k;

pub use top_k::{normalize_count, Offer, Ranked, TopK, DEFAULT_TOP_COUNT};
