use crate::error::{HierarchyError, Result};
use crate::names::NameResolver;
use crate::types::{PathEvent, RootAggregate, RootKey};
use crate::visited::VisitedSet;
use inspector_protocol::SymbolKey;
use serde::Serialize;
use std::collections::HashMap;

/// Counters for one aggregation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorrelatorStats {
    pub path_events: usize,
    pub name_events: usize,
    pub malformed_events: usize,
    pub closed_hierarchies: usize,
}

/// Read-only view of a hierarchy that has not closed yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub distinct_nodes: usize,
    pub max_depth: usize,
    pub display_name: Option<String>,
}

/// What is left once the event stream ends
#[derive(Debug)]
pub struct Finished {
    /// Every name seen, for aggregates that closed before their name arrived
    pub names: NameResolver,

    /// Roots whose closing event never arrived, in key order
    pub incomplete: Vec<RootKey>,

    pub stats: CorrelatorStats,
}

struct OpenAggregate {
    symbol_key: SymbolKey,
    display_name: Option<String>,
    distinct_nodes: usize,
    max_depth: usize,
    visited: VisitedSet,
}

impl OpenAggregate {
    fn new(symbol_key: SymbolKey, display_name: Option<String>) -> Self {
        Self {
            symbol_key,
            display_name,
            distinct_nodes: 0,
            max_depth: 0,
            visited: VisitedSet::new(),
        }
    }
}

/// Turns root-to-node path events into per-root aggregates.
///
/// An aggregate lives in the working map from the first event naming its
/// root until the root's own stop event (a path of length 1). At that point
/// it is removed and returned to the caller, so a later event reusing the
/// same root key starts from scratch.
#[derive(Default)]
pub struct Correlator {
    open: HashMap<RootKey, OpenAggregate>,
    names: NameResolver,
    stats: CorrelatorStats,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from names collected by an earlier pass.
    pub fn with_names(names: NameResolver) -> Self {
        Self {
            names,
            ..Self::default()
        }
    }

    /// Apply one path event. Returns the aggregate when this event closes its
    /// root.
    pub fn observe(&mut self, event: &PathEvent) -> Result<Option<RootAggregate>> {
        self.stats.path_events += 1;

        let (Some(root), Some(current)) = (event.root(), event.current()) else {
            self.stats.malformed_events += 1;
            return Err(HierarchyError::malformed("path has no nodes"));
        };

        {
            let names = &self.names;
            let open = self.open.entry(root).or_insert_with(|| {
                let symbol_key = event.symbol_key().unwrap_or_else(|| SymbolKey::from(root));
                OpenAggregate::new(symbol_key, names.resolve(symbol_key).map(str::to_string))
            });

            if !open.visited.contains(current) {
                open.distinct_nodes += open.visited.mark_branch(&event.path);
            }
            open.max_depth = open.max_depth.max(event.depth());
        }

        if !event.closes_root() {
            return Ok(None);
        }

        // Dropping the open entry flushes its visited set.
        let Some(open) = self.open.remove(&root) else {
            return Ok(None);
        };
        self.stats.closed_hierarchies += 1;

        let aggregate = RootAggregate {
            root_key: root,
            symbol_key: open.symbol_key,
            display_name: open.display_name,
            source_file: event.source_file.clone(),
            total_duration: event.duration,
            distinct_nodes: open.distinct_nodes,
            max_depth: open.max_depth,
        };
        log::debug!(
            "closed hierarchy {} ({}): {:?}, {} instantiations, depth {}",
            aggregate.root_key,
            aggregate.symbol_key,
            aggregate.total_duration,
            aggregate.distinct_nodes,
            aggregate.max_depth
        );
        Ok(Some(aggregate))
    }

    /// Bind a display name to every aggregate, open or future, whose root
    /// symbol is `key`.
    pub fn attach_name(&mut self, key: SymbolKey, name: impl Into<String>) {
        self.stats.name_events += 1;
        let name = name.into();

        for open in self.open.values_mut().filter(|open| open.symbol_key == key) {
            open.display_name = Some(name.clone());
        }
        self.names.attach(key, name);
    }

    pub fn progress(&self, root: RootKey) -> Option<Progress> {
        self.open.get(&root).map(|open| Progress {
            distinct_nodes: open.distinct_nodes,
            max_depth: open.max_depth,
            display_name: open.display_name.clone(),
        })
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// End of stream. Hierarchies still open are reported, never closed.
    pub fn finish(self) -> Finished {
        let mut incomplete: Vec<RootKey> = self.open.into_keys().collect();
        incomplete.sort_unstable();

        if !incomplete.is_empty() {
            log::warn!(
                "{} hierarchy(ies) never closed before end of trace; they are left out of the results",
                incomplete.len()
            );
        }

        Finished {
            names: self.names,
            incomplete,
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inspector_protocol::NodeId;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::time::Duration;

    const A: NodeId = NodeId(1);
    const B: NodeId = NodeId(2);
    const C: NodeId = NodeId(3);
    const D: NodeId = NodeId(4);

    fn event(path: &[NodeId], ms: u64) -> PathEvent {
        PathEvent::new(path.to_vec(), Duration::from_millis(ms)).with_source_file("main.cpp")
    }

    fn feed(correlator: &mut Correlator, events: &[PathEvent]) -> Vec<RootAggregate> {
        events
            .iter()
            .filter_map(|e| correlator.observe(e).expect("well formed"))
            .collect()
    }

    #[test]
    fn redelivered_branches_are_counted_once() {
        let mut correlator = Correlator::new();
        let closed = feed(
            &mut correlator,
            &[
                event(&[A], 10),
                event(&[A, B], 4),
                event(&[A, B], 4),
                event(&[A, C], 3),
                event(&[A], 50),
            ],
        );

        // The first [A] closes a single-node hierarchy; the reused key then
        // opens a fresh one.
        assert_eq!(closed.len(), 2);
        assert_eq!(closed[0].distinct_nodes, 1);
        assert_eq!(closed[0].total_duration, Duration::from_millis(10));

        let last = &closed[1];
        assert_eq!(last.root_key, A);
        assert_eq!(last.distinct_nodes, 3);
        assert_eq!(last.max_depth, 2);
        assert_eq!(last.total_duration, Duration::from_millis(50));
        assert_eq!(last.source_file, "main.cpp");
        assert_eq!(correlator.open_count(), 0);
    }

    #[test]
    fn deep_branch_then_siblings() {
        let mut correlator = Correlator::new();
        let closed = feed(
            &mut correlator,
            &[
                event(&[A, B, C, D], 1),
                event(&[A, B, C], 2),
                event(&[A, B, D], 1),
                event(&[A, B], 5),
                event(&[A], 9),
            ],
        );
        assert_eq!(closed.len(), 1);
        // D appears under C and directly under B but is the same instance.
        assert_eq!(closed[0].distinct_nodes, 4);
        assert_eq!(closed[0].max_depth, 4);
    }

    #[test]
    fn closure_is_terminal_for_reused_root_key() {
        let mut correlator = Correlator::new();
        feed(&mut correlator, &[event(&[A, B], 1), event(&[A, C], 1), event(&[A], 5)]);
        assert_eq!(correlator.progress(A), None);

        correlator.observe(&event(&[A, B], 1)).unwrap();
        assert_eq!(
            correlator.progress(A),
            Some(Progress {
                distinct_nodes: 2,
                max_depth: 2,
                display_name: None,
            })
        );
    }

    #[test]
    fn roots_are_aggregated_independently() {
        let mut correlator = Correlator::new();
        let closed = feed(
            &mut correlator,
            &[
                event(&[A, B], 1),
                event(&[C, D], 1),
                event(&[C], 7),
                event(&[A], 3),
            ],
        );
        let roots: Vec<NodeId> = closed.iter().map(|agg| agg.root_key).collect();
        assert_eq!(roots, vec![C, A]);
        assert!(closed.iter().all(|agg| agg.distinct_nodes == 2));
    }

    #[test]
    fn empty_path_is_rejected_and_counted() {
        let mut correlator = Correlator::new();
        let err = correlator.observe(&event(&[], 1)).unwrap_err();
        assert!(matches!(err, HierarchyError::MalformedPathEvent(_)));

        correlator.observe(&event(&[A], 1)).unwrap();
        let stats = correlator.finish().stats;
        assert_eq!(stats.path_events, 2);
        assert_eq!(stats.malformed_events, 1);
        assert_eq!(stats.closed_hierarchies, 1);
    }

    #[test]
    fn name_before_during_and_after_give_same_result() {
        let events = [event(&[A, B], 1), event(&[A], 20)];
        let symbol = SymbolKey::from(A);

        let mut before = Correlator::new();
        before.attach_name(symbol, "Foo<int>");
        let from_before = feed(&mut before, &events).remove(0);

        let mut during = Correlator::new();
        during.observe(&events[0]).unwrap();
        during.attach_name(symbol, "Foo<int>");
        let from_during = feed(&mut during, &events[1..]).remove(0);

        let mut after = Correlator::new();
        let mut from_after = feed(&mut after, &events).remove(0);
        assert_eq!(from_after.display_name, None);
        after.attach_name(symbol, "Foo<int>");
        let finished = after.finish();
        assert!(finished.names.fill_blank(&mut from_after));

        assert_eq!(from_before, from_during);
        assert_eq!(from_during, from_after);
        assert_eq!(from_after.display_name.as_deref(), Some("Foo<int>"));
    }

    #[test]
    fn explicit_root_symbol_joins_names() {
        let mut correlator = Correlator::new();
        correlator.attach_name(SymbolKey(900), "Bar<char>");
        let closed = correlator
            .observe(&event(&[A], 2).with_root_symbol(SymbolKey(900)))
            .unwrap()
            .unwrap();
        assert_eq!(closed.symbol_key, SymbolKey(900));
        assert_eq!(closed.display_name_or_blank(), "Bar<char>");
    }

    #[test]
    fn seeded_names_apply_on_creation() {
        let snapshot = vec![(SymbolKey::from(A), "Seeded".to_string())]
            .into_iter()
            .collect();
        let mut correlator = Correlator::with_names(NameResolver::seeded(snapshot));
        correlator.observe(&event(&[A, B], 1)).unwrap();
        assert_eq!(
            correlator.progress(A).and_then(|p| p.display_name),
            Some("Seeded".to_string())
        );
    }

    #[test]
    fn finish_reports_unclosed_roots() {
        let mut correlator = Correlator::new();
        feed(
            &mut correlator,
            &[event(&[C, D], 1), event(&[A, B], 1), event(&[B], 1)],
        );
        let finished = correlator.finish();
        assert_eq!(finished.incomplete, vec![A, C]);
        assert_eq!(finished.stats.closed_hierarchies, 1);
    }

    /// Random tree as a parent table: node `i + 1` hangs under `parents[i]`.
    fn tree_strategy() -> impl Strategy<Value = Vec<usize>> {
        proptest::collection::vec(any::<prop::sample::Index>(), 0..40).prop_map(|picks| {
            picks
                .iter()
                .enumerate()
                .map(|(i, pick)| pick.index(i + 1))
                .collect()
        })
    }

    fn branch_of(parents: &[usize], mut node: usize) -> Vec<NodeId> {
        let mut path = vec![NodeId(node as u64 + 100)];
        while node > 0 {
            node = parents[node - 1];
            path.push(NodeId(node as u64 + 100));
        }
        path.reverse();
        path
    }

    proptest! {
        #[test]
        fn proptest_distinct_count_matches_union_of_paths(
            parents in tree_strategy(),
            redeliveries in proptest::collection::vec(any::<prop::sample::Index>(), 0..60),
        ) {
            let node_count = parents.len() + 1;
            let mut events: Vec<PathEvent> = (1..node_count)
                .rev()
                .map(|node| PathEvent::new(branch_of(&parents, node), Duration::from_micros(1)))
                .collect();
            for pick in &redeliveries {
                let node = pick.index(node_count);
                if node > 0 {
                    let at = pick.index(events.len() + 1);
                    events.insert(at, PathEvent::new(branch_of(&parents, node), Duration::from_micros(1)));
                }
            }
            events.push(PathEvent::new(branch_of(&parents, 0), Duration::from_millis(5)));

            let expected_depth = events.iter().map(PathEvent::depth).max().unwrap_or(0);

            let mut correlator = Correlator::new();
            let mut last_depth = 0;
            let mut last_count = 0;
            let mut closed = Vec::new();
            for e in &events {
                if let Some(aggregate) = correlator.observe(e).unwrap() {
                    closed.push(aggregate);
                } else if let Some(progress) = correlator.progress(NodeId(100)) {
                    prop_assert!(progress.max_depth >= last_depth);
                    prop_assert!(progress.distinct_nodes >= last_count);
                    last_depth = progress.max_depth;
                    last_count = progress.distinct_nodes;
                }
            }

            prop_assert_eq!(closed.len(), 1);
            prop_assert_eq!(closed[0].distinct_nodes, node_count);
            prop_assert_eq!(closed[0].max_depth, expected_depth);
        }
    }
}
