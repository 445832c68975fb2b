use crate::types::RootAggregate;
use inspector_protocol::SymbolKey;
use std::collections::HashMap;

/// Names gathered by a first pass over a trace. Frozen once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSnapshot {
    names: HashMap<SymbolKey, String>,
}

impl NameSnapshot {
    pub fn get(&self, key: SymbolKey) -> Option<&str> {
        self.names.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Later records for the same key win, matching a sequential replay.
impl FromIterator<(SymbolKey, String)> for NameSnapshot {
    fn from_iter<I: IntoIterator<Item = (SymbolKey, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Symbol key to display name table used while aggregating.
///
/// Names for aggregates that do not exist yet stay here until the aggregate
/// is created; names that arrive after an aggregate closed are applied with
/// [`NameResolver::fill_blank`].
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    names: HashMap<SymbolKey, String>,
}

impl NameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with every name a previous pass collected.
    pub fn seeded(snapshot: NameSnapshot) -> Self {
        Self {
            names: snapshot.names,
        }
    }

    /// Record a name. Returns `false` if the same name was already known.
    pub fn attach(&mut self, key: SymbolKey, name: String) -> bool {
        match self.names.get(&key) {
            Some(existing) if *existing == name => false,
            _ => {
                self.names.insert(key, name);
                true
            }
        }
    }

    pub fn resolve(&self, key: SymbolKey) -> Option<&str> {
        self.names.get(&key).map(String::as_str)
    }

    /// Set the display name of a closed aggregate that has none yet.
    pub fn fill_blank(&self, aggregate: &mut RootAggregate) -> bool {
        if aggregate.display_name.is_some() {
            return false;
        }
        match self.resolve(aggregate.symbol_key) {
            Some(name) => {
                aggregate.display_name = Some(name.to_string());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
