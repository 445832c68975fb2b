//! Two-pass analysis: the first pass freezes every symbol name into a
//! [`NameSnapshot`], the second replays the trace through the correlator and
//! the top-K selector.

use crate::config::InspectorConfig;
use anyhow::{Context, Result};
use inspector_hierarchy::{
    Correlator, CorrelatorStats, NameResolver, NameSnapshot, PathEvent, RootAggregate,
};
use inspector_protocol::{TraceError, TraceRecord, TraceSource};
use inspector_ranking::TopK;
use serde::Serialize;

/// Output of the first pass
#[derive(Debug, Clone)]
pub struct NamePass {
    pub names: NameSnapshot,
    pub branch_records: usize,
}

/// Everything the report needs
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: String,

    /// Requested number of hierarchies
    pub top: usize,

    /// Closed hierarchies, longest first, at most `top`
    pub hierarchies: Vec<RootAggregate>,

    pub stats: CorrelatorStats,

    /// Roots still open at end of trace
    pub incomplete_hierarchies: usize,
}

/// Pass 1: gather symbol names and check the trace has instantiation events.
pub fn collect_names(source: &dyn TraceSource) -> Result<NamePass> {
    let mut branch_records = 0usize;
    let mut names = Vec::new();

    for record in source.replay()? {
        match record? {
            TraceRecord::InstantiationBranch(_) => branch_records += 1,
            TraceRecord::SymbolName(name) => names.push((name.key, name.name)),
            TraceRecord::Unknown => {}
        }
    }

    if branch_records == 0 {
        return Err(TraceError::MissingEvents.into());
    }

    let names: NameSnapshot = names.into_iter().collect();
    log::debug!(
        "name pass over {}: {} branch record(s), {} name(s)",
        source.describe(),
        branch_records,
        names.len()
    );
    Ok(NamePass {
        names,
        branch_records,
    })
}

/// Pass 2: aggregate hierarchies and keep the `top` longest.
pub fn aggregate(
    source: &dyn TraceSource,
    names: NameSnapshot,
    top: usize,
) -> Result<AnalysisReport> {
    let mut correlator = Correlator::with_names(NameResolver::seeded(names));
    let mut selector = TopK::new(top);
    let mut skipped_unknown = 0usize;

    for record in source.replay()? {
        match record? {
            TraceRecord::InstantiationBranch(branch) => {
                match correlator.observe(&PathEvent::from(&branch)) {
                    Ok(Some(closed)) => {
                        selector.offer(closed);
                    }
                    Ok(None) => {}
                    Err(err) => log::warn!("skipping record: {err}"),
                }
            }
            TraceRecord::SymbolName(name) => correlator.attach_name(name.key, name.name),
            TraceRecord::Unknown => skipped_unknown += 1,
        }
    }

    if skipped_unknown > 0 {
        log::debug!("ignored {skipped_unknown} record(s) of unknown kind");
    }
    log::debug!(
        "end of trace: {} hierarchy(ies) open, {} candidate(s) discarded",
        correlator.open_count(),
        selector.discarded()
    );

    let finished = correlator.finish();
    let top = selector.capacity();
    let mut hierarchies = selector.drain();
    for hierarchy in &mut hierarchies {
        finished.names.fill_blank(hierarchy);
    }

    log::info!(
        "{} hierarchy(ies) closed from {} path event(s); reporting {}",
        finished.stats.closed_hierarchies,
        finished.stats.path_events,
        hierarchies.len()
    );

    Ok(AnalysisReport {
        source: source.describe(),
        top,
        hierarchies,
        stats: finished.stats,
        incomplete_hierarchies: finished.incomplete.len(),
    })
}

/// Run both passes.
pub fn analyze(source: &dyn TraceSource, config: &InspectorConfig) -> Result<AnalysisReport> {
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    let pass = collect_names(source)
        .with_context(|| format!("failed to scan trace {}", source.describe()))?;
    log::debug!("{} branch record(s) to aggregate", pass.branch_records);

    aggregate(source, pass.names, config.top)
        .with_context(|| format!("failed to analyze trace {}", source.describe()))
}
