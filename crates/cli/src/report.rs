use crate::pipeline::AnalysisReport;
use anyhow::Result;

pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    if report.top == 1 {
        out.push_str("Top template instantiation hierarchy:");
    } else {
        out.push_str(&format!(
            "Top {} template instantiation hierarchies",
            report.top
        ));
    }
    out.push_str("\n\n");

    for hierarchy in &report.hierarchies {
        out.push_str(&format!("File:           {}\n", hierarchy.source_file));
        out.push_str(&format!("Duration:       {} ms\n", hierarchy.duration_ms()));
        out.push_str(&format!("Max Depth:      {}\n", hierarchy.max_depth));
        out.push_str(&format!("Instantiations: {}\n", hierarchy.distinct_nodes));
        out.push_str(&format!(
            "Root Name:      {}\n\n",
            hierarchy.display_name_or_blank()
        ));
    }

    out
}

pub fn render_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inspector_hierarchy::{CorrelatorStats, RootAggregate};
    use inspector_protocol::{NodeId, SymbolKey};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn report(top: usize, hierarchies: Vec<RootAggregate>) -> AnalysisReport {
        AnalysisReport {
            source: "trace.jsonl".to_string(),
            top,
            hierarchies,
            stats: CorrelatorStats::default(),
            incomplete_hierarchies: 0,
        }
    }

    fn hierarchy(name: Option<&str>) -> RootAggregate {
        RootAggregate {
            root_key: NodeId(1),
            symbol_key: SymbolKey(1),
            display_name: name.map(str::to_string),
            source_file: "main.cpp".to_string(),
            total_duration: Duration::from_micros(50_900),
            distinct_nodes: 3,
            max_depth: 2,
        }
    }

    #[test]
    fn text_report_matches_console_layout() {
        let text = render_text(&report(5, vec![hierarchy(Some("Foo<int>"))]));
        assert_eq!(
            text,
            "Top 5 template instantiation hierarchies\n\n\
             File:           main.cpp\n\
             Duration:       50 ms\n\
             Max Depth:      2\n\
             Instantiations: 3\n\
             Root Name:      Foo<int>\n\n"
        );
    }

    #[test]
    fn single_entry_heading_and_blank_name() {
        let text = render_text(&report(1, vec![hierarchy(None)]));
        assert!(text.starts_with("Top template instantiation hierarchy:\n\n"));
        assert!(text.contains("Root Name:      \n"));
    }

    #[test]
    fn json_report_uses_whole_milliseconds() {
        let json = render_json(&report(5, vec![hierarchy(None)])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["top"], 5);
        assert_eq!(value["hierarchies"][0]["duration_ms"], 50);
        assert_eq!(value["hierarchies"][0]["display_name"], serde_json::Value::Null);
        assert_eq!(value["stats"]["closed_hierarchies"], 0);
    }
}
