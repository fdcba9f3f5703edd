//! Console and JSON rendering of dispatch results.

use crate::error::Result;
use crate::handler::Outcome;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub request: String,
    pub outcome: Outcome,
}

impl Entry {
    /// `"NodeA handled Handler1"` or `"Handler3 was not handled"`.
    pub fn line(&self) -> String {
        match &self.outcome {
            Outcome::Handled(reply) => reply.message.clone(),
            Outcome::Unhandled => format!("{} was not handled", self.request),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub chain: String,
    pub entries: Vec<Entry>,
}

impl DispatchReport {
    pub fn new(chain: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, request: impl Into<String>, outcome: Outcome) {
        self.entries.push(Entry {
            request: request.into(),
            outcome,
        });
    }

    /// Requests accepted per handler, keyed by handler name.
    pub fn handled_by(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for handler in self.entries.iter().filter_map(|e| e.outcome.handler()) {
            *counts.entry(handler).or_insert(0) += 1;
        }
        counts
    }

    pub fn unhandled(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.outcome.is_handled())
            .count()
    }

    pub fn render(&self, use_colors: bool) -> String {
        let mut output = String::new();
        output.push_str(&format!("Chain: {}\n", self.chain));

        for entry in &self.entries {
            let line = entry.line();
            let line = match (&entry.outcome, use_colors) {
                (Outcome::Handled(_), true) => line.green().to_string(),
                (Outcome::Unhandled, true) => line.yellow().to_string(),
                (_, false) => line,
            };
            output.push_str(&format!("  {line}\n"));
        }

        output.push_str(&self.summary());
        output
    }

    pub fn summary(&self) -> String {
        let count = self.entries.len();
        let plural = if count == 1 { "" } else { "s" };
        let mut summary = format!("Summary: {count} request{plural}");

        for (handler, handled) in self.handled_by() {
            summary.push_str(&format!(", {handler}: {handled}"));
        }
        summary.push_str(&format!(", unhandled: {}\n", self.unhandled()));
        summary
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn should_use_colors() -> bool {
        std::env::var_os("NO_COLOR").is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;

    fn scenario_report() -> DispatchReport {
        let chain = ChainConfig::support_desk().build().unwrap();
        let mut report = DispatchReport::new(chain.to_string());
        for request in ["Handler1", "Handler2", "Handler3", "Handler1"] {
            report.record(request, chain.dispatch(request));
        }
        report
    }

    #[test]
    fn test_lines_match_console_format() {
        let report = scenario_report();
        let lines: Vec<_> = report.entries.iter().map(Entry::line).collect();
        assert_eq!(
            lines,
            vec![
                "NodeA handled Handler1",
                "NodeB handled Handler2",
                "Handler3 was not handled",
                "NodeA handled Handler1",
            ]
        );
    }

    #[test]
    fn test_counts() {
        let report = scenario_report();
        let counts = report.handled_by();
        assert_eq!(counts.get("NodeA"), Some(&2));
        assert_eq!(counts.get("NodeB"), Some(&1));
        assert_eq!(report.unhandled(), 1);
    }

    #[test]
    fn test_plain_render() {
        let rendered = scenario_report().render(false);
        assert!(rendered.starts_with("Chain: NodeA -> NodeB\n"));
        assert!(rendered.contains("  Handler3 was not handled\n"));
        assert!(rendered.ends_with("Summary: 4 requests, NodeA: 2, NodeB: 1, unhandled: 1\n"));
    }

    #[test]
    fn test_summary_pluralization() {
        let mut report = DispatchReport::new("empty");
        report.record("x", Outcome::Unhandled);
        assert!(report.summary().starts_with("Summary: 1 request,"));
    }

    #[test]
    fn test_no_color_environment() {
        std::env::set_var("NO_COLOR", "1");
        assert!(!DispatchReport::should_use_colors());
        std::env::remove_var("NO_COLOR");
        assert!(DispatchReport::should_use_colors());
    }

    #[test]
    fn test_json_output() {
        let json: serde_json::Value =
            serde_json::from_str(&scenario_report().to_json().unwrap()).unwrap();
        assert_eq!(json["chain"], "NodeA -> NodeB");
        assert_eq!(json["entries"][0]["outcome"]["status"], "handled");
        assert_eq!(json["entries"][2]["outcome"]["status"], "unhandled");
        assert_eq!(json["entries"][2]["request"], "Handler3");
    }
}
