//! Formatted output helpers for CLI commands.

use std::collections::BTreeMap;

use stratum_compose::output::ResolvedValue;
use stratum_compose::resolver::ResolvedGraph;

/// Returns a horizontal rule of `width` box-drawing characters.
#[must_use]
pub fn rule(width: usize) -> String {
    "\u{2550}".repeat(width)
}

/// Formats each resolved resource as `  + kind.id`, followed by the ids it
/// references on an indented line.
#[must_use]
pub fn order_lines(resolved: &ResolvedGraph<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    for descriptor in resolved.iter() {
        lines.push(format!("  + {}.{}", descriptor.kind, descriptor.id));
        let deps = resolved.dependencies_of(&descriptor.id);
        if !deps.is_empty() {
            lines.push(format!("      after: {}", deps.join(", ")));
        }
    }
    lines
}

/// Formats outputs as `name = value`, names padded to a common width.
#[must_use]
pub fn output_lines(outputs: &BTreeMap<String, ResolvedValue>) -> Vec<String> {
    let width = outputs.keys().map(String::len).max().unwrap_or(0);
    outputs
        .iter()
        .map(|(name, value)| format!("{name:<width$} = {value}"))
        .collect()
}
