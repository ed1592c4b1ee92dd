//! Census report generation.
//!
//! Renders a [`CensusReport`] as console text, Markdown, or JSON.

use crate::cli::OutputFormat;
use crate::models::{CensusReport, ReportMetadata, Timeline};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

const TIMELINE_BANNER: &str =
    "****************************TimeLine Information grouped by planet size****************************";
const TIMELINE_FOOTER: &str = "********************************************************";

/// Render a report in the requested format.
pub fn render(report: &CensusReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(generate_text_report(report)),
        OutputFormat::Markdown => Ok(generate_markdown_report(report)),
        OutputFormat::Json => generate_json_report(report),
    }
}

/// Labeled console lines, one per aggregate.
pub fn generate_text_report(report: &CensusReport) -> String {
    let mut output = String::new();

    output.push_str(&orphan_line(report.orphan_count));
    output.push('\n');
    output.push_str(&hottest_line(&report.hottest_star_planet));
    output.push('\n');

    if !report.timeline.is_empty() {
        output.push_str(&format!("\n{}\n\n", TIMELINE_BANNER));
        for line in timeline_lines(&report.timeline) {
            output.push_str(&line);
            output.push_str("\n\n");
        }
        output.push_str(&format!("\n{}\n", TIMELINE_FOOTER));
    }

    output
}

fn orphan_line(count: usize) -> String {
    format!("The number of orphan planets (no star): {}", count)
}

fn hottest_line(identifier: &str) -> String {
    format!(
        "The name (planet identifier) of the planet orbiting the hottest star: {}",
        identifier
    )
}

/// One human-readable sentence per timeline year.
pub fn timeline_lines(timeline: &Timeline) -> Vec<String> {
    timeline
        .entries
        .iter()
        .map(|t| {
            format!(
                "In {} we discovered {} small planets, {} medium planets and {} large planets",
                t.year, t.small, t.medium, t.large
            )
        })
        .collect()
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &CensusReport) -> String {
    let mut output = String::new();

    output.push_str("# Exoplanet Census\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(report));
    output.push_str(&generate_timeline_section(&report.timeline));
    output.push_str("---\n\n*Report generated by exocensus*\n");

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Records Analyzed:** {}\n",
        metadata.records_analyzed
    ));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n\n",
        metadata.duration_seconds
    ));

    section
}

fn generate_summary_section(report: &CensusReport) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str(&format!(
        "- **Orphan planets (no star):** {}\n",
        report.orphan_count
    ));
    if report.hottest_star_planet.is_empty() {
        section.push_str("- **Planet orbiting the hottest star:** n/a\n\n");
    } else {
        section.push_str(&format!(
            "- **Planet orbiting the hottest star:** `{}`\n\n",
            report.hottest_star_planet
        ));
    }

    section
}

fn generate_timeline_section(timeline: &Timeline) -> String {
    let mut section = String::new();

    section.push_str("## Discovery Timeline\n\n");

    if timeline.is_empty() {
        section.push_str("No discovery years in the dataset.\n\n");
        return section;
    }

    section.push_str("| Year | Small (< 1 Rj) | Medium (1-2 Rj) | Large (>= 2 Rj) | Sized |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|\n");
    for t in &timeline.entries {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            t.year,
            t.small,
            t.medium,
            t.large,
            t.total()
        ));
    }
    section.push('\n');

    section
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a CensusReport,
    timeline_flat: Vec<Value>,
}

/// Generate a JSON report.
pub fn generate_json_report(report: &CensusReport) -> Result<String> {
    let json = JsonReport {
        report,
        timeline_flat: report.timeline.flatten(),
    };
    serde_json::to_string_pretty(&json).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
