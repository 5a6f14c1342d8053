use std::io::{self, Write};

use camino::Utf8Path;
use serde::Serialize;

use crate::domain::{CategorySummary, SummaryKind};
use crate::error::AnnotationError;
use crate::fs_util;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

#[derive(Debug, Serialize)]
struct SummaryDocument<'a> {
    tool: String,
    generated_at: String,
    #[serde(flatten)]
    summary: &'a CategorySummary,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(summary: &CategorySummary) -> io::Result<()> {
        let document = SummaryDocument {
            tool: format!("kira-as/{}", env!("CARGO_PKG_VERSION")),
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary,
        };
        let json = serde_json::to_string_pretty(&document).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl crate::app::ProgressSink for JsonOutput {
    fn event(&self, _event: crate::app::ProgressEvent) {}
}

/// Tab-separated table with one header line, rows in summary order.
pub fn render_tsv(summary: &CategorySummary) -> String {
    let (top, mid) = column_names(summary.kind);
    let mut out = format!("{top}\t{mid}\tCount\tPercent\n");
    for row in &summary.rows {
        out.push_str(&format!(
            "{}\t{}\t{}\t{:.4}\n",
            row.top, row.mid, row.count, row.percentage
        ));
    }
    out
}

pub fn write_tsv(path: &Utf8Path, summary: &CategorySummary) -> Result<(), AnnotationError> {
    fs_util::write_atomic(path, render_tsv(summary).as_bytes())
}

pub fn column_names(kind: SummaryKind) -> (&'static str, &'static str) {
    match kind {
        SummaryKind::Kegg => ("Level1", "Level2"),
        SummaryKind::Cog => ("Macro", "COG"),
        SummaryKind::Go => ("Domain", "Term"),
    }
}

pub fn print_summary(summary: &CategorySummary) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    println!("{cyan}{} category summary{reset}", summary.kind);
    println!(
        "{green}annotated: {}  categories: {}  shown: {}{reset}",
        summary.total,
        summary.resolved_categories,
        summary.rows.len()
    );
    if summary.unmapped_tokens > 0 {
        println!(
            "{yellow}unresolved identifiers: {}{reset}",
            summary.unmapped_tokens
        );
    }

    let width = summary
        .rows
        .iter()
        .map(|row| row.mid.chars().count())
        .max()
        .unwrap_or(0);
    let mut current_top: Option<&str> = None;
    for row in &summary.rows {
        if summary.kind == SummaryKind::Go && current_top != Some(row.top.as_str()) {
            println!("{cyan}{}{reset}", row.top);
            current_top = Some(row.top.as_str());
        }
        if summary.kind == SummaryKind::Go {
            println!(
                "  {:<width$}  {:>6}  {:>5.1}%",
                row.mid, row.count, row.percentage
            );
        } else {
            println!(
                "  {:<width$}  {:>6}  {:>5.1}%  {yellow}{}{reset}",
                row.mid, row.count, row.percentage, row.top
            );
        }
    }
}
