// src/output/report.rs
use std::fs;
use std::path::Path;
use std::str::FromStr;
use chrono::Local;
use crate::error::{Result, XrayError};
use crate::xray::ScanReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = XrayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "txt" | "text" => Ok(OutputFormat::Text),
            other => Err(XrayError::Config(format!("unknown output format: {}", other))),
        }
    }
}

/// Writes `report` to `path`, creating parent directories as needed.
pub fn write(path: &Path, report: &ScanReport, format: OutputFormat) -> Result<()> {
    let content = render(report, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    Ok(())
}

pub fn render(report: &ScanReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

fn render_text(report: &ScanReport) -> String {
    let mut content = String::new();

    content.push_str("# XRAY SCAN REPORT\n");
    content.push_str(&format!("Date: {}\n\n", Local::now().format("%Y-%m-%d %H:%M:%S")));

    content.push_str("## SUMMARY\n");
    content.push_str(&format!("Safe: {}\n", if report.is_safe() { "yes" } else { "no" }));
    content.push_str(&format!("Vulnerabilities: {}\n", report.total_vulns()));
    content.push_str(&format!("Runs: {}\n\n", report.command_lines.len()));

    content.push_str("## COMMANDS\n");
    for cmd in &report.command_lines {
        content.push_str(&format!("- {}\n", cmd));
    }
    content.push('\n');

    if !report.scan_info.warnings.is_empty() {
        content.push_str("## WARNINGS\n");
        for warning in &report.scan_info.warnings {
            content.push_str(&format!("- {}\n", warning.trim_end()));
        }
        content.push('\n');
    }

    if !report.scan_info.errors.is_empty() {
        content.push_str("## ERRORS\n");
        for error in &report.scan_info.errors {
            content.push_str(&format!("{}\n\n", error.trim_end()));
        }
    }

    if !report.findings.is_empty() {
        content.push_str("## VULNERABILITIES\n");
        for finding in &report.findings {
            content.push_str(&format!("- {} - {}\n", finding.vuln_name, finding.target));
            if !finding.payload.is_empty() {
                content.push_str(&format!("  Payload: {}\n", finding.payload));
            }
            content.push_str(&format!("  Time: {}\n", finding.event_time));
            if !finding.request.is_empty() {
                content.push_str(&format!("  Request:\n{}\n", indent(&finding.request)));
            }
            if !finding.response.is_empty() {
                content.push_str(&format!("  Response:\n{}\n", indent(&finding.response)));
            }
        }
    }

    content
}

fn indent(block: &str) -> String {
    block
        .lines()
        .map(|l| format!("    {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}
