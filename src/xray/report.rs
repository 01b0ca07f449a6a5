// src/xray/report.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One vulnerability reported by xray, projected from its raw JSON item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub vuln_name: String,
    pub target: String,
    pub payload: String,
    pub request: String,
    pub response: String,
    /// `create_time` exactly as xray wrote it (milliseconds since epoch in current releases)
    pub event_time: Value,
}

/// Item of the array xray writes with `--json-output`.
///
/// Only the fields the report needs are decoded, everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVuln {
    pub plugin: String,
    pub target: RawTarget,
    #[serde(default)]
    pub detail: RawDetail,
    #[serde(default)]
    pub create_time: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTarget {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDetail {
    #[serde(default)]
    pub payload: String,
    /// `[request, response]` pairs; only the first pair is kept
    #[serde(default)]
    pub snapshot: Vec<Vec<String>>,
}

impl From<RawVuln> for Finding {
    fn from(raw: RawVuln) -> Self {
        let mut pair = raw.detail.snapshot.into_iter().next().unwrap_or_default().into_iter();
        let request = pair.next().unwrap_or_default();
        let response = pair.next().unwrap_or_default();

        Finding {
            vuln_name: raw.plugin,
            target: raw.target.url,
            payload: raw.detail.payload,
            request,
            response,
            event_time: raw.create_time,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanInfo {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStats {
    pub is_safe: bool,
    pub total_vulns: usize,
}

/// Normalized outcome of one or more xray runs.
///
/// Single-target and merged reports share this exact shape, so a consumer can
/// only tell them apart by the number of command lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub command_lines: Vec<String>,
    pub scan_info: ScanInfo,
    pub scan_stats: ScanStats,
    pub findings: Vec<Finding>,
}

impl ScanReport {
    /// Report for a single xray run. Stats are derived from `findings`.
    pub fn new(command_line: impl Into<String>, scan_info: ScanInfo, findings: Vec<Finding>) -> Self {
        Self {
            command_lines: vec![command_line.into()],
            scan_info,
            scan_stats: ScanStats {
                is_safe: findings.is_empty(),
                total_vulns: findings.len(),
            },
            findings,
        }
    }

    /// Folds per-target reports into one, keeping input order.
    ///
    /// Returns `None` when there is nothing to merge.
    pub fn merge(reports: Vec<ScanReport>) -> Option<ScanReport> {
        if reports.is_empty() {
            return None;
        }

        let mut merged = ScanReport {
            command_lines: Vec::with_capacity(reports.len()),
            scan_info: ScanInfo::default(),
            scan_stats: ScanStats {
                is_safe: true,
                total_vulns: 0,
            },
            findings: Vec::new(),
        };

        for report in reports {
            merged.command_lines.extend(report.command_lines);
            merged.scan_info.errors.extend(report.scan_info.errors);
            merged.scan_info.warnings.extend(report.scan_info.warnings);
            merged.scan_stats.is_safe &= report.scan_stats.is_safe;
            merged.scan_stats.total_vulns += report.scan_stats.total_vulns;
            merged.findings.extend(report.findings);
        }

        Some(merged)
    }

    pub fn is_safe(&self) -> bool {
        self.scan_stats.is_safe
    }

    pub fn total_vulns(&self) -> usize {
        self.scan_stats.total_vulns
    }
}
