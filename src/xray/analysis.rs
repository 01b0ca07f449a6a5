// src/xray/analysis.rs
use std::fs;
use std::io;
use std::path::Path;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::error::{Result, XrayError};
use crate::xray::report::{Finding, RawVuln, ScanInfo, ScanReport};

/// Printed by xray as the last line of a run that reached the end.
pub const COMPLETION_SENTINEL: &str = "controller released, task done";

static WARNING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\[warn\]|warn)\s").expect("warning pattern is valid"));

pub fn is_finished(stdout: &[u8]) -> bool {
    let end = stdout
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    stdout[..end].ends_with(COMPLETION_SENTINEL.as_bytes())
}

/// Splits stderr into warning lines and a single error trace.
///
/// Every non-empty line that is not a warning marks the run as having
/// errors; the full stderr text is then kept once as the trace.
pub fn partition_stderr(stderr: &str) -> ScanInfo {
    let mut info = ScanInfo::default();
    let mut has_error = false;

    for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
        if WARNING_LINE.is_match(line) {
            info.warnings.push(line.to_string());
        } else {
            has_error = true;
        }
    }

    if has_error {
        info.errors.push(stderr.trim_end().to_string());
    }

    info
}

/// Decodes the `--json-output` file content. Blank content means no findings.
pub fn parse_results(content: &[u8]) -> Result<Vec<RawVuln>> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(content)?)
}

fn read_results(path: &Path) -> Result<Vec<RawVuln>> {
    match fs::read(path) {
        Ok(content) => parse_results(&content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No result file at {}, treating as no findings", path.display());
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Turns one finished xray run into a report.
///
/// Fails with `XrayError::Scan` when stdout lacks the completion sentinel,
/// whatever the exit status and whether or not a result file was written.
pub fn analyse(
    command_line: &str,
    stdout: &[u8],
    stderr: &str,
    results_path: &Path,
) -> Result<ScanReport> {
    if !is_finished(stdout) {
        let trace = if stderr.is_empty() {
            String::from_utf8_lossy(stdout).into_owned()
        } else {
            stderr.to_string()
        };
        return Err(XrayError::Scan(trace));
    }

    let scan_info = partition_stderr(stderr);
    for warning in &scan_info.warnings {
        warn!("xray: {}", warning);
    }

    let findings: Vec<Finding> = read_results(results_path)?
        .into_iter()
        .map(Finding::from)
        .collect();

    Ok(ScanReport::new(command_line, scan_info, findings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    const DONE: &[u8] = b"[INFO] scanning\n[INFO] controller released, task done\n";

    fn item(n: usize) -> serde_json::Value {
        json!({
            "plugin": format!("xss/reflected/{}", n),
            "target": { "url": format!("http://example.com/{}", n) },
            "detail": {
                "payload": format!("<svg{}>", n),
                "snapshot": [[format!("GET /{} HTTP/1.1", n), format!("HTTP/1.1 200 OK {}", n)]]
            },
            "create_time": 1658800000000u64 + n as u64
        })
    }

    #[test]
    fn sentinel_detection() {
        assert!(is_finished(DONE));
        assert!(is_finished(b"controller released, task done"));
        assert!(is_finished(b"x\r\ncontroller released, task done\r\n"));
        assert!(!is_finished(b"controller released, task done... not really\n"));
        assert!(!is_finished(b""));
        assert!(!is_finished(b"panic: runtime error\n"));
    }

    #[test]
    fn stderr_warnings_and_errors() {
        let info = partition_stderr("[WARN] target slow\nwarn retrying\nsomething broke\n\n");
        assert_eq!(info.warnings, vec!["[WARN] target slow", "warn retrying"]);
        assert_eq!(
            info.errors,
            vec!["[WARN] target slow\nwarn retrying\nsomething broke"]
        );
    }

    #[test]
    fn error_trace_recorded_once() {
        let info = partition_stderr("line one\nline two\nline three\n");
        assert_eq!(info.errors.len(), 1);
        assert!(info.warnings.is_empty());
    }

    #[test]
    fn warnings_only_has_no_error() {
        let info = partition_stderr("[warn] a\nWARN b\n");
        assert_eq!(info.warnings.len(), 2);
        assert!(info.errors.is_empty());
    }

    #[test]
    fn warn_needs_word_boundary() {
        let info = partition_stderr("WARNING: not the same thing\n");
        assert!(info.warnings.is_empty());
        assert_eq!(info.errors.len(), 1);
    }

    #[test]
    fn zero_items_is_safe() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, "[]").unwrap();

        let report = analyse("xray webscan", DONE, "", &path).unwrap();
        assert!(report.is_safe());
        assert_eq!(report.total_vulns(), 0);
        assert!(report.findings.is_empty());
        assert_eq!(report.command_lines, vec!["xray webscan"]);
    }

    #[test]
    fn three_items_projected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        let items = json!([item(0), item(1), item(2)]);
        fs::write(&path, items.to_string()).unwrap();

        let report = analyse("xray webscan", DONE, "", &path).unwrap();
        assert!(!report.is_safe());
        assert_eq!(report.total_vulns(), 3);
        assert_eq!(report.findings.len(), 3);

        for (n, f) in report.findings.iter().enumerate() {
            assert_eq!(f.vuln_name, format!("xss/reflected/{}", n));
            assert_eq!(f.target, format!("http://example.com/{}", n));
            assert_eq!(f.payload, format!("<svg{}>", n));
            assert_eq!(f.request, format!("GET /{} HTTP/1.1", n));
            assert_eq!(f.response, format!("HTTP/1.1 200 OK {}", n));
            assert_eq!(f.event_time, json!(1658800000000u64 + n as u64));
        }
    }

    #[test]
    fn missing_result_file_means_no_findings() {
        let dir = tempdir().unwrap();
        let report = analyse("xray", DONE, "", &dir.path().join("absent.json")).unwrap();
        assert!(report.is_safe());
    }

    #[test]
    fn empty_result_file_means_no_findings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, "").unwrap();
        assert!(analyse("xray", DONE, "", &path).unwrap().is_safe());
    }

    #[test]
    fn missing_sentinel_reports_stderr() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, json!([item(0)]).to_string()).unwrap();

        let err = analyse("xray", b"[INFO] start\n", "license expired\n", &path).unwrap_err();
        match err {
            XrayError::Scan(msg) => assert_eq!(msg, "license expired\n"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_sentinel_falls_back_to_stdout() {
        let dir = tempdir().unwrap();
        let err = analyse("xray", b"[INFO] start\nkilled\n", "", &dir.path().join("r.json")).unwrap_err();
        match err {
            XrayError::Scan(msg) => assert_eq!(msg, "[INFO] start\nkilled\n"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn garbage_result_file_is_a_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(analyse("xray", DONE, "", &path), Err(XrayError::Json(_))));
    }
}
