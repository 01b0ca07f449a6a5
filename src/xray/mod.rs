// src/xray/mod.rs
//! Wrapper around the xray community web scanner.
//!
//! An [`XrayScanner`] owns one discovered binary and one instance id. Scans
//! take `&mut self`: a handle runs one scan at a time because all of its runs
//! share the same scratch file names. Use one handle per concurrent scan.

pub mod analysis;
pub mod discovery;
pub mod report;
pub mod scratch;
pub mod targets;

use std::path::{Path, PathBuf};
use std::time::Duration;
use log::info;
use uuid::Uuid;
use crate::config::ScannerConfig;
use crate::error::{Result, XrayError};
use crate::runner::{CommandLine, ProcessRunner, TokioRunner};

pub use discovery::{XrayBinary, XrayVersion};
pub use report::{Finding, ScanInfo, ScanReport, ScanStats};
pub use scratch::ScratchFiles;
pub use targets::Targets;

pub struct XrayScanner<R: ProcessRunner = TokioRunner> {
    runner: R,
    binary: XrayBinary,
    config_path: PathBuf,
    cache_dir: PathBuf,
    instance_id: String,
    last_output: Vec<u8>,
    last_command_line: String,
    last_report: Option<ScanReport>,
}

impl XrayScanner<TokioRunner> {
    /// Discovers xray from `config.search_path` using real child processes.
    pub async fn new(config: ScannerConfig) -> Result<Self> {
        Self::with_runner(config, TokioRunner).await
    }
}

impl<R: ProcessRunner> XrayScanner<R> {
    pub async fn with_runner(config: ScannerConfig, runner: R) -> Result<Self> {
        let binary = discovery::discover(&runner, &config.search_path).await?;

        Ok(Self {
            runner,
            binary,
            config_path: config.config_path,
            cache_dir: config.cache_dir,
            instance_id: Uuid::new_v4().simple().to_string(),
            last_output: Vec::new(),
            last_command_line: String::new(),
            last_report: None,
        })
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn path(&self) -> &Path {
        &self.binary.path
    }

    pub fn version(&self) -> XrayVersion {
        self.binary.version
    }

    /// `(major, minor)` of the discovered binary.
    pub fn xray_version(&self) -> (u32, u32) {
        (self.binary.version.major, self.binary.version.minor)
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn last_output(&self) -> &[u8] {
        &self.last_output
    }

    pub fn last_command_line(&self) -> &str {
        &self.last_command_line
    }

    /// Report of the most recent successful scan.
    pub fn scan_result(&self) -> Option<&ScanReport> {
        self.last_report.as_ref()
    }

    /// Scratch file paths this handle hands to xray.
    pub fn scratch_paths(&self) -> (PathBuf, PathBuf) {
        ScratchFiles::paths(&self.cache_dir, &self.instance_id)
    }

    /// Scans every target in one xray run fed through `--url-file`.
    ///
    /// `arguments` are extra xray flags, shell-quoted. A zero `timeout`
    /// waits as long as xray runs.
    pub async fn webscan(
        &mut self,
        targets: impl Into<Targets>,
        arguments: &str,
        timeout: Duration,
    ) -> Result<ScanReport> {
        let urls = targets.into().normalize()?;
        let extra = targets::split_arguments(arguments)?;
        // xray refuses an empty --url-file, fail before spawning it
        if urls.is_empty() {
            return Err(XrayError::InvalidTargets("no url given".to_string()));
        }

        let scratch = ScratchFiles::acquire(&self.cache_dir, &self.instance_id)?;
        scratch.write_urls(&urls)?;

        let command = self
            .base_command(&extra)
            .arg("--url-file")
            .arg(scratch.urls_path().to_string_lossy())
            .arg("--json-output")
            .arg(scratch.results_path().to_string_lossy());

        info!("Starting xray webscan of {} target(s)", urls.len());
        let report = self.execute(&command, &scratch, timeout).await?;
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Runs xray's basic crawler once per target and merges the reports.
    ///
    /// `Ok(None)` when there were no targets, nothing is spawned then.
    pub async fn webscan_with_crawler(
        &mut self,
        targets: impl Into<Targets>,
        arguments: &str,
        timeout: Duration,
    ) -> Result<Option<ScanReport>> {
        let urls = targets.into().normalize()?;
        let extra = targets::split_arguments(arguments)?;

        let mut reports = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            let scratch = ScratchFiles::acquire(&self.cache_dir, &self.instance_id)?;
            let command = self
                .base_command(&extra)
                .arg("--basic-crawler")
                .arg(url.as_str())
                .arg("--json-output")
                .arg(scratch.results_path().to_string_lossy());

            info!("Crawling {} ({}/{})", url, i + 1, urls.len());
            reports.push(self.execute(&command, &scratch, timeout).await?);
        }

        let merged = ScanReport::merge(reports);
        if merged.is_some() {
            self.last_report = merged.clone();
        }
        Ok(merged)
    }

    fn base_command(&self, extra: &[String]) -> CommandLine {
        CommandLine::new(&self.binary.path)
            .arg("--config")
            .arg(self.config_path.to_string_lossy())
            .arg("webscan")
            .args(extra.iter().cloned())
    }

    async fn execute(
        &mut self,
        command: &CommandLine,
        scratch: &ScratchFiles,
        timeout: Duration,
    ) -> Result<ScanReport> {
        self.last_command_line = command.render();
        let limit = (!timeout.is_zero()).then_some(timeout);

        let output = self.runner.run(command, limit).await?;
        self.last_output = output.stdout;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let report = analysis::analyse(
            &self.last_command_line,
            &self.last_output,
            &stderr,
            scratch.results_path(),
        )?;

        info!(
            "xray finished: {} vulnerabilit{} found",
            report.total_vulns(),
            if report.total_vulns() == 1 { "y" } else { "ies" }
        );
        Ok(report)
    }
}
