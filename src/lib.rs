// src/lib.rs
//! # xray-rs
//!
//! Drives an installed [xray](https://github.com/chaitin/xray) community
//! binary: finds it, runs `webscan` with a url file or the basic crawler,
//! enforces a deadline and turns the JSON output into a [`ScanReport`].
//!
//! ```no_run
//! use std::time::Duration;
//! use xray_rs::{ScannerConfig, XrayScanner};
//!
//! # async fn run() -> xray_rs::Result<()> {
//! let config = ScannerConfig::new(["/opt/xray/xray_linux_amd64"]);
//! let mut scanner = XrayScanner::new(config).await?;
//!
//! let report = scanner
//!     .webscan(["http://testphp.vulnweb.com/"], "--plugins sqldet", Duration::from_secs(600))
//!     .await?;
//! println!("{} vulnerabilities", report.total_vulns());
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod output;
pub mod runner;
pub mod xray;

pub use config::ScannerConfig;
pub use error::{Result, XrayError};
pub use runner::{CommandLine, ProcessOutput, ProcessRunner, TokioRunner};
pub use xray::{Finding, ScanInfo, ScanReport, ScanStats, Targets, XrayScanner, XrayVersion};
