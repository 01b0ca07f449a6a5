// src/main.rs
use std::process;
use std::time::{Duration, Instant};
use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::*;
use log::{error, info};

mod cli;

use xray_rs::common::{banner, logger, utils};
use xray_rs::output::report::{self, OutputFormat};
use xray_rs::{ScanReport, ScannerConfig, XrayScanner};

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    if let Err(e) = logger::init(args.verbose, args.silent, args.log_file.as_deref()) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if !args.silent {
        banner::show();
    }

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(args: cli::Args) -> Result<()> {
    let config = build_config(&args)?;
    let format: OutputFormat = args.output_format.parse()?;

    let mut urls = args.urls.clone();
    if let Some(path) = &args.url_file {
        let from_file = utils::read_lines_from_file(path)
            .with_context(|| format!("reading targets from {}", path.display()))?;
        urls.extend(from_file);
    }
    if urls.is_empty() {
        bail!("no targets: pass --url or --url-file");
    }

    let mut scanner = XrayScanner::new(config).await.context("locating xray")?;
    info!(
        "Using {} (xray {}), instance {}",
        scanner.path().display(),
        scanner.version(),
        scanner.instance_id()
    );

    let timeout = Duration::from_secs(args.timeout);
    let start_time = Instant::now();
    let spinner = (!args.silent).then(|| {
        let mode = if args.crawler { "crawling" } else { "scanning" };
        utils::create_spinner(&format!("xray {} {} target(s)", mode, urls.len()))
    });

    let result = if args.crawler {
        scanner.webscan_with_crawler(urls, &args.args, timeout).await
    } else {
        scanner.webscan(urls, &args.args, timeout).await.map(Some)
    };

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let scan_report = result
        .context("xray scan")?
        .context("no targets were scanned")?;

    if !args.silent {
        print_summary(&scan_report, start_time.elapsed());
    }

    if let Some(path) = &args.output {
        report::write(path, &scan_report, format)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    } else if args.silent {
        println!("{}", report::render(&scan_report, format)?);
    }

    Ok(())
}

fn build_config(args: &cli::Args) -> Result<ScannerConfig> {
    let mut config = match &args.settings {
        Some(path) => ScannerConfig::from_yaml_file(path)?,
        None => ScannerConfig::new(Vec::<std::path::PathBuf>::new()),
    };

    if !args.xray_paths.is_empty() {
        config.search_path = xray_rs::xray::discovery::candidates(&args.xray_paths);
    }
    if let Some(path) = &args.config {
        config.config_path = path.clone();
    }
    if let Some(dir) = &args.cache_dir {
        config.cache_dir = dir.clone();
    }

    config
        .validate()
        .context("no xray candidates: pass --xray-path or --settings")?;
    Ok(config)
}

fn print_summary(scan_report: &ScanReport, elapsed: Duration) {
    if scan_report.is_safe() {
        println!("{} no vulnerabilities found", "[+]".green());
    } else {
        println!(
            "{} {} vulnerabilities found",
            "[!]".red(),
            scan_report.total_vulns().to_string().red()
        );
        for finding in &scan_report.findings {
            println!("    {} {}", finding.vuln_name.yellow(), finding.target);
        }
    }

    for warning in &scan_report.scan_info.warnings {
        println!("{} {}", "[-]".yellow(), warning.trim_end());
    }

    println!("{} done in {:.2}s", "[*]".cyan(), elapsed.as_secs_f64());
}
