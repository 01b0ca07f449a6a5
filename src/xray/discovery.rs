// src/xray/discovery.rs
use std::fmt;
use std::path::{Path, PathBuf};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::error::{Result, XrayError};
use crate::runner::{CommandLine, ProcessRunner};

static BANNER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Version: (\d+)\.(\d+)\.(\d+)/.*/COMMUNITY").expect("banner pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct XrayVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl fmt::Display for XrayVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// An executable that answered `version` as xray community edition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrayBinary {
    pub path: PathBuf,
    pub version: XrayVersion,
}

/// Looks for the community banner in `version` output.
pub fn parse_banner(output: &str) -> Option<XrayVersion> {
    output.lines().find_map(|line| {
        let caps = BANNER.captures(line.trim())?;
        Some(XrayVersion {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
        })
    })
}

/// Runs `version` on each of `search_path` in order and identifies the first
/// executable that starts.
///
/// Candidates that cannot be spawned are skipped. The first one that does
/// spawn is final: if its output lacks the banner, discovery fails rather than
/// trying the remaining candidates.
pub async fn discover(runner: &dyn ProcessRunner, search_path: &[PathBuf]) -> Result<XrayBinary> {
    for candidate in search_path {
        let version_cmd = CommandLine::new(candidate).arg("version");
        let output = match runner.run(&version_cmd, None).await {
            Ok(output) => output,
            Err(XrayError::Spawn { source, .. }) => {
                debug!("Skipping {}: {}", candidate.display(), source);
                continue;
            }
            Err(e) => return Err(e),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        return match parse_banner(&stdout) {
            Some(version) => {
                info!("Found xray {} at {}", version, candidate.display());
                Ok(XrayBinary {
                    path: candidate.clone(),
                    version,
                })
            }
            None => Err(XrayError::NotFound(format!(
                "{} did not identify itself as xray community edition",
                candidate.display()
            ))),
        };
    }

    Err(XrayError::NotFound(format!(
        "none of the candidates could be executed: [{}]",
        search_path.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
    )))
}

/// Candidate list from `--xray-path` style values, skipping blanks.
pub fn candidates<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .filter(|p| !p.as_ref().as_os_str().is_empty())
        .map(|p| p.as_ref().to_path_buf())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANNER_OUTPUT: &str = "\n____  ___.________.\n\
        \\   \\/  /\\_  __ \\__  \\ \n\
        Version: 1.9.3/62f3d1a5/COMMUNITY\n\
        \n[INFO] 2022-07-26 10:00:00 [default:entry.go:226] Loading config file from config.yaml\n";

    #[test]
    fn banner_version_extracted() {
        assert_eq!(
            parse_banner(BANNER_OUTPUT),
            Some(XrayVersion { major: 1, minor: 9, patch: 3 })
        );
    }

    #[test]
    fn advanced_edition_rejected() {
        assert_eq!(parse_banner("Version: 1.9.3/62f3d1a5/ADVANCED\n"), None);
    }

    #[test]
    fn banner_must_be_present() {
        assert_eq!(parse_banner("xray help\nusage: xray [global options]\n"), None);
        assert_eq!(parse_banner(""), None);
    }

    #[test]
    fn version_display() {
        let v = XrayVersion { major: 1, minor: 10, patch: 0 };
        assert_eq!(v.to_string(), "1.10.0");
    }

    #[test]
    fn blank_candidates_dropped() {
        let c = candidates(["", "/usr/bin/xray", "./xray_linux_amd64"]);
        assert_eq!(c, vec![PathBuf::from("/usr/bin/xray"), PathBuf::from("./xray_linux_amd64")]);
    }
}
