// src/xray/scratch.rs
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use log::debug;

/// The url list and result file shared with one xray run.
///
/// Acquiring clears any stale result file; dropping removes both files,
/// whichever way the scan ended.
#[derive(Debug)]
pub struct ScratchFiles {
    urls: PathBuf,
    results: PathBuf,
}

impl ScratchFiles {
    pub fn paths(dir: &Path, instance_id: &str) -> (PathBuf, PathBuf) {
        (
            dir.join(format!("xray_{}_urls.txt", instance_id)),
            dir.join(format!("xray_{}_results.json", instance_id)),
        )
    }

    pub fn acquire(dir: &Path, instance_id: &str) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let (urls, results) = Self::paths(dir, instance_id);
        let scratch = ScratchFiles { urls, results };
        remove_quietly(&scratch.results);
        Ok(scratch)
    }

    /// One url per line, each newline-terminated.
    pub fn write_urls(&self, urls: &[String]) -> io::Result<()> {
        let mut file = fs::File::create(&self.urls)?;
        for url in urls {
            writeln!(file, "{}", url)?;
        }
        file.flush()
    }

    pub fn urls_path(&self) -> &Path {
        &self.urls
    }

    pub fn results_path(&self) -> &Path {
        &self.results
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        remove_quietly(&self.urls);
        remove_quietly(&self.results);
    }
}

fn remove_quietly(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed scratch file {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => debug!("Could not remove scratch file {}: {}", path.display(), e),
    }
}
