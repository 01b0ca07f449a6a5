// src/xray/targets.rs
use crate::error::{Result, XrayError};

/// URLs handed to a scan: either already split, or one shell-quoted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    List(Vec<String>),
    Raw(String),
}

impl Targets {
    /// Trimmed, non-empty URLs in input order. May be empty.
    pub fn normalize(&self) -> Result<Vec<String>> {
        let urls: Vec<String> = match self {
            Targets::List(items) => items
                .iter()
                .map(|u| u.trim())
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .collect(),
            Targets::Raw(line) => shlex::split(line)
                .ok_or_else(|| XrayError::InvalidTargets(format!("unbalanced quoting in {:?}", line)))?,
        };

        Ok(urls)
    }
}

impl From<Vec<String>> for Targets {
    fn from(urls: Vec<String>) -> Self {
        Targets::List(urls)
    }
}

impl From<&[String]> for Targets {
    fn from(urls: &[String]) -> Self {
        Targets::List(urls.to_vec())
    }
}

impl From<Vec<&str>> for Targets {
    fn from(urls: Vec<&str>) -> Self {
        Targets::List(urls.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Targets {
    fn from(urls: [&str; N]) -> Self {
        Targets::List(urls.iter().map(|u| u.to_string()).collect())
    }
}

impl From<&str> for Targets {
    fn from(line: &str) -> Self {
        Targets::Raw(line.to_string())
    }
}

impl From<String> for Targets {
    fn from(line: String) -> Self {
        Targets::Raw(line)
    }
}

/// Shell-style split of the free-form extra flags.
pub fn split_arguments(arguments: &str) -> Result<Vec<String>> {
    shlex::split(arguments)
        .ok_or_else(|| XrayError::InvalidArguments(format!("unbalanced quoting in {:?}", arguments)))
}
