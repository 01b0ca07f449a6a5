#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use async_trait::async_trait;
use serde_json::{json, Value};
use xray_rs::{CommandLine, ProcessOutput, ProcessRunner, Result, XrayError};

pub const BANNER: &str = "Version: 1.9.3/62f3d1a5/COMMUNITY\n";
pub const DONE: &str = "[INFO] 2022-07-26 10:00:00 controller released, task done\n";

/// What the fake xray does on one webscan invocation.
#[derive(Debug, Clone, Default)]
pub struct Run {
    pub stdout: String,
    pub stderr: String,
    pub results: Option<Value>,
    pub hang: bool,
}

impl Run {
    pub fn finished(findings: usize) -> Self {
        Run {
            stdout: DONE.to_string(),
            results: Some(Value::Array((0..findings).map(item).collect())),
            ..Default::default()
        }
    }

    pub fn crashed(stdout: &str, stderr: &str) -> Self {
        Run {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            ..Default::default()
        }
    }

    pub fn hanging() -> Self {
        Run {
            hang: true,
            ..Default::default()
        }
    }

    pub fn with_stderr(mut self, stderr: &str) -> Self {
        self.stderr = stderr.to_string();
        self
    }

    pub fn with_results(mut self, results: Value) -> Self {
        self.results = Some(results);
        self
    }
}

pub fn item(n: usize) -> Value {
    json!({
        "plugin": format!("sqldet/error-based/{}", n),
        "target": { "url": format!("http://target.test/{}", n) },
        "detail": {
            "payload": format!("{}'", n),
            "snapshot": [[format!("GET /{} HTTP/1.1", n), format!("HTTP/1.1 500 Internal {}", n)]]
        },
        "create_time": 1_658_800_000_000u64 + n as u64
    })
}

/// One recorded invocation, with the url file content as it was at run time.
#[derive(Debug, Clone)]
pub struct Call {
    pub command: CommandLine,
    pub url_file: Option<String>,
    pub limit: Option<Duration>,
}

/// Scripted stand-in for the xray process.
pub struct FakeRunner {
    spawnable: Vec<(PathBuf, String)>,
    runs: Mutex<VecDeque<Run>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            spawnable: Vec::new(),
            runs: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A path that spawns and prints `version_output` for `version`.
    pub fn with_binary(mut self, path: &str, version_output: &str) -> Self {
        self.spawnable.push((PathBuf::from(path), version_output.to_string()));
        self
    }

    pub fn with_run(self, run: Run) -> Self {
        self.runs.lock().unwrap().push_back(run);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn scan_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.command.args.first().map(String::as_str) != Some("version"))
            .collect()
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(&self, command: &CommandLine, limit: Option<Duration>) -> Result<ProcessOutput> {
        let url_file = flag_value(&command.args, "--url-file")
            .and_then(|p| fs::read_to_string(Path::new(p)).ok());
        self.calls.lock().unwrap().push(Call {
            command: command.clone(),
            url_file,
            limit,
        });

        let version_output = self
            .spawnable
            .iter()
            .find(|(path, _)| path == &command.program)
            .map(|(_, out)| out.clone());

        let Some(version_output) = version_output else {
            return Err(XrayError::Spawn {
                program: command.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        };

        if command.args.first().map(String::as_str) == Some("version") {
            return Ok(ProcessOutput {
                status: Some(0),
                stdout: version_output.into_bytes(),
                stderr: Vec::new(),
            });
        }

        let run = self
            .runs
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected xray invocation");

        if run.hang {
            return match limit {
                Some(limit) => Err(XrayError::Timeout(limit)),
                None => panic!("hanging run without a deadline would never return"),
            };
        }

        if let (Some(results), Some(path)) = (&run.results, flag_value(&command.args, "--json-output")) {
            fs::write(path, results.to_string()).unwrap();
        }

        Ok(ProcessOutput {
            status: Some(0),
            stdout: run.stdout.into_bytes(),
            stderr: run.stderr.into_bytes(),
        })
    }
}
