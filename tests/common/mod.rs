// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for integration tests: Docker detection, log capture, and a
//! scripted document fetcher.

use remotecfg::domain::{ConfigError, DataId, Result};
use remotecfg::ports::DocumentFetcher;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

/// Cached result of Docker availability check.
#[allow(dead_code)]
static DOCKER_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Checks if Docker is available on the system.
///
/// This check is cached after the first call.
#[allow(dead_code)]
pub fn is_docker_available() -> bool {
    *DOCKER_AVAILABLE.get_or_init(|| {
        // Try to run `docker ps` command
        std::process::Command::new("docker")
            .args(["ps"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

/// Prints a warning message that a test is skipped due to Docker being unavailable.
#[allow(dead_code)]
pub fn print_docker_unavailable_warning(test_name: &str) {
    eprintln!("\n⚠️  SKIPPED: {} - Docker is not available", test_name);
    eprintln!("   To run this test, ensure Docker is installed and running.");
    eprintln!("   Installation: https://docs.docker.com/get-docker/\n");
}

/// Routes resolver logs to the test output. Safe to call from every test.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Scripted response for one document.
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub enum Scripted {
    /// The document exists with this content.
    Found(Vec<u8>),
    /// The fetch fails with this message.
    Fail(String),
}

/// Fetcher answering from a fixed script and recording every request.
///
/// Documents not in the script are reported as absent.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    script: HashMap<String, Scripted>,
    calls: Mutex<Vec<(String, String, Duration)>>,
}

#[allow(dead_code)]
impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a document in any group.
    pub fn with_document(mut self, data_id: &str, content: &str) -> Self {
        self.script
            .insert(data_id.to_string(), Scripted::Found(content.as_bytes().to_vec()));
        self
    }

    /// Scripts a fetch failure in any group.
    pub fn with_failure(mut self, data_id: &str, message: &str) -> Self {
        self.script
            .insert(data_id.to_string(), Scripted::Fail(message.to_string()));
        self
    }

    /// Returns `(data_id, group, timeout)` for every fetch so far, in call order.
    pub fn calls(&self) -> Vec<(String, String, Duration)> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the requested data ids in call order.
    pub fn requested_ids(&self) -> Vec<String> {
        self.calls().into_iter().map(|(id, _, _)| id).collect()
    }
}

impl DocumentFetcher for ScriptedFetcher {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch(&self, data_id: &DataId, group: &str, timeout: Duration) -> Result<Option<Vec<u8>>> {
        self.calls
            .lock()
            .unwrap()
            .push((data_id.to_string(), group.to_string(), timeout));

        match self.script.get(data_id.as_str()) {
            None => Ok(None),
            Some(Scripted::Found(content)) => Ok(Some(content.clone())),
            Some(Scripted::Fail(message)) => {
                Err(ConfigError::fetch(data_id.as_str(), group, message.as_str()))
            }
        }
    }
}
