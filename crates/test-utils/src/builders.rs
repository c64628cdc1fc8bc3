#![allow(dead_code)]

use std::path::Path;

use threadme::config::{RawRunConfig, RunConfig};

/// Builder for `RunConfig` to simplify test setup.
///
/// Starts from a zero delay and no timeout so tests run fast unless they
/// opt in.
pub struct RunConfigBuilder {
    config: RawRunConfig,
}

impl RunConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            config: RawRunConfig {
                cmd: Some(cmd.to_string()),
                delay_ms: Some(0),
                timeout_ms: Some(0),
                ..RawRunConfig::default()
            },
        }
    }

    pub fn concurrency(mut self, c: usize) -> Self {
        self.config.concurrency = Some(c);
        self
    }

    pub fn count(mut self, n: u64) -> Self {
        self.config.count = Some(n);
        self
    }

    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.config.file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn forever(mut self) -> Self {
        self.config.forever = Some(true);
        self
    }

    pub fn delay_ms(mut self, ms: i64) -> Self {
        self.config.delay_ms = Some(ms);
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = Some(ms);
        self
    }

    pub fn stop_on(mut self, text: &str) -> Self {
        self.config.stop_on = Some(text.to_string());
        self
    }

    pub fn continue_while(mut self, text: &str) -> Self {
        self.config.continue_while = Some(text.to_string());
        self
    }

    pub fn raw(self) -> RawRunConfig {
        self.config
    }

    pub fn build(self) -> RunConfig {
        RunConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
