//! Environment configuration for the worker binary.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `HTMLPORT_LOG` | log filter, `tracing_subscriber::EnvFilter` syntax | `warn` |
//! | `HTMLPORT_MAX_MESSAGE_SIZE` | largest accepted request in bytes | `u32::MAX` |
//! | `HTMLPORT_STACK_CAPACITY` | initial traversal stack reservation | 64 |
//! | `HTMLPORT_RESPONSE_CAPACITY` | initial response buffer in bytes | 4096 |
//!
//! Values that do not parse are logged and ignored.

use crate::codec::DEFAULT_ENCODER_CAPACITY;
use crate::encoder::DEFAULT_STACK_CAPACITY;
use crate::protocol::DEFAULT_MAX_MESSAGE_SIZE;
use crate::worker::WorkerBuilder;

pub const ENV_LOG: &str = "HTMLPORT_LOG";
pub const ENV_MAX_MESSAGE_SIZE: &str = "HTMLPORT_MAX_MESSAGE_SIZE";
pub const ENV_STACK_CAPACITY: &str = "HTMLPORT_STACK_CAPACITY";
pub const ENV_RESPONSE_CAPACITY: &str = "HTMLPORT_RESPONSE_CAPACITY";

/// Log filter used when `HTMLPORT_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings for the worker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub max_message_size: u32,
    pub stack_capacity: usize,
    pub response_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            stack_capacity: DEFAULT_STACK_CAPACITY,
            response_capacity: DEFAULT_ENCODER_CAPACITY,
        }
    }
}

impl WorkerConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`, starting from the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = parse_var(&lookup, ENV_MAX_MESSAGE_SIZE) {
            config.max_message_size = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_STACK_CAPACITY) {
            config.stack_capacity = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_RESPONSE_CAPACITY) {
            config.response_capacity = value;
        }
        config
    }

    /// Copy these settings onto a builder.
    pub fn apply(&self, builder: WorkerBuilder) -> WorkerBuilder {
        builder
            .max_message_size(self.max_message_size)
            .stack_capacity(self.stack_capacity)
            .response_capacity(self.response_capacity)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
