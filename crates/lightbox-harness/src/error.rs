#![forbid(unsafe_code)]

//! Harness errors.

use std::io;

use lightbox_widgets::ConfigError;
use thiserror::Error;

/// Anything that can stop a harness run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("writing run output failed: {0}")]
    Io(#[from] io::Error),
    #[error("encoding frame record failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid lightbox configuration: {0}")]
    Config(#[from] ConfigError),
    /// An environment override could not be parsed.
    #[error("{key}={value:?} is not a valid {expected}")]
    Env {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("unknown scenario {0:?} (expected one of: {known})", known = crate::scenario::Script::NAMES.join(", "))]
    UnknownScenario(String),
}
