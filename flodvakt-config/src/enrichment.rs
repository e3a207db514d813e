//! Enrichment adapter configuration.
//!
//! The adapter is optional: when disabled (the default), the engine
//! never calls out and classifications are purely rule-based.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Third-party enrichment parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct EnrichmentConfig {
    /// Whether the engine consults the enrichment adapter at all.
    #[serde(default)]
    pub enabled: bool,

    /// Caller-imposed timeout for one enrichment call, in milliseconds.
    /// Expiry counts as an adapter failure and fails open.
    #[validate(range(min = 100, max = 120_000))]
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_ms: default_timeout_ms(),
        }
    }
}
