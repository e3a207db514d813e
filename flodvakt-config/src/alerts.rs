//! Alert destination configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Where alerts go once the engine has built them.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct AlertConfig {
    /// Emit alerts to the structured log.
    #[serde(default = "default_true")]
    pub log: bool,

    /// Broadcast alerts to connected dashboard clients.
    #[serde(default = "default_true")]
    pub broadcast: bool,

    /// Minimum alert severity level.
    #[validate(custom(function = validation::validate_severity))]
    #[serde(default = "default_severity")]
    pub min_severity: String,
}

fn default_true() -> bool {
    true
}
fn default_severity() -> String {
    "warning".into()
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            log: true,
            broadcast: true,
            min_severity: default_severity(),
        }
    }
}
