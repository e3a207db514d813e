//! Custom validation functions for configuration.
//!
//! Shared validation logic used across multiple configuration modules.

use validator::ValidationError;

/// Validate that a port list is non-empty and free of duplicates.
pub fn validate_port_set(ports: &[u16]) -> Result<(), ValidationError> {
    if ports.is_empty() {
        return Err(ValidationError::new("empty_port_set"));
    }
    let mut seen = std::collections::HashSet::new();
    if ports.iter().any(|port| !seen.insert(port)) {
        return Err(ValidationError::new("duplicate_port"));
    }
    Ok(())
}

/// Validate alert severity level.
pub fn validate_severity(level: &str) -> Result<(), ValidationError> {
    let valid = ["info", "warning", "error", "critical"].contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_severity"))
    }
}
