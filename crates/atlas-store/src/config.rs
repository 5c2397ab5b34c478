//! Store configuration, validation, and error types.
//!
//! [`StoreConfig`] is consumed by [`MapStore::new`](crate::MapStore::new),
//! which calls [`validate()`](StoreConfig::validate) before building the
//! store.

use std::error::Error;
use std::fmt;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`StoreConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `missing_door_name` is empty.
    EmptyMissingDoorName,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMissingDoorName => write!(f, "missing_door_name must not be empty"),
        }
    }
}

impl Error for ConfigError {}

// ── StoreConfig ────────────────────────────────────────────────────

/// Tunable behaviour of a [`MapStore`](crate::MapStore).
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Reject an action whose affected rooms are still claimed by another
    /// recipient once the caller's own selection has been released.
    /// Default: `false` (claims are advisory only).
    pub refuse_locked_targets: bool,
    /// Door name reported for a coordinate with no room, or for the
    /// `Unknown` direction. Default: `"exit"`.
    pub missing_door_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            refuse_locked_targets: false,
            missing_door_name: "exit".to_string(),
        }
    }
}

impl StoreConfig {
    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.missing_door_name.is_empty() {
            return Err(ConfigError::EmptyMissingDoorName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = StoreConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(!cfg.refuse_locked_targets);
        assert_eq!(cfg.missing_door_name, "exit");
    }

    #[test]
    fn empty_door_name_rejected() {
        let cfg = StoreConfig {
            missing_door_name: String::new(),
            ..StoreConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyMissingDoorName));
        assert_eq!(
            ConfigError::EmptyMissingDoorName.to_string(),
            "missing_door_name must not be empty"
        );
    }
}
