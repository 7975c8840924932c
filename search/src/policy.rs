//! Search policy types.

use serde_json::Value;

use crate::error::ConfigError;

/// Key under which the suboptimality bound is configured.
pub const WEIGHT_KEY: &str = "weight";

/// Search configuration.
///
/// `weight` is the suboptimality bound: a returned plan costs at most
/// `weight × optimal` when the domain heuristic is admissible. It also
/// scales the heuristic used for the corrected estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchPolicyV1 {
    pub weight: f64,
}

impl SearchPolicyV1 {
    /// Build a validated policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWeight`] if `weight` is NaN, infinite,
    /// or below 1.
    pub fn new(weight: f64) -> Result<Self, ConfigError> {
        let policy = Self { weight };
        policy.validate()?;
        Ok(policy)
    }

    /// Check the policy. Called again by every search entry point, since the
    /// fields are public.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWeight`] if `weight` is NaN, infinite,
    /// or below 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.weight.is_finite() {
            return Err(ConfigError::InvalidWeight {
                detail: format!("{} is not finite", self.weight),
            });
        }
        if self.weight < 1.0 {
            return Err(ConfigError::InvalidWeight {
                detail: format!("{} is below 1", self.weight),
            });
        }
        Ok(())
    }

    /// Read the policy from a JSON object such as `{"weight": 1.5}`.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Malformed`] if `config` is not an object.
    /// - [`ConfigError::MissingWeight`] if the object has no `"weight"`.
    /// - [`ConfigError::InvalidWeight`] if the value is not a number or
    ///   fails [`validate`](Self::validate).
    pub fn from_json(config: &Value) -> Result<Self, ConfigError> {
        let object = config.as_object().ok_or_else(|| ConfigError::Malformed {
            detail: format!("expected a JSON object, got {config}"),
        })?;
        let value = object.get(WEIGHT_KEY).ok_or(ConfigError::MissingWeight)?;
        let weight = value.as_f64().ok_or_else(|| ConfigError::InvalidWeight {
            detail: format!("{value} is not a number"),
        })?;
        Self::new(weight)
    }

    /// Parse and read the policy from JSON text.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Malformed`] if `text` is not valid JSON, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Value = serde_json::from_str(text).map_err(|e| ConfigError::Malformed {
            detail: e.to_string(),
        })?;
        Self::from_json(&config)
    }
}
