//! Configuration for the interaction layer.

use crate::{Result, SurgError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Thresholds and epsilons shared by every controller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InteractionConfig {
    /// Near-contact threshold: a contact counts as touching when its signed
    /// distance is below this value (world units).
    pub contact_distance: f64,
    /// Squared-length threshold under which a stitch segment is treated as
    /// degenerate and its endpoint returned directly.
    pub segment_epsilon_sq: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            contact_distance: 0.01,
            segment_epsilon_sq: 1e-6,
        }
    }
}

impl InteractionConfig {
    /// Create a config with a custom near-contact threshold.
    #[must_use]
    pub fn with_contact_distance(contact_distance: f64) -> Self {
        Self {
            contact_distance,
            ..Default::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SurgError::InvalidConfig`] on non-finite or non-positive
    /// values.
    pub fn validate(&self) -> Result<()> {
        if !self.contact_distance.is_finite() || self.contact_distance <= 0.0 {
            return Err(SurgError::invalid_config(format!(
                "contact_distance must be positive and finite, got {}",
                self.contact_distance
            )));
        }
        if !self.segment_epsilon_sq.is_finite() || self.segment_epsilon_sq <= 0.0 {
            return Err(SurgError::invalid_config(format!(
                "segment_epsilon_sq must be positive and finite, got {}",
                self.segment_epsilon_sq
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(InteractionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let config = InteractionConfig::with_contact_distance(0.0);
        assert!(config.validate().is_err());

        let config = InteractionConfig::with_contact_distance(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_epsilon() {
        let config = InteractionConfig {
            segment_epsilon_sq: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
