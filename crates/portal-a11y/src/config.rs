//! Compliance Configuration
//!
//! Thresholds and timings recognized by the compliance runtime.
//! Every section falls back to its WCAG default when omitted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{A11yError, Result};

/// Runtime configuration options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    pub contrast: ContrastConfig,
    pub touch_target: TouchTargetConfig,
    pub announcer: AnnouncerConfig,
    pub focus_trap: FocusTrapConfig,
}

impl ComplianceConfig {
    /// Parse a JSON document and validate it
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.contrast.validate()?;
        self.touch_target.validate()?;
        self.announcer.validate()
    }

    pub fn with_min_touch_target(mut self, px: f64) -> Self {
        self.touch_target.min_size_px = px;
        self
    }

    pub fn with_announce_delays(mut self, polite_ms: u64, assertive_ms: u64) -> Self {
        self.announcer.polite_delay_ms = polite_ms;
        self.announcer.assertive_delay_ms = assertive_ms;
        self
    }
}

/// Large-text classification used by the 3:1 vs 4.5:1 rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    /// Regular-weight text at or above this size is large (18pt)
    pub large_text_min_px: f64,
    /// Bold text at or above this size is large (14pt)
    pub large_bold_text_min_px: f64,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            large_text_min_px: 24.0,
            large_bold_text_min_px: 18.66,
        }
    }
}

impl ContrastConfig {
    fn validate(&self) -> Result<()> {
        positive("contrast.large_text_min_px", self.large_text_min_px)?;
        positive("contrast.large_bold_text_min_px", self.large_bold_text_min_px)?;
        if self.large_bold_text_min_px > self.large_text_min_px {
            return Err(A11yError::InvalidConfig(format!(
                "contrast.large_bold_text_min_px ({}) must not exceed contrast.large_text_min_px ({})",
                self.large_bold_text_min_px, self.large_text_min_px
            )));
        }
        Ok(())
    }
}

/// Touch target policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchTargetConfig {
    /// Minimum width and height in device-independent pixels
    pub min_size_px: f64,
}

impl Default for TouchTargetConfig {
    fn default() -> Self {
        Self { min_size_px: 44.0 } // WCAG 2.5.5
    }
}

impl TouchTargetConfig {
    fn validate(&self) -> Result<()> {
        positive("touch_target.min_size_px", self.min_size_px)
    }
}

/// Live region auto-clear timings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncerConfig {
    pub polite_delay_ms: u64,
    pub assertive_delay_ms: u64,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            polite_delay_ms: 1000,
            assertive_delay_ms: 2000,
        }
    }
}

impl AnnouncerConfig {
    pub fn polite_delay(&self) -> Duration {
        Duration::from_millis(self.polite_delay_ms)
    }

    pub fn assertive_delay(&self) -> Duration {
        Duration::from_millis(self.assertive_delay_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.polite_delay_ms == 0 || self.assertive_delay_ms == 0 {
            return Err(A11yError::InvalidConfig(
                "announcer delays must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Focus trap behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusTrapConfig {
    /// Escape releases an active trap
    pub escape_deactivates: bool,
}

impl Default for FocusTrapConfig {
    fn default() -> Self {
        Self { escape_deactivates: true }
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(A11yError::InvalidConfig(format!(
            "{field} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ComplianceConfig::default();
        assert_eq!(config.touch_target.min_size_px, 44.0);
        assert_eq!(config.announcer.polite_delay(), Duration::from_millis(1000));
        assert_eq!(config.announcer.assertive_delay(), Duration::from_millis(2000));
        assert!(config.focus_trap.escape_deactivates);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = ComplianceConfig::from_json_str(r#"{ "touch_target": { "min_size_px": 48 } }"#).unwrap();
        assert_eq!(config.touch_target.min_size_px, 48.0);
        assert_eq!(config.announcer, AnnouncerConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = ComplianceConfig::from_json_str(r#"{ "touch_target": { "min_size_px": 0 } }"#).unwrap_err();
        assert!(matches!(err, A11yError::InvalidConfig(_)));

        let err = ComplianceConfig::from_json_str(r#"{ "announcer": { "polite_delay_ms": 0 } }"#).unwrap_err();
        assert!(matches!(err, A11yError::InvalidConfig(_)));

        let err = ComplianceConfig::from_json_str(
            r#"{ "contrast": { "large_text_min_px": 18, "large_bold_text_min_px": 24 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, A11yError::InvalidConfig(_)));

        let err = ComplianceConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, A11yError::ConfigParse(_)));
    }
}
