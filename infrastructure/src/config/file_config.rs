//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into the application-layer
//! [`SessionParams`] after validation.

use halcyon_application::SessionParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("cycle_secs must be positive")]
    InvalidCycleLength,

    #[error("blink_min_secs must not exceed blink_max_secs")]
    InvertedBlinkBounds,

    #[error("history_window cannot be 0")]
    EmptyHistoryWindow,

    #[error("frame_rate cannot be 0")]
    InvalidFrameRate,

    #[error("dialogue endpoint cannot be empty")]
    EmptyEndpoint,

    #[error("dialogue timeout_seconds cannot be 0")]
    InvalidTimeout,
}

/// Raw session timing configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Breathing cycle length in seconds
    pub cycle_secs: f32,
    /// Delay before a suggested breathing exercise starts, in milliseconds
    pub breathing_delay_ms: u64,
    /// Gesture auto-clear delay in milliseconds
    pub gesture_clear_ms: u64,
    /// Minimum transcript length that triggers a dialogue turn
    pub min_transcript_chars: usize,
    /// Trailing turns sent to the dialogue service as context
    pub history_window: usize,
    /// Blink pause bounds in seconds
    pub blink_min_secs: f32,
    pub blink_max_secs: f32,
    /// Render frame rate in frames per second
    pub frame_rate: u32,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            cycle_secs: 16.0,
            breathing_delay_ms: 3000,
            gesture_clear_ms: 2000,
            min_transcript_chars: 10,
            history_window: 10,
            blink_min_secs: 3.0,
            blink_max_secs: 5.0,
            frame_rate: 60,
        }
    }
}

/// Raw dialogue service configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDialogueConfig {
    /// Base URL of the dialogue service
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Optional model override forwarded to the service
    pub model: Option<String>,
}

impl Default for FileDialogueConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api/dialogue".to_string(),
            timeout_seconds: 20,
            model: None,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Path for the JSONL session event log; disabled when unset
    pub session_log: Option<String>,
}

/// Complete raw configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub session: FileSessionConfig,
    pub dialogue: FileDialogueConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.session.cycle_secs > 0.0) {
            return Err(ConfigValidationError::InvalidCycleLength);
        }
        if self.session.blink_min_secs > self.session.blink_max_secs {
            return Err(ConfigValidationError::InvertedBlinkBounds);
        }
        if self.session.history_window == 0 {
            return Err(ConfigValidationError::EmptyHistoryWindow);
        }
        if self.session.frame_rate == 0 {
            return Err(ConfigValidationError::InvalidFrameRate);
        }
        if self.dialogue.endpoint.trim().is_empty() {
            return Err(ConfigValidationError::EmptyEndpoint);
        }
        if self.dialogue.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        Ok(())
    }

    /// Convert the validated file config into controller parameters.
    pub fn session_params(&self) -> SessionParams {
        SessionParams::default()
            .with_cycle_secs(self.session.cycle_secs)
            .with_breathing_start_delay(Duration::from_millis(self.session.breathing_delay_ms))
            .with_gesture_clear(Duration::from_millis(self.session.gesture_clear_ms))
            .with_min_transcript_chars(self.session.min_transcript_chars)
            .with_history_window(self.session.history_window)
            .with_blink_bounds(
                Duration::from_secs_f32(self.session.blink_min_secs),
                Duration::from_secs_f32(self.session.blink_max_secs),
            )
            .with_frame_period(Duration::from_secs_f64(
                1.0 / f64::from(self.session.frame_rate),
            ))
            .with_dialogue_timeout(Duration::from_secs(self.dialogue.timeout_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[session]
cycle_secs = 12.0
gesture_clear_ms = 1500
history_window = 6
frame_rate = 30

[dialogue]
endpoint = "https://api.example.com/dialogue"
timeout_seconds = 10
model = "companion-large"

[logging]
session_log = "/tmp/session.jsonl"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.cycle_secs, 12.0);
        assert_eq!(config.session.gesture_clear_ms, 1500);
        // Unset fields fall back to defaults
        assert_eq!(config.session.min_transcript_chars, 10);
        assert_eq!(config.dialogue.model.as_deref(), Some("companion-large"));
        assert_eq!(
            config.logging.session_log.as_deref(),
            Some("/tmp/session.jsonl")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.session.cycle_secs, 16.0);
        assert_eq!(config.dialogue.timeout_seconds, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_cycle() {
        let mut config = FileConfig::default();
        config.session.cycle_secs = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidCycleLength)
        ));
    }

    #[test]
    fn test_validate_inverted_blink_bounds() {
        let mut config = FileConfig::default();
        config.session.blink_min_secs = 6.0;
        config.session.blink_max_secs = 4.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvertedBlinkBounds)
        ));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = FileConfig::default();
        config.dialogue.timeout_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_session_params_conversion() {
        let mut config = FileConfig::default();
        config.session.cycle_secs = 8.0;
        config.session.gesture_clear_ms = 1000;
        config.session.frame_rate = 50;

        let params = config.session_params();
        assert_eq!(params.cycle_secs, 8.0);
        assert_eq!(params.gesture_clear, Duration::from_millis(1000));
        assert_eq!(params.frame_period, Duration::from_millis(20));
    }
}
