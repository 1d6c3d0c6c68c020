// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Logging configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
	/// Lowercase level name, one of [`LOG_LEVELS`].
	pub level: String,
	/// Emit JSON lines instead of human-readable output.
	pub json: bool,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: DEFAULT_LOG_LEVEL.to_string(),
			json: false,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfigLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub json: Option<bool>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: LoggingConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.json.is_some() {
			self.json = other.json;
		}
	}

	pub fn finalize(self) -> Result<LoggingConfig, ConfigError> {
		let level = self
			.level
			.map(|l| l.trim().to_ascii_lowercase())
			.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
		if !LOG_LEVELS.contains(&level.as_str()) {
			return Err(ConfigError::invalid_value(
				"logging.level",
				format!("unknown level '{level}', expected one of {}", LOG_LEVELS.join(", ")),
			));
		}

		Ok(LoggingConfig {
			level,
			json: self.json.unwrap_or(false),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_defaults() {
		let config = LoggingConfigLayer::default().finalize().unwrap();
		assert_eq!(config, LoggingConfig::default());
	}

	#[test]
	fn test_level_is_normalised() {
		let layer = LoggingConfigLayer {
			level: Some(" DEBUG ".to_string()),
			json: Some(true),
		};
		let config = layer.finalize().unwrap();
		assert_eq!(config.level, "debug");
		assert!(config.json);
	}

	#[test]
	fn test_unknown_level_rejected() {
		let layer = LoggingConfigLayer {
			level: Some("verbose".to_string()),
			json: None,
		};
		let err = layer.finalize().unwrap_err();
		assert!(err.to_string().contains("logging.level"));
	}

	proptest! {
		#[test]
		fn known_levels_accepted_in_any_case(idx in 0usize..5, upper in any::<bool>()) {
			let level = if upper {
				LOG_LEVELS[idx].to_ascii_uppercase()
			} else {
				LOG_LEVELS[idx].to_string()
			};
			let layer = LoggingConfigLayer { level: Some(level), json: None };
			prop_assert_eq!(layer.finalize().unwrap().level, LOG_LEVELS[idx]);
		}
	}
}
