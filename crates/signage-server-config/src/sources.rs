// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment variables.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{DatabaseConfigLayer, LoggingConfigLayer, SeedConfigLayer};

pub const SYSTEM_CONFIG_PATH: &str = "/etc/signage/server.toml";

pub const ENV_DATABASE_URL: &str = "SIGNAGE_SERVER_DATABASE_URL";
pub const ENV_LOG_LEVEL: &str = "SIGNAGE_SERVER_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "SIGNAGE_SERVER_LOG_JSON";
pub const ENV_SEED_USER_EMAIL: &str = "SIGNAGE_SERVER_SEED_USER_EMAIL";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: SIGNAGE_SERVER_<SECTION>_<FIELD>. Empty values count as unset.
pub struct EnvSource;

impl EnvSource {
	/// Build a layer from an arbitrary variable lookup.
	pub fn load_from(
		lookup: impl Fn(&str) -> Option<String>,
	) -> Result<ServerConfigLayer, ConfigError> {
		let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

		let json = match var(ENV_LOG_JSON) {
			Some(v) => Some(parse_bool(ENV_LOG_JSON, &v)?),
			None => None,
		};

		Ok(ServerConfigLayer {
			database: Some(DatabaseConfigLayer {
				url: var(ENV_DATABASE_URL),
			}),
			logging: Some(LoggingConfigLayer {
				level: var(ENV_LOG_LEVEL),
				json,
			}),
			seed: Some(SeedConfigLayer {
				super_admin_email: var(ENV_SEED_USER_EMAIL),
			}),
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Self::load_from(|name| std::env::var(name).ok())
	}
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		other => Err(ConfigError::invalid_value(
			key,
			format!("invalid boolean value '{other}'"),
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| map.get(name).cloned()
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.database.is_none());
		assert!(layer.logging.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/server.toml").load().unwrap();
		assert!(layer.database.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			"[database]\nurl = \"sqlite:/tmp/x.db\"\n\n[seed]\nsuper_admin_email = \"ops@example.com\""
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(
			layer.database.unwrap().url.as_deref(),
			Some("sqlite:/tmp/x.db")
		);
		assert_eq!(
			layer.seed.unwrap().super_admin_email.as_deref(),
			Some("ops@example.com")
		);
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[database\nurl = ").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_source_reads_variables() {
		let layer = EnvSource::load_from(lookup(&[
			(ENV_DATABASE_URL, "sqlite::memory:"),
			(ENV_LOG_LEVEL, "warn"),
			(ENV_LOG_JSON, "true"),
			(ENV_SEED_USER_EMAIL, ""),
		]))
		.unwrap();

		assert_eq!(
			layer.database.unwrap().url.as_deref(),
			Some("sqlite::memory:")
		);
		let logging = layer.logging.unwrap();
		assert_eq!(logging.level.as_deref(), Some("warn"));
		assert_eq!(logging.json, Some(true));
		assert!(layer.seed.unwrap().super_admin_email.is_none());
	}

	#[test]
	fn test_env_source_rejects_bad_bool() {
		let err = EnvSource::load_from(lookup(&[(ENV_LOG_JSON, "maybe")])).unwrap_err();
		assert!(err.to_string().contains(ENV_LOG_JSON));
	}
}
