//! Engine configuration

use crate::domain::InterfaceType;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
	fs,
	path::{Path, PathBuf},
};
use tracing::{info, warn};

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
	/// Config schema version
	pub version: u32,

	/// Upper bound on the direct targets of one propagation call (0 = unlimited)
	#[serde(default)]
	pub max_targets_per_call: usize,

	/// Interface types tried, in order, for items that accept any interface
	#[serde(default = "default_interface_priority")]
	pub interface_priority: Vec<InterfaceType>,

	/// Logging configuration
	#[serde(default)]
	pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
	/// Default filter directive, overridden by `RUST_LOG`
	pub level: String,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
		}
	}
}

fn default_interface_priority() -> Vec<InterfaceType> {
	InterfaceType::DEFAULT_PRIORITY.to_vec()
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			version: Self::target_version(),
			max_targets_per_call: 0,
			interface_priority: default_interface_priority(),
			logging: LoggingConfig::default(),
		}
	}
}

impl EngineConfig {
	/// Load configuration from `path`, writing the default there if nothing exists yet
	///
	/// Files ending in `.json` are read as JSON, everything else as TOML.
	pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();

		if path.exists() {
			info!("Loading engine config from {:?}", path);
			let raw = fs::read_to_string(path)
				.with_context(|| format!("Failed to read config at {path:?}"))?;

			let mut config: EngineConfig = if is_json(path) {
				serde_json::from_str(&raw)?
			} else {
				toml::from_str(&raw)?
			};

			if config.version < Self::target_version() {
				info!(
					"Migrating engine config from v{} to v{}",
					config.version,
					Self::target_version()
				);
				config.version = Self::target_version();
				config.save(path)?;
			}

			config.validate()?;
			Ok(config)
		} else {
			warn!("No engine config found, creating default at {:?}", path);
			let config = Self::default();
			config.save(path)?;
			Ok(config)
		}
	}

	/// Save configuration to disk
	pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)?;
		}

		let raw = if is_json(path) {
			serde_json::to_string_pretty(self)?
		} else {
			toml::to_string_pretty(self)?
		};

		fs::write(path, raw)?;
		info!("Saved engine config to {:?}", path);
		Ok(())
	}

	/// Default location inside a data directory
	pub fn default_path(data_dir: impl AsRef<Path>) -> PathBuf {
		data_dir.as_ref().join("lineage.toml")
	}

	pub fn validate(&self) -> Result<()> {
		if self.interface_priority.is_empty() {
			return Err(anyhow!("interface_priority must list at least one interface type"));
		}

		for (i, interface_type) in self.interface_priority.iter().enumerate() {
			if self.interface_priority[..i].contains(interface_type) {
				return Err(anyhow!(
					"interface_priority lists \"{}\" more than once",
					interface_type
				));
			}
		}

		Ok(())
	}

	/// Target version for migrations
	fn target_version() -> u32 {
		1
	}

	/// `None` when unbounded
	pub fn target_limit(&self) -> Option<usize> {
		(self.max_targets_per_call > 0).then_some(self.max_targets_per_call)
	}
}

fn is_json(path: &Path) -> bool {
	path.extension().is_some_and(|extension| extension == "json")
}
