//! Tracing bootstrap

use crate::config::LoggingConfig;
use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the global subscriber
///
/// `RUST_LOG` wins over `config.level`. Calling this more than once, or after another subscriber
/// was installed, does nothing.
pub fn init_tracing(config: &LoggingConfig) {
	INIT.call_once(|| {
		let filter = EnvFilter::try_from_default_env()
			.or_else(|_| EnvFilter::try_new(&config.level))
			.unwrap_or_else(|_| EnvFilter::new("info"));

		let console_layer = fmt::layer()
			.with_writer(std::io::stderr)
			.with_target(true);

		// A host application may already own the global subscriber
		if let Err(e) = tracing_subscriber::registry()
			.with(filter)
			.with(console_layer)
			.try_init()
		{
			tracing::debug!(error = %e, "Global subscriber already installed, keeping it");
		}

		tracing::debug!(level = %config.level, "Engine logging initialized");
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use tracing_test::traced_test;

	// The test subscriber is installed first, so the engine must keep it and say so
	#[test]
	#[traced_test]
	fn test_init_keeps_existing_subscriber() {
		let config = LoggingConfig {
			level: "not a valid directive ===".to_string(),
		};

		init_tracing(&config);
		init_tracing(&LoggingConfig::default());

		assert!(logs_contain("Global subscriber already installed"));
	}
}
