//! Shared logging setup for shared_flag demos and test suites.

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable holding an `EnvFilter` directive. Falls back to
/// `RUST_LOG`, then to the built-in defaults below.
pub const LOG_ENV_VAR: &str = "SHARED_FLAG_LOG";

const DEFAULT_LOG_FILTER: &str = "shared_flag=info";
const VERBOSE_LOG_FILTER: &str = "shared_flag=trace";

/// Logging configuration shared by binaries using shared_flag.
#[derive(Debug, Clone, Copy)]
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
}

/// Initialize tracing with stderr output.
///
/// Fails if a global subscriber was already installed or the filter
/// directive in the environment does not parse.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let filter = build_filter(&filter_directive(config.verbose, lookup_env))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_names(true)
                .with_filter(filter),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install subscriber for {}: {}", config.app_name, e))?;

    tracing::debug!(app = config.app_name, "logging initialized");
    Ok(())
}

/// Route tracing output through the libtest capture writer.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_logging() {
    let filter = build_filter(&filter_directive(false, lookup_env))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_thread_names(true)
                .with_filter(filter),
        )
        .try_init();
}

fn lookup_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn filter_directive(verbose: bool, env: impl Fn(&str) -> Option<String>) -> String {
    env(LOG_ENV_VAR)
        .or_else(|| env("RUST_LOG"))
        .unwrap_or_else(|| {
            if verbose {
                VERBOSE_LOG_FILTER.to_string()
            } else {
                DEFAULT_LOG_FILTER.to_string()
            }
        })
}

fn build_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| anyhow!("Invalid log filter {:?}: {}", directive, e))
}
