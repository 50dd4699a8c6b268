//! Tracing subscriber setup.

use crate::config::LedgerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber. Returns false when one was already set.
pub fn init_tracing(config: &LedgerConfig) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .boxed()
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            level = %config.log_level,
            json = config.json_logs,
            "[rl-01] Tracing initialized"
        );
    }
    installed
}
