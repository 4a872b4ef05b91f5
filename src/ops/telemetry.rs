// * Telemetry - structured logging setup
// * JSON lines for unattended runs, pretty output for an operator at a terminal.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// * Default filter when RUST_LOG is unset
pub const DEFAULT_FILTER: &str = "sector_lens=info,warn";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initializes JSON tracing with the default filter
pub fn init_tracing() {
    init_tracing_with_level(DEFAULT_FILTER);
}

/// Initializes JSON tracing with a custom filter directive
pub fn init_tracing_with_level(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().json().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .init();
}
