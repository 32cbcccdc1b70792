use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "UCUPTEST_LOG";

fn log_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `UCUPTEST_LOG`, then `RUST_LOG`, and falls back to
/// `info` (or `debug` when `verbose` is set). Returns `false` without output
/// when a global subscriber is already installed, so test suites can call it
/// from every test.
#[must_use]
pub fn init_logging(verbose: bool) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_target(false)
        .try_init()
        .is_ok()
}
