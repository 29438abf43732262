use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "pin_ledger=info";

/// Sends ledger service logs to stdout as one JSON object per line.
///
/// `RUST_LOG` overrides the level filter. Only the first call installs the
/// subscriber, so tests and the binary can both call it.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_env_filter(filter)
        .finish();
    // an existing global subscriber wins
    let _ = tracing::subscriber::set_global_default(subscriber);
}
