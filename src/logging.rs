use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parse a `MCP_LOG_LEVEL` value; anything unrecognized means INFO.
pub(crate) fn parse_level(value: &str) -> Level {
    value.trim().parse().unwrap_or(Level::INFO)
}

/// Install the process-wide subscriber. A second call is a no-op.
pub(crate) fn init(level: &str) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
