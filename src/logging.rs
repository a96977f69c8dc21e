use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Logs go to stderr; `RUST_LOG` overrides
/// the default `ledgersync=info` filter.
pub(crate) fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("ledgersync=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
