// Logging setup
//
// Library code only emits `tracing` events. Hosts that don't install their own
// subscriber get a fmt subscriber filtered by RUST_LOG.

/// Install a fmt subscriber, `RUST_LOG` overriding `default_filter`
///
/// Idempotent: a second call, or a host-installed subscriber, wins silently.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .try_init();
}
