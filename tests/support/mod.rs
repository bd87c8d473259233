use tracing_subscriber::EnvFilter;

/// Install the test subscriber; later calls are no-ops. Run with
/// `RUST_LOG=clubdesk=debug` to see the store-boundary events.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
