use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "table_form_builder=info";

/// Install the stderr log subscriber, honoring `RUST_LOG`
///
/// Command output goes to stdout, so logs stay on stderr.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A subscriber may already be installed (e.g. under test harnesses)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
