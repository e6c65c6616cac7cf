use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log to stderr so stdout carries only the user-facing messages
pub fn init() {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
