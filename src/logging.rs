use tracing_subscriber::EnvFilter;

/// Builds the log filter. `RUST_LOG` wins over the `-v` count.
pub fn env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    })
}

/// Installs the stderr subscriber. Stdout is reserved for the rendered command.
pub fn init(verbosity: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
