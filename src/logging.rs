use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `verbosity` picks the level for this
/// crate: 0 is `warn`, 1 `info`, 2 `debug`, anything above `trace`.
pub fn init_logging(verbosity: u8) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = match verbosity {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("warn,kasane={level}"))
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
}
