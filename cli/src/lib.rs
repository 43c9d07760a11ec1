pub mod command;
pub mod settings;
pub mod utils;

/// Installs the `tracing-subscriber` `fmt` + `EnvFilter` layer once, per
/// §10.2. `level` is the `--log-level` flag; `RUST_LOG` still overrides it
/// when set, matching `EnvFilter::builder().with_default_directive(..)`.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_ansi(true).init();
}
