//! User-facing diagnostics: consistent error prefixes and stderr logging.

use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "warn";

/// Install the stderr `tracing` subscriber. `RUST_LOG` overrides the default level.
///
/// stdout is reserved for the annotated tree, so everything goes to stderr.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { DEFAULT_LEVEL };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Prefix a message so every fatal error reads the same way.
pub fn error_message(msg: impl AsRef<str>) -> String {
    format!("protocolorizer: {}", msg.as_ref())
}

pub fn warn(msg: impl AsRef<str>) {
    tracing::warn!("{}", msg.as_ref());
}
