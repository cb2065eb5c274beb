//! Diagnostic logging to stderr.
//!
//! Claude Code reads the hook's stdout as JSON, so nothing but the hook
//! output may go there. Only warnings are shown by default; set
//! `RTK_HOOK_LOG=debug` to see how a command was split, matched and
//! classified.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "RTK_HOOK_LOG";

/// Install the global subscriber. A second call is a no-op.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .without_time(),
        )
        .with(
            EnvFilter::builder()
                .with_env_var(LOG_ENV)
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .try_init();
}
