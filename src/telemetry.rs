//! Tracing and diagnostics bootstrap.
//!
//! Call [`init`] once at process start. Verbosity comes from `RUST_LOG`
//! (standard `tracing` env-filter syntax); without it the engine logs at
//! `info` for its own crate and `warn` for everything else.

use tracing_subscriber::fmt;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber and miette panic hook.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::CLOSE);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,corpus_shuffler=info"));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok();

    if installed {
        miette::set_panic_hook();
    }
}
