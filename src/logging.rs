use std::path::PathBuf;
use std::sync::Once;

use tracing::Level;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::EnvFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

// Log targets
pub const CID_PARSING: &str = "cid_parse";
pub const CID_INCLUDE: &str = "cid_include";
pub const CID_WIDTHS: &str = "cid_widths";

const TARGETS: &[&str] = &[CID_PARSING, CID_INCLUDE, CID_WIDTHS, "cidmetrics"];

static INIT: Once = Once::new();

fn target_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    TARGETS.iter().fold(
        EnvFilter::from_default_env().add_directive(Level::WARN.into()),
        |filter, target| match format!("{target}={level}").parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        },
    )
}

/// Installs a stderr subscriber. Calling it more than once is a no-op.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_filter(target_filter(verbose)),
            )
            .init();
    });
}

/// Like [`init_logging`], but also writes every event to `cidmetrics.log`
/// in `log_dir`. Keep the returned guard alive until the program exits.
pub fn init_logging_with_dir(verbose: bool, log_dir: PathBuf) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::NEVER, log_dir, "cidmetrics.log");
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking_appender)
        .with_filter(target_filter(true));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(target_filter(verbose));

    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .init();
    });

    Ok(guard)
}
