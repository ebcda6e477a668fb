use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::Layer;
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

// Initialize tracing-subscriber. stdout is reserved for records, so the console
// layer writes to stderr. With a log directory a file layer is added, and its
// guard must live until exit.
pub fn init_tracing_subscriber(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter());

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry().with(console_layer).init();
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)?;
    let file_appender = RollingFileAppender::new(Rotation::NEVER, log_dir, "docsift.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(Some(guard))
}
