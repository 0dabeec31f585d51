//! Logging setup
//!
//! Console output through `tracing-subscriber`, optionally mirrored to a
//! daily rotating file under `log_dir`.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Initialize logging.
///
/// `RUST_LOG` overrides `level` when set. Keep the returned guard alive for
/// as long as file logging should flush.
///
/// # Examples
/// ```no_run
/// // Development (console only)
/// let _guard = canteen_client::logger::init_logger("debug", false, None)?;
///
/// // Production (JSON console + rotating file)
/// let _guard = canteen_client::logger::init_logger("info", true, Some("./logs"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if json_format {
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_filter(env_filter())
                .boxed(),
        );
    } else {
        layers.push(fmt::layer().with_target(true).with_filter(env_filter()).boxed());
    }

    let guard = match log_dir {
        Some(dir) => {
            let dir = Path::new(dir);
            fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "canteen");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(env_filter())
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(level, json_format, ?log_dir, "Logger initialized");
    Ok(guard)
}
