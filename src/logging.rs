use std::path::Path;

use flexi_logger::{opt_format, Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

use crate::Result;

/// Start the global logger
///
/// The level comes from `RUST_LOG` when set, `default_level` otherwise. With
/// a `log_dir` the output goes to rotating files there instead of stderr.
/// Keep the returned handle alive for as long as logging is needed.
pub fn setup_logging(default_level: &str, log_dir: Option<&Path>) -> Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(default_level)?.format(opt_format);

    let logger = match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir))
            .rotate(
                Criterion::Size(10 * 1024 * 1024), // Rotate logs after they reach 10 MB
                Naming::Numbers,
                Cleanup::KeepLogFiles(7),
            ),
        None => logger,
    };

    Ok(logger.start()?)
}
