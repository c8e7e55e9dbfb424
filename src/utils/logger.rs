use chrono::Local;
use eyre::Result;
use fern::Dispatch;
use log::LevelFilter;
use std::env;

/// Sets up the application logger with console output.
///
/// The level comes from `TELLER_LOG` (`error`, `warn`, `info`, `debug`,
/// `trace`) and defaults to `info`.
///
/// # Returns
/// * `Result<()>` - Success or failure of logger setup
///
/// # Errors
/// * If logger configuration fails
pub fn setup_logger() -> Result<()> {
    let level = env::var("TELLER_LOG")
        .ok()
        .and_then(|raw| raw.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    Dispatch::new()
        .level(level)
        // Configure logging to console
        .chain(std::io::stderr())
        // Format log messages with time and log level
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ));
        })
        .apply()?;
    Ok(())
}
