//! Terminal logger.

use log::LevelFilter;

/// Install a stderr logger. `verbose` raises the level from warnings to
/// debug output, which includes the outbound request and the classified
/// response shape.
///
/// # Errors
///
/// Fails if a logger is already installed.
pub fn init_logger(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}  {} {}",
                chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                record.level(),
                message
            ))
        })
        .level(level)
        // ureq logs every connection step at debug
        .level_for("ureq", LevelFilter::Warn)
        .level_for("ureq_proto", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()
}
