use clap::{builder::ValueParser, Arg, ArgAction, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names accepted by `VTLOCK_LOG_LEVEL`, indexed by verbosity count.
pub const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accept a level name or a numeric verbosity (0..=5).
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> std::result::Result<u8, String> {
        if let Some(count) = level.parse::<u8>().ok().filter(|count| *count <= 5) {
            return Ok(count);
        }

        let level = level.to_lowercase();
        LEVELS
            .iter()
            .position(|name| *name == level)
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| format!("invalid log level, expected one of: {}", LEVELS.join(", ")))
    })
}

/// Tracing level for a verbosity count; `None` keeps the default (ERROR).
#[must_use]
pub const fn level(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("VTLOCK_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
