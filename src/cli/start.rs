use crate::cli::{
    actions::Action,
    commands::{self, logging},
    dispatch, telemetry,
};
use anyhow::Result;
use clap::ArgMatches;

fn verbosity(matches: &ArgMatches) -> u8 {
    matches
        .get_one::<u8>(logging::ARG_VERBOSITY)
        .copied()
        .unwrap_or(0)
}

/// Parse the command line, set up logging and return the requested action.
///
/// # Errors
/// Returns an error if logging cannot be initialized or dispatch fails.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    telemetry::init(logging::level(verbosity(&matches)))?;

    dispatch::handler(&matches)
}
