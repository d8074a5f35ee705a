use crate::{
    cli::{
        actions::{unlock, Action, Target},
        commands::{self, auth, session},
    },
    session::Backend,
};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

fn target(matches: &clap::ArgMatches) -> Result<Target> {
    let vt = matches
        .get_one::<u32>(session::ARG_VT)
        .copied()
        .context("missing required argument: --vt")?;

    Ok(Target {
        vt,
        owner: matches.get_one::<u32>(session::ARG_OWNER).copied(),
        backend: matches
            .get_one::<Backend>(session::ARG_BACKEND)
            .copied()
            .unwrap_or_default(),
        utmp_path: matches
            .get_one::<PathBuf>(session::ARG_UTMP_PATH)
            .cloned()
            .context("missing required argument: --utmp-path")?,
    })
}

/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((commands::CMD_WHOAMI, sub_m)) => Ok(Action::Whoami(target(sub_m)?)),
        Some((commands::CMD_UNLOCK, sub_m)) => {
            let target = if sub_m.get_flag(auth::ARG_SUPERUSER) {
                None
            } else {
                Some(target(sub_m)?)
            };

            Ok(Action::Unlock(unlock::Args {
                target,
                pam_service: sub_m
                    .get_one::<String>(auth::ARG_PAM_SERVICE)
                    .cloned()
                    .unwrap_or_else(|| auth::DEFAULT_PAM_SERVICE.to_string()),
                max_attempts: sub_m
                    .get_one::<u32>(auth::ARG_MAX_ATTEMPTS)
                    .copied()
                    .unwrap_or(0),
            }))
        }
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("missing command")),
    }
}
