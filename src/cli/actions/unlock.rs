use crate::{
    account::SystemAccounts,
    auth::{AuthHandle, AuthProvider, UserInfo},
    cli::actions::Target,
    resolve,
};
use anyhow::{anyhow, Result};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    /// `None` selects the superuser.
    pub target: Option<Target>,
    pub pam_service: String,
    pub max_attempts: u32,
}

/// Execute the unlock action.
/// # Errors
/// Returns an error if the user cannot be resolved or authentication never succeeds.
#[cfg(feature = "pam")]
pub fn execute(args: Args) -> Result<()> {
    let provider = crate::auth::pam::Pam::new(args.pam_service.as_str());
    run(&args, &provider)
}

/// Execute the unlock action.
/// # Errors
/// Always fails: no authentication provider is compiled in.
#[cfg(not(feature = "pam"))]
pub fn execute(args: Args) -> Result<()> {
    Err(anyhow!(
        "cannot use PAM service {}: vtlock was built without PAM support, \
         rebuild with `--features pam`",
        args.pam_service
    ))
}

/// Resolve the user and authenticate until success or until the attempt limit.
/// # Errors
/// Returns an error if resolution fails or every allowed attempt fails.
pub fn run<P: AuthProvider>(args: &Args, provider: &P) -> Result<()> {
    let mut user = match &args.target {
        Some(target) => target.identify(provider)?,
        None => resolve::superuser(&SystemAccounts, provider)?,
    };

    let result = prompt(&mut user, args.max_attempts);
    user.release();
    result
}

/// Authenticate `user` until success. `max_attempts == 0` never gives up.
/// # Errors
/// Returns an error after `max_attempts` consecutive failures.
pub fn prompt<H: AuthHandle>(user: &mut UserInfo<H>, max_attempts: u32) -> Result<()> {
    let mut failures = 0u32;

    loop {
        if user.authenticate() {
            info!(user = user.name(), attempts = failures + 1, "access granted");
            return Ok(());
        }

        failures = failures.saturating_add(1);
        warn!(user = user.name(), failures, "access denied");

        if max_attempts != 0 && failures >= max_attempts {
            return Err(anyhow!(
                "authentication failed for user {} after {failures} attempt(s), last status: {}",
                user.name(),
                user.status()
            ));
        }
    }
}
