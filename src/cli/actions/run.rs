use crate::cli::actions::{unlock, whoami, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
// To add a new action, add a new `Action::*` variant and a corresponding `*::execute` call here.
/// # Errors
/// Returns an error if the action fails.
pub fn execute(action: Action) -> Result<()> {
    match action {
        Action::Whoami(target) => whoami::execute(&target),
        Action::Unlock(args) => unlock::execute(args),
    }
}
