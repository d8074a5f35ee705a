use crate::cli::actions::Target;
use anyhow::Result;

/// Print the owner of the target terminal.
/// # Errors
/// Returns an error if the owner cannot be determined.
pub fn execute(target: &Target) -> Result<()> {
    let name = target.owner_name()?;
    println!("{name}");
    Ok(())
}
