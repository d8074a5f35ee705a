use anyhow::Result;
use vtlock::cli;

// Main function
fn main() -> Result<()> {
    let action = cli::start()?;

    action.execute()?;

    Ok(())
}
