pub mod auth;
pub mod logging;
pub mod session;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    ColorChoice, Command,
};

pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_UNLOCK: &str = "unlock";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let whoami = session::with_args(
        Command::new(CMD_WHOAMI).about("Print the user owning a virtual terminal"),
    );

    let unlock = auth::with_args(session::with_args(
        Command::new(CMD_UNLOCK)
            .about("Authenticate the owner of a virtual terminal until access is granted"),
    ));

    let command = Command::new("vtlock")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(whoami)
        .subcommand(unlock);

    logging::with_args(command)
}
