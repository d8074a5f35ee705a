use clap::{Arg, ArgAction, Command};

pub const ARG_SUPERUSER: &str = "superuser";
pub const ARG_PAM_SERVICE: &str = "pam-service";
pub const ARG_MAX_ATTEMPTS: &str = "max-attempts";

pub const DEFAULT_PAM_SERVICE: &str = "vtlock";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        // The superuser path needs no terminal.
        .mut_arg(super::session::ARG_VT, |arg| {
            arg.required(false).required_unless_present(ARG_SUPERUSER)
        })
        .arg(
            Arg::new(ARG_SUPERUSER)
                .short('s')
                .long("superuser")
                .help("Only accept the superuser's credentials")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_PAM_SERVICE)
                .long("pam-service")
                .help("PAM service name")
                .env("VTLOCK_PAM_SERVICE")
                .default_value(DEFAULT_PAM_SERVICE),
        )
        .arg(
            Arg::new(ARG_MAX_ATTEMPTS)
                .long("max-attempts")
                .help("Give up after this many failed attempts (0: never)")
                .env("VTLOCK_MAX_ATTEMPTS")
                .default_value("0")
                .value_parser(clap::value_parser!(u32)),
        )
}
