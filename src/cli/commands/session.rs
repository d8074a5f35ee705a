use crate::session::{utmp::UTMP_PATH, Backend};
use clap::{
    builder::{PossibleValuesParser, TypedValueParser},
    Arg, Command,
};

pub const ARG_VT: &str = "vt";
pub const ARG_OWNER: &str = "owner";
pub const ARG_BACKEND: &str = "backend";
pub const ARG_UTMP_PATH: &str = "utmp-path";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VT)
                .long("vt")
                .help("Virtual terminal number whose owner is resolved")
                .env("VTLOCK_VT")
                .required(true)
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_OWNER)
                .long("owner")
                .help("Fallback owner uid (default: owner of /dev/ttyN)")
                .env("VTLOCK_OWNER")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_BACKEND)
                .short('b')
                .long("backend")
                .help("Session backend; auto picks logind on systemd hosts")
                .env("VTLOCK_BACKEND")
                .default_value("auto")
                .value_parser(
                    PossibleValuesParser::new(Backend::VARIANTS)
                        .try_map(|s| s.parse::<Backend>()),
                ),
        )
        .arg(
            Arg::new(ARG_UTMP_PATH)
                .long("utmp-path")
                .help("Session record store read by the utmp backend")
                .env("VTLOCK_UTMP_PATH")
                .default_value(UTMP_PATH)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}
