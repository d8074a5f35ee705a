use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

// Quiet zbus unless `RUST_LOG` says otherwise.
fn filter(verbosity_level: Level) -> Result<EnvFilter> {
    let user_directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .parse_lossy(&user_directives);

    if mentions_zbus(&user_directives) {
        return Ok(filter);
    }
    Ok(filter.add_directive("zbus=warn".parse()?))
}

fn mentions_zbus(directives: &str) -> bool {
    directives.split(',').any(|directive| {
        let target = directive.trim().split(['=', '[']).next().unwrap_or_default();
        target == "zbus" || target.starts_with("zbus::")
    })
}

/// Initialize logging on stderr.
///
/// `RUST_LOG` directives override the verbosity flag.
///
/// # Errors
///
/// Returns an error if the subscriber cannot be installed
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    // stdout carries command output (e.g. `whoami`), keep logs off it.
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false);

    let subscriber = Registry::default()
        .with(fmt_layer)
        .with(filter(verbosity_level)?);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
