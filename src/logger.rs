use tracing_subscriber::EnvFilter;

/// Picks the filter directive from the CLI flags; `RUST_LOG` applies only
/// when neither flag is set.
pub fn filter_directive(quiet: bool, verbose: bool) -> Option<&'static str> {
    if quiet {
        Some("error")
    } else if verbose {
        Some("img_shrink=debug,info")
    } else {
        None
    }
}

pub fn init_logging(quiet: bool, verbose: bool) {
    let filter = match filter_directive(quiet, verbose) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
