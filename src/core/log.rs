use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber. Silent unless `verbose` or `RUST_LOG` is set.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let level_filter = match (verbose, &env_filter) {
        (true, _) => LevelFilter::DEBUG,
        (false, Some(_)) => LevelFilter::TRACE,
        (false, None) => LevelFilter::OFF,
    };
    let app_filter = Targets::new().with_target("sectorking", level_filter);
    let env_filter = env_filter.unwrap_or_else(|| {
        EnvFilter::new(if verbose { "debug" } else { "off" })
    });

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_filter)
        .with(env_filter)
        .init();
}
