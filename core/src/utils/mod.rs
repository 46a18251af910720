//! Logging setup

use log::LevelFilter;

use crate::config::StoreConfig;

/// Install an `env_logger` backend at the configured level
///
/// `RUST_LOG`, when set, overrides the configured level. Calling this more
/// than once is harmless; only the first call installs a logger. Returns
/// whether this call installed it.
pub fn init_logging(config: &StoreConfig) -> bool {
    let level = parse_level(&config.log_level).to_string();
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    )
    .try_init()
    .is_ok()
}

/// Parse a level name, falling back to `info` for unknown names
fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}
