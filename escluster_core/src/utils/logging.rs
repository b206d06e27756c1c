use env_logger::Env;

/// Initialize logging using env_logger.
/// By default, this reads the RUST_LOG environment variable for filtering,
/// falling back to `default_level` when it is unset.
/// e.g., `RUST_LOG=escluster_core=debug escluster list`
pub fn init_logging(default_level: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}
