use log::LevelFilter;

/// Initialize the logger with the specified level.
///
/// `RUST_LOG` still takes precedence over `level` for individual modules.
/// Calling this more than once is harmless; only the first call installs the
/// logger.
pub fn init_logger(level: LevelFilter) {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

#[test]
fn init_twice_is_harmless() {
    init_logger(LevelFilter::Debug);
    init_logger(LevelFilter::Trace);

    log::debug!("logger initialised twice");
}
