use std::io::Write;

const DEBUG_FILTER: &str = "info,sia_core=debug,sia_llm=debug,sia_loop=debug,sia_server=debug";

/// Filter directives for `env_logger`. An explicit level wins over `debug`.
pub fn log_filter(log_level: Option<&str>, debug: bool) -> String {
    match log_level.map(str::trim).filter(|level| !level.is_empty()) {
        Some(level) => level.to_string(),
        None if debug => DEBUG_FILTER.to_string(),
        None => "info".to_string(),
    }
}

/// Initialise `env_logger` with `log_level` directives such as `warn` or
/// `info,sia_core=trace`.
pub fn init_logging_with_filter(log_level: Option<&str>, debug: bool) {
    let filter = log_filter(log_level, debug);

    env_logger::Builder::new()
        .parse_filters(&filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
