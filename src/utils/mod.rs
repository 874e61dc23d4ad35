// Sat Aug 22 2026 - Alex

use log::LevelFilter;

/// Initialize logging from `RUST_LOG`, falling back to `level` when the
/// variable is unset. Safe to call more than once.
pub fn init_logging(level: &str) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level_from_str(level).as_str()),
    )
    .try_init()
    .ok();
}

pub fn level_from_str(s: &str) -> LevelFilter {
    match s.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Parse "0x1400a3f10" or bare hex into an address value.
pub fn parse_address(s: &str) -> Option<u64> {
    let trimmed = s.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u64::from_str_radix(hex, 16).ok()
}
