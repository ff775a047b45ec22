use std::time::Duration;

/// Default poll interval in minutes.
pub const DEFAULT_SCAN_INTERVAL_MINUTES: u32 = 60;

/// Smallest poll interval accepted, in minutes.
pub const MIN_SCAN_INTERVAL_MINUTES: u32 = 10;

/// Largest poll interval accepted (one day), in minutes.
pub const MAX_SCAN_INTERVAL_MINUTES: u32 = 1440;

/// Upper bound on a single source call, including the HTTP client's own timeout.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = powerwatch_source::DEFAULT_REQUEST_TIMEOUT;

/// Format of `_last_updated` in the published snapshot (local wall time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Localized month names, index 0 is January.
pub const MONTH_NAMES: [&str; 12] = [
    "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "十一月",
    "十二月",
];

/// Localized name of `month` (`1..=12`), or `None` outside that range.
pub fn month_name(month: u32) -> Option<&'static str> {
    match month {
        1..=12 => Some(MONTH_NAMES[(month - 1) as usize]),
        _ => None,
    }
}
