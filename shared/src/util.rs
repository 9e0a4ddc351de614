/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Format a millisecond timestamp as a `YYYYMMDD` UTC date key
pub fn date_key(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .format("%Y%m%d")
        .to_string()
}

/// Format a millisecond timestamp as a human-readable UTC date (e.g. "12 Mar 2026")
pub fn display_date(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .format("%-d %b %Y")
        .to_string()
}
