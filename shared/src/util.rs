use chrono::{DateTime, Utc};

/// 一天的毫秒数
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 剩余天数，向上取整
///
/// 任意正的剩余时长都至少算 1 天；零或负数时长返回 <= 0。
pub fn ceil_days(diff_ms: i64) -> i64 {
    let days = diff_ms / MILLIS_PER_DAY;
    // `/` truncates toward zero, which is already the ceiling for negatives
    if diff_ms % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// Milliseconds from `now_ms` until `instant` (negative if already past)
pub fn millis_until(instant: &DateTime<Utc>, now_ms: i64) -> i64 {
    instant.timestamp_millis() - now_ms
}
