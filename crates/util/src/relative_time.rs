//! Compact "posted N ago" labels for listing cards.

use chrono::{DateTime, Utc};

/// Formats the age of `posted_at` relative to `now` as `just now`, `10m ago`,
/// `2h ago`, `3d ago` or `5w ago`. Timestamps in the future read as `just now`.
pub fn format_relative_age(posted_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(posted_at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = elapsed.num_days();
    if days < 7 {
        return format!("{days}d ago");
    }
    format!("{}w ago", days / 7)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid timestamp")
    }

    #[test]
    fn formats_each_unit() {
        let now = now();
        assert_eq!(format_relative_age(now - Duration::seconds(30), now), "just now");
        assert_eq!(format_relative_age(now - Duration::minutes(10), now), "10m ago");
        assert_eq!(format_relative_age(now - Duration::hours(2), now), "2h ago");
        assert_eq!(format_relative_age(now - Duration::days(3), now), "3d ago");
        assert_eq!(format_relative_age(now - Duration::days(15), now), "2w ago");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let now = now();
        assert_eq!(format_relative_age(now + Duration::hours(1), now), "just now");
    }
}
