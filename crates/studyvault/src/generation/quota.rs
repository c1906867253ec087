//! Daily provider quota reset arithmetic
//!
//! The free-tier quota resets once a day at midnight Pacific time, which is
//! 13:30 in the UTC+05:30 zone most of our users sit in. Wait-time messages
//! are phrased against that local reset point.

use chrono::{DateTime, Duration, FixedOffset, Utc};

/// Quota reset wall-clock time in the UTC+05:30 zone
const RESET_HOUR: u32 = 13;
const RESET_MINUTE: u32 = 30;

fn reset_offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("offset is in range")
}

/// Time remaining until the next daily quota reset
pub fn time_until_reset(now: DateTime<Utc>) -> Duration {
    let offset = reset_offset();
    let local = now.with_timezone(&offset);

    let today_reset = local
        .date_naive()
        .and_hms_opt(RESET_HOUR, RESET_MINUTE, 0)
        .expect("reset time is valid")
        .and_local_timezone(offset)
        .single()
        .expect("fixed offset is unambiguous");

    let reset = if local < today_reset {
        today_reset
    } else {
        today_reset + Duration::days(1)
    };

    reset - local
}

/// Break a wait duration into whole hours and remaining minutes (rounded up)
pub fn hours_and_minutes(wait: Duration) -> (i64, i64) {
    let total_minutes = (wait.num_seconds() + 59) / 60;
    (total_minutes / 60, total_minutes % 60)
}

/// Summary placeholder stored when the provider quota is exhausted
pub fn summary_quota_message(now: DateTime<Utc>) -> String {
    let (hours, minutes) = hours_and_minutes(time_until_reset(now));
    format!(
        "Not able to produce AI Summary due to daily rate limit, try deleting and uploading again after {} hrs {} mins",
        hours, minutes
    )
}

/// Chat reply stored when generation fails
pub fn chat_quota_message(now: DateTime<Utc>) -> String {
    let (hours, minutes) = hours_and_minutes(time_until_reset(now));
    format!(
        "Maximum number of requests exceeded. Please try again in {} hrs {} mins.",
        hours, minutes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn before_reset_waits_until_today() {
        // 07:00 UTC == 12:30 local, 1 hour before the reset
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap();
        let wait = time_until_reset(now);
        assert_eq!(wait.num_minutes(), 60);
    }

    #[test]
    fn after_reset_waits_until_tomorrow() {
        // 09:00 UTC == 14:30 local, 1 hour past the reset
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let wait = time_until_reset(now);
        assert_eq!(wait.num_minutes(), 23 * 60);
    }

    #[test]
    fn exactly_at_reset_waits_a_full_day() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let wait = time_until_reset(now);
        assert_eq!(wait.num_hours(), 24);
    }

    #[test]
    fn partial_minutes_round_up() {
        assert_eq!(hours_and_minutes(Duration::seconds(61)), (0, 2));
        assert_eq!(hours_and_minutes(Duration::seconds(3600)), (1, 0));
        assert_eq!(hours_and_minutes(Duration::seconds(5430)), (1, 31));
    }

    #[test]
    fn messages_carry_wait_time() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 7, 0, 0).unwrap();
        let summary = summary_quota_message(now);
        assert!(summary.starts_with("Not able to produce AI Summary"));
        assert!(summary.contains("1 hrs 0 mins"));

        let chat = chat_quota_message(now);
        assert!(chat.starts_with("Maximum number of requests exceeded"));
        assert!(chat.contains("1 hrs 0 mins"));
    }
}
