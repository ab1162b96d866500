use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Returns the current time in the organization timezone.
pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

/// Returns today's date in the organization timezone.
pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

/// Renders minutes as `HH:MM`. Hours are not wrapped at 24; negatives render as zero.
pub fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
