//! Time Engine - timezone-aware wall-clock data
//!
//! Converts a UTC instant into local time fields for an IANA timezone,
//! including the UTC offset and daylight saving status.

use chrono::{DateTime, Datelike, Duration, Offset, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use thiserror::Error;

/// DST transition information
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DstChange {
    /// No DST change within the detection window
    None,
    /// DST change upcoming within 24 hours
    Upcoming {
        /// When the change occurs (UTC)
        instant: DateTime<Utc>,
        /// Offset change in minutes (positive = spring forward, negative = fall back)
        delta_minutes: i32,
    },
    /// DST change occurred within the last 24 hours
    JustOccurred {
        instant: DateTime<Utc>,
        delta_minutes: i32,
    },
}

/// Local time fields for one timezone at one instant
#[derive(Debug, Clone)]
pub struct TimeData {
    pub month: u32,
    pub day: u32,
    pub weekday: Weekday,
    /// Hour in 24-hour format (0-23)
    pub hour: u32,
    pub minute: u32,
    /// UTC offset in minutes (e.g., -480 for UTC-8)
    pub utc_offset_minutes: i32,
    pub is_dst: bool,
    pub dst_change: DstChange,
}

impl TimeData {
    /// "HH:MM" on a 24-hour clock
    pub fn format_time_24(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    /// "October 16 Fri"
    pub fn format_date(&self) -> String {
        format!(
            "{} {} {}",
            month_name(self.month),
            self.day,
            self.weekday
        )
    }

    /// "UTC±hh:mm"
    pub fn format_utc_offset(&self) -> String {
        let sign = if self.utc_offset_minutes >= 0 { "+" } else { "-" };
        let abs_minutes = self.utc_offset_minutes.abs();
        format!("UTC{}{:02}:{:02}", sign, abs_minutes / 60, abs_minutes % 60)
    }

    /// Short note for a nearby DST change, e.g. "DST +1h in 5h"
    pub fn format_dst_change(&self, now_utc: DateTime<Utc>) -> Option<String> {
        match self.dst_change {
            DstChange::None => None,
            DstChange::Upcoming {
                instant,
                delta_minutes,
            } => Some(format!(
                "DST {} in {}",
                format_shift(delta_minutes),
                format_span(instant - now_utc)
            )),
            DstChange::JustOccurred {
                instant,
                delta_minutes,
            } => Some(format!(
                "DST {} {} ago",
                format_shift(delta_minutes),
                format_span(now_utc - instant)
            )),
        }
    }
}

fn format_shift(delta_minutes: i32) -> String {
    let sign = if delta_minutes >= 0 { "+" } else { "-" };
    let abs = delta_minutes.abs();
    if abs % 60 == 0 {
        format!("{}{}h", sign, abs / 60)
    } else {
        format!("{}{}m", sign, abs)
    }
}

fn format_span(span: Duration) -> String {
    let minutes = span.num_minutes().max(0);
    if minutes >= 60 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}m", minutes)
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Compute time data for a timezone at a specific instant
pub fn compute_time_data_at(tz: Tz, now_utc: DateTime<Utc>) -> TimeData {
    let local = now_utc.with_timezone(&tz);
    let utc_offset_minutes = local.offset().fix().local_minus_utc() / 60;
    let (is_dst, dst_change) = detect_dst_status(tz, now_utc);

    TimeData {
        month: local.month(),
        day: local.day(),
        weekday: local.weekday(),
        hour: local.hour(),
        minute: local.minute(),
        utc_offset_minutes,
        is_dst,
        dst_change,
    }
}

/// Detect DST status and transitions within 24 hours either side of `now_utc`
fn detect_dst_status(tz: Tz, now_utc: DateTime<Utc>) -> (bool, DstChange) {
    let local_now = now_utc.with_timezone(&tz);
    let current_offset = local_now.offset().fix().local_minus_utc();

    // Zones with DST have different offsets in January and July; the larger one is daylight time
    let january = tz.with_ymd_and_hms(local_now.year(), 1, 15, 12, 0, 0).single();
    let july = tz.with_ymd_and_hms(local_now.year(), 7, 15, 12, 0, 0).single();

    let is_dst = match (january, july) {
        (Some(jan), Some(jul)) => {
            let jan_offset = jan.offset().fix().local_minus_utc();
            let jul_offset = jul.offset().fix().local_minus_utc();
            jan_offset != jul_offset && current_offset == jan_offset.max(jul_offset)
        }
        _ => false,
    };

    let future = now_utc + Duration::hours(24);
    let future_offset = future.with_timezone(&tz).offset().fix().local_minus_utc();
    if future_offset != current_offset {
        let instant = find_transition_time(tz, now_utc, future, current_offset);
        return (
            is_dst,
            DstChange::Upcoming {
                instant,
                delta_minutes: (future_offset - current_offset) / 60,
            },
        );
    }

    let past = now_utc - Duration::hours(24);
    let past_offset = past.with_timezone(&tz).offset().fix().local_minus_utc();
    if past_offset != current_offset {
        let instant = find_transition_time(tz, past, now_utc, past_offset);
        return (
            is_dst,
            DstChange::JustOccurred {
                instant,
                delta_minutes: (current_offset - past_offset) / 60,
            },
        );
    }

    (is_dst, DstChange::None)
}

/// Binary search for the offset change, to within a minute
fn find_transition_time(
    tz: Tz,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    start_offset: i32,
) -> DateTime<Utc> {
    let mut low = start;
    let mut high = end;

    while high - low > Duration::minutes(1) {
        let mid = low + (high - low) / 2;
        let mid_offset = mid.with_timezone(&tz).offset().fix().local_minus_utc();
        if mid_offset == start_offset {
            low = mid;
        } else {
            high = mid;
        }
    }

    high
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimezoneError {
    #[error("unknown timezone: {0}")]
    Unknown(String),
}

/// Parse an IANA timezone identifier
pub fn parse_timezone(tz_str: &str) -> Result<Tz, TimezoneError> {
    tz_str
        .parse::<Tz>()
        .map_err(|_| TimezoneError::Unknown(tz_str.to_string()))
}

/// Search timezones by name (case-insensitive partial match)
pub fn search_timezones(query: &str) -> Vec<Tz> {
    let query_lower = query.to_lowercase();
    chrono_tz::TZ_VARIANTS
        .iter()
        .filter(|tz| tz.name().to_lowercase().contains(&query_lower))
        .copied()
        .collect()
}

/// Size of the timezone database
pub fn timezone_count() -> usize {
    chrono_tz::TZ_VARIANTS.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_fixed_offset_zone() {
        let tz = parse_timezone("Asia/Tokyo").unwrap();
        let data = compute_time_data_at(tz, utc(2025, 3, 1, 23, 5));
        assert_eq!(data.format_time_24(), "08:05");
        assert_eq!(data.format_date(), "March 2 Sun");
        assert_eq!(data.format_utc_offset(), "UTC+09:00");
        assert!(!data.is_dst);
        assert_eq!(data.dst_change, DstChange::None);
    }

    #[test]
    fn test_negative_offset_and_dst() {
        let tz = parse_timezone("America/New_York").unwrap();
        let data = compute_time_data_at(tz, utc(2025, 7, 4, 3, 30));
        assert_eq!(data.format_time_24(), "23:30");
        assert_eq!(data.format_utc_offset(), "UTC-04:00");
        assert!(data.is_dst);
    }

    #[test]
    fn test_upcoming_transition_detected() {
        // Chicago springs forward at 2025-03-09 08:00 UTC
        let tz = parse_timezone("America/Chicago").unwrap();
        let data = compute_time_data_at(tz, utc(2025, 3, 8, 20, 0));
        match data.dst_change {
            DstChange::Upcoming { delta_minutes, .. } => assert_eq!(delta_minutes, 60),
            ref other => panic!("expected upcoming change, got {:?}", other),
        }
        assert_eq!(
            data.format_dst_change(utc(2025, 3, 8, 20, 0)),
            Some("DST +1h in 12h".to_string())
        );
    }

    #[test]
    fn test_recent_fall_back_noted() {
        // Berlin falls back at 2025-10-26 01:00 UTC
        let tz = parse_timezone("Europe/Berlin").unwrap();
        let now = utc(2025, 10, 26, 2, 30);
        let data = compute_time_data_at(tz, now);
        assert!(!data.is_dst);
        assert_eq!(data.format_dst_change(now), Some("DST -1h 1h ago".to_string()));
    }

    #[test]
    fn test_parse_unknown_timezone() {
        assert_eq!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(TimezoneError::Unknown("Mars/Olympus_Mons".to_string()))
        );
    }

    #[test]
    fn test_search_timezones() {
        let results = search_timezones("new_york");
        assert!(results.iter().any(|tz| tz.name() == "America/New_York"));
        assert_eq!(search_timezones("").len(), timezone_count());
    }
}
