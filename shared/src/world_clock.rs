//! World clock entries and rendering
//!
//! Rendering is stateless: every refresh recomputes each reading from the
//! wall-clock instant it is given.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::time_engine::{compute_time_data_at, parse_timezone, TimezoneError};

/// A city shown on the world clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldClockEntry {
    pub id: u32,
    pub timezone: Tz,
    pub display_name: String,
}

/// Persisted form of a world clock entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldClockSpec {
    pub timezone: String,
    pub display_name: String,
}

impl WorldClockSpec {
    pub fn new(timezone: &str, display_name: &str) -> Self {
        Self {
            timezone: timezone.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// One rendered card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldClockReading {
    pub id: u32,
    pub display_name: String,
    /// "HH:MM", 24-hour
    pub time: String,
    /// "October 16 Fri"
    pub date: String,
    /// "UTC±hh:mm"
    pub utc_offset: String,
    pub is_dst: bool,
    /// Set when a DST change is within a day either side
    pub dst_note: Option<String>,
}

pub fn default_world_clocks() -> Vec<WorldClockSpec> {
    vec![
        WorldClockSpec::new("Asia/Shanghai", "Shanghai"),
        WorldClockSpec::new("Asia/Tokyo", "Tokyo"),
        WorldClockSpec::new("Asia/Hong_Kong", "Hong Kong"),
        WorldClockSpec::new("Asia/Singapore", "Singapore"),
        WorldClockSpec::new("Asia/Dubai", "Dubai"),
        WorldClockSpec::new("Europe/London", "London"),
        WorldClockSpec::new("Europe/Paris", "Paris"),
        WorldClockSpec::new("Europe/Moscow", "Moscow"),
        WorldClockSpec::new("America/New_York", "New York"),
        WorldClockSpec::new("America/Los_Angeles", "Los Angeles"),
        WorldClockSpec::new("America/Chicago", "Chicago"),
        WorldClockSpec::new("Australia/Sydney", "Sydney"),
    ]
}

/// City part of an IANA identifier, e.g. "America/New_York" -> "New York"
pub fn city_name(tz: Tz) -> String {
    let name = tz.name();
    name.rsplit('/').next().unwrap_or(name).replace('_', " ")
}

/// Ordered, editable list of world clocks
#[derive(Debug, Clone, Default)]
pub struct WorldClockList {
    entries: Vec<WorldClockEntry>,
    next_id: u32,
}

impl WorldClockList {
    /// Build from persisted specs. Entries with unknown timezones are skipped.
    pub fn from_specs(specs: &[WorldClockSpec]) -> Self {
        let mut list = Self::default();
        for spec in specs {
            if let Err(e) = list.add(&spec.timezone, &spec.display_name) {
                warn!("skipping world clock {:?}: {}", spec.display_name, e);
            }
        }
        list
    }

    pub fn entries(&self) -> &[WorldClockEntry] {
        &self.entries
    }

    pub fn to_specs(&self) -> Vec<WorldClockSpec> {
        self.entries
            .iter()
            .map(|entry| WorldClockSpec::new(entry.timezone.name(), &entry.display_name))
            .collect()
    }

    pub fn contains(&self, tz: Tz) -> bool {
        self.entries.iter().any(|entry| entry.timezone == tz)
    }

    /// Append a city. An empty display name falls back to the city part of the identifier.
    pub fn add(&mut self, timezone: &str, display_name: &str) -> Result<u32, TimezoneError> {
        let tz = parse_timezone(timezone)?;
        let display_name = if display_name.trim().is_empty() {
            city_name(tz)
        } else {
            display_name.trim().to_string()
        };
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(WorldClockEntry {
            id,
            timezone: tz,
            display_name,
        });
        Ok(id)
    }

    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }
}

/// Render every entry at `now`
pub fn render_world_clocks(entries: &[WorldClockEntry], now: DateTime<Utc>) -> Vec<WorldClockReading> {
    entries
        .iter()
        .map(|entry| {
            let data = compute_time_data_at(entry.timezone, now);
            WorldClockReading {
                id: entry.id,
                display_name: entry.display_name.clone(),
                time: data.format_time_24(),
                date: data.format_date(),
                utc_offset: data.format_utc_offset(),
                is_dst: data.is_dst,
                dst_note: data.format_dst_change(now),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_all_parse() {
        let list = WorldClockList::from_specs(&default_world_clocks());
        assert_eq!(list.entries().len(), 12);
        assert_eq!(list.to_specs(), default_world_clocks());
    }

    #[test]
    fn test_render_is_pure_function_of_instant() {
        let list = WorldClockList::from_specs(&[
            WorldClockSpec::new("Europe/London", "London"),
            WorldClockSpec::new("Asia/Shanghai", "Shanghai"),
        ]);
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 16, 7, 42).unwrap();
        let readings = render_world_clocks(list.entries(), now);

        assert_eq!(readings[0].time, "16:07");
        assert_eq!(readings[0].date, "January 10 Fri");
        assert_eq!(readings[0].utc_offset, "UTC+00:00");
        assert_eq!(readings[1].time, "00:07");
        assert_eq!(readings[1].date, "January 11 Sat");
        assert_eq!(readings[1].display_name, "Shanghai");
        assert_eq!(render_world_clocks(list.entries(), now), readings);
    }

    #[test]
    fn test_unknown_timezone_skipped() {
        let list = WorldClockList::from_specs(&[
            WorldClockSpec::new("Nowhere/Special", "Nowhere"),
            WorldClockSpec::new("Europe/Paris", ""),
        ]);
        assert_eq!(list.entries().len(), 1);
        assert_eq!(list.entries()[0].display_name, "Paris");
    }

    #[test]
    fn test_add_and_remove() {
        let mut list = WorldClockList::default();
        let id = list.add("America/Los_Angeles", "").unwrap();
        assert_eq!(list.entries()[0].display_name, "Los Angeles");
        assert!(list.contains(list.entries()[0].timezone));
        assert!(list.remove(id));
        assert!(!list.remove(id));
        assert!(list.add("Bogus/Zone", "x").is_err());
    }
}
