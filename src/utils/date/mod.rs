// Date utility functions
// Display-zone conversions shared by the grid and the plan form

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Time zone used to place absolute plan instants on the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The system's local zone
    #[default]
    Local,
    /// An explicit IANA zone, e.g. `Europe/Madrid`
    Named(Tz),
}

impl DisplayZone {
    /// Resolve an optional IANA zone name. Blank or missing names mean the
    /// system zone.
    pub fn from_name(name: Option<&str>) -> Result<Self, String> {
        match name.map(str::trim).filter(|name| !name.is_empty()) {
            None => Ok(Self::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(Self::Named)
                .map_err(|_| format!("Unknown time zone '{}'", name)),
        }
    }

    pub fn to_wall_clock(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Local => instant.with_timezone(&Local).naive_local(),
            Self::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    pub fn hour_of(&self, instant: DateTime<Utc>) -> u32 {
        self.to_wall_clock(instant).hour()
    }

    /// Resolve a wall-clock time in this zone to an absolute instant.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant; times
    /// that fall inside a DST gap do not exist and yield `None`.
    pub fn from_wall_clock(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Self::Named(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.to_wall_clock(Utc::now()).date()
    }
}

/// Format a time of day as 24-hour `HH:MM`.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parse a 24-hour `HH:MM` string. Seconds are not accepted.
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()
}

/// Render a plan instant as `HH:MM` in the display zone.
pub fn format_instant(instant: DateTime<Utc>, zone: &DisplayZone) -> String {
    format_clock(zone.to_wall_clock(instant).time())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc() -> DisplayZone {
        DisplayZone::Named(chrono_tz::UTC)
    }

    #[test]
    fn test_hour_of_follows_zone() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();
        assert_eq!(utc().hour_of(instant), 9);

        let madrid = DisplayZone::Named(chrono_tz::Europe::Madrid);
        assert_eq!(madrid.hour_of(instant), 10);
    }

    #[test]
    fn test_wall_clock_round_trip() {
        let madrid = DisplayZone::Named(chrono_tz::Europe::Madrid);
        let naive = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let instant = madrid.from_wall_clock(naive).unwrap();

        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 7, 1, 7, 30, 0).unwrap());
        assert_eq!(madrid.to_wall_clock(instant), naive);
    }

    #[test]
    fn test_wall_clock_inside_dst_gap() {
        let madrid = DisplayZone::Named(chrono_tz::Europe::Madrid);
        let missing = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert!(madrid.from_wall_clock(missing).is_none());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(DisplayZone::from_name(None).unwrap(), DisplayZone::Local);
        assert_eq!(DisplayZone::from_name(Some("  ")).unwrap(), DisplayZone::Local);
        assert_eq!(
            DisplayZone::from_name(Some("Europe/Madrid")).unwrap(),
            DisplayZone::Named(chrono_tz::Europe::Madrid)
        );
        assert!(DisplayZone::from_name(Some("Mars/Olympus")).is_err());
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("09:15"), NaiveTime::from_hms_opt(9, 15, 0));
        assert_eq!(parse_clock(" 17:00 "), NaiveTime::from_hms_opt(17, 0, 0));
        assert!(parse_clock("25:00").is_none());
        assert!(parse_clock("nine").is_none());
        assert!(parse_clock("").is_none());
    }

    #[test]
    fn test_format_instant() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 3, 7, 5, 59).unwrap();
        assert_eq!(format_instant(instant, &utc()), "07:05");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-03"), NaiveDate::from_ymd_opt(2024, 1, 3));
        assert!(parse_date("03/01/2024").is_none());
        assert!(parse_date("2024-02-30").is_none());
    }
}
