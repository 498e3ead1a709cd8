//! Clock times, weekdays and daily time windows.
//!
//! Input data expresses times of day as `[hour, minute]` pairs and days as
//! weekday names (English or Spanish). This module turns those into chrono
//! values and provides the inclusive window check used by schedules and
//! rule windows.

use chrono::{NaiveTime, Timelike, Weekday};
use std::fmt;

/// Error returned when parsing an invalid time or weekday.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: String,
}

impl TimeError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Build a clock time from an hour and minute.
///
/// # Examples
///
/// ```
/// use transit_server::domain::clock_time;
///
/// assert!(clock_time(5, 0).is_ok());
/// assert!(clock_time(23, 59).is_ok());
/// assert!(clock_time(24, 0).is_err());
/// assert!(clock_time(12, 60).is_err());
/// ```
pub fn clock_time(hour: u32, minute: u32) -> Result<NaiveTime, TimeError> {
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
}

/// Parse a weekday name, case-insensitively, in English or Spanish.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use transit_server::domain::parse_weekday;
///
/// assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Mon);
/// assert_eq!(parse_weekday("lunes").unwrap(), Weekday::Mon);
/// assert_eq!(parse_weekday("MIÉRCOLES").unwrap(), Weekday::Wed);
/// assert!(parse_weekday("someday").is_err());
/// ```
pub fn parse_weekday(name: &str) -> Result<Weekday, TimeError> {
    let day = match name.trim().to_lowercase().as_str() {
        "monday" | "lunes" => Weekday::Mon,
        "tuesday" | "martes" => Weekday::Tue,
        "wednesday" | "miercoles" | "miércoles" => Weekday::Wed,
        "thursday" | "jueves" => Weekday::Thu,
        "friday" | "viernes" => Weekday::Fri,
        "saturday" | "sabado" | "sábado" => Weekday::Sat,
        "sunday" | "domingo" => Weekday::Sun,
        _ => return Err(TimeError::new(format!("unknown weekday '{name}'"))),
    };
    Ok(day)
}

/// Lowercase English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// An inclusive time-of-day window `[start, end]`.
///
/// Windows never wrap past midnight: when `end < start` no time is inside.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Returns true if `time` falls within the window, bounds included.
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time <= self.end
    }
}

impl fmt::Debug for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeWindow({self})")
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        clock_time(h, m).unwrap()
    }

    #[test]
    fn weekday_names_round_trip() {
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert_eq!(parse_weekday(weekday_name(day)).unwrap(), day);
        }
    }

    #[test]
    fn spanish_weekdays() {
        assert_eq!(parse_weekday("martes").unwrap(), Weekday::Tue);
        assert_eq!(parse_weekday("miercoles").unwrap(), Weekday::Wed);
        assert_eq!(parse_weekday("Sábado").unwrap(), Weekday::Sat);
        assert_eq!(parse_weekday("DOMINGO").unwrap(), Weekday::Sun);
    }

    #[test]
    fn unknown_weekday_error() {
        let err = parse_weekday("funday").unwrap_err();
        assert_eq!(err.to_string(), "invalid time: unknown weekday 'funday'");
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = TimeWindow::new(t(5, 0), t(23, 0));
        assert!(window.contains(t(5, 0)));
        assert!(window.contains(t(12, 30)));
        assert!(window.contains(t(23, 0)));
        assert!(!window.contains(t(4, 59)));
        assert!(!window.contains(t(23, 1)));
    }

    #[test]
    fn inverted_window_contains_nothing() {
        let window = TimeWindow::new(t(22, 0), t(2, 0));
        assert!(!window.contains(t(23, 0)));
        assert!(!window.contains(t(1, 0)));
    }

    #[test]
    fn window_display() {
        let window = TimeWindow::new(t(7, 0), t(9, 5));
        assert_eq!(window.to_string(), "07:00-09:05");
        assert_eq!(format!("{:?}", window), "TimeWindow(07:00-09:05)");
    }
}
