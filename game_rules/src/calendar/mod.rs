//! In-game calendar used to schedule timed events.
//!
//! The game runs in weeks of five working days plus a weekend. Times are
//! minute-precise; the time manager that advances the clock at runtime lives
//! outside this crate.

use serde::{Deserialize, Serialize};

/// Days of the in-game week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    const ORDER: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Zero-based index from Monday.
    pub fn index(&self) -> u32 {
        *self as u32
    }

    /// Weekday for a zero-based index, wrapping every seven days.
    pub fn from_index(index: u32) -> Self {
        Self::ORDER[(index % 7) as usize]
    }

    /// Three letter abbreviation.
    pub fn short_name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

/// A point on the in-game calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameTime {
    /// One-based week number.
    pub week: u32,
    pub day: Weekday,
    pub hour: u8,
    pub minute: u8,
}

impl Default for GameTime {
    fn default() -> Self {
        Self {
            week: 1,
            day: Weekday::Monday,
            hour: 9,
            minute: 0,
        }
    }
}

impl GameTime {
    /// Create a new game time. Hour and minute are clamped to valid ranges.
    pub fn new(week: u32, day: Weekday, hour: u8, minute: u8) -> Self {
        Self {
            week: week.max(1),
            day,
            hour: hour.min(23),
            minute: minute.min(59),
        }
    }

    /// Minutes elapsed since week 1, Monday 00:00.
    pub fn total_minutes(&self) -> u64 {
        let days = (self.week.saturating_sub(1) as u64) * 7 + self.day.index() as u64;
        days * 24 * 60 + self.hour as u64 * 60 + self.minute as u64
    }

    /// Return this time advanced by the given number of minutes.
    pub fn advanced_by(&self, minutes: u32) -> Self {
        let total_minutes = self.minute as u64 + minutes as u64;
        let minute = (total_minutes % 60) as u8;

        let total_hours = self.hour as u64 + total_minutes / 60;
        let hour = (total_hours % 24) as u8;

        let total_days = self.day.index() as u64 + total_hours / 24;
        let weeks_passed = u32::try_from(total_days / 7).unwrap_or(u32::MAX);

        Self {
            week: self.week.saturating_add(weeks_passed),
            day: Weekday::from_index((total_days % 7) as u32),
            hour,
            minute,
        }
    }

    /// Check whether this time falls inside working hours (09:00-18:00, weekdays).
    pub fn is_working_hours(&self) -> bool {
        !self.day.is_weekend() && (9..18).contains(&self.hour)
    }
}

impl PartialOrd for GameTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.total_minutes().cmp(&other.total_minutes())
    }
}

impl std::fmt::Display for GameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "W{} {} {:02}:{:02}",
            self.week,
            self.day.short_name(),
            self.hour,
            self.minute
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_within_day() {
        let time = GameTime::new(1, Weekday::Monday, 9, 30);
        let later = time.advanced_by(45);
        assert_eq!(later.hour, 10);
        assert_eq!(later.minute, 15);
        assert_eq!(later.day, Weekday::Monday);
    }

    #[test]
    fn test_advance_rolls_into_next_week() {
        let time = GameTime::new(2, Weekday::Sunday, 23, 30);

        let later = time.advanced_by(60);

        assert_eq!(later.week, 3);
        assert_eq!(later.day, Weekday::Monday);
        assert_eq!(later.hour, 0);
        assert_eq!(later.minute, 30);
    }

    #[test]
    fn test_advance_by_maximum_duration() {
        let time = GameTime::new(1, Weekday::Monday, 23, 59);

        let later = time.advanced_by(u32::MAX);

        assert!(later > time);
        assert_eq!(
            later.total_minutes(),
            time.total_minutes() + u32::MAX as u64
        );
    }

    #[test]
    fn test_ordering_uses_calendar_position() {
        let monday = GameTime::new(1, Weekday::Monday, 17, 0);
        let tuesday = GameTime::new(1, Weekday::Tuesday, 8, 0);
        let next_week = GameTime::new(2, Weekday::Monday, 0, 0);

        assert!(monday < tuesday);
        assert!(tuesday < next_week);
    }

    #[test]
    fn test_working_hours() {
        assert!(GameTime::new(1, Weekday::Wednesday, 11, 0).is_working_hours());
        assert!(!GameTime::new(1, Weekday::Wednesday, 19, 0).is_working_hours());
        assert!(!GameTime::new(1, Weekday::Saturday, 11, 0).is_working_hours());
    }

    #[test]
    fn test_display() {
        let time = GameTime::new(4, Weekday::Friday, 8, 5);
        assert_eq!(time.to_string(), "W4 Fri 08:05");
    }

    #[test]
    fn test_new_clamps_fields() {
        let time = GameTime::new(0, Weekday::Monday, 30, 75);
        assert_eq!(time.week, 1);
        assert_eq!(time.hour, 23);
        assert_eq!(time.minute, 59);
    }
}
