//! Wall-clock access for the planner.

use jiff::{civil::Date, tz::TimeZone, Timestamp};

/// Source of "now" and "today".
///
/// The system clock is the default; tests pin a fixed instant so that
/// session dates and staleness are deterministic.
#[derive(Debug, Clone)]
pub struct Clock {
    fixed: Option<Timestamp>,
    time_zone: TimeZone,
}

impl Clock {
    /// The system clock in the system time zone.
    pub fn system() -> Self {
        Self {
            fixed: None,
            time_zone: TimeZone::system(),
        }
    }

    /// A clock frozen at `at`, with calendar days computed in `time_zone`.
    pub fn fixed(at: Timestamp, time_zone: TimeZone) -> Self {
        Self {
            fixed: Some(at),
            time_zone,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.fixed.unwrap_or_else(Timestamp::now)
    }

    /// Today's calendar date in the clock's time zone.
    pub fn today(&self) -> Date {
        self.now().to_zoned(self.time_zone.clone()).date()
    }

    /// 1-based day number counted from `since` (the profile's creation).
    pub fn day_sequence(&self, since: Option<Timestamp>) -> u32 {
        let Some(since) = since else {
            return 1;
        };
        let start = since.to_zoned(self.time_zone.clone()).date();
        let days = self
            .today()
            .since(start)
            .map(|span| span.get_days())
            .unwrap_or(0);
        days.max(0) as u32 + 1
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(second: i64) -> Clock {
        Clock::fixed(Timestamp::from_second(second).unwrap(), TimeZone::UTC)
    }

    #[test]
    fn test_fixed_clock_today() {
        // 2026-10-19 12:00:00 UTC
        let clock = clock_at(1_792_411_200);
        assert_eq!(clock.today(), jiff::civil::date(2026, 10, 19));
    }

    #[test]
    fn test_day_sequence() {
        let clock = clock_at(1_792_411_200);
        assert_eq!(clock.day_sequence(None), 1);

        let same_day = Timestamp::from_second(1_792_400_000).unwrap();
        assert_eq!(clock.day_sequence(Some(same_day)), 1);

        let three_days_earlier = Timestamp::from_second(1_792_411_200 - 3 * 86_400).unwrap();
        assert_eq!(clock.day_sequence(Some(three_days_earlier)), 4);

        let in_future = Timestamp::from_second(1_792_411_200 + 86_400).unwrap();
        assert_eq!(clock.day_sequence(Some(in_future)), 1);
    }
}
