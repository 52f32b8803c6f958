//! Pre-built Test Fixtures
//!
//! Scenario tests share one calendar so their expectations read the same
//! way: "now" is midday on 1 June 2024.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Fixed dates and instants
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Calendar date shorthand
    pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
    }

    /// Midnight UTC on the given date
    pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .expect("valid fixture instant")
    }

    pub fn at_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("valid fixture instant")
    }

    /// The reference "now" used by notice and plan scenarios
    pub fn now() -> DateTime<Utc> {
        Self::at_time(2024, 6, 1, 12, 0)
    }

    pub fn today() -> NaiveDate {
        Self::now().date_naive()
    }

    /// Creation timestamp given to built records
    pub fn created() -> DateTime<Utc> {
        Self::at(2024, 1, 1)
    }
}

/// House codes used across scenarios
pub struct HouseFixtures;

impl HouseFixtures {
    pub const H1: &'static str = "H1";
    pub const H2: &'static str = "H2";
    pub const H3: &'static str = "H3";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_falls_on_today() {
        assert_eq!(TemporalFixtures::today(), TemporalFixtures::day(2024, 6, 1));
        assert!(TemporalFixtures::created() < TemporalFixtures::now());
    }
}
