//! Day-cycle arithmetic.
//!
//! The world clock counts ticks and wraps every 24000. Tick zero is dawn,
//! not midnight, so displayed clock fields shift by a configurable epoch
//! offset (6000 aligns tick zero with 06:00). The day/night boundary is a
//! property of the raw tick, not the displayed clock.

/// Ticks in one full day cycle.
pub const TICKS_PER_DAY: i64 = 24000;

/// First tick of night within a wrapped day.
pub const NIGHT_START: i64 = 12000;

/// Wrap a tick count into `0..TICKS_PER_DAY`.
pub fn wrapped(ticks: i64) -> i64 {
    ticks.rem_euclid(TICKS_PER_DAY)
}

/// Displayed time of day in ticks, after applying the epoch offset.
pub fn time_of_day(ticks: i64, epoch_offset: i64) -> i64 {
    (ticks + epoch_offset).rem_euclid(TICKS_PER_DAY)
}

/// 24-hour clock hour of a time-of-day value.
pub fn hour24(tod: i64) -> u32 {
    (tod / 1000) as u32
}

/// Minute of a time-of-day value. 1000 ticks span one hour.
pub fn minute(tod: i64) -> u32 {
    ((tod % 1000) * 60 / 1000) as u32
}

/// 12-hour clock hour: 0 and 12 map to 12.
pub fn hour12(hour24: u32) -> u32 {
    match hour24 % 12 {
        0 => 12,
        h => h,
    }
}

/// True while the raw tick is in the daytime half of the cycle.
pub fn is_day(ticks: i64) -> bool {
    wrapped(ticks) < NIGHT_START
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAWN_OFFSET: i64 = 6000;

    fn clock(ticks: i64) -> (u32, u32) {
        let tod = time_of_day(ticks, DAWN_OFFSET);
        (hour24(tod), minute(tod))
    }

    #[test]
    fn test_dawn_is_six() {
        assert_eq!(clock(0), (6, 0));
        assert!(is_day(0));
    }

    #[test]
    fn test_noon_and_midnight() {
        assert_eq!(clock(6000), (12, 0));
        assert_eq!(clock(18000), (0, 0));
        assert!(!is_day(18000));
    }

    #[test]
    fn test_nightfall() {
        assert_eq!(clock(12000), (18, 0));
        assert!(is_day(11999));
        assert!(!is_day(12000));
    }

    #[test]
    fn test_minutes_scale() {
        assert_eq!(clock(250), (6, 15));
        assert_eq!(clock(999), (6, 59));
        assert_eq!(clock(1000), (7, 0));
    }

    #[test]
    fn test_wraps_across_days() {
        assert_eq!(clock(24000), clock(0));
        assert_eq!(wrapped(24000 * 3 + 17), 17);
        assert_eq!(wrapped(-1), 23999);
    }

    #[test]
    fn test_hour12_mapping() {
        assert_eq!(hour12(0), 12);
        assert_eq!(hour12(12), 12);
        assert_eq!(hour12(13), 1);
        assert_eq!(hour12(23), 11);
        assert_eq!(hour12(6), 6);
    }
}
