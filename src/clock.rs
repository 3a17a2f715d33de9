use core::fmt;

use crate::error::{RingError, TimeError};
use crate::ring::{CircularCounter, Position};

pub const SECONDS_PER_MINUTE: usize = 60;
pub const MINUTES_PER_HOUR: usize = 60;
pub const HOURS_PER_DIAL: usize = 12;

/// A validated reading on a 12 hour dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct TimeOfDay {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl TimeOfDay {
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Result<Self, TimeError> {
        if usize::from(hours) >= HOURS_PER_DIAL
            || usize::from(minutes) >= MINUTES_PER_HOUR
            || usize::from(seconds) >= SECONDS_PER_MINUTE
        {
            return Err(TimeError::OutOfRange {
                hours,
                minutes,
                seconds,
            });
        }
        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }

    /// Reduces each field modulo its range, so any input lands on the dial.
    pub fn wrapping(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            hours: hours % HOURS_PER_DIAL as u8,
            minutes: minutes % MINUTES_PER_HOUR as u8,
            seconds: seconds % SECONDS_PER_MINUTE as u8,
        }
    }

    /// Folds a 24 hour wall reading onto the dial (`hour % 12`).
    pub fn from_wall_time(wall: WallTime) -> Result<Self, TimeError> {
        Self::new(
            wall.hour % HOURS_PER_DIAL as u8,
            wall.minute,
            wall.second,
        )
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// A 24 hour reading from a wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Source of the current wall-clock time.
pub trait WallClock {
    /// `None` when the clock is not running or cannot be read.
    fn now(&self) -> Option<WallTime>;
}

/// Validates an explicit set request, logging the rejection.
pub(crate) fn checked_time(hours: u8, minutes: u8, seconds: u8) -> Result<TimeOfDay, TimeError> {
    TimeOfDay::new(hours, minutes, seconds).map_err(|err| {
        warn!("rejected set_time: {}", err);
        err
    })
}

pub(crate) fn read_wall_clock(clock: &impl WallClock) -> Result<TimeOfDay, TimeError> {
    let wall = clock.now().ok_or(TimeError::ClockUnavailable)?;
    TimeOfDay::from_wall_time(wall)
}

/// Seconds, minutes and hours as three rings with a cursor each.
///
/// Advancing behaves like an odometer: the seconds ring carries into the
/// minutes ring, which carries into the hours ring.
#[derive(Debug, Clone)]
pub struct TimeModel {
    seconds: CircularCounter,
    minutes: CircularCounter,
    hours: CircularCounter,
    second: Position,
    minute: Position,
    hour: Position,
}

impl TimeModel {
    /// Builds the rings with every cursor at 00:00:00.
    pub fn new() -> Result<Self, RingError> {
        let seconds = CircularCounter::new(SECONDS_PER_MINUTE)?;
        let minutes = CircularCounter::new(MINUTES_PER_HOUR)?;
        let hours = CircularCounter::new(HOURS_PER_DIAL)?;
        Ok(Self {
            second: seconds.start(),
            minute: minutes.start(),
            hour: hours.start(),
            seconds,
            minutes,
            hours,
        })
    }

    /// Moves forward one second, carrying into minutes and hours on wraparound.
    pub fn advance(&mut self) {
        self.second = self.seconds.next(self.second);
        if self.seconds.value(self.second) == 0 {
            self.carry_minute();
        }
    }

    /// Moves forward one minute without touching the seconds.
    pub fn advance_minute(&mut self) {
        self.carry_minute();
    }

    fn carry_minute(&mut self) {
        self.minute = self.minutes.next(self.minute);
        if self.minutes.value(self.minute) == 0 {
            self.hour = self.hours.next(self.hour);
        }
    }

    /// Repositions all three cursors. Out of range input leaves the model untouched.
    pub fn set_time(&mut self, hours: u8, minutes: u8, seconds: u8) -> Result<(), TimeError> {
        self.set(checked_time(hours, minutes, seconds)?);
        Ok(())
    }

    pub fn set(&mut self, time: TimeOfDay) {
        self.hour = self.hours.walk(self.hours.start(), usize::from(time.hours));
        self.minute = self
            .minutes
            .walk(self.minutes.start(), usize::from(time.minutes));
        self.second = self
            .seconds
            .walk(self.seconds.start(), usize::from(time.seconds));
        debug!("time set to {}", time);
    }

    /// Copies the wall clock onto the dial.
    pub fn set_from_wall_clock(&mut self, clock: &impl WallClock) -> Result<TimeOfDay, TimeError> {
        let time = read_wall_clock(clock)?;
        self.set(time);
        Ok(time)
    }

    pub fn current_seconds(&self) -> u8 {
        self.seconds.value(self.second)
    }

    pub fn current_minutes(&self) -> u8 {
        self.minutes.value(self.minute)
    }

    pub fn current_hours(&self) -> u8 {
        self.hours.value(self.hour)
    }

    pub fn reading(&self) -> TimeOfDay {
        TimeOfDay {
            hours: self.current_hours(),
            minutes: self.current_minutes(),
            seconds: self.current_seconds(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A wall clock stuck at one instant.
    pub(crate) struct FixedClock(pub Option<WallTime>);

    impl FixedClock {
        pub(crate) fn at(hour: u8, minute: u8, second: u8) -> Self {
            Self(Some(WallTime {
                hour,
                minute,
                second,
            }))
        }
    }

    impl WallClock for FixedClock {
        fn now(&self) -> Option<WallTime> {
            self.0
        }
    }

    fn hms(model: &TimeModel) -> (u8, u8, u8) {
        (
            model.current_hours(),
            model.current_minutes(),
            model.current_seconds(),
        )
    }

    #[test]
    fn test_starts_at_midnight() {
        let model = TimeModel::new().unwrap();
        assert_eq!(hms(&model), (0, 0, 0));
        assert_eq!(model.reading(), TimeOfDay::default());
    }

    #[test]
    fn test_sixty_ticks_carry_one_minute() {
        let mut model = TimeModel::new().unwrap();
        model.set_time(3, 17, 0).unwrap();
        for _ in 0..60 {
            model.advance();
        }
        assert_eq!(hms(&model), (3, 18, 0));
    }

    #[test]
    fn test_an_hour_of_ticks_carries_one_hour() {
        let mut model = TimeModel::new().unwrap();
        model.set_time(4, 0, 0).unwrap();
        for _ in 0..3600 {
            model.advance();
        }
        assert_eq!(hms(&model), (5, 0, 0));
    }

    #[test]
    fn test_full_wraparound_in_one_tick() {
        let mut model = TimeModel::new().unwrap();
        model.set_time(11, 59, 59).unwrap();
        model.advance();
        assert_eq!(hms(&model), (0, 0, 0));
    }

    #[test]
    fn test_half_day_of_ticks_returns_to_start() {
        let mut model = TimeModel::new().unwrap();
        model.set_time(7, 30, 15).unwrap();
        for _ in 0..12 * 3600 {
            model.advance();
        }
        assert_eq!(hms(&model), (7, 30, 15));
    }

    #[test]
    fn test_set_time_reads_back() {
        let mut model = TimeModel::new().unwrap();
        for (h, m, s) in [(0, 0, 0), (11, 59, 59), (6, 1, 42), (9, 45, 0)] {
            model.set_time(h, m, s).unwrap();
            assert_eq!(hms(&model), (h, m, s));
        }
    }

    #[test]
    fn test_out_of_range_set_keeps_state() {
        let mut model = TimeModel::new().unwrap();
        model.set_time(8, 20, 10).unwrap();

        for (h, m, s) in [(12, 0, 0), (0, 60, 0), (0, 0, 60), (255, 255, 255)] {
            assert_eq!(
                model.set_time(h, m, s),
                Err(TimeError::OutOfRange {
                    hours: h,
                    minutes: m,
                    seconds: s
                })
            );
            assert_eq!(hms(&model), (8, 20, 10));
        }
    }

    #[test]
    fn test_advance_minute_carries_into_hours() {
        let mut model = TimeModel::new().unwrap();
        model.set_time(11, 59, 30).unwrap();
        model.advance_minute();
        assert_eq!(hms(&model), (0, 0, 30));
    }

    #[test]
    fn test_wall_clock_folds_to_twelve_hours() {
        let mut model = TimeModel::new().unwrap();
        let time = model
            .set_from_wall_clock(&FixedClock::at(14, 5, 30))
            .unwrap();
        assert_eq!(hms(&model), (2, 5, 30));
        assert_eq!(time, TimeOfDay::new(2, 5, 30).unwrap());
    }

    #[test]
    fn test_wall_clock_noon_and_midnight_are_zero() {
        let mut model = TimeModel::new().unwrap();
        model.set_from_wall_clock(&FixedClock::at(12, 0, 0)).unwrap();
        assert_eq!(model.current_hours(), 0);
        model.set_from_wall_clock(&FixedClock::at(0, 0, 1)).unwrap();
        assert_eq!(hms(&model), (0, 0, 1));
    }

    #[test]
    fn test_unreadable_wall_clock_keeps_state() {
        let mut model = TimeModel::new().unwrap();
        model.set_time(1, 2, 3).unwrap();
        assert_eq!(
            model.set_from_wall_clock(&FixedClock(None)),
            Err(TimeError::ClockUnavailable)
        );
        // leap second
        assert!(model.set_from_wall_clock(&FixedClock::at(23, 59, 60)).is_err());
        assert_eq!(hms(&model), (1, 2, 3));
    }

    #[test]
    fn test_wrapping_reduces_each_field() {
        assert_eq!(TimeOfDay::wrapping(11, 59, 59), TimeOfDay::new(11, 59, 59).unwrap());
        assert_eq!(TimeOfDay::wrapping(12, 60, 60), TimeOfDay::default());
        assert_eq!(TimeOfDay::wrapping(255, 255, 255), TimeOfDay::new(3, 15, 15).unwrap());
    }

    #[test]
    fn test_display_is_zero_padded() {
        let time = TimeOfDay::new(2, 5, 9).unwrap();
        assert_eq!(format!("{time}"), "02:05:09");
    }
}
