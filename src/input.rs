//! User input boundary.
//!
//! Anything typed or pressed is reduced to a valid [`TimeOfDay`] or rejected
//! here, before it reaches the clock. Rejections are plain values; nothing in
//! this module panics on bad input.

use heapless::String;

use crate::clock::{TimeOfDay, HOURS_PER_DIAL, MINUTES_PER_HOUR, SECONDS_PER_MINUTE};
use crate::error::InputError;

/// Longest console line kept; longer lines are dropped whole.
pub const LINE_CAPACITY: usize = 32;

/// Reduces a signed decimal integer of any length modulo `modulus`.
fn parse_field(field: &str, modulus: usize) -> Result<u8, InputError> {
    let field = field.trim();
    let (negative, digits) = match field.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, field.strip_prefix('+').unwrap_or(field)),
    };
    if digits.is_empty() {
        return Err(InputError::NonNumeric);
    }

    let mut reduced = 0;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            return Err(InputError::NonNumeric);
        }
        reduced = (reduced * 10 + usize::from(byte - b'0')) % modulus;
    }
    if negative {
        reduced = (modulus - reduced) % modulus;
    }
    // modulus <= 60, so the reduced value always fits
    Ok(reduced as u8)
}

/// Parses hour, minute and second fields, wrapping each into range.
///
/// `-1` hours becomes 11, `75` minutes becomes 15. Fields may be
/// arbitrarily long; only non-numeric text is rejected.
pub fn parse_time_fields(hours: &str, minutes: &str, seconds: &str) -> Result<TimeOfDay, InputError> {
    let hours = parse_field(hours, HOURS_PER_DIAL)?;
    let minutes = parse_field(minutes, MINUTES_PER_HOUR)?;
    let seconds = parse_field(seconds, SECONDS_PER_MINUTE)?;
    Ok(TimeOfDay::wrapping(hours, minutes, seconds))
}

/// A line received on the serial console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `set H M S`
    Set(TimeOfDay),
    /// `sync`: copy the real-time clock onto the dial.
    Sync,
    /// `style`: switch between roman and arabic numerals.
    ToggleStyle,
    /// `now`: log the current reading.
    Report,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let mut words = line.split_ascii_whitespace();
        let verb = words.next().ok_or(InputError::UnknownCommand)?;

        if verb.eq_ignore_ascii_case("set") {
            let mut field = || words.next().ok_or(InputError::MissingField);
            let (h, m, s) = (field()?, field()?, field()?);
            parse_time_fields(h, m, s).map(Self::Set)
        } else if verb.eq_ignore_ascii_case("sync") {
            Ok(Self::Sync)
        } else if verb.eq_ignore_ascii_case("style") {
            Ok(Self::ToggleStyle)
        } else if verb.eq_ignore_ascii_case("now") {
            Ok(Self::Report)
        } else {
            Err(InputError::UnknownCommand)
        }
    }
}

/// Collects serial bytes into lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    line: String<LINE_CAPACITY>,
    discarding: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one byte. Returns the finished line on `\n` or `\r`.
    ///
    /// Overlong lines and lines with non-ASCII bytes are dropped.
    pub fn push(&mut self, byte: u8) -> Option<String<LINE_CAPACITY>> {
        if byte == b'\n' || byte == b'\r' {
            let line = core::mem::take(&mut self.line);
            let discarded = core::mem::replace(&mut self.discarding, false);
            return (!discarded && !line.is_empty()).then_some(line);
        }
        if self.discarding {
            return None;
        }
        if !byte.is_ascii() || self.line.push(char::from(byte)).is_err() {
            self.line.clear();
            self.discarding = true;
        }
        None
    }
}

/// Auto-repeat timing for a held button: starts slow and speeds up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatRate {
    delay_us: u32,
}

impl RepeatRate {
    pub const INITIAL_US: u32 = 500_000;
    pub const FLOOR_US: u32 = 20_000;

    pub const fn new() -> Self {
        Self {
            delay_us: Self::INITIAL_US,
        }
    }

    /// Back to the initial delay, for a fresh press.
    pub fn reset(&mut self) -> u32 {
        self.delay_us = Self::INITIAL_US;
        self.delay_us
    }

    /// Shortens the delay by 20%, never below the floor.
    pub fn accelerate(&mut self) -> u32 {
        if self.delay_us > Self::FLOOR_US {
            self.delay_us = (u64::from(self.delay_us) * 8 / 10) as u32;
            self.delay_us = self.delay_us.max(Self::FLOOR_US);
        }
        self.delay_us
    }

    pub fn delay_us(&self) -> u32 {
        self.delay_us
    }
}

impl Default for RepeatRate {
    fn default() -> Self {
        Self::new()
    }
}

/// One action per physical press of a bouncy button.
///
/// The first falling edge latches; further edges are ignored until a poll
/// sees the button released.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PressLatch {
    latched: bool,
}

impl PressLatch {
    /// How often a latched button is polled for release.
    pub const RELEASE_POLL_US: u32 = 50_000;

    pub const fn new() -> Self {
        Self { latched: false }
    }

    /// Records a falling edge. `true` only for the first edge of a press.
    pub fn press(&mut self) -> bool {
        !core::mem::replace(&mut self.latched, true)
    }

    /// Returns `true` once the button is up and edges should be listened to again.
    pub fn poll(&mut self, held: bool) -> bool {
        if held && self.latched {
            return false;
        }
        self.latched = false;
        true
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u8, m: u8, s: u8) -> TimeOfDay {
        TimeOfDay::new(h, m, s).unwrap()
    }

    #[test]
    fn test_fields_in_range_pass_through() {
        assert_eq!(parse_time_fields("4", "20", "0"), Ok(time(4, 20, 0)));
        assert_eq!(parse_time_fields(" 11 ", "+59", "59"), Ok(time(11, 59, 59)));
    }

    #[test]
    fn test_fields_wrap_modulo_their_range() {
        assert_eq!(parse_time_fields("12", "60", "60"), Ok(time(0, 0, 0)));
        assert_eq!(parse_time_fields("14", "75", "121"), Ok(time(2, 15, 1)));
        assert_eq!(parse_time_fields("-1", "-1", "-61"), Ok(time(11, 59, 59)));
    }

    #[test]
    fn test_non_numeric_fields_are_rejected() {
        for (h, m, s) in [("", "1", "1"), ("one", "1", "1"), ("1", "2.5", "1"), ("1", "1", "1s")] {
            assert_eq!(parse_time_fields(h, m, s), Err(InputError::NonNumeric));
        }
    }

    #[test]
    fn test_huge_numbers_still_wrap() {
        // 99999999999999999999 = 12 * k + 3 = 60 * j + 39
        assert_eq!(
            parse_time_fields("99999999999999999999", "99999999999999999999", "0"),
            Ok(time(3, 39, 0))
        );
        assert_eq!(
            parse_time_fields("-99999999999999999999", "0", "-99999999999999999999"),
            Ok(time(9, 0, 21))
        );
    }

    #[test]
    fn test_lone_signs_are_non_numeric() {
        for field in ["-", "+", "--1", "+-1", "1-"] {
            assert_eq!(parse_time_fields(field, "0", "0"), Err(InputError::NonNumeric));
        }
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("set 2 5 30"), Ok(Command::Set(time(2, 5, 30))));
        assert_eq!(Command::parse("  SET 14 5 30 "), Ok(Command::Set(time(2, 5, 30))));
        assert_eq!(Command::parse("sync"), Ok(Command::Sync));
        assert_eq!(Command::parse("Style"), Ok(Command::ToggleStyle));
        assert_eq!(Command::parse("now"), Ok(Command::Report));
    }

    #[test]
    fn test_bad_commands() {
        assert_eq!(Command::parse(""), Err(InputError::UnknownCommand));
        assert_eq!(Command::parse("reboot"), Err(InputError::UnknownCommand));
        assert_eq!(Command::parse("set 1 2"), Err(InputError::MissingField));
        assert_eq!(Command::parse("set a b c"), Err(InputError::NonNumeric));
    }

    #[test]
    fn test_line_buffer_splits_lines() {
        let mut buffer = LineBuffer::new();
        let mut lines = Vec::new();
        for &byte in b"set 1 2 3\r\nnow\n\n" {
            if let Some(line) = buffer.push(byte) {
                lines.push(line);
            }
        }
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_str(), "set 1 2 3");
        assert_eq!(lines[1].as_str(), "now");
    }

    #[test]
    fn test_line_buffer_drops_overlong_line() {
        let mut buffer = LineBuffer::new();
        for _ in 0..LINE_CAPACITY + 5 {
            assert_eq!(buffer.push(b'x'), None);
        }
        assert_eq!(buffer.push(b'\n'), None);

        for &byte in b"sync" {
            buffer.push(byte);
        }
        assert_eq!(buffer.push(b'\n').as_deref(), Some("sync"));
    }

    #[test]
    fn test_line_buffer_drops_non_ascii() {
        let mut buffer = LineBuffer::new();
        for &byte in "sét 1 2 3".as_bytes() {
            buffer.push(byte);
        }
        assert_eq!(buffer.push(b'\n'), None);
    }

    #[test]
    fn test_press_latch_counts_one_toggle_per_press() {
        let mut latch = PressLatch::new();
        let mut toggles = 0;

        // bouncing contact: five edges, then held for two polls, then released
        for _ in 0..5 {
            toggles += usize::from(latch.press());
        }
        assert!(!latch.poll(true));
        assert!(!latch.poll(true));
        assert!(latch.is_latched());
        assert!(latch.poll(false));
        assert_eq!(toggles, 1);

        // the next press counts again
        assert!(latch.press());
    }

    #[test]
    fn test_press_latch_poll_without_press_releases() {
        let mut latch = PressLatch::new();
        assert!(latch.poll(true));
        assert!(!latch.is_latched());
    }

    #[test]
    fn test_repeat_rate_accelerates_to_floor() {
        let mut rate = RepeatRate::new();
        assert_eq!(rate.delay_us(), 500_000);
        assert_eq!(rate.accelerate(), 400_000);
        assert_eq!(rate.accelerate(), 320_000);

        for _ in 0..50 {
            rate.accelerate();
        }
        assert_eq!(rate.delay_us(), RepeatRate::FLOOR_US);
        assert_eq!(rate.reset(), RepeatRate::INITIAL_US);
    }
}
