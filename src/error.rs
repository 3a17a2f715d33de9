use thiserror::Error;

/// Raised when a circular counter is built with an unusable size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum RingError {
    #[error("a circular counter needs at least one element")]
    Empty,
    #[error("a circular counter holds at most {max} elements, got {limit}")]
    TooLarge { limit: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum TimeError {
    /// The requested time does not fit on a 12 hour dial.
    #[error("time {hours}:{minutes}:{seconds} is outside 0-11h 0-59m 0-59s")]
    OutOfRange { hours: u8, minutes: u8, seconds: u8 },
    #[error("wall clock could not be read")]
    ClockUnavailable,
}

/// Rejections at the user input boundary. Callers treat all of these as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum InputError {
    #[error("field is not an integer")]
    NonNumeric,
    #[error("command is missing a field")]
    MissingField,
    #[error("unknown command")]
    UnknownCommand,
}
