//! Analog clock for a Raspberry Pi Pico driving chained MAX7219 matrices.
//!
//! The time is kept in three circular counters (seconds, minutes, hours)
//! that carry into each other like an odometer. A one second timer advances
//! them and the dial is redrawn from the current reading.
#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod clock;
pub mod display;
pub mod error;
pub mod face;
pub mod input;
pub mod ring;
pub mod schedule;
pub mod trig;

pub use clock::{TimeModel, TimeOfDay, WallClock, WallTime};
pub use error::{InputError, RingError, TimeError};
pub use schedule::{ClockDriver, RepeatingTimer};
