//! Timer-driven tick loop.
//!
//! One repeating timer fires once per second. Each firing advances the time
//! model by exactly one tick and hands the new reading to the display. Any
//! explicit change of time stops the timer first and restarts it afterwards,
//! so the next tick is always a full period after the change.

use crate::clock::{checked_time, read_wall_clock, TimeModel, TimeOfDay, WallClock};
use crate::error::TimeError;

/// Nominal tick period.
pub const TICK_PERIOD_US: u32 = 1_000_000;

/// A periodic hardware (or simulated) timer.
pub trait RepeatingTimer {
    /// Schedules the first firing one period from now.
    fn start(&mut self);

    /// Cancels any pending firing.
    fn stop(&mut self);

    /// Clears the pending interrupt of a firing that just happened.
    fn acknowledge(&mut self) {}

    /// Schedules the firing after the one that just happened.
    fn rearm(&mut self);
}

/// Owns the time model and the timer that drives it.
pub struct ClockDriver<T> {
    model: TimeModel,
    timer: T,
    running: bool,
}

impl<T: RepeatingTimer> ClockDriver<T> {
    pub fn new(model: TimeModel, timer: T) -> Self {
        Self {
            model,
            timer,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            self.timer.start();
            self.running = true;
            trace!("tick timer started");
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.timer.stop();
            self.running = false;
            trace!("tick timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Handles one timer firing.
    ///
    /// Returns the reading to draw, or `None` if the firing arrived after the
    /// timer was stopped.
    pub fn on_tick(&mut self) -> Option<TimeOfDay> {
        self.timer.acknowledge();
        if !self.running {
            debug!("ignored tick while stopped");
            return None;
        }
        self.timer.rearm();
        self.model.advance();
        Some(self.model.reading())
    }

    /// Sets the dial. Rejected input leaves both the model and the timer alone.
    pub fn set_time(&mut self, hours: u8, minutes: u8, seconds: u8) -> Result<TimeOfDay, TimeError> {
        let time = checked_time(hours, minutes, seconds)?;
        self.restart_with(|model| model.set(time));
        Ok(time)
    }

    pub fn set_from_wall_clock(&mut self, clock: &impl WallClock) -> Result<TimeOfDay, TimeError> {
        let time = read_wall_clock(clock)?;
        self.restart_with(|model| model.set(time));
        info!("synced to wall clock at {}", time);
        Ok(time)
    }

    /// One minute forward, carrying into hours.
    pub fn nudge_minute(&mut self) -> TimeOfDay {
        self.restart_with(TimeModel::advance_minute);
        self.model.reading()
    }

    pub fn reading(&self) -> TimeOfDay {
        self.model.reading()
    }

    pub fn model(&self) -> &TimeModel {
        &self.model
    }

    fn restart_with(&mut self, change: impl FnOnce(&mut TimeModel)) {
        self.stop();
        change(&mut self.model);
        self.start();
    }
}
