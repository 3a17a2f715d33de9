//! RP2040 glue: the tick alarm and the real-time clock.

use rp_pico::hal::{
    fugit::ExtU32,
    rtc::{DateTime, DayOfWeek, RealTimeClock},
    timer::{Alarm, Alarm0},
};
use wokwi_analog_clock::{
    clock::{WallClock, WallTime},
    schedule::{RepeatingTimer, TICK_PERIOD_US},
};

/// The board has no battery backed clock, so the RTC boots at this instant.
pub const BOOT_TIME: DateTime = DateTime {
    year: 2024,
    month: 1,
    day: 1,
    day_of_week: DayOfWeek::Monday,
    hour: 12,
    minute: 34,
    second: 56,
};

/// Alarm 0 as the one second tick source.
pub struct TickAlarm(Alarm0);

impl TickAlarm {
    pub fn new(alarm: Alarm0) -> Self {
        Self(alarm)
    }

    fn schedule(&mut self) {
        if self.0.schedule(TICK_PERIOD_US.micros()).is_err() {
            defmt::warn!("failed to schedule tick");
        }
    }
}

impl RepeatingTimer for TickAlarm {
    fn start(&mut self) {
        self.0.clear_interrupt();
        self.schedule();
        self.0.enable_interrupt();
    }

    fn stop(&mut self) {
        self.0.disable_interrupt();
        self.0.clear_interrupt();
    }

    fn acknowledge(&mut self) {
        self.0.clear_interrupt();
    }

    fn rearm(&mut self) {
        self.schedule();
    }
}

pub struct BoardRtc(pub RealTimeClock);

impl WallClock for BoardRtc {
    fn now(&self) -> Option<WallTime> {
        let now = self.0.now().ok()?;
        Some(WallTime {
            hour: now.hour,
            minute: now.minute,
            second: now.second,
        })
    }
}
