#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
use {defmt_rtt as _, panic_probe as _};

#[cfg(target_os = "none")]
use rtic::app;

#[cfg(target_os = "none")]
mod board;

#[cfg(target_os = "none")]
#[app(device = rp_pico::hal::pac, peripherals = true, dispatchers = [I2C0_IRQ])]
mod app {
    use crate::board::{BoardRtc, TickAlarm, BOOT_TIME};
    use defmt::{info, unwrap, warn};
    use embedded_graphics::draw_target::DrawTargetExt;
    use embedded_hal::digital::v2::{InputPin, ToggleableOutputPin};
    use max7219::MAX7219;
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::{ExtU32, RateExtU32},
        gpio::{
            bank0::{Gpio0, Gpio1, Gpio14, Gpio15, Gpio16, Gpio17, Gpio18, Gpio19, Gpio25},
            FunctionSio, FunctionSpi, FunctionUart, Interrupt::EdgeLow, Pin, PullDown, PullUp,
            SioInput, SioOutput,
        },
        rtc::RealTimeClock,
        sio::Sio,
        spi::Spi,
        timer::{Alarm, Alarm1, Alarm2, Timer},
        uart::{DataBits, StopBits, UartConfig, UartPeripheral},
        watchdog::Watchdog,
    };
    use wokwi_analog_clock::{
        display::{Framebuffer, BADGE_AREA, DEVICES, FACE_AREA},
        face::{ClockFace, HourBadge},
        input::{Command, LineBuffer, PressLatch, RepeatRate},
        ClockDriver, TimeModel,
    };

    type Spi0 = Spi<
        rp_pico::hal::spi::Enabled,
        rp_pico::hal::pac::SPI0,
        (
            Pin<Gpio19, FunctionSpi, PullDown>,
            Pin<Gpio16, FunctionSpi, PullDown>,
            Pin<Gpio18, FunctionSpi, PullDown>,
        ),
    >;
    type CsPin = Pin<Gpio17, FunctionSio<SioOutput>, PullDown>;
    type DisplayType = MAX7219<max7219::connectors::SpiConnectorSW<Spi0, CsPin>>;
    type Console = UartPeripheral<
        rp_pico::hal::uart::Enabled,
        rp_pico::hal::pac::UART0,
        (
            Pin<Gpio0, FunctionUart, PullDown>,
            Pin<Gpio1, FunctionUart, PullDown>,
        ),
    >;
    type Button<P> = Pin<P, FunctionSio<SioInput>, PullUp>;

    #[shared]
    struct Shared {
        driver: ClockDriver<TickAlarm>,
        face: ClockFace,
        adjust_button: Button<Gpio15>,
        alarm1: Alarm1,
        repeat: RepeatRate,
        style_button: Button<Gpio14>,
        style_latch: PressLatch,
        alarm2: Alarm2,
    }

    #[local]
    struct Local {
        display: DisplayType,
        framebuffer: Framebuffer,
        led: Pin<Gpio25, FunctionSio<SioOutput>, PullDown>,
        console: Console,
        line: LineBuffer,
        rtc: BoardRtc,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = unwrap!(init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok());

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let alarm = unwrap!(timer.alarm_0());
        let mut alarm1 = unwrap!(timer.alarm_1());
        alarm1.enable_interrupt();
        let mut alarm2 = unwrap!(timer.alarm_2());
        alarm2.enable_interrupt();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let led = pins.led.into_push_pull_output();

        let adjust_button = pins.gpio15.into_pull_up_input();
        adjust_button.set_interrupt_enabled(EdgeLow, true);
        let style_button = pins.gpio14.into_pull_up_input();
        style_button.set_interrupt_enabled(EdgeLow, true);

        let mosi = pins.gpio19.into_function::<FunctionSpi>();
        let sck = pins.gpio18.into_function::<FunctionSpi>();
        let miso = pins.gpio16.into_function::<FunctionSpi>();
        let cs = pins.gpio17.into_push_pull_output();

        let spi = Spi::<_, _, _, 8>::new(pac.SPI0, (mosi, miso, sck));
        let spi = spi.init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            2_000_000u32.Hz(),
            &embedded_hal::spi::MODE_0,
        );

        let mut display = unwrap!(MAX7219::from_spi_cs(DEVICES, spi, cs).ok());
        unwrap!(display.power_on().ok());
        for i in 0..DEVICES {
            unwrap!(display.set_intensity(i, 0x0).ok());
            unwrap!(display.clear_display(i).ok());
        }

        let console_pins = (
            pins.gpio0.into_function::<FunctionUart>(),
            pins.gpio1.into_function::<FunctionUart>(),
        );
        let mut console = unwrap!(UartPeripheral::new(pac.UART0, console_pins, &mut pac.RESETS)
            .enable(
                UartConfig::new(115_200.Hz(), DataBits::Eight, None, StopBits::One),
                clocks.peripheral_clock.freq(),
            )
            .ok());
        console.enable_rx_interrupt();

        let rtc = BoardRtc(unwrap!(RealTimeClock::new(
            pac.RTC,
            clocks.rtc_clock,
            &mut pac.RESETS,
            BOOT_TIME,
        )
        .ok()));

        let mut driver = ClockDriver::new(unwrap!(TimeModel::new()), TickAlarm::new(alarm));
        if let Err(err) = driver.set_from_wall_clock(&rtc) {
            warn!("starting at midnight: {}", err);
            driver.start();
        }
        info!("clock running at {}", driver.reading());
        update_display::spawn().ok();

        (
            Shared {
                driver,
                face: ClockFace::default(),
                adjust_button,
                alarm1,
                repeat: RepeatRate::new(),
                style_button,
                style_latch: PressLatch::new(),
                alarm2,
            },
            Local {
                display,
                framebuffer: Framebuffer::new(),
                led,
                console,
                line: LineBuffer::new(),
                rtc,
            },
            init::Monotonics(),
        )
    }

    // 1 Hz tick
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [driver], local = [led])]
    fn timer_tick(mut ctx: timer_tick::Context) {
        if ctx.shared.driver.lock(|d| d.on_tick()).is_some() {
            ctx.local.led.toggle().ok();
            update_display::spawn().ok();
        }
    }

    #[task(binds = IO_IRQ_BANK0, priority = 1, shared = [driver, face, adjust_button, alarm1, repeat, style_button, style_latch, alarm2])]
    fn button_press(mut ctx: button_press::Context) {
        let adjust = ctx.shared.adjust_button.lock(|b| {
            let fired = b.interrupt_status(EdgeLow);
            if fired {
                // masked until released, see button_repeat
                b.set_interrupt_enabled(EdgeLow, false);
                b.clear_interrupt(EdgeLow);
            }
            fired
        });
        let style_edge = ctx.shared.style_button.lock(|b| {
            let fired = b.interrupt_status(EdgeLow);
            if fired {
                // masked until released, see style_release
                b.set_interrupt_enabled(EdgeLow, false);
                b.clear_interrupt(EdgeLow);
            }
            fired
        });
        let style = style_edge && ctx.shared.style_latch.lock(|l| l.press());
        if style_edge {
            ctx.shared.alarm2.lock(|a| {
                a.clear_interrupt();
                a.schedule(PressLatch::RELEASE_POLL_US.micros()).ok();
            });
        }

        if adjust {
            let time = ctx.shared.driver.lock(|d| d.nudge_minute());
            info!("adjusted to {}", time);

            let delay = ctx.shared.repeat.lock(|r| r.reset());
            ctx.shared.alarm1.lock(|a| {
                a.clear_interrupt();
                a.schedule(delay.micros()).ok();
            });
        }
        if style {
            ctx.shared.face.lock(|f| f.toggle_numeral_style());
        }
        if adjust || style {
            update_display::spawn().ok();
        }
    }

    // Auto-repeat while the adjust button is held
    #[task(binds = TIMER_IRQ_1, priority = 1, shared = [driver, adjust_button, alarm1, repeat])]
    fn button_repeat(mut ctx: button_repeat::Context) {
        ctx.shared.alarm1.lock(|a| a.clear_interrupt());

        let is_held = ctx.shared.adjust_button.lock(|b| b.is_low().unwrap_or(false));

        if is_held {
            ctx.shared.driver.lock(|d| d.nudge_minute());
            update_display::spawn().ok();

            let delay = ctx.shared.repeat.lock(|r| r.accelerate());
            ctx.shared.alarm1.lock(|a| {
                a.schedule(delay.micros()).ok();
            });
        } else {
            ctx.shared.adjust_button.lock(|b| {
                // drop edges latched while bouncing
                b.clear_interrupt(EdgeLow);
                b.set_interrupt_enabled(EdgeLow, true);
            });
        }
    }

    // Unmasks the style button once it has been let go
    #[task(binds = TIMER_IRQ_2, priority = 1, shared = [style_button, style_latch, alarm2])]
    fn style_release(mut ctx: style_release::Context) {
        ctx.shared.alarm2.lock(|a| a.clear_interrupt());

        let held = ctx.shared.style_button.lock(|b| b.is_low().unwrap_or(false));

        if ctx.shared.style_latch.lock(|l| l.poll(held)) {
            ctx.shared.style_button.lock(|b| {
                b.clear_interrupt(EdgeLow);
                b.set_interrupt_enabled(EdgeLow, true);
            });
        } else {
            ctx.shared.alarm2.lock(|a| {
                a.schedule(PressLatch::RELEASE_POLL_US.micros()).ok();
            });
        }
    }

    #[task(binds = UART0_IRQ, priority = 1, shared = [driver, face], local = [console, line, rtc])]
    fn console_rx(mut ctx: console_rx::Context) {
        let mut byte = [0u8; 1];
        loop {
            if !matches!(ctx.local.console.read_raw(&mut byte), Ok(1)) {
                break;
            }
            let Some(line) = ctx.local.line.push(byte[0]) else {
                continue;
            };
            match Command::parse(&line) {
                Ok(Command::Set(time)) => {
                    let result = ctx
                        .shared
                        .driver
                        .lock(|d| d.set_time(time.hours(), time.minutes(), time.seconds()));
                    if let Ok(time) = result {
                        info!("set to {}", time);
                    }
                }
                Ok(Command::Sync) => {
                    let rtc: &BoardRtc = ctx.local.rtc;
                    let result = ctx.shared.driver.lock(|d| d.set_from_wall_clock(rtc));
                    if let Err(err) = result {
                        warn!("sync failed: {}", err);
                    }
                }
                Ok(Command::ToggleStyle) => ctx.shared.face.lock(|f| f.toggle_numeral_style()),
                Ok(Command::Report) => {
                    let time = ctx.shared.driver.lock(|d| d.reading());
                    info!("time is {}", time);
                }
                Err(err) => {
                    warn!("ignored console line {=str}: {}", line.as_str(), err);
                    continue;
                }
            }
            update_display::spawn().ok();
        }
    }

    #[task(shared = [driver, face], local = [display, framebuffer])]
    fn update_display(mut ctx: update_display::Context) {
        let time = ctx.shared.driver.lock(|d| d.reading());
        let face = ctx.shared.face.lock(|f| *f);

        let framebuffer = ctx.local.framebuffer;
        framebuffer.clear_all();
        face.draw(time, &mut framebuffer.cropped(&FACE_AREA)).ok();
        HourBadge::new(face.style())
            .draw(time.hours(), &mut framebuffer.cropped(&BADGE_AREA))
            .ok();

        let display = ctx.local.display;
        for (dev_idx, buffer) in framebuffer.device_buffers().iter().enumerate() {
            if display.write_raw(dev_idx, buffer).is_err() {
                warn!("display write failed on device {}", dev_idx);
            }
        }
    }
}

/// Host builds print one frame of the dial at the current UTC time.
#[cfg(not(target_os = "none"))]
fn main() -> std::process::ExitCode {
    use std::time::{SystemTime, UNIX_EPOCH};

    use embedded_graphics::draw_target::DrawTargetExt;
    use wokwi_analog_clock::{
        display::{Framebuffer, BADGE_AREA, FACE_AREA, HEIGHT, WIDTH},
        face::{ClockFace, HourBadge},
        TimeModel, WallClock, WallTime,
    };

    struct SystemClock;

    impl WallClock for SystemClock {
        fn now(&self) -> Option<WallTime> {
            let secs = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
            let of_day = secs % 86_400;
            Some(WallTime {
                hour: (of_day / 3600) as u8,
                minute: (of_day / 60 % 60) as u8,
                second: (of_day % 60) as u8,
            })
        }
    }

    let mut model = match TimeModel::new() {
        Ok(model) => model,
        Err(err) => {
            eprintln!("error: {err}");
            return std::process::ExitCode::FAILURE;
        }
    };
    let time = match model.set_from_wall_clock(&SystemClock) {
        Ok(time) => time,
        Err(err) => {
            eprintln!("error: {err}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let face = ClockFace::default();
    let mut framebuffer = Framebuffer::new();
    let _ = face.draw(time, &mut framebuffer.cropped(&FACE_AREA));
    let _ = HourBadge::new(face.style()).draw(time.hours(), &mut framebuffer.cropped(&BADGE_AREA));

    println!("{time} UTC");
    for y in 0..HEIGHT {
        let row: String = (0..WIDTH)
            .map(|x| if framebuffer.pixel(x, y) { '#' } else { '.' })
            .collect();
        println!("{row}");
    }
    std::process::ExitCode::SUCCESS
}
