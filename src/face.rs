//! Analog dial rendering.
//!
//! Everything here is presentation: it reads a [`TimeOfDay`] and draws it.
//! The numeral style is display state and never feeds back into the model.

use embedded_graphics::{
    mono_font::{ascii::FONT_4X6, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::clock::TimeOfDay;
use crate::trig::point_on_dial;

const ROMAN: [&str; 12] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

/// Smallest radius that gets hour markers.
const MARKER_RADIUS: i32 = 10;
/// Smallest radius that gets numerals and thick hands.
const NUMERAL_RADIUS: i32 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum NumeralStyle {
    #[default]
    Roman,
    Arabic,
}

impl NumeralStyle {
    pub fn toggle(self) -> Self {
        match self {
            Self::Roman => Self::Arabic,
            Self::Arabic => Self::Roman,
        }
    }

    /// Calls `f` with the label for a dial hour. Hour 0 is labelled 12.
    pub fn with_label<R>(self, hour: u8, f: impl FnOnce(&str) -> R) -> R {
        let hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        match self {
            Self::Roman => f(ROMAN[usize::from(hour - 1)]),
            Self::Arabic => {
                let mut buf = [0u8; 2];
                match format_no_std::show(&mut buf, format_args!("{}", hour)) {
                    Ok(text) => f(text),
                    Err(_) => f("?"),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Second,
    Minute,
    Hour,
}

impl Hand {
    /// Position on the 60-tick dial. The hour hand only moves on the hour.
    pub fn tick(self, time: TimeOfDay) -> u8 {
        match self {
            Self::Second => time.seconds(),
            Self::Minute => time.minutes(),
            Self::Hour => time.hours() * 5,
        }
    }

    fn length_percent(self) -> i32 {
        match self {
            Self::Second => 85,
            Self::Minute => 70,
            Self::Hour => 50,
        }
    }

    fn stroke_width(self, radius: i32) -> u32 {
        if radius < NUMERAL_RADIUS {
            return 1;
        }
        match self {
            Self::Second => 1,
            Self::Minute => 2,
            Self::Hour => 3,
        }
    }
}

/// Largest odd-diameter circle centred in a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dial {
    pub centre: Point,
    pub radius: i32,
}

impl Dial {
    pub fn fit(area: Rectangle) -> Option<Self> {
        let side = area.size.width.min(area.size.height);
        if side == 0 {
            return None;
        }
        let diameter = if side % 2 == 0 { side - 1 } else { side };
        let radius = (diameter / 2) as i32;
        let offset = Point::new(
            ((area.size.width - diameter) / 2) as i32,
            ((area.size.height - diameter) / 2) as i32,
        );
        Some(Self {
            centre: area.top_left + offset + Point::new(radius, radius),
            radius,
        })
    }

    fn diameter(&self) -> u32 {
        (self.radius * 2 + 1) as u32
    }

    /// Where the tip of `hand` lands for `time`.
    pub fn hand_tip(&self, hand: Hand, time: TimeOfDay) -> Point {
        point_on_dial(
            self.centre,
            self.radius * hand.length_percent() / 100,
            hand.tick(time),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockFace {
    style: NumeralStyle,
}

impl ClockFace {
    pub fn new(style: NumeralStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> NumeralStyle {
        self.style
    }

    pub fn toggle_numeral_style(&mut self) {
        self.style = self.style.toggle();
        debug!("numeral style toggled");
    }

    /// Draws rim, markings, hands and hub, fitted to the target's bounding box.
    pub fn draw<D>(&self, time: TimeOfDay, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let Some(dial) = Dial::fit(target.bounding_box()) else {
            return Ok(());
        };

        Circle::with_center(dial.centre, dial.diameter())
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(target)?;

        if dial.radius >= NUMERAL_RADIUS {
            self.draw_numerals(&dial, target)?;
        } else if dial.radius >= MARKER_RADIUS {
            for hour in 0..12u8 {
                Pixel(
                    point_on_dial(dial.centre, dial.radius - 2, hour * 5),
                    BinaryColor::On,
                )
                .draw(target)?;
            }
        }

        for hand in [Hand::Hour, Hand::Minute, Hand::Second] {
            Line::new(dial.centre, dial.hand_tip(hand, time))
                .into_styled(PrimitiveStyle::with_stroke(
                    BinaryColor::On,
                    hand.stroke_width(dial.radius),
                ))
                .draw(target)?;
        }

        if dial.radius >= MARKER_RADIUS {
            Circle::with_center(dial.centre, 3)
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(target)?;
        } else {
            Pixel(dial.centre, BinaryColor::On).draw(target)?;
        }
        Ok(())
    }

    fn draw_numerals<D>(&self, dial: &Dial, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let character_style = MonoTextStyle::new(&FONT_4X6, BinaryColor::On);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();

        for hour in 1..=12u8 {
            let position = point_on_dial(dial.centre, dial.radius * 78 / 100, (hour % 12) * 5);
            self.style.with_label(hour, |label| {
                Text::with_text_style(label, position, character_style, text_style)
                    .draw(target)
                    .map(|_| ())
            })?;
        }
        Ok(())
    }
}

/// The current hour as a single numeral, centred in its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourBadge {
    style: NumeralStyle,
}

impl HourBadge {
    pub fn new(style: NumeralStyle) -> Self {
        Self { style }
    }

    pub fn draw<D>(&self, hours: u8, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let character_style = MonoTextStyle::new(&FONT_4X6, BinaryColor::On);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let centre = target.bounding_box().center();

        self.style.with_label(hours, |label| {
            Text::with_text_style(label, centre, character_style, text_style)
                .draw(target)
                .map(|_| ())
        })
    }
}
