//! Fixed-point unit circle at the 60 dial positions (6° apart).
//!
//! Tick 0 is 12 o'clock and ticks run clockwise, so `x` follows `sin` and
//! screen `y` follows `-cos`.

use embedded_graphics::prelude::Point;

pub const SCALE: i32 = 1000;
pub const TICKS: u8 = 60;

/// `sin(t × 6°) × 1000` for the first quadrant, rounded.
const QUARTER: [i32; 16] = [
    0, 105, 208, 309, 407, 500, 588, 669, 743, 809, 866, 914, 951, 978, 995, 1000,
];

fn sin(tick: u8) -> i32 {
    let t = usize::from(tick % TICKS);
    match t / 15 {
        0 => QUARTER[t],
        1 => QUARTER[30 - t],
        2 => -QUARTER[t - 30],
        _ => -QUARTER[60 - t],
    }
}

/// `(sin, cos)` of the dial angle at `tick`, scaled by [`SCALE`].
pub fn unit(tick: u8) -> (i32, i32) {
    (sin(tick), sin((tick % TICKS) + 15))
}

fn scale_rounded(length: i32, fraction: i32) -> i32 {
    let product = length * fraction;
    if product >= 0 {
        (product + SCALE / 2) / SCALE
    } else {
        (product - SCALE / 2) / SCALE
    }
}

/// The pixel `radius` away from `centre` in the direction of `tick`.
pub fn point_on_dial(centre: Point, radius: i32, tick: u8) -> Point {
    let (sin, cos) = unit(tick);
    Point::new(
        centre.x + scale_rounded(radius, sin),
        centre.y - scale_rounded(radius, cos),
    )
}
