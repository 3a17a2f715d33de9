//! Framebuffer for the chained MAX7219 matrices.
//!
//! Eight 8x8 devices sit in two rows of four, giving a 32x16 panel. Devices
//! are numbered row-major from the top left and use the FC16 layout, where
//! bit 7 of a row register is the leftmost LED.

use core::convert::Infallible;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::Rectangle};

pub const DEVICE_SIZE: usize = 8;
pub const DEVICES_PER_ROW: usize = 4;
pub const DEVICE_ROWS: usize = 2;
pub const DEVICES: usize = DEVICES_PER_ROW * DEVICE_ROWS;
pub const WIDTH: usize = DEVICE_SIZE * DEVICES_PER_ROW;
pub const HEIGHT: usize = DEVICE_SIZE * DEVICE_ROWS;

/// Left half: the analog dial.
pub const FACE_AREA: Rectangle = Rectangle::new(Point::new(0, 0), Size::new(16, 16));
/// Right half: the hour numeral.
pub const BADGE_AREA: Rectangle = Rectangle::new(Point::new(16, 0), Size::new(16, 16));

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Framebuffer {
    // one word per pixel row, bit 31 is column 0
    rows: [u32; HEIGHT],
}

impl Framebuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_all(&mut self) {
        self.rows = [0; HEIGHT];
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.rows[y] & (1 << (31 - x)) != 0
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let mask = 1 << (31 - x);
        if on {
            self.rows[y] |= mask;
        } else {
            self.rows[y] &= !mask;
        }
    }

    pub fn lit_pixels(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }

    /// Prepares the 8x8 buffers for the chained devices, in chain order.
    pub fn device_buffers(&self) -> [[u8; DEVICE_SIZE]; DEVICES] {
        let mut device_buffers = [[0u8; DEVICE_SIZE]; DEVICES];
        for (dev_idx, buffer) in device_buffers.iter_mut().enumerate() {
            let top = (dev_idx / DEVICES_PER_ROW) * DEVICE_SIZE;
            let shift = 24 - (dev_idx % DEVICES_PER_ROW) * DEVICE_SIZE;
            for (r, byte) in buffer.iter_mut().enumerate() {
                *byte = ((self.rows[top + r] >> shift) & 0xFF) as u8;
            }
        }
        device_buffers
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.rows = if color.is_on() { [u32::MAX; HEIGHT] } else { [0; HEIGHT] };
        Ok(())
    }
}
