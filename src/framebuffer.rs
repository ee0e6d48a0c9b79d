//! 1-bit frame buffer
//!
//! A packed monochrome buffer the renderer draws into through
//! `embedded-graphics`. Rows are stored MSB-first, `(width + 7) / 8` bytes per
//! row, which is also the layout of a binary PBM image.

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use std::fs;
use std::io;
use std::path::Path;

/// Monochrome frame, `BinaryColor::On` is ink
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let bytes_per_row = (width as usize).div_ceil(8);
        let buffer_size = bytes_per_row * height as usize;
        Self {
            width,
            height,
            pixels: vec![0x00; buffer_size], // Blank by default
        }
    }

    pub fn clear_all(&mut self) {
        self.pixels.fill(0x00);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bytes_per_row = (self.width as usize).div_ceil(8);
        let byte_index = y as usize * bytes_per_row + x as usize / 8;
        let bit_mask = 0x80 >> (x % 8);
        Some((byte_index, bit_mask))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: BinaryColor) {
        let Some((byte_index, bit_mask)) = self.locate(x, y) else {
            return;
        };
        match color {
            BinaryColor::On => self.pixels[byte_index] |= bit_mask,
            BinaryColor::Off => self.pixels[byte_index] &= !bit_mask,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> BinaryColor {
        match self.locate(x, y) {
            Some((byte_index, bit_mask)) if self.pixels[byte_index] & bit_mask != 0 => {
                BinaryColor::On
            }
            _ => BinaryColor::Off,
        }
    }

    /// Number of inked pixels
    pub fn count_on(&self) -> u32 {
        self.pixels.iter().map(|b| b.count_ones()).sum()
    }

    /// Encode as a binary PBM (P4) image.
    pub fn to_pbm(&self) -> Vec<u8> {
        let mut out = format!("P4\n{} {}\n", self.width, self.height).into_bytes();
        out.extend_from_slice(&self.pixels);
        out
    }

    pub fn write_pbm<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::write(path, self.to_pbm())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn set_and_read_back() {
        let mut frame = FrameBuffer::new(10, 3);
        frame.set_pixel(9, 2, BinaryColor::On);
        assert_eq!(frame.pixel(9, 2), BinaryColor::On);
        assert_eq!(frame.pixel(8, 2), BinaryColor::Off);
        assert_eq!(frame.count_on(), 1);

        frame.set_pixel(9, 2, BinaryColor::Off);
        assert_eq!(frame.count_on(), 0);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut frame = FrameBuffer::new(8, 8);
        frame.set_pixel(8, 0, BinaryColor::On);
        frame
            .draw_iter([Pixel(Point::new(-1, 3), BinaryColor::On)])
            .unwrap();
        assert_eq!(frame.count_on(), 0);
        assert_eq!(frame.pixel(100, 100), BinaryColor::Off);
    }

    #[test]
    fn draws_primitives() {
        let mut frame = FrameBuffer::new(16, 16);
        Rectangle::new(Point::new(2, 2), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.count_on(), 16);

        frame.clear_all();
        assert_eq!(frame.count_on(), 0);
    }

    #[test]
    fn wide_frame_indexes_last_pixel() {
        let mut frame = FrameBuffer::new(4096, 2);
        frame.set_pixel(4095, 1, BinaryColor::On);
        assert_eq!(frame.as_bytes().len(), 1024);
        assert_eq!(frame.as_bytes()[1023], 0x01);
    }

    #[test]
    fn pbm_layout() {
        let mut frame = FrameBuffer::new(9, 2);
        frame.set_pixel(0, 0, BinaryColor::On);
        frame.set_pixel(8, 1, BinaryColor::On);

        let pbm = frame.to_pbm();
        let header = b"P4\n9 2\n";
        assert_eq!(&pbm[..header.len()], header);
        // 2 bytes per row, 2 rows
        assert_eq!(&pbm[header.len()..], &[0x80, 0x00, 0x00, 0x80]);
    }
}
