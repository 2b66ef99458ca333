//! In-memory pixel surface
//!
//! Holds the frame being composed for the strip. Writes are invisible until
//! [`PixelSurface::present`] pushes the frame, scaled by the global
//! brightness, through an [`OutputDriver`].

use crate::OutputDriver;
use crate::color::{BLACK, Rgb, hsv_color, rainbow_hue};
use crate::math8::scale8;

/// Frame buffer for an `N` pixel RGB strip
#[derive(Debug, Clone)]
pub struct PixelSurface<const N: usize> {
    pixels: [Rgb; N],
    output: [Rgb; N],
    brightness: u8,
}

impl<const N: usize> Default for PixelSurface<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PixelSurface<N> {
    /// Create a cleared surface at full brightness
    pub const fn new() -> Self {
        Self {
            pixels: [BLACK; N],
            output: [BLACK; N],
            brightness: 255,
        }
    }

    /// Number of pixels on the strip
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Set global brightness applied on present
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Set a single pixel
    ///
    /// Returns `false` if the index is outside the strip.
    pub fn set_pixel(&mut self, index: usize, color: Rgb) -> bool {
        match self.pixels.get_mut(index) {
            Some(pixel) => {
                *pixel = color;
                true
            }
            None => false,
        }
    }

    /// Get the unscaled color of a pixel
    pub fn pixel(&self, index: usize) -> Option<Rgb> {
        self.pixels.get(index).copied()
    }

    /// Unscaled frame contents
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Fill the whole strip with one color
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    /// Paint one full hue circle across the strip starting at `first_hue`
    pub fn rainbow(&mut self, first_hue: u16) {
        for (index, pixel) in self.pixels.iter_mut().enumerate() {
            let hue = rainbow_hue(first_hue, index, N);
            *pixel = hsv_color(hue, 255, 255);
        }
    }

    /// Push the current frame to the strip
    pub fn present<O: OutputDriver>(&mut self, driver: &mut O) {
        match self.brightness {
            255 => self.output = self.pixels,
            0 => self.output.fill(BLACK),
            brightness => {
                for (out, pixel) in self.output.iter_mut().zip(self.pixels.iter()) {
                    *out = Rgb {
                        r: scale8(pixel.r, brightness),
                        g: scale8(pixel.g, brightness),
                        b: scale8(pixel.b, brightness),
                    };
                }
            }
        }
        driver.write(&self.output);
    }
}
