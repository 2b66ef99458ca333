//! Lighting engine
//!
//! Computes one strip frame per loop tick from the current [`LightMode`] and
//! ramps the global brightness toward its target one unit at a time.

use embassy_time::{Duration, Instant};

use crate::OutputDriver;
use crate::color::{Rgb, WHITE, hsv_color};
use crate::config::ControllerConfig;
use crate::math8::step_toward;
use crate::surface::PixelSurface;

const MODE_ID_OFF: u8 = 0;
const MODE_ID_SOLID: u8 = 1;
const MODE_ID_RAINBOW: u8 = 2;
const MODE_ID_RAINBOW_SOLID: u8 = 3;
const MODE_ID_MANUAL: u8 = 4;

/// Pixel computation branch run every tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum LightMode {
    #[default]
    Off = MODE_ID_OFF,
    /// Single color with white borders
    Solid = MODE_ID_SOLID,
    /// Hue sweep across the strip, moving every tick
    Rainbow = MODE_ID_RAINBOW,
    /// Whole strip cycling through hues together
    RainbowSolid = MODE_ID_RAINBOW_SOLID,
    /// Pixels written directly over the bus
    Manual = MODE_ID_MANUAL,
}

impl LightMode {
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            MODE_ID_OFF => Self::Off,
            MODE_ID_SOLID => Self::Solid,
            MODE_ID_RAINBOW => Self::Rainbow,
            MODE_ID_RAINBOW_SOLID => Self::RainbowSolid,
            MODE_ID_MANUAL => Self::Manual,
            _ => return None,
        })
    }
}

/// Pixel addressed by the manual write command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualPixel {
    pub index: u8,
    pub color: [u8; 3],
}

/// Lighting state shared between the bus, the power sequencer and the engine
#[derive(Debug, Clone)]
pub struct LightingState {
    pub mode: LightMode,
    pub target_brightness: u8,
    pub color: [u8; 3],
    pub manual: ManualPixel,
    brightness: u8,
    phase: u16,
    next_brightness_step: Option<Instant>,
}

impl LightingState {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            mode: LightMode::Off,
            target_brightness: config.target_brightness,
            color: config.color,
            manual: ManualPixel {
                index: 0,
                color: [255, 255, 255],
            },
            brightness: config.brightness,
            phase: 0,
            next_brightness_step: None,
        }
    }

    /// Brightness currently shown on the strip
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Animation phase of the rainbow modes
    pub const fn phase(&self) -> u16 {
        self.phase
    }

    pub const fn color_rgb(&self) -> Rgb {
        Rgb {
            r: self.color[0],
            g: self.color[1],
            b: self.color[2],
        }
    }
}

/// Per-tick frame computation
#[derive(Debug, Clone)]
pub struct LightingEngine<const N: usize> {
    step_interval: Duration,
    border_pixels: usize,
    phase_step: u16,
}

impl<const N: usize> LightingEngine<N> {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            step_interval: config.brightness_step_interval,
            border_pixels: config.border_pixels,
            phase_step: config.rainbow_phase_step,
        }
    }

    /// Compute and present one frame
    ///
    /// While the cabinet is unpowered the engine behaves as if the mode were
    /// [`LightMode::Off`], so the strip fades out and stays dark.
    pub fn tick<O: OutputDriver>(
        &self,
        state: &mut LightingState,
        surface: &mut PixelSurface<N>,
        driver: &mut O,
        powered: bool,
        now: Instant,
    ) {
        let mode = if powered { state.mode } else { LightMode::Off };
        self.step_brightness(state, mode, now);

        match mode {
            LightMode::Off => {
                if state.brightness == 0 {
                    surface.clear();
                }
            }
            LightMode::Solid => {
                surface.fill(state.color_rgb());
                self.paint_border(surface);
            }
            LightMode::Rainbow => {
                state.phase = state.phase.wrapping_add(self.phase_step);
                surface.rainbow(state.phase);
                self.paint_border(surface);
            }
            LightMode::RainbowSolid => {
                state.phase = state.phase.wrapping_add(self.phase_step);
                surface.fill(hsv_color(state.phase, 255, 255));
                self.paint_border(surface);
            }
            LightMode::Manual => {}
        }

        surface.set_brightness(state.brightness);
        surface.present(driver);
    }

    /// Rate-limited brightness ramp
    ///
    /// Off fades to zero but keeps the stored target for the next mode.
    fn step_brightness(&self, state: &mut LightingState, mode: LightMode, now: Instant) {
        let target = match mode {
            LightMode::Off => 0,
            _ => state.target_brightness,
        };
        if state.brightness == target {
            return;
        }
        if state.next_brightness_step.is_some_and(|at| now < at) {
            return;
        }
        state.brightness = step_toward(state.brightness, target);
        state.next_brightness_step = Some(now + self.step_interval);
    }

    fn paint_border(&self, surface: &mut PixelSurface<N>) {
        let border = self.border_pixels.min(N);
        for i in 0..border {
            surface.set_pixel(i, WHITE);
            surface.set_pixel(N - 1 - i, WHITE);
        }
    }
}
