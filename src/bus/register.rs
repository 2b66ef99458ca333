use crate::OutputDriver;
use crate::color::Rgb;
use crate::lighting::{LightMode, LightingState};
use crate::surface::PixelSurface;

const REGISTER_BRIGHTNESS: u8 = 0x01;
const REGISTER_COLOR: u8 = 0x02;
const REGISTER_MODE: u8 = 0x10;
const REGISTER_MANUAL: u8 = 0x20;
const REGISTER_OFF: u8 = 0xFF;

/// Everything a command handler may touch
pub struct Dispatch<'a, O, const N: usize> {
    pub lighting: &'a mut LightingState,
    pub surface: &'a mut PixelSurface<N>,
    pub output: &'a mut O,
}

/// Handles one payload byte and returns the next expected position
pub type RegisterHandler<O, const N: usize> = fn(&mut Dispatch<'_, O, N>, u8, u8) -> u8;

/// Known bus registers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// Target brightness, 1 byte
    Brightness = REGISTER_BRIGHTNESS,
    /// Solid color, 3 bytes (R, G, B)
    Color = REGISTER_COLOR,
    /// Light mode, 1 byte
    Mode = REGISTER_MODE,
    /// Direct pixel write, 4 bytes (index, R, G, B)
    Manual = REGISTER_MANUAL,
    /// Lights off, the payload byte is ignored
    Off = REGISTER_OFF,
}

impl Register {
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            REGISTER_BRIGHTNESS => Self::Brightness,
            REGISTER_COLOR => Self::Color,
            REGISTER_MODE => Self::Mode,
            REGISTER_MANUAL => Self::Manual,
            REGISTER_OFF => Self::Off,
            _ => return None,
        })
    }

    /// Handler for payload bytes of this register
    pub fn handler<O: OutputDriver, const N: usize>(self) -> RegisterHandler<O, N> {
        match self {
            Self::Brightness => set_brightness::<O, N>,
            Self::Color => set_color::<O, N>,
            Self::Mode => set_mode::<O, N>,
            Self::Manual => write_manual::<O, N>,
            Self::Off => lights_off::<O, N>,
        }
    }
}

/// Apply one payload byte of `register`
///
/// Unknown registers swallow the byte and end the frame.
pub fn apply<O: OutputDriver, const N: usize>(
    register: u8,
    position: u8,
    data: u8,
    dispatch: &mut Dispatch<'_, O, N>,
) -> u8 {
    match Register::from_raw(register) {
        Some(register) => (register.handler::<O, N>())(dispatch, position, data),
        None => 0,
    }
}

fn set_brightness<O: OutputDriver, const N: usize>(
    dispatch: &mut Dispatch<'_, O, N>,
    _position: u8,
    data: u8,
) -> u8 {
    dispatch.lighting.target_brightness = data;
    0
}

fn set_color<O: OutputDriver, const N: usize>(
    dispatch: &mut Dispatch<'_, O, N>,
    position: u8,
    data: u8,
) -> u8 {
    // Out of range positions are dropped to survive desynchronized frames
    if (1..=3).contains(&position) {
        dispatch.lighting.color[usize::from(position - 1)] = data;
    }
    if position < 3 { position + 1 } else { 0 }
}

fn set_mode<O: OutputDriver, const N: usize>(
    dispatch: &mut Dispatch<'_, O, N>,
    _position: u8,
    data: u8,
) -> u8 {
    if let Some(mode) = LightMode::from_raw(data) {
        dispatch.lighting.mode = mode;
    }
    0
}

fn write_manual<O: OutputDriver, const N: usize>(
    dispatch: &mut Dispatch<'_, O, N>,
    position: u8,
    data: u8,
) -> u8 {
    let manual = &mut dispatch.lighting.manual;
    match position {
        1 => {
            if usize::from(data) < N {
                manual.index = data;
            }
            2
        }
        2 | 3 => {
            manual.color[usize::from(position - 2)] = data;
            position + 1
        }
        4 => {
            manual.color[2] = data;
            let [r, g, b] = manual.color;
            dispatch
                .surface
                .set_pixel(usize::from(manual.index), Rgb { r, g, b });
            dispatch.surface.present(&mut *dispatch.output);
            0
        }
        _ => 0,
    }
}

fn lights_off<O: OutputDriver, const N: usize>(
    dispatch: &mut Dispatch<'_, O, N>,
    _position: u8,
    _data: u8,
) -> u8 {
    dispatch.lighting.mode = LightMode::Off;
    0
}
