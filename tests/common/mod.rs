#![allow(dead_code)]

use std::collections::VecDeque;

use arcade_cabinet_controller::{BusTransport, Instant, OutputDriver, Rgb};
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};

pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

pub fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

/// Keeps the last frame written to the strip
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub last: Vec<Rgb>,
    pub writes: usize,
}

impl OutputDriver for RecordingDriver {
    fn write(&mut self, colors: &[Rgb]) {
        self.last = colors.to_vec();
        self.writes += 1;
    }
}

/// Bus transport backed by a byte queue
#[derive(Debug, Default)]
pub struct ByteQueue {
    pub bytes: VecDeque<u8>,
}

impl ByteQueue {
    pub fn push(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes.iter().copied());
    }
}

impl BusTransport for ByteQueue {
    fn read(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Output pin recording every write
#[derive(Debug, Default)]
pub struct FakeOutput {
    pub level: bool,
    pub writes: Vec<bool>,
    pub fail: bool,
}

impl FakeOutput {
    pub fn high_writes(&self) -> usize {
        self.writes.iter().filter(|level| **level).count()
    }
}

impl ErrorType for FakeOutput {
    type Error = PinFault;
}

impl OutputPin for FakeOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(PinFault);
        }
        self.level = false;
        self.writes.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(PinFault);
        }
        self.level = true;
        self.writes.push(true);
        Ok(())
    }
}

/// Input pin with a level set by the test
#[derive(Debug, Default)]
pub struct FakeInput {
    pub level: bool,
}

impl FakeInput {
    pub fn high() -> Self {
        Self { level: true }
    }

    pub fn low() -> Self {
        Self { level: false }
    }
}

impl ErrorType for FakeInput {
    type Error = PinFault;
}

impl InputPin for FakeInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level)
    }
}

pub fn relays() -> [FakeOutput; 4] {
    [
        FakeOutput::default(),
        FakeOutput::default(),
        FakeOutput::default(),
        FakeOutput::default(),
    ]
}
