#![no_std]

pub mod bus;
pub mod button;
pub mod color;
pub mod config;
pub mod controller;
pub mod error;
pub mod lighting;
pub mod math8;
pub mod power;
pub mod remote;
pub mod status;
pub mod surface;

pub use bus::{BusFramer, Dispatch, Register, RegisterHandler};
pub use button::{ButtonClassifier, ButtonEvent, ButtonUpdate, Debouncer};
pub use config::{ControllerConfig, DEFAULT_PIXEL_COUNT, RELAY_COUNT, RelayDomain};
pub use controller::{CabinetIo, Controller};
pub use error::ControllerError;
pub use lighting::{LightMode, LightingEngine, LightingState, ManualPixel};
pub use power::{PowerPhase, PowerSequencer};
pub use remote::{RemoteChannel, RemoteCommand, RemoteReceiver, RemoteSender};
pub use status::{PowerStatus, StatusReporter, TickReport};
pub use surface::PixelSurface;

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The pixel surface is presented through it.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

/// Byte source of the peripheral bus
///
/// The controller acts as a follower: the host writes bytes, the transport
/// buffers them and the control loop drains them without blocking.
pub trait BusTransport {
    /// Take the next buffered byte, if one is available
    fn read(&mut self) -> Option<u8>;
}
