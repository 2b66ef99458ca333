//! Peripheral bus protocol
//!
//! The host writes a register selector followed by the payload bytes of that
//! command. [`BusFramer`] reassembles the byte stream into frames and
//! [`Register`] dispatches every payload byte to its command handler.

mod framer;
mod register;

pub use framer::BusFramer;
pub use register::{Dispatch, Register, RegisterHandler, apply};
