use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Reassembles bus bytes into `(register, position, data)` frames
///
/// Position 0 means the framer is idle and the next byte selects a register.
/// A frame left incomplete for longer than the timeout is abandoned so it
/// cannot merge with a later command.
#[derive(Debug, Clone)]
pub struct BusFramer {
    timeout: Duration,
    register: u8,
    position: u8,
    last_byte_at: Option<Instant>,
}

impl BusFramer {
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            register: 0,
            position: 0,
            last_byte_at: None,
        }
    }

    /// Register of the frame in flight, `None` when idle
    pub const fn register(&self) -> Option<u8> {
        if self.position == 0 {
            None
        } else {
            Some(self.register)
        }
    }

    /// Position expected for the next byte
    pub const fn position(&self) -> u8 {
        self.position
    }

    /// Abandon the frame in flight if the sender went quiet
    ///
    /// Returns `true` if a frame was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        let Some(last) = self.last_byte_at else {
            return false;
        };
        if now.saturating_duration_since(last) <= self.timeout {
            return false;
        }

        let dropped = self.position != 0;
        #[cfg(feature = "esp32-log")]
        if dropped {
            println!(
                "[BusFramer.expire] dropping frame for register {:#04x} at position {}",
                self.register, self.position
            );
        }
        self.position = 0;
        self.last_byte_at = None;
        dropped
    }

    /// Consume one byte
    ///
    /// Payload bytes are handed to `apply` as `(register, position, data)`;
    /// its return value is the next expected position, 0 ending the frame.
    pub fn feed<F>(&mut self, byte: u8, now: Instant, apply: F)
    where
        F: FnOnce(u8, u8, u8) -> u8,
    {
        self.last_byte_at = Some(now);
        if self.position == 0 {
            self.register = byte;
            self.position = 1;
        } else {
            self.position = apply(self.register, self.position, byte);
        }
    }
}
