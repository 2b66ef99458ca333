//! Power sequencing
//!
//! Energizes the cabinet supplies one domain at a time with a settle delay in
//! between, and cuts them only after the lights have faded out. Requests are
//! expressed as a target the sequencer converges toward on every tick.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::{Error as _, OutputPin};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::config::{RELAY_COUNT, RelayDomain};
use crate::error::ControllerError;
use crate::lighting::{LightMode, LightingState};

/// Observable phase of the cabinet supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerPhase {
    /// All sequenced relays open
    Off,
    /// Energizing, `step` is the next power-up step to write at `next_at`
    PoweringOn { step: u8, next_at: Instant },
    /// All sequenced relays closed
    On,
    /// Waiting for the lights to fade out before cutting power
    PoweringOff,
}

/// Relay power state machine
#[derive(Debug, Clone)]
pub struct PowerSequencer {
    domains: [RelayDomain; RELAY_COUNT],
    settle_delay: Duration,
    phase: PowerPhase,
    target: bool,
    last_transition: Option<Instant>,
}

impl PowerSequencer {
    pub fn new(domains: [RelayDomain; RELAY_COUNT], settle_delay: Duration) -> Self {
        Self {
            domains,
            settle_delay,
            phase: PowerPhase::Off,
            target: false,
            last_transition: None,
        }
    }

    pub const fn phase(&self) -> PowerPhase {
        self.phase
    }

    /// Requested power state
    pub const fn target(&self) -> bool {
        self.target
    }

    /// Whether the supplies are energized
    pub const fn is_on(&self) -> bool {
        matches!(self.phase, PowerPhase::On | PowerPhase::PoweringOff)
    }

    /// Whether the lights follow the requested mode
    ///
    /// False while fading out, so the strip always reaches zero before the
    /// relays open.
    pub const fn lights_enabled(&self) -> bool {
        matches!(self.phase, PowerPhase::On)
    }

    /// Whether the supplies are fully off
    pub const fn is_off(&self) -> bool {
        matches!(self.phase, PowerPhase::Off)
    }

    /// Time of the last completed power-up or power-down
    pub const fn last_transition(&self) -> Option<Instant> {
        self.last_transition
    }

    /// Request power on or off
    ///
    /// The request is only recorded; [`Self::tick`] carries it out.
    pub fn request(&mut self, on: bool) {
        #[cfg(feature = "esp32-log")]
        if on != self.target {
            println!("[PowerSequencer.request] target {}", if on { "on" } else { "off" });
        }
        self.target = on;
    }

    /// Drive all relays low without sequencing
    ///
    /// Used at boot to put the board in a known state.
    pub fn reset<P: OutputPin>(
        &mut self,
        relays: &mut [P; RELAY_COUNT],
    ) -> Result<(), ControllerError> {
        for (index, relay) in relays.iter_mut().enumerate() {
            relay
                .set_low()
                .map_err(|e| ControllerError::Relay { index, kind: e.kind() })?;
        }
        self.phase = PowerPhase::Off;
        Ok(())
    }

    /// Advance the state machine
    ///
    /// Forces the light mode on transitions: rainbow once power is up, off
    /// while powering down.
    pub fn tick<P: OutputPin>(
        &mut self,
        relays: &mut [P; RELAY_COUNT],
        lighting: &mut LightingState,
        now: Instant,
    ) -> Result<(), ControllerError> {
        match self.phase {
            PowerPhase::Off => {
                if self.target {
                    self.energize(relays, lighting, 0, now)?;
                }
            }
            PowerPhase::PoweringOn { step, next_at } => {
                if now >= next_at {
                    self.energize(relays, lighting, step, now)?;
                }
            }
            PowerPhase::On => {
                if !self.target {
                    lighting.mode = LightMode::Off;
                    self.set_phase(PowerPhase::PoweringOff);
                }
            }
            PowerPhase::PoweringOff => {
                if self.target {
                    // Relays are still closed, only the lights need restoring
                    lighting.mode = LightMode::Rainbow;
                    self.set_phase(PowerPhase::On);
                } else {
                    // Host writes must not interrupt the fade-out
                    lighting.mode = LightMode::Off;
                    if lighting.brightness() == 0 {
                        self.cut(relays)?;
                        self.last_transition = Some(now);
                        self.set_phase(PowerPhase::Off);
                    }
                }
            }
        }
        Ok(())
    }

    /// Write one power-up step and schedule the next
    fn energize<P: OutputPin>(
        &mut self,
        relays: &mut [P; RELAY_COUNT],
        lighting: &mut LightingState,
        step: u8,
        now: Instant,
    ) -> Result<(), ControllerError> {
        for (index, (relay, domain)) in relays.iter_mut().zip(self.domains.iter()).enumerate() {
            if domain.power_up_order == Some(step) {
                relay
                    .set_high()
                    .map_err(|e| ControllerError::Relay { index, kind: e.kind() })?;
            }
        }

        let has_next = self
            .domains
            .iter()
            .any(|domain| domain.power_up_order.is_some_and(|order| order > step));
        if has_next {
            self.set_phase(PowerPhase::PoweringOn {
                step: step + 1,
                next_at: now + self.settle_delay,
            });
        } else {
            lighting.mode = LightMode::Rainbow;
            self.last_transition = Some(now);
            self.set_phase(PowerPhase::On);
        }
        Ok(())
    }

    /// Open every relay marked for power-down in one pass
    fn cut<P: OutputPin>(&self, relays: &mut [P; RELAY_COUNT]) -> Result<(), ControllerError> {
        for (index, (relay, domain)) in relays.iter_mut().zip(self.domains.iter()).enumerate() {
            if domain.cut_on_power_down {
                relay
                    .set_low()
                    .map_err(|e| ControllerError::Relay { index, kind: e.kind() })?;
            }
        }
        Ok(())
    }

    fn set_phase(&mut self, phase: PowerPhase) {
        #[cfg(feature = "esp32-log")]
        println!("[PowerSequencer] {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}
