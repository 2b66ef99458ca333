//! Cabinet control loop
//!
//! One [`Controller::tick`] runs every sub-machine once, in order: startup
//! indicator, remote requests, power sequencer, start button, bus, lighting.
//! Nothing in a tick blocks; call it continuously.

use embassy_time::Instant;
use embedded_hal::digital::{Error as _, InputPin, OutputPin};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::bus::{self, BusFramer, Dispatch};
use crate::button::{ButtonClassifier, ButtonEvent};
use crate::config::{ControllerConfig, RELAY_COUNT};
use crate::error::ControllerError;
use crate::lighting::{LightingEngine, LightingState};
use crate::power::{PowerPhase, PowerSequencer};
use crate::remote::{RemoteCommand, RemoteReceiver};
use crate::status::{PowerStatus, StatusReporter, TickReport};
use crate::surface::PixelSurface;
use crate::{BusTransport, OutputDriver};

/// Digital lines of the cabinet board
pub struct CabinetIo<P, I> {
    /// Relay outputs, indexed like `ControllerConfig::relays`
    pub relays: [P; RELAY_COUNT],
    /// Start button, active low with pull-up
    pub button: I,
    /// Debounced copy of the start button for downstream wiring
    pub button_mirror: P,
    /// High when the host asks for the cabinet to be powered down
    pub shutdown_signal: I,
    /// Lit during startup
    pub status_led: P,
}

/// Cabinet controller - owns all state and drives every sub-machine
pub struct Controller<'a, T, O, P, I, const N: usize, const Q: usize> {
    // External dependencies and configuration
    transport: T,
    output: O,
    io: CabinetIo<P, I>,
    remote: RemoteReceiver<'a, Q>,
    config: ControllerConfig,

    // Internal state
    lighting: LightingState,
    surface: PixelSurface<N>,
    framer: BusFramer,
    power: PowerSequencer,
    button: ButtonClassifier,
    reporter: StatusReporter,
    parental_mode: bool,
    started_at: Option<Instant>,
    startup_complete: bool,

    // Internal dependencies
    engine: LightingEngine<N>,
}

impl<'a, T, O, P, I, const N: usize, const Q: usize> Controller<'a, T, O, P, I, N, Q>
where
    T: BusTransport,
    O: OutputDriver,
    P: OutputPin,
    I: InputPin,
{
    pub fn new(
        transport: T,
        output: O,
        io: CabinetIo<P, I>,
        remote: RemoteReceiver<'a, Q>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            lighting: LightingState::new(&config),
            surface: PixelSurface::new(),
            framer: BusFramer::new(config.bus_frame_timeout),
            power: PowerSequencer::new(config.relays, config.relay_settle_delay),
            button: ButtonClassifier::new(
                config.button_debounce,
                config.short_press_min,
                config.long_press_min,
            ),
            reporter: StatusReporter::new(),
            parental_mode: false,
            started_at: None,
            startup_complete: false,
            engine: LightingEngine::new(&config),
            transport,
            output,
            io,
            remote,
            config,
        }
    }

    /// Run one loop iteration
    ///
    /// A pin error aborts the rest of this tick only; state stays consistent
    /// and the next tick retries.
    pub fn tick(&mut self, now: Instant) -> Result<TickReport, ControllerError> {
        self.check_startup(now)?;
        self.process_remote();
        self.power.tick(&mut self.io.relays, &mut self.lighting, now)?;
        self.process_button(now)?;
        self.process_shutdown_signal()?;
        self.process_bus(now);

        self.engine.tick(
            &mut self.lighting,
            &mut self.surface,
            &mut self.output,
            self.power.lights_enabled(),
            now,
        );

        Ok(self.reporter.report(self.power_status(), self.parental_mode))
    }

    /// Request power on or off, same as a local button request
    pub fn request_power(&mut self, on: bool) {
        self.power.request(on);
    }

    pub fn set_parental_mode(&mut self, enabled: bool) {
        self.parental_mode = enabled;
    }

    pub const fn parental_mode(&self) -> bool {
        self.parental_mode
    }

    pub const fn startup_complete(&self) -> bool {
        self.startup_complete
    }

    pub const fn lighting(&self) -> &LightingState {
        &self.lighting
    }

    pub const fn power(&self) -> &PowerSequencer {
        &self.power
    }

    pub const fn framer(&self) -> &BusFramer {
        &self.framer
    }

    pub const fn surface(&self) -> &PixelSurface<N> {
        &self.surface
    }

    pub const fn button(&self) -> &ButtonClassifier {
        &self.button
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn io_mut(&mut self) -> &mut CabinetIo<P, I> {
        &mut self.io
    }

    /// Settled power state, `None` mid-transition
    fn power_status(&self) -> Option<PowerStatus> {
        match self.power.phase() {
            PowerPhase::Off => Some(PowerStatus::Off),
            PowerPhase::On => Some(PowerStatus::On),
            PowerPhase::PoweringOn { .. } | PowerPhase::PoweringOff => None,
        }
    }

    /// Light the status LED at boot and turn it off once startup is over
    fn check_startup(&mut self, now: Instant) -> Result<(), ControllerError> {
        let Some(started_at) = self.started_at else {
            self.io
                .status_led
                .set_high()
                .map_err(|e| ControllerError::StatusLed(e.kind()))?;
            self.power.reset(&mut self.io.relays)?;
            self.started_at = Some(now);
            return Ok(());
        };

        if !self.startup_complete
            && now.saturating_duration_since(started_at) >= self.config.startup_delay
        {
            self.io
                .status_led
                .set_low()
                .map_err(|e| ControllerError::StatusLed(e.kind()))?;
            self.startup_complete = true;
            #[cfg(feature = "esp32-log")]
            println!("[Controller] startup complete");
        }
        Ok(())
    }

    /// Drain queued broker requests (non-blocking)
    fn process_remote(&mut self) {
        while let Some(command) = self.remote.try_receive() {
            #[cfg(feature = "esp32-log")]
            println!("[Controller.process_remote] {:?}", command);
            match command {
                RemoteCommand::PowerOn => self.power.request(true),
                RemoteCommand::PowerOff => self.power.request(false),
                RemoteCommand::PressPowerButton => {
                    let on = !self.power.target();
                    self.power.request(on);
                }
                RemoteCommand::SetParentalMode(enabled) => self.parental_mode = enabled,
            }
        }
    }

    fn process_button(&mut self, now: Instant) -> Result<(), ControllerError> {
        let raw_pressed = self
            .io
            .button
            .is_low()
            .map_err(|e| ControllerError::Button(e.kind()))?;
        let update = self.button.update(raw_pressed, now);

        if let Some(pressed) = update.edge {
            // Mirror keeps the active-low level of the physical button
            self.io
                .button_mirror
                .set_state((!pressed).into())
                .map_err(|e| ControllerError::ButtonMirror(e.kind()))?;
        }

        if !self.startup_complete {
            return Ok(());
        }
        match update.event {
            Some(ButtonEvent::ShortPress) => {
                #[cfg(feature = "esp32-log")]
                println!("[Controller.process_button] short press");
                if self.power.is_off() && !self.parental_mode {
                    self.power.request(true);
                }
            }
            Some(ButtonEvent::LongPress) => {
                #[cfg(feature = "esp32-log")]
                println!("[Controller.process_button] long press");
                if self.power.is_on() {
                    self.power.request(false);
                }
            }
            None => {}
        }
        Ok(())
    }

    fn process_shutdown_signal(&mut self) -> Result<(), ControllerError> {
        let requested = self
            .io
            .shutdown_signal
            .is_high()
            .map_err(|e| ControllerError::ShutdownSignal(e.kind()))?;
        if requested && self.power.is_on() {
            self.power.request(false);
        }
        Ok(())
    }

    /// Drain at most one buffer's worth of bus bytes
    fn process_bus(&mut self, now: Instant) {
        self.framer.expire(now);

        for _ in 0..self.config.bus_bytes_per_tick {
            let Some(byte) = self.transport.read() else {
                break;
            };
            let mut dispatch = Dispatch {
                lighting: &mut self.lighting,
                surface: &mut self.surface,
                output: &mut self.output,
            };
            self.framer.feed(byte, now, |register, position, data| {
                bus::apply(register, position, data, &mut dispatch)
            });
        }
    }
}
