//! Controller configuration
//!
//! Every timing constant of the control loop lives here so boards and tests
//! can tune them without touching the state machines.

use embassy_time::Duration;

/// Number of pixels on the cabinet marquee strip
pub const DEFAULT_PIXEL_COUNT: usize = 34;

/// Number of relay outputs on the board
pub const RELAY_COUNT: usize = 4;

/// How a relay output takes part in power sequencing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayDomain {
    /// Human readable supply name
    pub name: &'static str,
    /// Power-up step in which the relay is energized, `None` to leave it off
    pub power_up_order: Option<u8>,
    /// Whether the relay is opened on power-down
    pub cut_on_power_down: bool,
}

impl RelayDomain {
    pub const fn new(name: &'static str, power_up_order: Option<u8>) -> Self {
        Self {
            name,
            power_up_order,
            cut_on_power_down: true,
        }
    }

    /// Keep the relay closed on power-down
    #[must_use]
    pub const fn kept_on_power_down(mut self) -> Self {
        self.cut_on_power_down = false;
        self
    }
}

/// 12 V first, then 5 V, then mains.
pub const DEFAULT_RELAYS: [RelayDomain; RELAY_COUNT] = [
    RelayDomain::new("mains", Some(2)),
    RelayDomain::new("12v-amplifier", Some(0)),
    RelayDomain::new("12v-leds", Some(0)),
    RelayDomain::new("5v", Some(1)),
];

/// Board revision with the noisy 5 V supply left disconnected
pub const RELAYS_WITHOUT_5V: [RelayDomain; RELAY_COUNT] = [
    RelayDomain::new("mains", Some(2)),
    RelayDomain::new("12v-amplifier", Some(0)),
    RelayDomain::new("12v-leds", Some(0)),
    RelayDomain::new("5v", None),
];

/// Configuration for the cabinet controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Inter-byte gap that abandons a partially received bus frame
    pub bus_frame_timeout: Duration,
    /// Upper bound of bus bytes consumed in one tick
    pub bus_bytes_per_tick: usize,
    /// Interval between single-unit brightness steps
    pub brightness_step_interval: Duration,
    /// Debounce window of the start button
    pub button_debounce: Duration,
    /// Minimum hold that counts as a power-on press
    pub short_press_min: Duration,
    /// Hold that requests power-off
    pub long_press_min: Duration,
    /// Pause between energizing consecutive power domains
    pub relay_settle_delay: Duration,
    /// Time the status LED stays lit after boot
    pub startup_delay: Duration,
    /// Pixels at each end of the strip forced to white
    pub border_pixels: usize,
    /// Animation phase advance per tick in rainbow modes
    pub rainbow_phase_step: u16,
    /// Brightness at boot
    pub brightness: u8,
    /// Target brightness at boot
    pub target_brightness: u8,
    /// Solid color at boot
    pub color: [u8; 3],
    /// Sequencing role of each relay output
    pub relays: [RelayDomain; RELAY_COUNT],
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            bus_frame_timeout: Duration::from_millis(100),
            bus_bytes_per_tick: 32,
            brightness_step_interval: Duration::from_millis(10),
            button_debounce: Duration::from_millis(35),
            short_press_min: Duration::from_millis(1_000),
            long_press_min: Duration::from_millis(10_000),
            relay_settle_delay: Duration::from_millis(250),
            startup_delay: Duration::from_millis(2_000),
            border_pixels: 4,
            rainbow_phase_step: 10,
            brightness: 0,
            target_brightness: 255,
            color: [255, 255, 255],
            relays: DEFAULT_RELAYS,
        }
    }
}
