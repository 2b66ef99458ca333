//! State published to the home-automation bridge

/// Settled power state of the cabinet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerStatus {
    Off,
    On,
}

impl PowerStatus {
    /// Binary sensor payload
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }
}

/// Changes the bridge should publish after a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub power: Option<PowerStatus>,
    pub parental_mode: Option<bool>,
}

/// Remembers what was last reported so only changes go out
#[derive(Debug, Clone, Default)]
pub struct StatusReporter {
    power: Option<PowerStatus>,
    parental_mode: Option<bool>,
}

impl StatusReporter {
    pub const fn new() -> Self {
        Self {
            power: None,
            parental_mode: None,
        }
    }

    /// Compare the current state with the last report
    ///
    /// `power` is `None` while a transition is in flight; nothing is reported
    /// until it settles.
    pub fn report(&mut self, power: Option<PowerStatus>, parental_mode: bool) -> TickReport {
        let mut report = TickReport::default();
        if let Some(power) = power {
            if self.power != Some(power) {
                self.power = Some(power);
                report.power = Some(power);
            }
        }
        if self.parental_mode != Some(parental_mode) {
            self.parental_mode = Some(parental_mode);
            report.parental_mode = Some(parental_mode);
        }
        report
    }
}
