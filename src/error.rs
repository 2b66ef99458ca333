use core::fmt;

use embedded_hal::digital::ErrorKind;

/// Failure of a digital I/O line
///
/// Bus and lighting input never fails; only pin access can. The failing line
/// is named so the caller can log it and keep ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    /// Writing a relay output failed
    Relay { index: usize, kind: ErrorKind },
    /// Reading the start button failed
    Button(ErrorKind),
    /// Writing the button passthrough output failed
    ButtonMirror(ErrorKind),
    /// Reading the external shutdown request failed
    ShutdownSignal(ErrorKind),
    /// Writing the status LED failed
    StatusLed(ErrorKind),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relay { index, kind } => write!(f, "relay {index}: {kind:?}"),
            Self::Button(kind) => write!(f, "start button: {kind:?}"),
            Self::ButtonMirror(kind) => write!(f, "button passthrough: {kind:?}"),
            Self::ShutdownSignal(kind) => write!(f, "shutdown signal: {kind:?}"),
            Self::StatusLed(kind) => write!(f, "status led: {kind:?}"),
        }
    }
}

impl core::error::Error for ControllerError {}
