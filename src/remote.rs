//! Remote requests from the home-automation bridge
//!
//! The network side pushes [`RemoteCommand`]s from its own task or interrupt;
//! the control loop drains them once per tick without blocking. The queue is
//! a fixed-size `heapless::Deque` guarded by a critical section.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Request received from the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    PowerOn,
    PowerOff,
    /// Virtual power button: toggles the requested power state
    PressPowerButton,
    /// Block local power-on presses while enabled
    SetParentalMode(bool),
}

/// Error returned when the queue is full, carrying the rejected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError(pub RemoteCommand);

/// Bounded command queue shared between the bridge and the control loop
pub struct RemoteChannel<const SIZE: usize> {
    queue: Mutex<RefCell<Deque<RemoteCommand, SIZE>>>,
}

impl<const SIZE: usize> RemoteChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> RemoteSender<'_, SIZE> {
        RemoteSender { channel: self }
    }

    /// Only the control loop should hold a receiver.
    pub const fn receiver(&self) -> RemoteReceiver<'_, SIZE> {
        RemoteReceiver { channel: self }
    }

    fn push(&self, command: RemoteCommand) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.queue.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(TrySendError)
        })
    }

    fn pop(&self) -> Option<RemoteCommand> {
        critical_section::with(|cs| self.queue.borrow(cs).borrow_mut().pop_front())
    }
}

impl<const SIZE: usize> Default for RemoteChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer side, held by the network bridge
#[derive(Clone, Copy)]
pub struct RemoteSender<'a, const SIZE: usize> {
    channel: &'a RemoteChannel<SIZE>,
}

impl<const SIZE: usize> RemoteSender<'_, SIZE> {
    /// Queue a command
    ///
    /// Returns `Err(TrySendError(command))` if the queue is full.
    pub fn try_send(&self, command: RemoteCommand) -> Result<(), TrySendError> {
        self.channel.push(command)
    }
}

/// Consumer side, drained by the control loop
#[derive(Clone, Copy)]
pub struct RemoteReceiver<'a, const SIZE: usize> {
    channel: &'a RemoteChannel<SIZE>,
}

impl<const SIZE: usize> RemoteReceiver<'_, SIZE> {
    /// Take the oldest queued command
    pub fn try_receive(&self) -> Option<RemoteCommand> {
        self.channel.pop()
    }
}
