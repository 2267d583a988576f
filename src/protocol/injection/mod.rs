//! Test-injection path: a secondary source of key events that bypasses the CAN
//! receive path.
//!
//! Two sources exist on the bench: the serial console (one character per key)
//! and a hardware test pin that asks for a loopback frame on the bus. Both post
//! an [`Injection`] into a pre-allocated [`embassy_sync::channel::Channel`]; the
//! dispatcher drains it without blocking. No allocation is performed and the
//! mutex flavour is left to the firmware (`NoopRawMutex` when everything runs
//! on one executor, `CriticalSectionRawMutex` when an interrupt feeds it).
use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Channel, Sender, TrySendError},
};

use crate::protocol::keys::KeyCode;

/// Channel carrying injected events to the dispatcher.
pub type InjectionChannel<M, const CAP: usize> = Channel<M, Injection, CAP>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Event posted by a test source.
pub enum Injection {
    /// Raw key code fed straight to the interpreter, as if read from a frame.
    Key(u8),
    /// Send a `VolUp` key frame on the bus (the controller is expected to loop it back).
    LoopbackTest,
}

impl Injection {
    /// Translate a serial console character (`u`, `d`, `h`, `j`, `n`).
    ///
    /// Other characters, line endings included, produce nothing.
    pub fn from_console(byte: u8) -> Option<Self> {
        KeyCode::from_console(byte).map(|key| Injection::Key(key.raw()))
    }
}

/// Producer handle given to the console task or the test pin handler.
pub struct InjectionPort<'a, M: RawMutex, const CAP: usize> {
    sender: Sender<'a, M, Injection, CAP>,
}

impl<'a, M: RawMutex, const CAP: usize> InjectionPort<'a, M, CAP> {
    pub fn new(channel: &'a InjectionChannel<M, CAP>) -> Self {
        Self {
            sender: channel.sender(),
        }
    }

    /// Queue an event, waiting for room if the channel is full.
    pub async fn inject(&self, injection: Injection) {
        self.sender.send(injection).await;
    }

    /// Queue an event if there is room. Returns the event back otherwise.
    pub fn try_inject(&self, injection: Injection) -> Result<(), Injection> {
        self.sender
            .try_send(injection)
            .map_err(|TrySendError::Full(injection)| injection)
    }

    /// Feed one console character. Returns `true` when it mapped to a key and was queued.
    pub fn console_byte(&self, byte: u8) -> bool {
        match Injection::from_console(byte) {
            Some(injection) => self.try_inject(injection).is_ok(),
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Ignoring console byte {=u8:#x}", byte);
                false
            }
        }
    }

    /// Hardware test pin pulled low.
    pub fn test_pin_pressed(&self) -> bool {
        self.try_inject(Injection::LoopbackTest).is_ok()
    }
}
