//! Error definitions shared across library modules.
//! None of them is fatal for the device: the dispatcher traces and counts them,
//! then keeps polling.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur while building a CAN frame.
pub enum FrameError {
    /// Classic CAN carries at most eight data bytes.
    #[error("Payload too long: {len} bytes (max 8)")]
    PayloadTooLong { len: usize },
    /// The identifier does not fit the requested format.
    #[error("Invalid CAN identifier: {id:#X}")]
    InvalidId { id: u32 },
    /// Remote (RTR) frames carry no key code and are not modelled.
    #[error("Remote frames are not supported")]
    RemoteFrame,
}

#[derive(Error, Debug)]
/// Failures while pulling a key frame from the bus.
pub enum PollError<E: core::fmt::Debug> {
    /// The CAN driver reported a receive error.
    #[error("CAN bus receive error: {0:?}")]
    Receive(E),
    /// A key frame arrived without any data byte.
    #[error("Key frame carries no payload")]
    EmptyPayload,
}

#[derive(Error, Debug)]
/// Failures while sending the loopback test frame.
pub enum InjectError<E: core::fmt::Debug> {
    /// The loopback frame could not be built.
    #[error(transparent)]
    Build(#[from] FrameError),
    /// CAN layer refused or failed to send the frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
}
