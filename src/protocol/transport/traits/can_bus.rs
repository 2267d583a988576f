//! Minimal abstraction for a polled CAN controller. Allows the dispatcher to
//! plug into various implementations (embedded HAL, desktop driver, mocks).
use crate::protocol::transport::can_frame::CanFrame;
use futures_util::Future;

/// Contract to poll and send CAN frames.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Emit a frame on the bus. Asynchronous to accommodate non-blocking drivers.
    fn send<'a>(
        &'a mut self,
        frame: &'a CanFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
    /// Take the next pending frame without waiting.
    ///
    /// `Ok(None)` means the receive buffer is empty. On `Err` no frame (and no
    /// partial frame) is handed out.
    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error>;
}
