//! Transport layer: CAN frame representation and the collaborator traits the
//! dispatcher is generic over.
//!
//! ## Timing constants
//!
//! Delays of the polling loop itself; the interpreter windows live in
//! [`crate::protocol::interpreter`].

pub mod can_frame;
pub mod traits;

/// Pause between two polls that found nothing to do (ms).
///
/// The receive path never blocks, so without this yield a cooperative executor
/// would never run anything else.
pub const IDLE_POLL_INTERVAL_MS: u32 = 1;

/// Hold-off after a loopback test frame (ms).
///
/// A hardware test pin stays low for as long as it is held; the hold-off keeps
/// one press from flooding the bus with test frames.
pub const LOOPBACK_TEST_HOLDOFF_MS: u32 = 500;
