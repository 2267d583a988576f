//! Time primitives shared by the interpreter and the dispatcher.
//!
//! The device clock is a free-running millisecond counter that wraps after
//! roughly 49 days. Every comparison goes through [`Timestamp::since`], which
//! subtracts modulo 2^32, so a press that straddles the wrap is still timed
//! correctly.
use embassy_time::{Duration, Instant};

/// Reading of the monotonic millisecond clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(pub u32);

impl Timestamp {
    /// Raw millisecond count.
    #[inline]
    pub const fn as_millis(&self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`, wraparound-safe.
    #[inline]
    pub const fn since(&self, earlier: Timestamp) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Timestamp `millis` milliseconds later, wrapping like the hardware counter.
    #[inline]
    pub const fn add_millis(&self, millis: u32) -> Self {
        Self(self.0.wrapping_add(millis))
    }
}

impl From<Instant> for Timestamp {
    /// Truncates the 64-bit tick count the same way a 32-bit `millis()` counter wraps.
    fn from(instant: Instant) -> Self {
        Self(instant.as_millis() as u32)
    }
}

/// Express a duration as the millisecond window used by the state machine.
///
/// Durations above `u32::MAX` ms saturate; they could never be observed on a
/// 32-bit clock anyway.
#[inline]
pub(crate) fn window_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
