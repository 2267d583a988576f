//! Clock and delay abstraction: the interpreter is timed from `now()` and the
//! dispatcher suspends on `delay_ms` while a pulse settles.
use crate::core::Timestamp;

/// Monotonic millisecond clock with an asynchronous delay.
///
/// Firmware backs it with `embassy_time` (`Instant::now().into()` and
/// `Timer::after_millis`); tests back it with a virtual clock that `delay_ms`
/// advances instantly.
pub trait MonotonicTimer {
    /// Current reading of the millisecond clock.
    fn now(&self) -> Timestamp;
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}
