//! Steering-wheel key handling: the key map, the press/long-press interpreter,
//! the polling dispatcher, the test-injection path and the transport traits.
pub mod dispatch;
pub mod injection;
pub mod interpreter;
pub mod keys;
pub mod transport;
