//! `swc-ladder` library: interprets steering-wheel key frames received on a
//! vehicle CAN bus and replays them as resistor-ladder levels on a digital
//! potentiometer, in a `no_std` environment. The crate exposes the timing
//! primitives, the error types and the protocol logic (key map, interpreter,
//! polling dispatcher, test injection, CAN transport abstractions).
#![no_std]
//==================================================================================
/// Millisecond timestamps with wraparound-safe arithmetic.
pub mod core;
/// Frame construction, bus receive and loopback test errors.
pub mod error;
/// Key map, key interpreter, dispatcher and the CAN/potentiometer interfaces.
pub mod protocol;
//==================================================================================
