//! Collaborator traits consumed by the dispatcher (CAN bus, clock, potentiometer).
pub mod can_bus;
pub mod monotonic_timer;
pub mod potentiometer;
