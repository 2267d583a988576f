//! In-memory representation of a classic CAN data frame.
//!
//! [`CanFrame`] implements [`embedded_can::Frame`], so any HAL driver can build
//! or convert it without knowing this crate, and [`CanFrame::from_frame`]
//! copies a driver frame into it.
use embedded_can::{ExtendedId, Frame, Id, StandardId};

use crate::error::FrameError;

/// Classic CAN payload capacity.
pub const MAX_CAN_PAYLOAD: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Raw CAN data frame as read from (or written to) the bus.
pub struct CanFrame {
    /// Standard (11-bit) or extended (29-bit) identifier.
    pub id: Id,
    /// Payload buffer. Classic CAN frames always provide eight bytes.
    pub data: [u8; MAX_CAN_PAYLOAD],
    /// Number of valid payload bytes (Data Length Code, 0 to 8). Values above
    /// eight, as a raw DLC nibble can carry, read as eight.
    pub len: usize,
}

impl CanFrame {
    /// Build a data frame for `id`.
    pub fn with_id(id: Id, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_CAN_PAYLOAD {
            return Err(FrameError::PayloadTooLong { len: payload.len() });
        }
        let mut data = [0u8; MAX_CAN_PAYLOAD];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            data,
            len: payload.len(),
        })
    }

    /// Build a data frame with a standard 11-bit identifier.
    pub fn standard(raw_id: u32, payload: &[u8]) -> Result<Self, FrameError> {
        let id = u16::try_from(raw_id)
            .ok()
            .and_then(StandardId::new)
            .ok_or(FrameError::InvalidId { id: raw_id })?;
        Self::with_id(Id::Standard(id), payload)
    }

    /// Build a data frame with an extended 29-bit identifier.
    pub fn extended(raw_id: u32, payload: &[u8]) -> Result<Self, FrameError> {
        let id = ExtendedId::new(raw_id).ok_or(FrameError::InvalidId { id: raw_id })?;
        Self::with_id(Id::Extended(id), payload)
    }

    /// Copy a driver frame. Remote frames carry no data and are rejected.
    pub fn from_frame<F: Frame>(frame: &F) -> Result<Self, FrameError> {
        if frame.is_remote_frame() {
            return Err(FrameError::RemoteFrame);
        }
        Self::with_id(frame.id(), frame.data())
    }

    /// Identifier as a plain number, whatever its width.
    pub fn raw_id(&self) -> u32 {
        match self.id {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }

    /// Populated payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.payload_len()]
    }

    /// Valid payload length, capped to the buffer.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.len.min(MAX_CAN_PAYLOAD)
    }
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        Self::with_id(id.into(), data).ok()
    }

    /// Remote frames are not modelled.
    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.payload_len()
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}
