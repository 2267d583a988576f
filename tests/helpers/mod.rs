/// Test doubles to simulate the CAN bus, the potentiometer and the clock during
/// integration tests.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use swc_ladder::core::Timestamp;
use swc_ladder::protocol::transport::{
    can_frame::CanFrame,
    traits::{can_bus::CanBus, monotonic_timer::MonotonicTimer, potentiometer::Potentiometer},
};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors produced by the mock bus.
pub enum MockBusError {
    /// Receive buffer overrun reported by the controller.
    Overrun,
    /// Transmission refused.
    TxRefused,
}

#[allow(dead_code)]
/// In-memory CAN bus reproducing the `CanBus` trait behavior.
pub struct MockCanBus {
    rx: mpsc::UnboundedReceiver<Result<CanFrame, MockBusError>>,
    tx: mpsc::UnboundedSender<CanFrame>,
    refuse_sends: Rc<Cell<bool>>,
}

#[allow(dead_code)]
/// Host side of the bus: queues incoming frames and inspects sent ones.
pub struct HostBus {
    tx: mpsc::UnboundedSender<Result<CanFrame, MockBusError>>,
    rx: mpsc::UnboundedReceiver<CanFrame>,
    refuse_sends: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Construct a pair of interconnected endpoints (DUT ↔ host).
    pub fn create_pair() -> (Self, HostBus) {
        let (host_tx, dut_rx) = mpsc::unbounded_channel();
        let (dut_tx, host_rx) = mpsc::unbounded_channel();
        let refuse_sends = Rc::new(Cell::new(false));

        let dut_bus = Self {
            rx: dut_rx,
            tx: dut_tx,
            refuse_sends: refuse_sends.clone(),
        };
        let host_bus = HostBus {
            tx: host_tx,
            rx: host_rx,
            refuse_sends,
        };

        (dut_bus, host_bus)
    }
}

impl CanBus for MockCanBus {
    type Error = MockBusError;

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        if self.refuse_sends.get() {
            return Err(MockBusError::TxRefused);
        }
        self.tx.send(*frame).map_err(|_| MockBusError::TxRefused)?;
        Ok(())
    }

    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        match self.rx.try_recv() {
            Ok(Ok(frame)) => Ok(Some(frame)),
            Ok(Err(err)) => Err(err),
            Err(_) => Ok(None),
        }
    }
}

#[allow(dead_code)]
impl HostBus {
    /// Queue a steering-wheel key frame carrying `raw`.
    pub fn key(&self, raw: u8) {
        self.frame(CanFrame::standard(0x5C1, &[raw, 0x00]).expect("valid key frame"));
    }

    pub fn frame(&self, frame: CanFrame) {
        self.tx.send(Ok(frame)).expect("DUT bus dropped");
    }

    pub fn error(&self, err: MockBusError) {
        self.tx.send(Err(err)).expect("DUT bus dropped");
    }

    pub fn refuse_sends(&self, refuse: bool) {
        self.refuse_sends.set(refuse);
    }

    /// Next frame sent by the DUT, if any.
    pub fn sent(&mut self) -> Option<CanFrame> {
        self.rx.try_recv().ok()
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Potentiometer recording every resistance it is driven to.
pub struct RecordingPotentiometer {
    pub log: Rc<RefCell<Vec<u32>>>,
}

#[allow(dead_code)]
impl RecordingPotentiometer {
    pub fn history(&self) -> Vec<u32> {
        self.log.borrow().clone()
    }
}

impl Potentiometer for RecordingPotentiometer {
    fn set_resistance(&mut self, ohms: u32) {
        self.log.borrow_mut().push(ohms);
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Virtual clock: `delay_ms` advances time instantly and records the delay.
pub struct MockTimer {
    pub clock: Rc<Cell<u32>>,
    pub delays: Rc<RefCell<Vec<u32>>>,
}

#[allow(dead_code)]
impl MockTimer {
    /// Jump the clock to `millis`.
    pub fn set(&self, millis: u32) {
        self.clock.set(millis);
    }

    pub fn delays(&self) -> Vec<u32> {
        self.delays.borrow().clone()
    }
}

impl MonotonicTimer for MockTimer {
    fn now(&self) -> Timestamp {
        Timestamp(self.clock.get())
    }

    async fn delay_ms(&mut self, millis: u32) {
        self.delays.borrow_mut().push(millis);
        self.clock.set(self.clock.get().wrapping_add(millis));
    }
}
