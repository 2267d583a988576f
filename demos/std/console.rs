//! # Console Demo
//!
//! Runs the dispatcher on the host, with stdin standing in for the serial
//! console of the device:
//!
//! - `u` / `d` / `h` / `j` / `n`: inject VolUp, VolDown, HangUp, Joker, release
//! - `t`: press the hardware test pin (a VolUp frame is looped back on the bus)
//!
//! Type several characters on one line to emulate a held key, e.g. `jjjjjjjjn`
//! (each character is one poll, spaced by `POLL_SPACING_MS`).
//!
//! ```bash
//! cargo run --example console
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::io::{BufRead, Write as _};
use std::time::{Duration as StdDuration, Instant};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use swc_ladder::core::Timestamp;
use swc_ladder::protocol::dispatch::{DispatchConfig, Dispatcher};
use swc_ladder::protocol::injection::{InjectionChannel, InjectionPort};
use swc_ladder::protocol::interpreter::KeyInterpreter;
use swc_ladder::protocol::transport::{
    can_frame::CanFrame,
    traits::{can_bus::CanBus, monotonic_timer::MonotonicTimer, potentiometer::Potentiometer},
};
use tokio::sync::mpsc;

/// Time between two injected characters, so a line of `j` reads as a held key.
const POLL_SPACING_MS: u64 = 120;

// ============================================================================
// Host collaborators
// ============================================================================

/// Bus in permanent loopback mode: whatever is sent is received back.
#[derive(Default)]
struct LoopbackBus {
    pending: VecDeque<CanFrame>,
}

impl CanBus for LoopbackBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        self.pending.push_back(*frame);
        Ok(())
    }

    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        Ok(self.pending.pop_front())
    }
}

/// Prints the wiper position instead of driving an SPI potentiometer.
struct PrintPotentiometer;

impl Potentiometer for PrintPotentiometer {
    fn set_resistance(&mut self, ohms: u32) {
        println!("   [MCP4151] wiper -> {} ohm", ohms);
    }
}

/// Wall clock since the demo started.
struct HostTimer {
    boot: Instant,
}

impl MonotonicTimer for HostTimer {
    fn now(&self) -> Timestamp {
        Timestamp(self.boot.elapsed().as_millis() as u32)
    }

    async fn delay_ms(&mut self, millis: u32) {
        tokio::time::sleep(StdDuration::from_millis(millis as u64)).await;
    }
}

/// Diagnostic sink on stdout.
struct Stdout;

impl fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        print!("{}", s);
        std::io::stdout().flush().map_err(|_| fmt::Error)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== swc-ladder console demo ===");
    println!("u/d/h/j/n inject keys, t presses the test pin, Ctrl-D quits.\n");

    // stdin is blocking: read it on its own thread and forward the bytes.
    let (byte_tx, mut byte_rx) = mpsc::unbounded_channel::<u8>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            for byte in line.bytes() {
                if byte_tx.send(byte).is_err() {
                    return;
                }
            }
        }
    });

    let channel = InjectionChannel::<NoopRawMutex, 16>::new();
    let port = InjectionPort::new(&channel);
    let mut dispatcher = Dispatcher::new(
        LoopbackBus::default(),
        PrintPotentiometer,
        HostTimer {
            boot: Instant::now(),
        },
        Stdout,
        KeyInterpreter::default(),
        DispatchConfig::default(),
        Some(&channel),
    );
    dispatcher.start();

    loop {
        match byte_rx.try_recv() {
            Ok(b't') => {
                port.test_pin_pressed();
            }
            Ok(byte) => {
                if port.console_byte(byte) {
                    tokio::time::sleep(StdDuration::from_millis(POLL_SPACING_MS)).await;
                }
            }
            Err(mpsc::error::TryRecvError::Empty) => {}
            Err(mpsc::error::TryRecvError::Disconnected) => break,
        }
        dispatcher.poll().await;
    }

    // Drain what is still queued before leaving.
    while !channel.is_empty() {
        dispatcher.poll().await;
    }
    println!("\n{:?}", dispatcher.stats());
}
