//! Polling loop wrapped around the [`KeyInterpreter`].
//!
//! Each call to [`Dispatcher::poll`] handles at most one key event:
//!
//! 1. take one pending frame from the bus (never waits); a steering-wheel key
//!    frame is decoded from its first data byte, other identifiers are counted
//!    and dropped;
//! 2. if the bus produced no key, take one pending [`Injection`];
//! 3. run the key through the interpreter and play the resulting pulse on the
//!    potentiometer, suspending on the timer while the action level settles.
//!
//! Nothing here is fatal. Read failures, empty frames, unknown codes and failed
//! test frames are traced to the diagnostic sink, counted in [`DispatchStats`],
//! and the loop keeps polling.
//!
//! The diagnostic sink is any [`core::fmt::Write`] (typically the serial
//! console). Write errors on it are ignored: nothing reads the trace back.
use core::fmt::{self, Debug, Write};

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Receiver};
use embassy_time::Duration;
use embedded_can::Id;

use crate::core::window_ms;
use crate::error::{InjectError, PollError};
use crate::protocol::injection::{Injection, InjectionChannel};
use crate::protocol::interpreter::{KeyInterpreter, Phase, PulseStep, ResistanceCommand};
use crate::protocol::keys::{KeyCode, ResistanceLevel, STEERING_WHEEL_KEYS_ID};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::{
    can_bus::CanBus, monotonic_timer::MonotonicTimer, potentiometer::Potentiometer,
};
use crate::protocol::transport::{IDLE_POLL_INTERVAL_MS, LOOPBACK_TEST_HOLDOFF_MS};

/// Foreign frames are summarised in the trace once every this many.
pub const FOREIGN_FRAME_TRACE_EVERY: u32 = 100;

//==================================================================================CONFIG
/// Settings of the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Standard CAN identifier of the steering-wheel key frame.
    pub keys_id: u32,
    /// Pause after a poll that found nothing to do.
    pub idle_poll: Duration,
    /// Pause after a loopback test frame.
    pub loopback_holdoff: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            keys_id: STEERING_WHEEL_KEYS_ID,
            idle_poll: Duration::from_millis(IDLE_POLL_INTERVAL_MS as u64),
            loopback_holdoff: Duration::from_millis(LOOPBACK_TEST_HOLDOFF_MS as u64),
        }
    }
}

impl DispatchConfig {
    pub fn with_keys_id(mut self, keys_id: u32) -> Self {
        self.keys_id = keys_id;
        self
    }

    pub fn with_idle_poll(mut self, idle_poll: Duration) -> Self {
        self.idle_poll = idle_poll;
        self
    }

    pub fn with_loopback_holdoff(mut self, loopback_holdoff: Duration) -> Self {
        self.loopback_holdoff = loopback_holdoff;
        self
    }
}

//==================================================================================OUTCOME
/// What a single poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No frame and no injected event.
    Idle,
    /// A frame with another identifier was dropped.
    Foreign { id: u32 },
    /// A key event reached the interpreter; `pulse` is the action level played, if any.
    Key {
        code: KeyCode,
        pulse: Option<ResistanceLevel>,
    },
    /// The bus reported a receive error.
    ReadFailed,
    /// A key frame arrived without data.
    EmptyFrame,
    /// The loopback test frame was sent.
    LoopbackSent,
    /// The loopback test frame could not be sent.
    LoopbackFailed,
}

/// Running counters of the polling loop. All counters wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Frames carrying the steering-wheel key identifier.
    pub key_frames: u32,
    /// Frames with any other identifier.
    pub foreign_frames: u32,
    /// Key events taken from the injection channel.
    pub injected_keys: u32,
    /// Receive errors reported by the bus.
    pub read_errors: u32,
    /// Key frames without any data byte.
    pub empty_frames: u32,
    /// Pulses played on the potentiometer.
    pub pulses: u32,
    /// Loopback test frames the bus refused.
    pub loopback_failures: u32,
}

/// Payload trace: `0x2B 00 FF`.
struct HexBytes<'a>(&'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

//==================================================================================DISPATCHER
/// Owns the collaborators and the interpreter for the device's uptime.
pub struct Dispatcher<'a, C, P, T, D, M, const CAP: usize>
where
    C: CanBus,
    C::Error: Debug,
    P: Potentiometer,
    T: MonotonicTimer,
    D: Write,
    M: RawMutex,
{
    bus: C,
    potentiometer: P,
    timer: T,
    diagnostics: D,
    interpreter: KeyInterpreter,
    config: DispatchConfig,
    injections: Option<Receiver<'a, M, Injection, CAP>>,
    stats: DispatchStats,
}

impl<'a, C, P, T, D, M, const CAP: usize> Dispatcher<'a, C, P, T, D, M, CAP>
where
    C: CanBus,
    C::Error: Debug,
    P: Potentiometer,
    T: MonotonicTimer,
    D: Write,
    M: RawMutex,
{
    /// Assemble the loop. `injections` is the optional test-injection channel.
    pub fn new(
        bus: C,
        potentiometer: P,
        timer: T,
        diagnostics: D,
        interpreter: KeyInterpreter,
        config: DispatchConfig,
        injections: Option<&'a InjectionChannel<M, CAP>>,
    ) -> Self {
        Self {
            bus,
            potentiometer,
            timer,
            diagnostics,
            interpreter,
            config,
            injections: injections.map(|channel| channel.receiver()),
            stats: DispatchStats::default(),
        }
    }

    /// Put the ladder at rest and announce the configuration.
    pub fn start(&mut self) {
        let rest = ResistanceLevel::NoKey;
        self.potentiometer.set_resistance(rest.ohms());

        #[cfg(feature = "defmt")]
        defmt::info!("Startup, listening on CAN ID {=u32:#x}", self.config.keys_id);

        let _ = writeln!(self.diagnostics, "SETUP: Potentiometer at {}.", rest);
        let _ = writeln!(
            self.diagnostics,
            "SETUP: Listening for key frames on CAN ID 0x{:X}.",
            self.config.keys_id
        );
        let _ = writeln!(self.diagnostics, "SETUP: Startup is complete.");
    }

    /// [`start`](Self::start), then poll forever.
    pub async fn run(mut self) {
        self.start();
        loop {
            self.poll().await;
        }
    }

    /// One pass of the loop. Handles at most one key event.
    pub async fn poll(&mut self) -> PollOutcome {
        self.interpreter.expire(self.timer.now());

        let outcome = match self.bus.try_recv() {
            Ok(Some(frame)) => self.handle_frame(&frame).await,
            Ok(None) => PollOutcome::Idle,
            Err(err) => {
                self.report_poll_error(PollError::Receive(err));
                PollOutcome::ReadFailed
            }
        };

        if let PollOutcome::Key { .. } = outcome {
            return outcome;
        }

        let injection = self
            .injections
            .as_ref()
            .and_then(|receiver| receiver.try_receive().ok());
        if let Some(injection) = injection {
            return self.handle_injection(injection).await;
        }

        if outcome == PollOutcome::Idle {
            self.timer.delay_ms(window_ms(self.config.idle_poll)).await;
        }
        outcome
    }

    async fn handle_frame(&mut self, frame: &CanFrame) -> PollOutcome {
        if !self.is_keys_frame(frame) {
            self.stats.foreign_frames = self.stats.foreign_frames.wrapping_add(1);
            if self.stats.foreign_frames % FOREIGN_FRAME_TRACE_EVERY == 0 {
                let _ = writeln!(
                    self.diagnostics,
                    "LOOP: {} frames with foreign CAN IDs ignored.",
                    FOREIGN_FRAME_TRACE_EVERY
                );
            }
            return PollOutcome::Foreign { id: frame.raw_id() };
        }

        self.stats.key_frames = self.stats.key_frames.wrapping_add(1);
        let _ = writeln!(
            self.diagnostics,
            "LOOP: Received CAN ID: 0x{:X} Data: {}",
            frame.raw_id(),
            HexBytes(frame.payload())
        );

        match frame.payload().first() {
            Some(&raw) => self.handle_key(KeyCode::from_raw(raw)).await,
            None => {
                self.report_poll_error(PollError::EmptyPayload);
                PollOutcome::EmptyFrame
            }
        }
    }

    /// Only standard frames carry the key identifier.
    fn is_keys_frame(&self, frame: &CanFrame) -> bool {
        matches!(frame.id, Id::Standard(id) if id.as_raw() as u32 == self.config.keys_id)
    }

    async fn handle_injection(&mut self, injection: Injection) -> PollOutcome {
        match injection {
            Injection::Key(raw) => {
                self.stats.injected_keys = self.stats.injected_keys.wrapping_add(1);
                let _ = writeln!(self.diagnostics, "LOOP: Injected key code {}.", raw);
                self.handle_key(KeyCode::from_raw(raw)).await
            }
            Injection::LoopbackTest => {
                let _ = writeln!(self.diagnostics, "LOOP: Test input pulled LOW");
                let outcome = match self.send_loopback_frame().await {
                    Ok(()) => {
                        let _ = writeln!(
                            self.diagnostics,
                            "LOOP: Test CAN message sent successfully."
                        );
                        PollOutcome::LoopbackSent
                    }
                    Err(err) => {
                        self.stats.loopback_failures =
                            self.stats.loopback_failures.wrapping_add(1);
                        #[cfg(feature = "defmt")]
                        defmt::error!("Loopback test frame failed");
                        let _ = writeln!(
                            self.diagnostics,
                            "LOOP: Failed to send test CAN message: {}",
                            err
                        );
                        PollOutcome::LoopbackFailed
                    }
                };
                self.timer
                    .delay_ms(window_ms(self.config.loopback_holdoff))
                    .await;
                outcome
            }
        }
    }

    /// Send a `VolUp` key frame with the keys identifier.
    async fn send_loopback_frame(&mut self) -> Result<(), InjectError<C::Error>> {
        let frame = CanFrame::standard(self.config.keys_id, &[KeyCode::VolUp.raw()])?;
        self.bus.send(&frame).await.map_err(InjectError::Send)
    }

    async fn handle_key(&mut self, code: KeyCode) -> PollOutcome {
        if let KeyCode::Unknown(raw) = code {
            let _ = writeln!(self.diagnostics, "Unknown key pressed: {}", raw);
        }

        let now = self.timer.now();
        let previous = self.interpreter.state().last_key();
        let command = self.interpreter.process(code, now);

        let _ = writeln!(self.diagnostics, "Last Pressed Key: {}", previous);
        let _ = writeln!(self.diagnostics, "Current Key: {}", code);
        match self.interpreter.state().phase() {
            Phase::Holding { since } => {
                let _ = writeln!(
                    self.diagnostics,
                    "Time Since Last Press: {} ms",
                    now.since(since)
                );
            }
            Phase::Cooldown { since } => {
                let _ = writeln!(
                    self.diagnostics,
                    "Cooldown: {} ms since long press",
                    now.since(since)
                );
            }
            Phase::Idle => {}
        }

        let pulse = command.map(|command| command.level);
        if let Some(command) = command {
            self.play(command).await;
        }
        PollOutcome::Key { code, pulse }
    }

    /// Execute a pulse step by step.
    async fn play(&mut self, command: ResistanceCommand) {
        for step in command.steps() {
            match step {
                PulseStep::Set(level) => {
                    self.potentiometer.set_resistance(level.ohms());
                    let _ = writeln!(self.diagnostics, "POTI: {}", level);
                }
                PulseStep::Settle(settle) => self.timer.delay_ms(window_ms(settle)).await,
            }
        }
        self.stats.pulses = self.stats.pulses.wrapping_add(1);
    }

    fn report_poll_error(&mut self, err: PollError<C::Error>) {
        match &err {
            PollError::Receive(_) => {
                self.stats.read_errors = self.stats.read_errors.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("CAN receive error");
            }
            PollError::EmptyPayload => {
                self.stats.empty_frames = self.stats.empty_frames.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("Key frame without payload");
            }
        }
        let _ = writeln!(self.diagnostics, "LOOP: Error reading CAN message: {}", err);
    }

    #[inline]
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    #[inline]
    pub fn interpreter(&self) -> &KeyInterpreter {
        &self.interpreter
    }

    #[inline]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    #[inline]
    pub fn potentiometer(&self) -> &P {
        &self.potentiometer
    }

    #[inline]
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }
}
