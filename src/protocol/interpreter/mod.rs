//! Key event interpreter: turns the stream of decoded key codes into
//! resistor-ladder pulses.
//!
//! The head unit reads a momentary button, so each action is a pulse: the
//! action level, a short settle delay, then the rest level. Volume keys pulse as
//! soon as they are seen. `HangUp` and `Joker` are timed across polls: released
//! before the long-press threshold they pulse their short level, held past it
//! they pulse their long level once and arm a cooldown that swallows every event
//! (including the trailing release) until it expires.
//!
//! State lives in [`InterpreterState`], a last-key register plus a tagged
//! [`Phase`]. [`InterpreterState::transition`] is pure: it takes the state and one
//! event and returns the next state and at most one [`ResistanceCommand`].
//! [`KeyInterpreter`] owns one state and one configuration for the device's
//! uptime.
//!
//! # Example
//!
//! ```rust
//! use swc_ladder::core::Timestamp;
//! use swc_ladder::protocol::interpreter::KeyInterpreter;
//! use swc_ladder::protocol::keys::{KeyCode, ResistanceLevel};
//!
//! let mut interpreter = KeyInterpreter::default();
//! assert!(interpreter.process(KeyCode::Joker, Timestamp(0)).is_none());
//! let command = interpreter
//!     .process(KeyCode::Joker, Timestamp(720))
//!     .expect("held past the threshold");
//! assert_eq!(command.level, ResistanceLevel::JokerLong);
//! // The release that follows is swallowed by the cooldown.
//! assert!(interpreter.process(KeyCode::None, Timestamp(730)).is_none());
//! ```
use embassy_time::Duration;

use crate::core::{window_ms, Timestamp};
use crate::protocol::keys::{KeyCode, ResistanceLevel};

/// Hold time at which `HangUp`/`Joker` switch to their long action (ms).
pub const LONG_PRESS_THRESHOLD_MS: u64 = 700;

/// Window after a long action during which every event is ignored (ms).
///
/// Releasing a long-pressed key produces a trailing release event that would
/// otherwise read as a fresh short press.
pub const LONG_PRESS_COOLDOWN_MS: u64 = 1000;

/// Time the action level is held before returning to rest (ms).
pub const PULSE_SETTLE_MS: u64 = 100;

//==================================================================================CONFIG
/// Timing windows of the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub long_press: Duration,
    pub cooldown: Duration,
    pub settle: Duration,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterConfig {
    /// Windows expected by the head unit: 700 ms long press, 1 s cooldown, 100 ms pulse.
    pub const fn new() -> Self {
        Self {
            long_press: Duration::from_millis(LONG_PRESS_THRESHOLD_MS),
            cooldown: Duration::from_millis(LONG_PRESS_COOLDOWN_MS),
            settle: Duration::from_millis(PULSE_SETTLE_MS),
        }
    }

    pub fn with_long_press(mut self, long_press: Duration) -> Self {
        self.long_press = long_press;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }
}

//==================================================================================COMMAND
/// One step of a resistance pulse, executed in order by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseStep {
    /// Drive the potentiometer to this level.
    Set(ResistanceLevel),
    /// Keep the current level for this long.
    Settle(Duration),
}

/// Resistance pulse emitted for one key action.
///
/// The pulse always ends on [`ResistanceLevel::NoKey`]; the settle delay is part
/// of the contract so callers can simulate it instead of sleeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResistanceCommand {
    /// Action level presented to the head unit.
    pub level: ResistanceLevel,
    /// How long the action level is held.
    pub settle: Duration,
}

impl ResistanceCommand {
    pub const fn new(level: ResistanceLevel, settle: Duration) -> Self {
        Self { level, settle }
    }

    /// Level the pulse returns to.
    #[inline]
    pub const fn rest(&self) -> ResistanceLevel {
        ResistanceLevel::NoKey
    }

    /// Action level, settle delay, rest level.
    pub const fn steps(&self) -> [PulseStep; 3] {
        [
            PulseStep::Set(self.level),
            PulseStep::Settle(self.settle),
            PulseStep::Set(self.rest()),
        ]
    }
}

//==================================================================================STATE
/// Timing phase of the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No press is being timed.
    Idle,
    /// A held key went down at `since` and has not fired yet.
    Holding { since: Timestamp },
    /// A long action fired at `since`; events are ignored until the cooldown elapses.
    Cooldown { since: Timestamp },
}

/// Everything the interpreter remembers between two events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterState {
    last_key: KeyCode,
    phase: Phase,
}

impl Default for InterpreterState {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterState {
    /// Power-on state: nothing pressed, no cooldown.
    pub const fn new() -> Self {
        Self {
            last_key: KeyCode::None,
            phase: Phase::Idle,
        }
    }

    /// Key seen by the previous processed event.
    #[inline]
    pub fn last_key(&self) -> KeyCode {
        self.last_key
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Start of the press being timed, if any.
    pub fn press_start(&self) -> Option<Timestamp> {
        match self.phase {
            Phase::Holding { since } => Some(since),
            _ => None,
        }
    }

    /// Time the most recent long action fired, while it is still remembered.
    pub fn last_long_press(&self) -> Option<Timestamp> {
        match self.phase {
            Phase::Cooldown { since } => Some(since),
            _ => None,
        }
    }

    /// Whether an event at `now` would be swallowed by the cooldown.
    pub fn in_cooldown(&self, now: Timestamp, config: &InterpreterConfig) -> bool {
        match self.phase {
            Phase::Cooldown { since } => now.since(since) < window_ms(config.cooldown),
            _ => false,
        }
    }

    /// Drop a cooldown that has elapsed by `now`.
    ///
    /// The cooldown start is compared with wrapping arithmetic, so a record left
    /// in place would gate events again one full counter lap later.
    pub fn expire(self, now: Timestamp, config: &InterpreterConfig) -> Self {
        match self.phase {
            Phase::Cooldown { .. } if !self.in_cooldown(now, config) => Self {
                phase: Phase::Idle,
                ..self
            },
            _ => self,
        }
    }

    /// Apply one key event observed at `now`.
    ///
    /// Returns the next state and the pulse to emit, if any. Inside the cooldown
    /// the state is returned untouched. Otherwise `last_key` always becomes
    /// `code`, and the phase moves as follows:
    ///
    /// | event            | condition                          | phase after     | pulse           |
    /// |------------------|------------------------------------|-----------------|-----------------|
    /// | `None`           | held for less than the threshold   | `Idle`          | short of last key |
    /// | `None`           | otherwise                          | `Idle`          | none            |
    /// | `VolUp`/`VolDown`| always                             | `Idle`          | volume level    |
    /// | `HangUp`/`Joker` | last key was `None`                | `Holding(now)`  | none            |
    /// | `HangUp`/`Joker` | held at or past the threshold      | `Cooldown(now)` | long of `code`  |
    /// | `HangUp`/`Joker` | still under the threshold          | unchanged       | none            |
    /// | `Unknown`        | always                             | unchanged       | none            |
    ///
    /// A held key with no recorded press start counts as past the threshold, so a
    /// key still held once the cooldown expires repeats its long action. An
    /// elapsed cooldown is dropped (see [`expire`](Self::expire)) before the
    /// event is applied.
    pub fn transition(
        self,
        code: KeyCode,
        now: Timestamp,
        config: &InterpreterConfig,
    ) -> (Self, Option<ResistanceCommand>) {
        if self.in_cooldown(now, config) {
            #[cfg(feature = "defmt")]
            defmt::debug!("Cooldown active, ignoring {}", code);
            return (self, None);
        }

        let long_press_ms = window_ms(config.long_press);
        let held_for = self.press_start().map(|since| now.since(since));
        let mut next = self.expire(now, config);

        let level = match code {
            KeyCode::None => {
                next.phase = Phase::Idle;
                match held_for {
                    Some(ms) if ms < long_press_ms => self.last_key.short_level(),
                    _ => None,
                }
            }
            KeyCode::VolUp => {
                next.phase = Phase::Idle;
                Some(ResistanceLevel::VolUp)
            }
            KeyCode::VolDown => {
                next.phase = Phase::Idle;
                Some(ResistanceLevel::VolDown)
            }
            KeyCode::HangUp | KeyCode::Joker => {
                if self.last_key == KeyCode::None {
                    next.phase = Phase::Holding { since: now };
                    None
                } else if held_for.map_or(true, |ms| ms >= long_press_ms) {
                    next.phase = Phase::Cooldown { since: now };
                    code.long_level()
                } else {
                    None
                }
            }
            KeyCode::Unknown(_raw) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Unknown key code: {}", _raw);
                None
            }
        };

        next.last_key = code;
        (next, level.map(|level| ResistanceCommand::new(level, config.settle)))
    }
}

//==================================================================================INTERPRETER
/// Long-lived interpreter: one state, one configuration.
#[derive(Debug, Clone, Default)]
pub struct KeyInterpreter {
    state: InterpreterState,
    config: InterpreterConfig,
}

impl KeyInterpreter {
    pub const fn new(config: InterpreterConfig) -> Self {
        Self {
            state: InterpreterState::new(),
            config,
        }
    }

    /// Process one key event (release events included) observed at `now`.
    pub fn process(&mut self, code: KeyCode, now: Timestamp) -> Option<ResistanceCommand> {
        let (next, command) = self.state.transition(code, now, &self.config);
        self.state = next;

        #[cfg(feature = "defmt")]
        if let Some(command) = &command {
            defmt::info!("Key {} -> pulse {}", code, command.level);
        }

        command
    }

    /// Drop an elapsed cooldown without processing an event.
    pub fn expire(&mut self, now: Timestamp) {
        self.state = self.state.expire(now, &self.config);
    }

    #[inline]
    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }
}
