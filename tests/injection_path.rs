//! Test-injection path: console characters and the hardware test pin feed the
//! same interpreter as the bus.
mod helpers;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use helpers::{MockCanBus, MockTimer, RecordingPotentiometer};
use swc_ladder::protocol::dispatch::{DispatchConfig, Dispatcher, PollOutcome};
use swc_ladder::protocol::injection::{InjectionChannel, InjectionPort};
use swc_ladder::protocol::interpreter::KeyInterpreter;
use swc_ladder::protocol::keys::{KeyCode, ResistanceLevel};
use swc_ladder::protocol::transport::can_frame::CanFrame;

const REST: u32 = 100_000;

#[tokio::test]
async fn console_key_reaches_interpreter() {
    let channel = InjectionChannel::<NoopRawMutex, 4>::new();
    let port = InjectionPort::new(&channel);
    let (dut_bus, _host) = MockCanBus::create_pair();
    let potentiometer = RecordingPotentiometer::default();
    let mut dispatcher = Dispatcher::new(
        dut_bus,
        potentiometer.clone(),
        MockTimer::default(),
        String::new(),
        KeyInterpreter::default(),
        DispatchConfig::default(),
        Some(&channel),
    );

    assert!(port.console_byte(b'd'));
    assert_eq!(
        dispatcher.poll().await,
        PollOutcome::Key {
            code: KeyCode::VolDown,
            pulse: Some(ResistanceLevel::VolDown)
        }
    );
    assert_eq!(potentiometer.history(), vec![2_000, REST]);
    assert_eq!(dispatcher.stats().injected_keys, 1);
    assert!(dispatcher
        .diagnostics()
        .contains("LOOP: Injected key code 7."));
}

#[tokio::test]
/// Console long press on Joker behaves exactly like the bus one.
async fn console_long_press() {
    let channel = InjectionChannel::<NoopRawMutex, 4>::new();
    let port = InjectionPort::new(&channel);
    let (dut_bus, _host) = MockCanBus::create_pair();
    let potentiometer = RecordingPotentiometer::default();
    let timer = MockTimer::default();
    let mut dispatcher = Dispatcher::new(
        dut_bus,
        potentiometer.clone(),
        timer.clone(),
        String::new(),
        KeyInterpreter::default(),
        DispatchConfig::default(),
        Some(&channel),
    );

    for (byte, at) in [(b'j', 0u32), (b'j', 720), (b'n', 830)] {
        timer.set(at);
        assert!(port.console_byte(byte));
        dispatcher.poll().await;
    }

    assert_eq!(potentiometer.history(), vec![6_000, REST]);
    assert_eq!(dispatcher.interpreter().state().last_key(), KeyCode::Joker);
}

#[tokio::test]
/// One key per poll: the bus goes first, the injected key waits one poll.
async fn bus_key_takes_priority() {
    let channel = InjectionChannel::<NoopRawMutex, 4>::new();
    let port = InjectionPort::new(&channel);
    let (dut_bus, host) = MockCanBus::create_pair();
    let mut dispatcher = Dispatcher::new(
        dut_bus,
        RecordingPotentiometer::default(),
        MockTimer::default(),
        String::new(),
        KeyInterpreter::default(),
        DispatchConfig::default(),
        Some(&channel),
    );

    host.key(6);
    assert!(port.console_byte(b'd'));

    assert!(matches!(
        dispatcher.poll().await,
        PollOutcome::Key {
            code: KeyCode::VolUp,
            ..
        }
    ));
    assert!(matches!(
        dispatcher.poll().await,
        PollOutcome::Key {
            code: KeyCode::VolDown,
            ..
        }
    ));
}

#[tokio::test]
/// A foreign frame does not hold back an injected key.
async fn injection_after_foreign_frame() {
    let channel = InjectionChannel::<NoopRawMutex, 4>::new();
    let port = InjectionPort::new(&channel);
    let (dut_bus, host) = MockCanBus::create_pair();
    let mut dispatcher = Dispatcher::new(
        dut_bus,
        RecordingPotentiometer::default(),
        MockTimer::default(),
        String::new(),
        KeyInterpreter::default(),
        DispatchConfig::default(),
        Some(&channel),
    );

    host.frame(CanFrame::standard(0x3E0, &[1, 2]).expect("frame"));
    assert!(port.console_byte(b'u'));

    assert!(matches!(
        dispatcher.poll().await,
        PollOutcome::Key {
            code: KeyCode::VolUp,
            ..
        }
    ));
    assert_eq!(dispatcher.stats().foreign_frames, 1);
}

#[tokio::test]
/// Test pin: a VolUp key frame goes out, then the loop holds off for 500 ms.
async fn test_pin_sends_loopback_frame() {
    let channel = InjectionChannel::<NoopRawMutex, 2>::new();
    let port = InjectionPort::new(&channel);
    let (dut_bus, mut host) = MockCanBus::create_pair();
    let potentiometer = RecordingPotentiometer::default();
    let timer = MockTimer::default();
    let mut dispatcher = Dispatcher::new(
        dut_bus,
        potentiometer.clone(),
        timer.clone(),
        String::new(),
        KeyInterpreter::default(),
        DispatchConfig::default(),
        Some(&channel),
    );

    assert!(port.test_pin_pressed());
    assert_eq!(dispatcher.poll().await, PollOutcome::LoopbackSent);
    assert_eq!(timer.delays(), vec![500]);

    let sent = host.sent().expect("loopback frame on the bus");
    assert_eq!(sent.raw_id(), 0x5C1);
    assert_eq!(sent.payload(), &[6]);
    assert!(dispatcher
        .diagnostics()
        .contains("LOOP: Test CAN message sent successfully."));

    // The controller loops the frame back.
    host.frame(sent);
    assert_eq!(
        dispatcher.poll().await,
        PollOutcome::Key {
            code: KeyCode::VolUp,
            pulse: Some(ResistanceLevel::VolUp)
        }
    );
    assert_eq!(potentiometer.history(), vec![1_000, REST]);
}

#[tokio::test]
async fn loopback_send_failure_is_not_fatal() {
    let channel = InjectionChannel::<NoopRawMutex, 2>::new();
    let port = InjectionPort::new(&channel);
    let (dut_bus, mut host) = MockCanBus::create_pair();
    let timer = MockTimer::default();
    let mut dispatcher = Dispatcher::new(
        dut_bus,
        RecordingPotentiometer::default(),
        timer.clone(),
        String::new(),
        KeyInterpreter::default(),
        DispatchConfig::default(),
        Some(&channel),
    );

    host.refuse_sends(true);
    assert!(port.test_pin_pressed());
    assert_eq!(dispatcher.poll().await, PollOutcome::LoopbackFailed);
    assert_eq!(dispatcher.stats().loopback_failures, 1);
    assert_eq!(timer.delays(), vec![500]);
    assert!(host.sent().is_none());
    assert!(dispatcher
        .diagnostics()
        .contains("LOOP: Failed to send test CAN message: CAN bus send error: TxRefused"));

    // The loop keeps going.
    assert!(port.console_byte(b'u'));
    assert!(matches!(
        dispatcher.poll().await,
        PollOutcome::Key {
            code: KeyCode::VolUp,
            ..
        }
    ));
}
