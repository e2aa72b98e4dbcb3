//! End-to-end fusion through the pump and through real child processes

mod common;

use std::thread;
use std::time::{Duration, Instant};

use thermofuse_bridge::{BridgeError, FuseBridge, PumpOutcome, StreamMode};
use thermofuse_core::Interrupt;

use common::{sh, SteppingSource};

#[test]
fn structured_stream_gets_fresh_values_per_line() {
    let source = SteppingSource::new(&[("MOTOR_TEMP", 30.0)], 0.5);
    let mut bridge = FuseBridge::new(source.clone(), Interrupt::new());
    let input = concat!(
        r#"{"TIMESTAMP":"2025-06-10T12:00:00","POWER":{"VIN":24.0}}"#, "\n",
        "\n",
        r#"{"TIMESTAMP":"2025-06-10T12:00:01","MOTOR_TEMP":99}"#, "\n",
    );

    let mut out = Vec::new();
    let outcome = bridge.pump(input.as_bytes(), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(outcome, PumpOutcome::Finished);
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec![
            r#"{"TIMESTAMP":"2025-06-10T12:00:00","POWER":{"VIN":24.0},"MOTOR_TEMP":30.0}"#,
            "",
            r#"{"TIMESTAMP":"2025-06-10T12:00:01","MOTOR_TEMP":30.5}"#,
        ]
    );
    assert_eq!(source.fetches(), 2);
    assert_eq!(bridge.interceptor().mode(), StreamMode::Structured);
}

#[test]
fn text_stream_is_regrouped_per_cycle() {
    let source = SteppingSource::new(&[("Z", 3.1)], 1.0);
    let mut bridge = FuseBridge::new(source.clone(), Interrupt::new());
    let input = "Power report\nX: 1.500 degC\nY: 12.340 degC\nX: 1.600 degC\nY: 12.350 degC\n";

    let mut out = Vec::new();
    bridge.pump(input.as_bytes(), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec![
            "Power report",
            // flushed when X repeats, with the third fetch
            "X:   1.500 degC",
            "Y:  12.340 degC",
            "Z:   5.100 degC",
            // flushed at end of stream, with the last fetch
            "X:   1.600 degC",
            "Y:  12.350 degC",
            "Z:   6.100 degC",
        ]
    );
    assert_eq!(source.fetches(), 4);
    assert_eq!(bridge.interceptor().mode(), StreamMode::Text);
}

#[test]
fn mode_switch_mid_stream_keeps_earlier_output() {
    let source = SteppingSource::new(&[("T", 20.0)], 0.0);
    let mut bridge = FuseBridge::new(source, Interrupt::new());
    let input = "{\"a\":1}\nA: 1.0 V\n{\"b\":2}\n";

    let mut out = Vec::new();
    bridge.pump(input.as_bytes(), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], r#"{"a":1,"T":20.0}"#);
    // the late JSON line is batched as text and emitted verbatim
    assert_eq!(lines[1..], ["A:   1.0 V", r#"{"b":2}"#, "T:  20.0 degC"][..]);
}

#[test]
fn child_output_is_fused_and_exit_code_passed_through() {
    let source = SteppingSource::new(&[("T", 25.0)], 0.0);
    let mut bridge = FuseBridge::new(source, Interrupt::new());
    let mut out = Vec::new();

    let code = bridge
        .run(&sh(r#"printf '%s\n' '{"a":1}' '{"a":2}'; exit 3"#), &mut out)
        .unwrap();

    assert_eq!(code, 3);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{\"a\":1,\"T\":25.0}\n{\"a\":2,\"T\":25.0}\n"
    );
}

#[test]
fn missing_program_fails_to_spawn() {
    let source = SteppingSource::new(&[], 0.0);
    let mut bridge = FuseBridge::new(source, Interrupt::new());
    let err = bridge
        .run(&["thermofuse-no-such-program".to_string()], &mut Vec::<u8>::new())
        .unwrap_err();
    assert!(matches!(err, BridgeError::Spawn { .. }));
}

#[test]
fn interrupt_stops_child_and_reports_130() {
    let source = SteppingSource::new(&[("T", 25.0)], 0.0);
    let interrupt = Interrupt::new();
    let mut bridge = FuseBridge::new(source, interrupt.clone());

    let trigger = interrupt.clone();
    let signal = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        trigger.trigger();
    });

    let started = Instant::now();
    let mut out = Vec::new();
    let code = bridge
        .run(&sh("echo 'A: 1.0 V'; exec sleep 30"), &mut out)
        .unwrap();
    signal.join().unwrap();

    assert_eq!(code, 130);
    assert!(started.elapsed() < Duration::from_secs(10));
    // the pending text batch is dropped on interrupt
    assert!(out.is_empty());
}

#[test]
fn interrupt_after_end_of_stream_still_reports_130() {
    let source = SteppingSource::new(&[("T", 25.0)], 0.0);
    let interrupt = Interrupt::new();
    let mut bridge = FuseBridge::new(source, interrupt.clone());

    let trigger = interrupt.clone();
    let signal = thread::spawn(move || {
        thread::sleep(Duration::from_millis(150));
        trigger.trigger();
    });

    // stdout closes at once; the process dies of a signal later
    let script = "echo 'A: 1.0 V'; exec >&-; sleep 0.4; kill -INT $$";
    let mut out = Vec::new();
    let code = bridge.run(&sh(script), &mut out).unwrap();
    signal.join().unwrap();

    assert!(interrupt.is_triggered());
    assert_eq!(code, 130);
}
