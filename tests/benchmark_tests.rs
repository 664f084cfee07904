//! Performance benchmarks for the hot paths of the client

use client::session::SessionController;
use shared::{decode, encode_key, InboundMessage, KeyScanner, Position};
use std::time::Instant;

/// A broadcast for a crowded arena, well past a kilobyte on the wire
fn full_batch() -> Vec<u8> {
    let entries = (0..200)
        .map(|i| Position::new(format!("player{i}"), i, 42))
        .collect();
    InboundMessage::PositionBatch { entries }.encode().unwrap()
}

/// Benchmarks decoding of full-size position broadcasts
#[test]
fn benchmark_position_decoding() {
    let datagram = full_batch();
    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let _ = decode(&datagram);
    }

    let duration = start.elapsed();
    println!(
        "Position decoding: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // A 60Hz broadcast leaves ~16ms per frame; this is far below that
    assert!(duration.as_secs() < 5);
}

/// Benchmarks the full inbound path: decode and session update
#[test]
fn benchmark_session_updates() {
    let mut controller = SessionController::new();
    controller.start();
    controller.on_inbound(decode(b"INIT:player0|24|80"));

    let datagram = full_batch();
    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let actions = controller.on_inbound(decode(&datagram));
        assert_eq!(actions.len(), 1);
    }

    let duration = start.elapsed();
    println!(
        "Session updates: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_secs() < 5);
}

/// Benchmarks keyboard scanning of a long paste mixing arrows and characters
#[test]
fn benchmark_key_scanning() {
    let chunk: Vec<u8> = b"\x1b[Aw\x1b[Ba\x1b[Cs\x1b[Dd".repeat(64);
    let iterations = 1_000;
    let start = Instant::now();

    let mut scanner = KeyScanner::new();
    let mut units = 0;
    for _ in 0..iterations {
        scanner.push(&chunk);
        while let Some(unit) = scanner.next_unit() {
            let _ = encode_key(unit);
            units += 1;
        }
    }

    let duration = start.elapsed();
    println!(
        "Key scanning: {} units in {:?} ({:.2} ns/unit)",
        units,
        duration,
        duration.as_nanos() as f64 / units as f64
    );

    assert_eq!(units, iterations * 8 * 64);
    assert!(duration.as_secs() < 5);
}
