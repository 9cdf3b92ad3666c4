//! End-to-end transmissions through real threads.

use covert_channel::reporter::Report;
use covert_channel::sink::json_stream::JsonStreamSink;
use covert_channel::{Session, SessionConfig};
use proptest::prelude::*;

#[test]
fn ascii_a_scenario() {
    let tx = Session::default().transmit(&[0b0100_0001]).unwrap();
    assert_eq!(tx.decoded, vec![0x41]);
    assert_eq!(tx.sender.bits_sent, 16);
}

#[test]
fn text_survives_the_channel() {
    let message = "The quick brown fox jumps over the lazy dog.\n".as_bytes();
    let tx = Session::default().transmit(message).unwrap();
    assert_eq!(tx.decoded, message);

    let report = Report::build(message, &tx);
    assert!(report.intact);
    assert_eq!(report.bits_sent, 8 * (message.len() + 1));
}

#[test]
fn all_nonzero_byte_values_survive() {
    let message: Vec<u8> = (1..=255).collect();
    let tx = Session::default().transmit(&message).unwrap();
    assert_eq!(tx.decoded, message);
}

#[test]
fn trace_streams_as_ndjson() {
    let session = Session::new(SessionConfig {
        record_trace: true,
        ..SessionConfig::default()
    });
    let tx = session.transmit(b"ok").unwrap();
    let report = Report::build(b"ok", &tx);

    let mut buf = Vec::new();
    let mut sink = JsonStreamSink::new(&mut buf);
    sink.write_summary(&report.to_row()).unwrap();
    sink.write_events(&tx.events).unwrap();
    let rows = sink.finish().unwrap();

    // one summary plus sender and receiver turns for 3 framed bytes
    assert_eq!(rows, 1 + 2 * 24);
    assert_eq!(String::from_utf8(buf).unwrap().lines().count(), rows);
}

#[test]
fn back_to_back_sessions_are_independent() {
    let session = Session::default();
    for message in [&b"first"[..], &b"second"[..], &b"x"[..]] {
        assert_eq!(session.transmit(message).unwrap().decoded, message);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn round_trip(message in prop::collection::vec(1u8..=255, 0..24)) {
        let tx = Session::default().transmit(&message).unwrap();
        prop_assert_eq!(tx.decoded, message.clone());
        prop_assert_eq!(tx.sender.bits_sent, 8 * (message.len() + 1));
        prop_assert_eq!(tx.handoffs, 2 * 8 * (message.len() as u64 + 1));
    }
}
