//! Replay of a recorded sentence log against expected committed state.

use csv::ReaderBuilder;
use furrow::{Clock, Decoder, Fix};

const LOG: &str = "tests/fixtures/field-pass.nmea";
const EXPECTED: &str = "tests/fixtures/field-pass.csv";

fn decoder() -> Decoder<impl Clock> {
    Decoder::new(|| 0u32)
}

#[test]
fn replayed_log_matches_expected_state() {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(EXPECTED)
        .unwrap();
    let expected: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();

    let mut decoder = decoder();
    let mut rows = expected.iter();

    for byte in std::fs::read(LOG).unwrap() {
        if !decoder.feed(byte) {
            continue;
        }
        let row = rows.next().expect("more validated sentences than expected");
        assert_eq!(row[0], family(&mut decoder));
        assert_state(decoder.fix(), row);
    }

    assert!(rows.next().is_none(), "expected more validated sentences");
}

#[test]
fn reader_decode_counts_validated_sentences() {
    let mut file = std::fs::File::open(LOG).unwrap();
    let mut decoder = decoder();
    let validated = furrow::stream::decode(&mut file, &mut decoder).unwrap();

    // One sentence in the log is corrupted; every other one validates,
    // including the unrecognized RMC.
    assert_eq!(validated, 5);
    assert_eq!(decoder.stats().failed, 1);
}

/// Which family the most recent commit updated, by its one-shot flag.
fn family(decoder: &mut Decoder<impl Clock>) -> &'static str {
    let fix = decoder.fix_mut();
    if fix.take_position_update() {
        "position"
    } else if fix.take_velocity_update() {
        "velocity"
    } else if fix.take_cross_track_update() {
        "cross-track"
    } else {
        "none"
    }
}

fn assert_state(fix: &Fix, row: &[String]) {
    assert_field(fix.latitude(), &row[1]);
    assert_field(fix.longitude(), &row[2]);
    assert_field(fix.altitude_m(), &row[3]);
    assert_field(fix.quality().map(|q| q as f32), &row[4]);
    assert_field(fix.speed_knots(), &row[5]);
    assert_field(fix.course_deg(), &row[6]);
    assert_field(fix.cross_track(), &row[7]);
}

fn assert_field(value: Option<f32>, cell: &str) {
    match value {
        None => assert!(cell.is_empty(), "expected {cell}, field unset"),
        Some(value) => {
            let expected: f32 = cell.parse().expect("malformed expectation");
            assert!(
                (value - expected).abs() < 2e-3,
                "{value} not close to {expected}"
            );
        }
    }
}
