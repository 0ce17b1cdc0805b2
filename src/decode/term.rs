//! Term classification, field dispatch, and sentence commit.

use micromath::F32Ext;

use crate::fix::Staging;

use super::{Clock, Decoder, check};

/// Sentence classification, fixed for the rest of a sentence once its
/// first term has been read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SentenceKind {
    /// `GPGGA`: positional fix (time, coordinates, altitude, quality).
    Gga,
    /// `GPVTG`: velocity and course over ground.
    Vtg,
    /// `GPXTE`: cross-track error, text framed.
    Xte,
    /// `ROXTE`: cross-track error, binary framed.
    XteBinary,
    /// Anything else: body terms are ignored and nothing is committed.
    #[default]
    Unrecognized,
}

/// Sentence header strings and the kind each selects. Supporting another
/// sentence means adding a row here and a field table below; the
/// tokenizer is untouched.
const SENTENCES: &[(&[u8], SentenceKind)] = &[
    (b"GPGGA", SentenceKind::Gga),
    (b"GPVTG", SentenceKind::Vtg),
    (b"GPXTE", SentenceKind::Xte),
    (b"ROXTE", SentenceKind::XteBinary),
];

type FieldSetter = fn(&mut Staging, &[u8]);

/// `(term index, setter)` rows for each sentence kind. Term indices not
/// listed are ignored without error.
const GGA_FIELDS: &[(u8, FieldSetter)] = &[
    (1, |s, t| s.time = parse_decimal(t)),
    (2, |s, t| s.latitude = parse_degrees(t)),
    (3, |s, t| {
        if t.first() == Some(&b'S') {
            s.latitude = -s.latitude;
        }
    }),
    (4, |s, t| s.longitude = parse_degrees(t)),
    (5, |s, t| {
        if t.first() == Some(&b'W') {
            s.longitude = -s.longitude;
        }
    }),
    (6, |s, t| s.quality = parse_integer(t)),
    (9, |s, t| s.altitude = parse_decimal(t)),
];

const VTG_FIELDS: &[(u8, FieldSetter)] = &[
    (1, |s, t| s.course = parse_decimal(t)),
    (5, |s, t| s.speed = parse_decimal(t)),
];

const XTE_FIELDS: &[(u8, FieldSetter)] = &[(3, |s, t| s.cross_track = parse_decimal(t))];

const XTE_BINARY_FIELDS: &[(u8, FieldSetter)] = &[(1, |s, t| s.cross_track = parse_decimal(t))];

impl SentenceKind {
    fn fields(self) -> &'static [(u8, FieldSetter)] {
        match self {
            SentenceKind::Gga => GGA_FIELDS,
            SentenceKind::Vtg => VTG_FIELDS,
            SentenceKind::Xte => XTE_FIELDS,
            SentenceKind::XteBinary => XTE_BINARY_FIELDS,
            SentenceKind::Unrecognized => &[],
        }
    }
}

impl<C: Clock> Decoder<C> {
    /// Handle one completed term.
    ///
    /// Returns `true` only when the term was a checksum term that
    /// validated its sentence.
    pub(super) fn process_term(&mut self) -> bool {
        if self.cursor.in_checksum {
            return self.finish_sentence();
        }

        if self.cursor.term_number == 0 {
            self.cursor.kind = classify(self.cursor.term.as_slice());
            return false;
        }

        let term = self.cursor.term.as_slice();
        if term.is_empty() {
            return false;
        }

        let index = self.cursor.term_number;
        if let Some((_, set)) = self.cursor.kind.fields().iter().find(|(i, _)| *i == index) {
            set(&mut self.staging, term);
        }
        false
    }

    /// Validate the checksum term and, on success, publish the staged
    /// fields for the sentence's family.
    fn finish_sentence(&mut self) -> bool {
        // Binary frames were already validated against their embedded
        // sum during framing; accept them here unconditionally.
        let expected = if self.cursor.kind == SentenceKind::XteBinary {
            i32::from(self.cursor.parity)
        } else {
            check::expected_parity(self.cursor.term.as_slice())
        };

        if expected != i32::from(self.cursor.parity) {
            #[cfg(feature = "stats")]
            {
                self.stats.failed = self.stats.failed.wrapping_add(1);
            }
            self.staging = Staging::default();
            return false;
        }

        #[cfg(feature = "stats")]
        {
            self.stats.passed = self.stats.passed.wrapping_add(1);
        }

        match self.cursor.kind {
            SentenceKind::Gga => {
                let now = self.clock.now_ms();
                self.fix.commit_position(&self.staging, now);
            }
            SentenceKind::Vtg => {
                let now = self.clock.now_ms();
                self.fix.commit_velocity(&self.staging, now);
            }
            SentenceKind::Xte | SentenceKind::XteBinary => {
                let now = self.clock.now_ms();
                self.fix.commit_cross_track(&self.staging, now);
            }
            // A valid checksum on an unrecognized sentence publishes
            // nothing; the sentence still counts as validated.
            SentenceKind::Unrecognized => {}
        }
        true
    }
}

fn classify(term: &[u8]) -> SentenceKind {
    SENTENCES
        .iter()
        .find(|(header, _)| *header == term)
        .map(|&(_, kind)| kind)
        .unwrap_or(SentenceKind::Unrecognized)
}

/// Permissive decimal parse: malformed or empty text yields zero.
fn parse_decimal(term: &[u8]) -> f32 {
    core::str::from_utf8(term)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

/// Parse a `DDMM.mmmm` coordinate into signed-ready decimal degrees.
fn parse_degrees(term: &[u8]) -> f32 {
    let raw = parse_decimal(term);
    let degrees = F32Ext::floor(raw / 100.0);
    degrees + (raw - degrees * 100.0) / 60.0
}

/// Permissive integer parse: malformed or empty text yields zero.
fn parse_integer(term: &[u8]) -> i32 {
    core::str::from_utf8(term)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}
