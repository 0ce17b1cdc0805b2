//! The sentence decoder and its per-sentence parse cursor.
//!
//! [`Decoder`] is a single-threaded state machine fed one byte at a time
//! through [`Decoder::feed`]. Each call is non-blocking, allocation-free,
//! and O(1): bytes accumulate into a bounded term buffer, completed terms
//! are dispatched to the term processor, and a sentence's staged fields are
//! published to the [`Fix`] only when its checksum term validates.
//!
//! Two framings share the tokenizer. Text sentences start at `$` or `@`,
//! split terms on `,` `:` `*` CR LF, and close with a two-hex-digit XOR
//! parity term armed by `*`. Binary frames start after a vendor marker
//! byte, carry an embedded big-endian sum in a three-byte trailer, and
//! close on a terminator byte escaped by the preceding buffered byte.
//!
//! A start marker always wins over an in-progress sentence, so a stream
//! that drops bytes self-recovers at the next sentence.

mod check;
mod term;

use tinyvec::ArrayVec;

use crate::fix::{Fix, Staging};

pub(crate) use term::SentenceKind;

/// Capacity of the term accumulator, sized for the longest field of the
/// recognized sentences. Longer terms are silently truncated to fit.
pub const TERM_CAPACITY: usize = 20;

/// Vendor marker opening a binary frame; also zeroes the running byte sum
/// that the frame's embedded checksum is validated against.
const FRAME_START: u8 = 0xBF;
/// Escape byte expected immediately before the binary frame terminator.
const FRAME_ESCAPE: u8 = 0x10;
/// Terminator of a binary frame.
const FRAME_END: u8 = 0x03;

/// A source of monotonic millisecond timestamps.
///
/// The decoder queries the clock exactly once per committed sentence, to
/// stamp that family's last-fix time. Any `FnMut() -> u32` closure works.
pub trait Clock {
    fn now_ms(&mut self) -> u32;
}

impl<F: FnMut() -> u32> Clock for F {
    fn now_ms(&mut self) -> u32 {
        self()
    }
}

/// Running decode counters.
///
/// A pure observability add-on with no effect on decoding.
///
/// _Requires Cargo feature `stats`._
#[cfg(feature = "stats")]
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    /// Total bytes fed to the decoder.
    pub characters: u64,
    /// Sentences that passed checksum validation.
    pub passed: u32,
    /// Sentences whose checksum did not match.
    pub failed: u32,
}

/// Parsing state for the sentence currently in flight.
///
/// Lives from one start marker to the next; never outlives a sentence.
#[derive(Default)]
struct Cursor {
    /// Bounded accumulator for the current term's bytes.
    term: ArrayVec<[u8; TERM_CAPACITY]>,
    /// Ordinal of the current term within the sentence.
    term_number: u8,
    /// Running XOR of term and comma bytes since the start marker.
    parity: u8,
    /// Running byte sum since the frame marker, for binary frames only.
    sum: i32,
    /// Whether the current term is the checksum term.
    in_checksum: bool,
    /// Classification fixed once term 0 completes.
    kind: SentenceKind,
}

impl Cursor {
    fn start_sentence(&mut self) {
        self.term.clear();
        self.term_number = 0;
        self.parity = 0;
        self.in_checksum = false;
        self.kind = SentenceKind::Unrecognized;
    }
}

/// An incremental NMEA 0183 sentence decoder.
///
/// Owns the published [`Fix`] and the staging record behind it. Not
/// re-entrant: [`Decoder::feed`] must not be called concurrently with
/// itself. Readers on another context should snapshot the fix (`Fix` is
/// `Copy`) under whatever guard the host provides.
pub struct Decoder<C> {
    clock: C,
    cursor: Cursor,
    staging: Staging,
    fix: Fix,
    #[cfg(feature = "stats")]
    stats: Stats,
}

impl<C: Clock> Decoder<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            cursor: Cursor::default(),
            staging: Staging::default(),
            fix: Fix::default(),
            #[cfg(feature = "stats")]
            stats: Stats::default(),
        }
    }

    /// Feed one byte from the stream.
    ///
    /// Returns `true` exactly when this byte completed a sentence that
    /// passed checksum validation, at which point the published fix has
    /// been updated for that sentence's family. Never blocks, never
    /// panics, never allocates.
    pub fn feed(&mut self, byte: u8) -> bool {
        #[cfg(feature = "stats")]
        {
            self.stats.characters = self.stats.characters.wrapping_add(1);
        }

        match byte {
            FRAME_START => {
                self.cursor.start_sentence();
                self.cursor.sum = 0;
                false
            }
            b'$' | b'@' => {
                self.cursor.start_sentence();
                self.cursor.sum = self.cursor.sum.wrapping_add(i32::from(byte));
                false
            }
            // Filler bytes unused by the text framing; they still count
            // toward the binary frame sum.
            0x00 | 0x14 | b' ' => {
                self.cursor.sum = self.cursor.sum.wrapping_add(i32::from(byte));
                false
            }
            b',' | b':' | b'*' | b'\r' | b'\n' => {
                // The comma itself is covered by the textual parity.
                if byte == b',' {
                    self.cursor.parity ^= byte;
                }
                self.cursor.sum = self.cursor.sum.wrapping_add(i32::from(byte));

                let committed = self.process_term();

                self.cursor.term_number = self.cursor.term_number.wrapping_add(1);
                self.cursor.term.clear();
                self.cursor.in_checksum = byte == b'*';
                committed
            }
            FRAME_END => self.end_binary_frame(),
            _ => {
                self.accumulate(byte);
                false
            }
        }
    }

    /// Feed a run of bytes, returning how many sentences validated.
    pub fn feed_all(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().filter(|&&byte| self.feed(byte)).count()
    }

    /// The published fix state.
    pub fn fix(&self) -> &Fix {
        &self.fix
    }

    /// Mutable access to the published fix, for the one-shot
    /// [`Fix::take_position_update`] family of consumers.
    pub fn fix_mut(&mut self) -> &mut Fix {
        &mut self.fix
    }

    /// Snapshot of the running counters.
    ///
    /// _Requires Cargo feature `stats`._
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Append an ordinary byte to the current term.
    fn accumulate(&mut self, byte: u8) {
        // A full buffer truncates silently rather than aborting the
        // sentence; parity still covers the byte so truncation does not
        // disturb checksum validation.
        let _ = self.cursor.term.try_push(byte);
        if !self.cursor.in_checksum {
            self.cursor.parity ^= byte;
        }
        self.cursor.sum = self.cursor.sum.wrapping_add(i32::from(byte));
    }

    /// Handle a binary frame terminator byte.
    ///
    /// Only meaningful directly after the escape byte, outside the
    /// checksum term, with the full three-byte trailer buffered; in every
    /// other position the terminator value is ordinary payload.
    fn end_binary_frame(&mut self) -> bool {
        let len = self.cursor.term.len();
        if len < 3 || self.cursor.term[len - 1] != FRAME_ESCAPE || self.cursor.in_checksum {
            self.accumulate(FRAME_END);
            return false;
        }

        // Trailer layout: big-endian embedded sum, then the escape byte.
        // The trailer was folded into the running sum as it streamed in,
        // so back it out before comparing.
        let hi = i32::from(self.cursor.term[len - 3]);
        let lo = i32::from(self.cursor.term[len - 2]);
        for i in len - 3..len {
            let byte = self.cursor.term[i];
            self.cursor.sum = self.cursor.sum.wrapping_sub(i32::from(byte));
        }

        let mut committed = false;
        if self.cursor.sum == (hi << 8) | lo {
            self.cursor.term.truncate(len - 3);
            self.process_term();

            // Binary frames carry no textual checksum term; dispatch an
            // empty one so the commit path runs uniformly.
            self.cursor.in_checksum = true;
            self.cursor.term.clear();
            committed = self.process_term();
        }

        self.cursor.term_number = self.cursor.term_number.wrapping_add(1);
        self.cursor.term.clear();
        committed
    }
}
