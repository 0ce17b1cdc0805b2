//! Reader-driven decoding.
//!
//! _Requires Cargo feature `std`._

extern crate std;

use std::io::{ErrorKind, Read};

use thiserror::Error;

use crate::decode::{Clock, Decoder};

/// Errors occurring while draining a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Drain a reader into a decoder until end of stream.
///
/// Returns the number of sentences that passed checksum validation; the
/// fix state accumulated on `decoder` is read separately once draining
/// ends. Interrupted reads are retried.
///
/// _Requires Cargo feature `std`._
pub fn decode(r: &mut impl Read, decoder: &mut Decoder<impl Clock>) -> Result<usize, Error> {
    let mut validated = 0;
    let mut buf = [0u8; 512];

    loop {
        let n = match r.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        validated += decoder.feed_all(&buf[..n]);
    }

    Ok(validated)
}
