#![no_std]

//! An incremental decoder for NMEA 0183 guidance sentences.
//!
//! Furrow decodes GPS sentences one byte at a time, with no line buffering
//! and no heap allocation, folding each validated sentence into a running
//! fix state. It recognizes the position (`GPGGA`), velocity (`GPVTG`), and
//! cross-track error (`GPXTE`) sentences, plus a binary-framed cross-track
//! variant emitted by Trimble guidance displays (`ROXTE`).
//!
//! Feed bytes through [`Decoder::feed`] as they arrive from a serial port.
//! The decoder reports when a sentence has just passed checksum validation,
//! and the published [`Fix`] is replaced only at that moment; a corrupt or
//! truncated sentence never leaves partial state behind. Malformed input of
//! any kind degrades gracefully: there is no error condition in the decoder
//! itself, only sentences whose data is not applied.
//!
//! The [`geo`] module provides a stateless great-circle distance helper for
//! working with decoded coordinates.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable reader-driven decoding (default).
//! - `stats`: count decoded characters and checksum outcomes (default).
//! - `defmt`: implement `defmt::Format` for the published state types.

pub mod decode;
pub mod fix;
pub mod geo;
#[cfg(feature = "std")]
pub mod stream;

pub use decode::{Clock, Decoder};
pub use fix::Fix;
