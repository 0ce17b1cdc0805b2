//! Published fix state and the staging record behind it.
//!
//! Fields parsed from an in-flight sentence land in a staging record that
//! is never visible through the public API. When the sentence's checksum
//! validates, the staged fields for that sentence's family are copied into
//! the published [`Fix`] in one step, together with a last-fix timestamp
//! and a one-shot new-data flag for the family. Unset fields read as
//! `None` until the first sentence carrying them commits.

use core::mem;

/// Metres per second in one knot.
pub const MPS_PER_KNOT: f32 = 0.514_444_44;
/// Kilometres per hour in one knot.
pub const KMH_PER_KNOT: f32 = 1.852;
/// Statute miles per hour in one knot.
pub const MPH_PER_KNOT: f32 = 1.150_779_45;

/// Fields staged for the sentence currently being parsed.
///
/// Mutated term-by-term as the sentence streams in; discarded wholesale if
/// the checksum does not match.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Staging {
    pub(crate) time: f32,
    pub(crate) latitude: f32,
    pub(crate) longitude: f32,
    pub(crate) altitude: f32,
    pub(crate) speed: f32,
    pub(crate) course: f32,
    pub(crate) cross_track: f32,
    pub(crate) quality: i32,
}

/// The published fix state.
///
/// Only ever mutated as a whole-family replacement at the moment a
/// sentence validates, so a reader never observes a half-updated family.
/// `Fix` is `Copy`; hosts with real threads can snapshot it under their
/// own guard.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fix {
    time: Option<f32>,
    date: Option<u32>,
    latitude: Option<f32>,
    longitude: Option<f32>,
    altitude: Option<f32>,
    quality: Option<i32>,
    speed: Option<f32>,
    course: Option<f32>,
    cross_track: Option<f32>,

    last_position_ms: Option<u32>,
    last_velocity_ms: Option<u32>,
    last_cross_track_ms: Option<u32>,

    new_position: bool,
    new_velocity: bool,
    new_cross_track: bool,
}

impl Fix {
    /// UTC time of the last positional fix, as `hhmmss.cc`.
    pub fn time(&self) -> Option<f32> {
        self.time
    }

    /// Date of the last dated fix, as `ddmmyy`. None of the four
    /// recognized sentence kinds carries a date, so this stays unset
    /// until a dated kind is added to the sentence table.
    pub fn date(&self) -> Option<u32> {
        self.date
    }

    /// Latitude in signed decimal degrees, south negative.
    pub fn latitude(&self) -> Option<f32> {
        self.latitude
    }

    /// Longitude in signed decimal degrees, west negative.
    pub fn longitude(&self) -> Option<f32> {
        self.longitude
    }

    /// Latitude and longitude in signed decimal degrees.
    pub fn position(&self) -> Option<(f32, f32)> {
        self.latitude.zip(self.longitude)
    }

    /// Antenna altitude above mean sea level, in metres.
    pub fn altitude_m(&self) -> Option<f32> {
        self.altitude
    }

    /// Fix quality indicator from the positional sentence.
    pub fn quality(&self) -> Option<i32> {
        self.quality
    }

    /// Speed over ground, in knots.
    pub fn speed_knots(&self) -> Option<f32> {
        self.speed
    }

    /// Speed over ground, in metres per second.
    pub fn speed_mps(&self) -> Option<f32> {
        self.speed.map(|s| s * MPS_PER_KNOT)
    }

    /// Speed over ground, in kilometres per hour.
    pub fn speed_kmh(&self) -> Option<f32> {
        self.speed.map(|s| s * KMH_PER_KNOT)
    }

    /// Speed over ground, in statute miles per hour.
    pub fn speed_mph(&self) -> Option<f32> {
        self.speed.map(|s| s * MPH_PER_KNOT)
    }

    /// Course over ground, in degrees true.
    pub fn course_deg(&self) -> Option<f32> {
        self.course
    }

    /// Cross-track error, in the units the sender reports (nautical
    /// miles for the text sentence).
    pub fn cross_track(&self) -> Option<f32> {
        self.cross_track
    }

    /// Clock reading at the last committed positional fix. Compare with
    /// the current clock reading for fix age.
    pub fn last_position_fix_ms(&self) -> Option<u32> {
        self.last_position_ms
    }

    /// Clock reading at the last committed velocity fix.
    pub fn last_velocity_fix_ms(&self) -> Option<u32> {
        self.last_velocity_ms
    }

    /// Clock reading at the last committed cross-track fix.
    pub fn last_cross_track_fix_ms(&self) -> Option<u32> {
        self.last_cross_track_ms
    }

    /// Whether a positional fix committed since the last call.
    ///
    /// Consume-once: reading the flag clears it.
    pub fn take_position_update(&mut self) -> bool {
        mem::take(&mut self.new_position)
    }

    /// Whether a velocity fix committed since the last call.
    ///
    /// Consume-once: reading the flag clears it.
    pub fn take_velocity_update(&mut self) -> bool {
        mem::take(&mut self.new_velocity)
    }

    /// Whether a cross-track fix committed since the last call.
    ///
    /// Consume-once: reading the flag clears it.
    pub fn take_cross_track_update(&mut self) -> bool {
        mem::take(&mut self.new_cross_track)
    }

    pub(crate) fn commit_position(&mut self, staged: &Staging, now_ms: u32) {
        self.time = Some(staged.time);
        self.latitude = Some(staged.latitude);
        self.longitude = Some(staged.longitude);
        self.altitude = Some(staged.altitude);
        self.quality = Some(staged.quality);
        self.last_position_ms = Some(now_ms);
        self.new_position = true;
    }

    pub(crate) fn commit_velocity(&mut self, staged: &Staging, now_ms: u32) {
        self.course = Some(staged.course);
        self.speed = Some(staged.speed);
        self.last_velocity_ms = Some(now_ms);
        self.new_velocity = true;
    }

    pub(crate) fn commit_cross_track(&mut self, staged: &Staging, now_ms: u32) {
        self.cross_track = Some(staged.cross_track);
        self.last_cross_track_ms = Some(now_ms);
        self.new_cross_track = true;
    }
}
