//! Stateless great-circle helpers.

use micromath::F32Ext;

/// Radius of the reference sphere, in metres.
pub const EARTH_RADIUS_M: f32 = 6_372_795.0;

/// Great-circle distance in metres between two points given as signed
/// decimal degrees.
///
/// Computed on a sphere of radius [`EARTH_RADIUS_M`]; Earth is not an
/// exact sphere, so the result can be off by up to about 0.5 %. Inputs
/// are not range-checked.
pub fn distance_between(lat1: f32, lon1: f32, lat2: f32, lon2: f32) -> f32 {
    let delta = (lon1 - lon2).to_radians();
    let sin_dlon = F32Ext::sin(delta);
    let cos_dlon = F32Ext::cos(delta);

    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let sin_lat1 = F32Ext::sin(lat1);
    let cos_lat1 = F32Ext::cos(lat1);
    let sin_lat2 = F32Ext::sin(lat2);
    let cos_lat2 = F32Ext::cos(lat2);

    let cross = cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_dlon;
    let along = cos_lat2 * sin_dlon;
    let rise = F32Ext::sqrt(cross * cross + along * along);
    let run = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_dlon;

    F32Ext::atan2(rise, run) * EARTH_RADIUS_M
}
