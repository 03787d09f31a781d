//! Rough mainland-China membership test.

use crate::coord::Coordinate;

const MIN_LON: f64 = 72.004;
const MAX_LON: f64 = 137.8347;
const MIN_LAT: f64 = 0.8293;
const MAX_LAT: f64 = 55.8271;

/// Whether `c` falls inside the bounding box where the GCJ-02 offset applies.
///
/// This is a rectangle, so it also accepts parts of neighbouring countries.
pub fn in_china(c: Coordinate) -> bool {
    (MIN_LON..=MAX_LON).contains(&c.lon) && (MIN_LAT..=MAX_LAT).contains(&c.lat)
}
