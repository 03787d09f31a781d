//! Coordinate value types shared by every module.
//!
//! Angles are decimal degrees, lengths are metres.

use std::ops::{Add, Sub};

/// A latitude/longitude pair in decimal degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Largest absolute per-axis difference, in degrees.
    ///
    /// Returns NaN if either coordinate has a NaN component; callers that
    /// compare errors must check `is_finite` first.
    pub fn max_abs_diff(&self, other: &Coordinate) -> f64 {
        let dlat = (self.lat - other.lat).abs();
        let dlon = (self.lon - other.lon).abs();
        if dlat.is_nan() || dlon.is_nan() {
            return f64::NAN;
        }
        dlat.max(dlon)
    }

    /// Round both axes to `digits` decimal places, half away from zero.
    pub fn round_to(&self, digits: u32) -> Self {
        Self {
            lat: round_decimal(self.lat, digits),
            lon: round_decimal(self.lon, digits),
        }
    }

    /// Number of decimal places needed to print this coordinate exactly
    /// (the larger of the two axes).
    pub fn decimal_digits(&self) -> u32 {
        decimal_digits(self.lat).max(decimal_digits(self.lon))
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.lat + rhs.lat, self.lon + rhs.lon)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.lat - rhs.lat, self.lon - rhs.lon)
    }
}

/// A point on (or above) a reference ellipsoid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeodeticPoint {
    pub lat: f64,
    pub lon: f64,
    /// Height above the ellipsoid (metres)
    pub height: f64,
}

impl GeodeticPoint {
    pub const fn new(lat: f64, lon: f64, height: f64) -> Self {
        Self { lat, lon, height }
    }
}

/// Earth-centred, earth-fixed Cartesian point (metres).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Web Mercator easting/northing (metres).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MercatorPoint {
    pub x: f64,
    pub y: f64,
}

impl MercatorPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Round `value` to `digits` decimal places, rounding halves away from zero.
pub fn round_decimal(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    value.signum() * (value.abs() * scale).round() / scale
}

/// Count the decimal places in the shortest representation of `value` that
/// parses back to the same `f64`. Non-finite values have no digits.
pub fn decimal_digits(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    // `Display` for f64 prints the shortest round-tripping form and never
    // switches to exponent notation.
    let repr = value.to_string();
    match repr.split_once('.') {
        Some((_, frac)) => frac.len() as u32,
        None => 0,
    }
}
