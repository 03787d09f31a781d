//! Web Mercator (EPSG:3857) on a sphere of the WGS-84 semi-major axis.
//!
//!   forward: x = a·λ, y = a·ln(tan(π/4 + φ/2))
//!   inverse: λ = x/a, φ = 2·atan(exp(y/a)) - π/2

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::coord::{Coordinate, MercatorPoint};
use crate::proj::ellipsoid::WGS84;

/// Maximum latitude for Web Mercator (≈85.0511°), where the projection
/// is bounded to a square.
pub const MAX_LAT_3857: f64 = 85.051_128_779_806_59; // atan(sinh(π)) in degrees

#[derive(Clone, Copy, Debug)]
pub struct WebMercator {
    radius: f64,
}

impl WebMercator {
    pub fn new() -> Self {
        Self { radius: WGS84.a }
    }

    /// Degrees to metres. Latitude is clamped to ±`MAX_LAT_3857`.
    pub fn forward(&self, c: Coordinate) -> MercatorPoint {
        // Unclamped, the poles would map to y = ±inf. Clamping pins them to
        // the edge of the square tile grid instead.
        let lat = c.lat.clamp(-MAX_LAT_3857, MAX_LAT_3857).to_radians();
        let x = self.radius * c.lon.to_radians();
        let y = self.radius * (FRAC_PI_4 + lat / 2.0).tan().ln();
        MercatorPoint::new(x, y)
    }

    /// Metres to degrees.
    pub fn inverse(&self, p: MercatorPoint) -> Coordinate {
        let lon = p.x / self.radius;
        let lat = 2.0 * (p.y / self.radius).exp().atan() - FRAC_PI_2;
        Coordinate::new(lat.to_degrees(), lon.to_degrees())
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn latlon_to_web_mercator(c: Coordinate) -> MercatorPoint {
    WebMercator::new().forward(c)
}

pub fn web_mercator_to_latlon(p: MercatorPoint) -> Coordinate {
    WebMercator::new().inverse(p)
}
