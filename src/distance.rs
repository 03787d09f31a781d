//! Great-circle distance used for reporting conversion error.

use crate::coord::Coordinate;

/// Mean Earth radius (metres).
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Haversine distance in metres on a sphere of radius `EARTH_RADIUS`.
pub fn haversine(a: Coordinate, b: Coordinate) -> f64 {
    let hav = |theta: f64| (1.0 - theta.cos()) / 2.0;
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let h = hav(lat2 - lat1) + lat1.cos() * lat2.cos() * hav((b.lon - a.lon).to_radians());
    2.0 * EARTH_RADIUS * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance() {
        let c = Coordinate::new(39.9042, 116.4074);
        assert_eq!(haversine(c, c), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert_relative_eq!(d, EARTH_RADIUS * std::f64::consts::PI / 180.0, max_relative = 1e-12);
    }

    #[test]
    fn test_symmetric() {
        let a = Coordinate::new(39.9042, 116.4074);
        let b = Coordinate::new(31.2304, 121.4737);
        assert_relative_eq!(haversine(a, b), haversine(b, a));
        // Beijing to Shanghai is roughly 1070 km.
        assert!((1_000_000.0..1_150_000.0).contains(&haversine(a, b)));
    }
}
