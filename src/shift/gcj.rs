//! WGS-84 → GCJ-02 offset.
//!
//! The offset is an empirical polynomial plus sine series in metres, evaluated
//! around (lon - 105, lat - 35) and turned into degrees with the Krasovsky
//! radii of curvature at the input latitude. There is no closed-form inverse;
//! `gcj_to_wgs_approx` subtracts the offset evaluated at the GCJ point, which
//! is good to a few metres. Use `crate::solve` for the exact inverse.

use std::f64::consts::PI;

use crate::coord::Coordinate;
use crate::proj::ellipsoid::KRASOVSKY_1940;

/// Offset in metres (north, east) before scaling to degrees.
fn offset_metres(x: f64, y: f64) -> (f64, f64) {
    let sqrt_abs_x = x.abs().sqrt();
    let xy = x * y;

    let north = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * xy + 0.2 * sqrt_abs_x
        + (20.0 * (6.0 * PI * x).sin() + 20.0 * (2.0 * PI * x).sin()) * 2.0 / 3.0
        + (20.0 * (PI * y).sin() + 40.0 * (PI * y / 3.0).sin()) * 2.0 / 3.0
        + (160.0 * (PI * y / 12.0).sin() + 320.0 * (PI * y / 30.0).sin()) * 2.0 / 3.0;

    let east = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * xy + 0.1 * sqrt_abs_x
        + (20.0 * (6.0 * PI * x).sin() + 20.0 * (2.0 * PI * x).sin()) * 2.0 / 3.0
        + (20.0 * (PI * x).sin() + 40.0 * (PI * x / 3.0).sin()) * 2.0 / 3.0
        + (150.0 * (PI * x / 12.0).sin() + 300.0 * (PI * x / 30.0).sin()) * 2.0 / 3.0;

    (north, east)
}

/// GCJ-02 minus WGS-84, in degrees, for a WGS-84 input.
fn delta(wgs: Coordinate) -> Coordinate {
    let (north, east) = offset_metres(wgs.lon - 105.0, wgs.lat - 35.0);
    let lat_rad = wgs.lat.to_radians();

    // Arc length of one degree along the meridian and along the parallel.
    let lat_deg_len = KRASOVSKY_1940.meridional_radius(lat_rad) * PI / 180.0;
    let lon_deg_len = KRASOVSKY_1940.prime_vertical_radius(lat_rad) * lat_rad.cos() * PI / 180.0;

    Coordinate::new(north / lat_deg_len, east / lon_deg_len)
}

pub fn wgs_to_gcj(wgs: Coordinate) -> Coordinate {
    wgs + delta(wgs)
}

pub fn gcj_to_wgs_approx(gcj: Coordinate) -> Coordinate {
    gcj - delta(gcj)
}
