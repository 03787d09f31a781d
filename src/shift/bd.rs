//! GCJ-02 → BD-09 perturbation.
//!
//! BD-09 perturbs the GCJ point in polar form around the origin, then shifts
//! it by (0.006, 0.0065). `bd_to_gcj_approx` removes the perturbation using
//! the BD-side values, which leaves an error of a few centimetres.

use std::f64::consts::PI;

use crate::coord::Coordinate;

const X_PI: f64 = PI * 3000.0 / 180.0;
const LAT_SHIFT: f64 = 0.006;
const LON_SHIFT: f64 = 0.0065;

pub fn gcj_to_bd(gcj: Coordinate) -> Coordinate {
    let (x, y) = (gcj.lon, gcj.lat);
    let r = x.hypot(y) + 0.00002 * (y * X_PI).sin();
    let theta = y.atan2(x) + 0.000003 * (x * X_PI).cos();
    Coordinate::new(r * theta.sin() + LAT_SHIFT, r * theta.cos() + LON_SHIFT)
}

pub fn bd_to_gcj_approx(bd: Coordinate) -> Coordinate {
    let x = bd.lon - LON_SHIFT;
    let y = bd.lat - LAT_SHIFT;
    let r = x.hypot(y) - 0.00002 * (y * X_PI).sin();
    let theta = y.atan2(x) - 0.000003 * (x * X_PI).cos();
    Coordinate::new(r * theta.sin(), r * theta.cos())
}
