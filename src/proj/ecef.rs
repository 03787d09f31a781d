//! Geodetic ↔ Earth-centred earth-fixed conversion.
//!
//! forward: x = (N + h)·cosφ·cosλ, y = (N + h)·cosφ·sinλ, z = (N·(1 - e²) + h)·sinφ
//! inverse: closed-form solution of the latitude quartic (Zhu 1993 / Vermeille),
//!   one cube root and nested square roots, no iteration.
//!
//! The inverse is accurate to well below a millimetre for points near the
//! ellipsoid surface. Inside the evolute of the meridian ellipse (within
//! roughly 43 km of the centre) the Zhu radicands go negative; there the
//! trigonometric root of Vermeille (2011) is used instead, so every finite
//! input maps to a finite geodetic point that projects back onto it.

use crate::coord::{CartesianPoint, GeodeticPoint};
use crate::error::EllipsoidError;
use crate::proj::ellipsoid::{Ellipsoid, EllipsoidParams};

impl Ellipsoid {
    /// Geodetic (degrees, degrees, metres) to ECEF (metres).
    pub fn to_ecef(&self, p: GeodeticPoint) -> CartesianPoint {
        let lat = p.lat.to_radians();
        let lon = p.lon.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        let n = self.prime_vertical_radius(lat);

        CartesianPoint::new(
            (n + p.height) * cos_lat * cos_lon,
            (n + p.height) * cos_lat * sin_lon,
            (n * (1.0 - self.e2) + p.height) * sin_lat,
        )
    }

    /// ECEF (metres) to geodetic (degrees, degrees, metres).
    ///
    /// On the polar axis (x = y = 0) longitude is undefined and reported as
    /// 0; latitude is ±90 following the sign of z (z = 0 counts as north).
    pub fn to_geodetic(&self, p: CartesianPoint) -> GeodeticPoint {
        let CartesianPoint { x, y, z } = p;
        let a = self.a;
        let b = self.b;
        let e2 = self.e2;

        let r2 = x * x + y * y;
        let r = r2.sqrt();
        if r == 0.0 {
            return if z >= 0.0 {
                GeodeticPoint::new(90.0, 0.0, z - b)
            } else {
                GeodeticPoint::new(-90.0, 0.0, -z - b)
            };
        }

        let z2 = z * z;
        let b2 = b * b;
        let f = 54.0 * b2 * z2;
        let g = r2 + (1.0 - e2) * z2 - e2 * (a * a - b2);
        if g <= 0.0 {
            return self.to_geodetic_near_centre(x, y, z);
        }
        let c = e2 * e2 * f * r2 / (g * g * g);
        let s = (1.0 + c + (c * c + 2.0 * c).sqrt()).cbrt();
        let k = s + 1.0 / s + 1.0;
        let big_p = f / (3.0 * k * k * g * g);
        let q = (1.0 + 2.0 * e2 * e2 * big_p).sqrt();
        let radicand = 0.5 * a * a * (1.0 + 1.0 / q)
            - big_p * (1.0 - e2) * z2 / (q * (1.0 + q))
            - 0.5 * big_p * r2;
        if radicand < 0.0 {
            return self.to_geodetic_near_centre(x, y, z);
        }
        let r0 = -(big_p * e2 * r) / (1.0 + q) + radicand.sqrt();
        let t = r - e2 * r0;
        let u = (t * t + z2).sqrt();
        let v = (t * t + (1.0 - e2) * z2).sqrt();
        let z0 = b2 * z / (a * v);

        let height = u * (1.0 - b2 / (a * v));
        let lat = ((z + self.ep2 * z0) / r).atan();
        let lon = y.atan2(x);

        GeodeticPoint::new(lat.to_degrees(), lon.to_degrees(), height)
    }

    /// Vermeille's inverse, valid everywhere off the polar axis including
    /// inside the evolute.
    fn to_geodetic_near_centre(&self, x: f64, y: f64, z: f64) -> GeodeticPoint {
        let a2 = self.a * self.a;
        let e2 = self.e2;
        let e4 = e2 * e2;
        let lon = y.atan2(x).to_degrees();

        let p = (x * x + y * y) / a2;
        let q = (1.0 - e2) * z * z / a2;
        let r = (p + q - e4) / 6.0;
        let border = 8.0 * r * r * r + e4 * p * q;

        if border <= 0.0 && q == 0.0 {
            // Equatorial disc inside the evolute: two symmetric normals meet
            // here. Take the northern one, matching the polar-axis rule.
            let cos2 = (p * (1.0 - e2) / (e2 * (e2 - p))).clamp(0.0, 1.0);
            let lat = cos2.sqrt().acos();
            let n = self.prime_vertical_radius(lat);
            return GeodeticPoint::new(lat.to_degrees(), lon, -n * (1.0 - e2));
        }

        let u = if border > 0.0 {
            let top = border.sqrt() + (e4 * p * q).sqrt();
            let cb = (top * top).cbrt();
            r + 0.5 * cb + 2.0 * r * r / cb
        } else {
            let angle = 2.0
                * (e4 * p * q)
                    .sqrt()
                    .atan2((-border).sqrt() + (-8.0 * r * r * r).sqrt())
                / 3.0;
            -4.0 * r * angle.sin() * (std::f64::consts::FRAC_PI_6 + angle).cos()
        };
        let v = (u * u + e4 * q).sqrt();
        let w = e2 * (u + v - q) / (2.0 * v);
        let k = (u + v) / ((w * w + u + v).sqrt() + w);
        let d = k * (x * x + y * y).sqrt() / (k + e2);
        let dz = (d * d + z * z).sqrt();

        let lat = 2.0 * z.atan2(dz + d);
        let height = (k + e2 - 1.0) * dz / k;
        GeodeticPoint::new(lat.to_degrees(), lon, height)
    }
}

/// Convert a geodetic point to ECEF on the ellipsoid described by `params`.
pub fn geodetic_to_ecef(
    point: GeodeticPoint,
    params: EllipsoidParams,
) -> Result<CartesianPoint, EllipsoidError> {
    Ok(Ellipsoid::from_params(params)?.to_ecef(point))
}

/// Convert an ECEF point to geodetic on the ellipsoid described by `params`.
pub fn ecef_to_geodetic(
    point: CartesianPoint,
    params: EllipsoidParams,
) -> Result<GeodeticPoint, EllipsoidError> {
    Ok(Ellipsoid::from_params(params)?.to_geodetic(point))
}
