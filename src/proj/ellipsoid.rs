use crate::error::EllipsoidError;

/// Defining parameters of a reference ellipsoid, as supplied by callers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipsoidParams {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Inverse flattening 1/f
    pub invf: f64,
}

impl EllipsoidParams {
    pub const fn new(a: f64, invf: f64) -> Self {
        Self { a, invf }
    }

    /// Check the parameters describe a proper oblate ellipsoid.
    pub fn validate(&self) -> Result<(), EllipsoidError> {
        if !self.a.is_finite() || self.a <= 0.0 {
            return Err(EllipsoidError::InvalidSemiMajorAxis(self.a));
        }
        // invf <= 1 gives b <= 0 and an infinite second eccentricity.
        if !self.invf.is_finite() || self.invf <= 1.0 {
            return Err(EllipsoidError::InvalidInverseFlattening(self.invf));
        }
        Ok(())
    }
}

impl Default for EllipsoidParams {
    /// WGS-84
    fn default() -> Self {
        Self::new(6_378_137.0, 298.257_223_563)
    }
}

/// Reference ellipsoid with its derived constants.
#[derive(Clone, Copy, Debug)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Inverse flattening
    pub invf: f64,
    /// Flattening: 1 / invf
    pub f: f64,
    /// Semi-minor axis: a * (invf - 1) / invf
    pub b: f64,
    /// First eccentricity squared: (2 invf - 1) / invf^2
    pub e2: f64,
    /// Second eccentricity squared: (2 invf - 1) / (invf - 1)^2
    pub ep2: f64,
}

impl Ellipsoid {
    /// Build from already-validated parameters. Used for the named constants.
    const fn from_parts(a: f64, invf: f64) -> Self {
        let f = 1.0 / invf;
        let b = a * (invf - 1.0) / invf;
        let e2 = (2.0 * invf - 1.0) / (invf * invf);
        let ep2 = (2.0 * invf - 1.0) / ((invf - 1.0) * (invf - 1.0));
        Self {
            a,
            invf,
            f,
            b,
            e2,
            ep2,
        }
    }

    pub fn new(a: f64, invf: f64) -> Result<Self, EllipsoidError> {
        Self::from_params(EllipsoidParams::new(a, invf))
    }

    pub fn from_params(params: EllipsoidParams) -> Result<Self, EllipsoidError> {
        params.validate()?;
        Ok(Self::from_parts(params.a, params.invf))
    }

    /// Get the first eccentricity (computed at runtime).
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }

    /// Prime vertical radius of curvature at geodetic latitude `lat_rad`.
    pub fn prime_vertical_radius(&self, lat_rad: f64) -> f64 {
        let s = lat_rad.sin();
        self.a / (1.0 - self.e2 * s * s).sqrt()
    }

    /// Meridional radius of curvature at geodetic latitude `lat_rad`.
    pub fn meridional_radius(&self, lat_rad: f64) -> f64 {
        let s = lat_rad.sin();
        let w = 1.0 - self.e2 * s * s;
        self.a * (1.0 - self.e2) / (w * w.sqrt())
    }
}

impl TryFrom<EllipsoidParams> for Ellipsoid {
    type Error = EllipsoidError;

    fn try_from(params: EllipsoidParams) -> Result<Self, Self::Error> {
        Self::from_params(params)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        WGS84
    }
}

pub const WGS84: Ellipsoid = Ellipsoid::from_parts(6_378_137.0, 298.257_223_563);
pub const GRS80: Ellipsoid = Ellipsoid::from_parts(6_378_137.0, 298.257_222_101);
/// Ellipsoid underlying the GCJ-02 offset.
pub const KRASOVSKY_1940: Ellipsoid = Ellipsoid::from_parts(6_378_245.0, 298.3);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wgs84_constants() {
        assert_relative_eq!(WGS84.a, 6_378_137.0);
        assert_relative_eq!(WGS84.b, 6_356_752.314_245_179, epsilon = 0.001);
        assert_relative_eq!(WGS84.eccentricity(), 0.081_819_190_842_622, epsilon = 1e-12);
        assert_relative_eq!(WGS84.ep2, 0.006_739_496_742_276_434, epsilon = 1e-15);
    }

    #[test]
    fn test_grs80_close_to_wgs84() {
        assert_relative_eq!(WGS84.a, GRS80.a);
        assert!((WGS84.f - GRS80.f).abs() < 1e-8);
    }

    #[test]
    fn test_krasovsky_matches_gcj_constant() {
        assert_relative_eq!(KRASOVSKY_1940.e2, 0.006_693_421_622_965_943, epsilon = 1e-16);
    }

    #[test]
    fn test_default_params_are_wgs84() {
        let ell = Ellipsoid::from_params(EllipsoidParams::default()).unwrap();
        assert_eq!(ell.b, WGS84.b);
        assert_eq!(ell.e2, WGS84.e2);
    }

    #[test]
    fn test_rejects_invalid_params() {
        assert_eq!(
            Ellipsoid::new(0.0, 298.0).unwrap_err(),
            EllipsoidError::InvalidSemiMajorAxis(0.0)
        );
        assert_eq!(
            Ellipsoid::new(-1.0, 298.0).unwrap_err(),
            EllipsoidError::InvalidSemiMajorAxis(-1.0)
        );
        assert_eq!(
            Ellipsoid::new(6_378_137.0, 0.0).unwrap_err(),
            EllipsoidError::InvalidInverseFlattening(0.0)
        );
        assert_eq!(
            Ellipsoid::new(6_378_137.0, 1.0).unwrap_err(),
            EllipsoidError::InvalidInverseFlattening(1.0)
        );
        assert!(Ellipsoid::new(f64::NAN, 298.0).is_err());
        assert!(Ellipsoid::new(6_378_137.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_radii_of_curvature_at_equator_and_pole() {
        assert_relative_eq!(WGS84.prime_vertical_radius(0.0), WGS84.a);
        assert_relative_eq!(
            WGS84.meridional_radius(0.0),
            WGS84.a * (1.0 - WGS84.e2),
            max_relative = 1e-15
        );
        let pole = std::f64::consts::FRAC_PI_2;
        assert_relative_eq!(
            WGS84.prime_vertical_radius(pole),
            WGS84.a * WGS84.a / WGS84.b,
            max_relative = 1e-12
        );
    }
}
