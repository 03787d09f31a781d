//! Numerical inversion of one-way coordinate transforms.
//!
//! Given a forward transform `F` with no closed-form inverse and a cheap
//! approximate inverse `G`, [`Inverter::solve`] finds `p` with
//! `max(|F(p) - t|) < eps` by fixed-point correction seeded at `G(t)`, then
//! searches for the decimal rounding of `p` with the fewest digits that is
//! still at least as accurate.
//!
//! Convergence is fast wherever `F` is close to a translation, which holds
//! for the GCJ-02 and BD-09 offsets across China. Close to the poles the
//! longitude scaling of those offsets blows up and the correction can stall;
//! the best iterate is still returned, so callers that need a guarantee
//! should check [`Solution::residual`] or [`Solution::converged`].

mod fixed_point;
mod refine;

use log::debug;

use crate::coord::Coordinate;
use crate::error::{SolveError, SolveStage};

pub use refine::MAX_REFINE_DIGITS;

/// A pure coordinate-to-coordinate mapping.
///
/// Implementations must be deterministic: equal inputs give equal outputs.
pub trait Transform: Send + Sync {
    fn apply(&self, c: Coordinate) -> Coordinate;
}

impl<F> Transform for F
where
    F: Fn(Coordinate) -> Coordinate + Send + Sync,
{
    fn apply(&self, c: Coordinate) -> Coordinate {
        self(c)
    }
}

/// Stopping rule for [`Inverter::solve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Stop once the max-axis forward error drops below this (degrees).
    /// Default: `f64::EPSILON`.
    pub eps: f64,
    /// Maximum number of fixed-point corrections. Default: 20.
    pub max_iterations: usize,
    /// Run the digit-rounding search after the fixed-point phase. Default: true.
    pub refine_digits: bool,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            eps: f64::EPSILON,
            max_iterations: 20,
            refine_digits: true,
        }
    }
}

impl Tolerance {
    pub fn new(eps: f64, max_iterations: usize) -> Self {
        Self {
            eps,
            max_iterations,
            ..Self::default()
        }
    }

    pub fn with_refine_digits(mut self, refine_digits: bool) -> Self {
        self.refine_digits = refine_digits;
        self
    }

    fn validate(&self) -> Result<(), SolveError> {
        if self.eps.is_nan() || self.eps < 0.0 {
            return Err(SolveError::InvalidTolerance(format!(
                "eps must be >= 0, got {}",
                self.eps
            )));
        }
        Ok(())
    }
}

/// Outcome of a solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Solution {
    pub coord: Coordinate,
    /// Max-axis forward error of `coord` (degrees).
    pub residual: f64,
    /// Fixed-point corrections applied, at most `max_iterations`.
    pub iterations: usize,
    /// Decimal places in `coord`.
    pub digits: u32,
    /// Whether `residual` is below the requested `eps`.
    pub converged: bool,
}

/// Inverts `forward`, seeded by `approx_inverse`.
///
/// Both transforms are owned by value so an `Inverter` can be built once and
/// shared across threads.
#[derive(Clone, Debug)]
pub struct Inverter<F, G> {
    forward: F,
    approx_inverse: G,
}

impl<F: Transform, G: Transform> Inverter<F, G> {
    pub fn new(forward: F, approx_inverse: G) -> Self {
        Self {
            forward,
            approx_inverse,
        }
    }

    pub fn forward(&self) -> &F {
        &self.forward
    }

    pub fn approx_inverse(&self) -> &G {
        &self.approx_inverse
    }

    /// Find the point whose forward image is `target`.
    ///
    /// With `max_iterations == 0` the approximate inverse is returned as is.
    /// Its residual is measured when the forward image is finite and set to
    /// infinity otherwise. Running out of iterations is not an error: the
    /// best iterate is returned with `converged == false`.
    pub fn solve(&self, target: Coordinate, tolerance: &Tolerance) -> Result<Solution, SolveError> {
        tolerance.validate()?;
        if !target.is_finite() {
            return Err(SolveError::NonFiniteTarget {
                lat: target.lat,
                lon: target.lon,
            });
        }

        let seed = self.approx_inverse.apply(target);
        if !seed.is_finite() {
            return Err(SolveError::NonFiniteSeed {
                lat: seed.lat,
                lon: seed.lon,
            });
        }

        if tolerance.max_iterations == 0 {
            let residual = fixed_point::forward_error(
                &self.forward,
                seed,
                target,
                SolveStage::FixedPoint,
                0,
            )
            .map_or(f64::INFINITY, |(_, error)| error);
            return Ok(Solution {
                coord: seed,
                residual,
                iterations: 0,
                digits: seed.decimal_digits(),
                converged: residual < tolerance.eps,
            });
        }

        let fp = fixed_point::iterate(&self.forward, target, seed, tolerance)?;
        if fp.best.error >= tolerance.eps {
            debug!(
                "no convergence for ({}, {}) after {} steps, best error {:e} (eps {:e})",
                target.lat, target.lon, fp.iterations, fp.best.error, tolerance.eps
            );
        }

        let (best, digits) = if tolerance.refine_digits {
            let r = refine::refine(&self.forward, target, fp.best)?;
            (r.best, r.digits)
        } else {
            (fp.best, fp.best.coord.decimal_digits())
        };

        Ok(Solution {
            coord: best.coord,
            residual: best.error,
            iterations: fp.iterations,
            digits,
            converged: best.error < tolerance.eps,
        })
    }

    /// Like [`solve`](Self::solve) but returns only the coordinate.
    pub fn invert(
        &self,
        target: Coordinate,
        tolerance: &Tolerance,
    ) -> Result<Coordinate, SolveError> {
        self.solve(target, tolerance).map(|s| s.coord)
    }
}

/// One-shot inversion without building an [`Inverter`].
pub fn invert<F, G>(
    forward: F,
    approx_inverse: G,
    target: Coordinate,
    eps: f64,
    max_iterations: usize,
) -> Result<Coordinate, SolveError>
where
    F: Transform,
    G: Transform,
{
    Inverter::new(forward, approx_inverse).invert(target, &Tolerance::new(eps, max_iterations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shift::{
        bd_to_gcj_approx, bd_to_wgs_approx, gcj_to_bd, gcj_to_wgs_approx, wgs_to_bd, wgs_to_gcj,
    };
    use approx::assert_abs_diff_eq;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn plus_offset(p: Coordinate) -> Coordinate {
        Coordinate::new(p.lat + 0.006, p.lon + 0.006)
    }

    fn minus_offset(p: Coordinate) -> Coordinate {
        Coordinate::new(p.lat - 0.006, p.lon - 0.006)
    }

    #[test]
    fn test_affine_converges_in_one_iteration() {
        init_logger();
        let target = Coordinate::new(1.0, 2.0);
        let inv = Inverter::new(plus_offset, minus_offset);
        let s = inv.solve(target, &Tolerance::new(1e-12, 20)).unwrap();
        assert!(s.iterations <= 1);
        assert!(s.converged);
        assert_abs_diff_eq!(s.coord.lat, target.lat - 0.006, epsilon = 1e-15);
        assert_abs_diff_eq!(s.coord.lon, target.lon - 0.006, epsilon = 1e-15);
    }

    #[test]
    fn test_one_correction_fixes_imperfect_affine_seed() {
        let rough_inverse = |p: Coordinate| Coordinate::new(p.lat - 0.005, p.lon - 0.005);
        let target = Coordinate::new(1.0, 2.0);
        let s = Inverter::new(plus_offset, rough_inverse)
            .solve(target, &Tolerance::new(1e-12, 1))
            .unwrap();
        assert_eq!(s.iterations, 1);
        assert!(s.converged);
        assert!(s.residual < 1e-12, "residual {}", s.residual);
        assert_abs_diff_eq!(s.coord.lat, 0.994, epsilon = 1e-15);
        assert_abs_diff_eq!(s.coord.lon, 1.994, epsilon = 1e-15);
    }

    #[test]
    fn test_zero_iterations_returns_seed() {
        let target = Coordinate::new(39.9087, 116.3975);
        let seed = gcj_to_wgs_approx(target);
        let got = invert(wgs_to_gcj, gcj_to_wgs_approx, target, f64::EPSILON, 0).unwrap();
        assert_eq!(got, seed);

        let s = Inverter::new(wgs_to_gcj, gcj_to_wgs_approx)
            .solve(target, &Tolerance::new(f64::EPSILON, 0))
            .unwrap();
        assert_eq!(s.iterations, 0);
        assert!(s.residual > 0.0);
    }

    #[test]
    fn test_zero_iterations_ignores_degenerate_forward() {
        let target = Coordinate::new(1.0, 1.0);
        let s = Inverter::new(|_: Coordinate| Coordinate::new(f64::NAN, 0.0), minus_offset)
            .solve(target, &Tolerance::new(1e-12, 0))
            .unwrap();
        assert_eq!(s.coord, minus_offset(target));
        assert_eq!(s.residual, f64::INFINITY);
        assert!(!s.converged);
    }

    #[test]
    fn test_gcj_roundtrip_recovers_input() {
        init_logger();
        let inv = Inverter::new(wgs_to_gcj, gcj_to_wgs_approx);
        let tol = Tolerance::default();
        for wgs in [
            Coordinate::new(39.904179, 116.407387),
            Coordinate::new(31.2304, 121.4737),
            Coordinate::new(22.5431, 114.0579),
            Coordinate::new(43.8256, 87.6168),
            Coordinate::new(45.8038, 126.5350),
        ] {
            let gcj = wgs_to_gcj(wgs);
            let s = inv.solve(gcj, &tol).unwrap();
            assert!(s.residual < 1e-12, "residual {} for {wgs:?}", s.residual);
            assert!(s.coord.max_abs_diff(&wgs) < 1e-12, "{:?} vs {wgs:?}", s.coord);
            assert!(inv.forward().apply(s.coord).max_abs_diff(&gcj) <= s.residual);
        }
    }

    #[test]
    fn test_bd_roundtrips() {
        let bd_gcj = Inverter::new(gcj_to_bd, bd_to_gcj_approx);
        let bd_wgs = Inverter::new(wgs_to_bd, bd_to_wgs_approx);
        let tol = Tolerance::default();
        let p = Coordinate::new(39.9042, 116.4074);

        let s = bd_gcj.solve(gcj_to_bd(p), &tol).unwrap();
        assert!(s.coord.max_abs_diff(&p) < 1e-12);

        let s = bd_wgs.solve(wgs_to_bd(p), &tol).unwrap();
        assert!(s.coord.max_abs_diff(&p) < 1e-12);
    }

    #[test]
    fn test_solver_beats_approximate_inverse() {
        let inv = Inverter::new(wgs_to_bd, bd_to_wgs_approx);
        let wgs = Coordinate::new(30.5728, 104.0668);
        let bd = wgs_to_bd(wgs);
        let approx_err = bd_to_wgs_approx(bd).max_abs_diff(&wgs);
        let solved_err = inv.invert(bd, &Tolerance::default()).unwrap().max_abs_diff(&wgs);
        assert!(solved_err < approx_err);
    }

    #[test]
    fn test_refinement_never_adds_digits() {
        let inv = Inverter::new(wgs_to_bd, bd_to_wgs_approx);
        for target in [
            Coordinate::new(39.915, 116.404),
            Coordinate::new(31.239_666, 121.499_809),
            Coordinate::new(23.129_163_1, 113.264_435_2),
        ] {
            let raw = inv
                .solve(target, &Tolerance::default().with_refine_digits(false))
                .unwrap();
            let refined = inv.solve(target, &Tolerance::default()).unwrap();
            assert!(refined.digits <= raw.digits);
            assert!(refined.residual <= raw.residual);
            assert_eq!(refined.iterations, raw.iterations);
        }
    }

    #[test]
    fn test_deterministic() {
        let inv = Inverter::new(wgs_to_gcj, gcj_to_wgs_approx);
        let target = Coordinate::new(34.3416, 108.9398);
        let a = inv.solve(target, &Tolerance::default()).unwrap();
        let b = inv.solve(target, &Tolerance::default()).unwrap();
        assert_eq!(a.coord.lat.to_bits(), b.coord.lat.to_bits());
        assert_eq!(a.coord.lon.to_bits(), b.coord.lon.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_convergence_returns_best() {
        // Jumps by 2e-9 across lat = 10, so no point maps within 1e-9 of the
        // target and the correction cycles around the gap.
        let forward = |p: Coordinate| {
            let gap = if p.lat < 10.0 { -1e-9 } else { 1e-9 };
            Coordinate::new(p.lat + 0.5 + gap, p.lon + 0.5)
        };
        let approx = |p: Coordinate| Coordinate::new(p.lat - 0.5, p.lon - 0.5);
        let s = Inverter::new(forward, approx)
            .solve(Coordinate::new(10.5, 10.5), &Tolerance::new(1e-12, 5))
            .unwrap();
        assert!(!s.converged);
        assert_eq!(s.iterations, 5);
        assert!(s.residual.is_finite());
        assert!(s.residual >= 1e-9 * 0.99);
        assert!(s.residual < 1.5e-9);
        assert_eq!(s.coord, Coordinate::new(10.0, 10.0));
    }

    #[test]
    fn test_nan_target_rejected() {
        let err = invert(
            plus_offset,
            minus_offset,
            Coordinate::new(f64::NAN, 1.0),
            1e-12,
            10,
        )
        .unwrap_err();
        assert!(matches!(err, SolveError::NonFiniteTarget { .. }));
    }

    #[test]
    fn test_nan_seed_rejected() {
        let err = invert(
            plus_offset,
            |_: Coordinate| Coordinate::new(f64::NAN, 0.0),
            Coordinate::new(1.0, 1.0),
            1e-12,
            10,
        )
        .unwrap_err();
        assert!(matches!(err, SolveError::NonFiniteSeed { .. }));
    }

    #[test]
    fn test_nan_forward_propagates() {
        let err = invert(
            |_: Coordinate| Coordinate::new(f64::INFINITY, 0.0),
            minus_offset,
            Coordinate::new(1.0, 1.0),
            1e-12,
            10,
        )
        .unwrap_err();
        assert!(matches!(err, SolveError::NonFiniteForward { .. }));
    }

    #[test]
    fn test_invalid_tolerance() {
        let inv = Inverter::new(plus_offset, minus_offset);
        let target = Coordinate::new(1.0, 1.0);
        assert!(matches!(
            inv.solve(target, &Tolerance::new(-1.0, 10)),
            Err(SolveError::InvalidTolerance(_))
        ));
        assert!(matches!(
            inv.solve(target, &Tolerance::new(f64::NAN, 10)),
            Err(SolveError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn test_inverter_is_shareable_across_threads() {
        let inv = Inverter::new(wgs_to_gcj, gcj_to_wgs_approx);
        let target = Coordinate::new(30.2741, 120.1551);
        let expected = inv.invert(target, &Tolerance::default()).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| inv.invert(target, &Tolerance::default()).unwrap()))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }
}
