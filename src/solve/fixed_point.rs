//! Fixed-point correction `p ← p - (F(p) - t)` with best-iterate tracking.
//!
//! The offset transforms have a near-identity Jacobian, so the correction
//! converges in a handful of steps, but near the limit of f64 resolution the
//! sequence can cycle between neighbouring values. The iterate with the
//! smallest forward error is returned, not the last one.

use log::trace;

use crate::coord::Coordinate;
use crate::error::{SolveError, SolveStage};
use crate::solve::{Tolerance, Transform};

/// A candidate together with its max-axis forward error.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Candidate {
    pub coord: Coordinate,
    pub error: f64,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct FixedPointResult {
    pub best: Candidate,
    /// Corrections applied. The seed measurement is not counted.
    pub iterations: usize,
}

/// Max-axis error of `coord` under `forward` against `target`.
///
/// A non-finite image is an error rather than a NaN that silently loses
/// every comparison.
pub(crate) fn forward_error<F: Transform + ?Sized>(
    forward: &F,
    coord: Coordinate,
    target: Coordinate,
    stage: SolveStage,
    step: usize,
) -> Result<(Coordinate, f64), SolveError> {
    let image = forward.apply(coord);
    if !image.is_finite() {
        return Err(SolveError::NonFiniteForward {
            stage,
            step,
            lat: image.lat,
            lon: image.lon,
        });
    }
    let diff = image - target;
    Ok((diff, diff.lat.abs().max(diff.lon.abs())))
}

/// Apply at most `tolerance.max_iterations` corrections to `seed`.
///
/// The seed is measured as step 0 and every corrected point is measured
/// after its update, so each candidate carries its own error.
pub(crate) fn iterate<F: Transform + ?Sized>(
    forward: &F,
    target: Coordinate,
    seed: Coordinate,
    tolerance: &Tolerance,
) -> Result<FixedPointResult, SolveError> {
    let mut curr = seed;
    let (mut diff, error) = forward_error(forward, curr, target, SolveStage::FixedPoint, 0)?;
    let mut best = Candidate { coord: curr, error };
    let mut step = 0;

    trace!("step 0: ({}, {}) error {error:e}", curr.lat, curr.lon);

    while best.error >= tolerance.eps && step < tolerance.max_iterations {
        curr = curr - diff;
        step += 1;

        let (next_diff, error) =
            forward_error(forward, curr, target, SolveStage::FixedPoint, step)?;
        trace!("step {step}: ({}, {}) error {error:e}", curr.lat, curr.lon);

        if error < best.error {
            best = Candidate { coord: curr, error };
        }
        if error < tolerance.eps {
            break;
        }
        diff = next_diff;
    }

    Ok(FixedPointResult {
        best,
        iterations: step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_exact_seed_needs_no_correction() {
        let forward = |p: Coordinate| Coordinate::new(p.lat + 1.0, p.lon + 1.0);
        let target = Coordinate::new(11.0, 21.0);
        let tol = Tolerance::new(1e-12, 20);
        let r = iterate(&forward, target, Coordinate::new(10.0, 20.0), &tol).unwrap();
        assert_eq!(r.iterations, 0);
        assert_eq!(r.best.coord, Coordinate::new(10.0, 20.0));
        assert_eq!(r.best.error, 0.0);
    }

    #[test]
    fn test_keeps_best_iterate_when_diverging() {
        // Jacobian 2.5 makes the correction overshoot: e ← -1.5·e.
        let seen = Mutex::new(Vec::new());
        let forward = |p: Coordinate| {
            let image = Coordinate::new(2.5 * p.lat, 2.5 * p.lon);
            seen.lock().unwrap().push(image.max_abs_diff(&Coordinate::new(2.5, 2.5)));
            image
        };
        let target = Coordinate::new(2.5, 2.5);
        let seed = Coordinate::new(1.01, 0.99);
        let tol = Tolerance::new(1e-12, 8);

        let r = iterate(&forward, target, seed, &tol).unwrap();
        assert_eq!(r.iterations, 8);
        assert_eq!(r.best.coord, seed);
        for &e in seen.lock().unwrap().iter() {
            assert!(r.best.error <= e);
        }
    }

    #[test]
    fn test_best_error_never_worse_than_any_iterate() {
        // Slowly converging contraction with an oscillating sign.
        let seen = Mutex::new(Vec::new());
        let target = Coordinate::new(30.0, 110.0);
        let forward = |p: Coordinate| {
            let image = Coordinate::new(
                p.lat + 0.4 * (p.lat - 29.0) + 0.006,
                p.lon + 0.4 * (p.lon - 109.0) + 0.0065,
            );
            seen.lock().unwrap().push(image.max_abs_diff(&target));
            image
        };
        let tol = Tolerance::new(1e-15, 6);
        let r = iterate(&forward, target, Coordinate::new(29.5, 109.5), &tol).unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(r.iterations, 6);
        // Seed plus one evaluation per correction.
        assert_eq!(seen.len(), r.iterations + 1);
        assert!(seen.iter().all(|&e| r.best.error <= e));
    }

    #[test]
    fn test_non_finite_forward_is_an_error() {
        let forward = |p: Coordinate| {
            if p.lat > 10.0 {
                Coordinate::new(f64::NAN, p.lon)
            } else {
                Coordinate::new(p.lat - 1.0, p.lon)
            }
        };
        let tol = Tolerance::new(1e-12, 20);
        let err = iterate(
            &forward,
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.5, 0.0),
            &tol,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SolveError::NonFiniteForward {
                stage: SolveStage::FixedPoint,
                step: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_budget_counts_corrections() {
        // Affine map with an imperfect seed: one correction lands exactly.
        let forward = |p: Coordinate| Coordinate::new(p.lat + 0.006, p.lon + 0.006);
        let target = Coordinate::new(1.0, 2.0);
        let seed = Coordinate::new(0.995, 1.995);
        let r = iterate(&forward, target, seed, &Tolerance::new(1e-12, 1)).unwrap();
        assert_eq!(r.iterations, 1);
        assert!(r.best.error < 1e-12, "error {}", r.best.error);
        assert!(r.best.coord.max_abs_diff(&Coordinate::new(0.994, 1.994)) < 1e-15);
    }

    #[test]
    fn test_non_finite_after_correction_reports_step() {
        let forward = |p: Coordinate| {
            if p.lat < 10.0 {
                Coordinate::new(f64::NAN, p.lon)
            } else {
                Coordinate::new(p.lat + 1.0, p.lon)
            }
        };
        let err = iterate(
            &forward,
            Coordinate::new(10.5, 0.0),
            Coordinate::new(10.0, 0.0),
            &Tolerance::new(1e-12, 20),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SolveError::NonFiniteForward {
                stage: SolveStage::FixedPoint,
                step: 1,
                ..
            }
        ));
    }
}
