//! Decimal-digit refinement of a solved coordinate.
//!
//! The fixed-point result usually carries 14-16 significant digits, most of
//! them noise. Rounding it to successively more decimal places and keeping
//! the shortest candidate whose forward error is no worse than the best seen
//! gives an answer that is just as accurate and far more legible.

use log::debug;

use crate::coord::Coordinate;
use crate::error::{SolveError, SolveStage};
use crate::solve::fixed_point::{forward_error, Candidate};
use crate::solve::Transform;

/// Beyond this many decimal places `10^d` stops being useful for rounding
/// coordinate-sized values.
pub const MAX_REFINE_DIGITS: u32 = 30;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Refined {
    pub best: Candidate,
    pub digits: u32,
}

/// Search `d = 1..=digits(start)` for the roundest acceptable candidate.
///
/// A candidate replaces the current best if its error is strictly smaller,
/// or equal with fewer decimal places.
pub(crate) fn refine<F: Transform + ?Sized>(
    forward: &F,
    target: Coordinate,
    start: Candidate,
) -> Result<Refined, SolveError> {
    let start_digits = start.coord.decimal_digits();
    let mut best = start;
    let mut best_digits = start_digits;

    for d in 1..=start_digits.min(MAX_REFINE_DIGITS) {
        let candidate = start.coord.round_to(d);
        let (_, error) = forward_error(
            forward,
            candidate,
            target,
            SolveStage::DigitRefinement,
            d as usize,
        )?;

        if error < best.error || (error == best.error && d < best_digits) {
            best = Candidate {
                coord: candidate,
                error,
            };
            best_digits = d;
        }
    }

    let digits = best.coord.decimal_digits();
    if digits < start_digits {
        debug!(
            "rounded ({}, {}) to ({}, {}): {start_digits} -> {digits} decimal places",
            start.coord.lat, start.coord.lon, best.coord.lat, best.coord.lon
        );
    }

    Ok(Refined { best, digits })
}
