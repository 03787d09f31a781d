//! Frame-to-frame conversion built on the shift functions and the solver.

use rayon::prelude::*;

use crate::coord::Coordinate;
use crate::distance::haversine;
use crate::error::GeoError;
use crate::region::in_china;
use crate::shift::{
    bd_to_gcj_approx, bd_to_wgs_approx, gcj_to_bd, gcj_to_wgs_approx, wgs_to_bd, wgs_to_gcj, Frame,
};
use crate::solve::{Inverter, Solution, Tolerance, Transform};

pub type ShiftFn = fn(Coordinate) -> Coordinate;

/// How reverse directions (GCJ→WGS, BD→GCJ, BD→WGS) are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Closed-form approximate inverse, off by up to a few metres.
    Approximate,
    /// Numerical inversion of the forward transform.
    #[default]
    Precise,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertOptions {
    /// Leave coordinates outside China untouched. Default: true.
    pub check_china: bool,
    /// Default: `Method::Precise`.
    pub method: Method,
    /// Used by `Method::Precise` only.
    pub tolerance: Tolerance,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            check_china: true,
            method: Method::default(),
            tolerance: Tolerance::default(),
        }
    }
}

/// Why a conversion returned its input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    OutsideChina,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converted {
    pub coord: Coordinate,
    pub diagnostic: Option<Diagnostic>,
    /// Solver details when the conversion went through `Method::Precise`.
    pub solution: Option<Solution>,
}

impl Converted {
    fn plain(coord: Coordinate) -> Self {
        Self {
            coord,
            diagnostic: None,
            solution: None,
        }
    }
}

/// Holds one solver per reverse direction. Build once, share freely.
#[derive(Clone)]
pub struct Converter {
    gcj_wgs: Inverter<ShiftFn, ShiftFn>,
    bd_gcj: Inverter<ShiftFn, ShiftFn>,
    bd_wgs: Inverter<ShiftFn, ShiftFn>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self {
            gcj_wgs: Inverter::new(wgs_to_gcj as ShiftFn, gcj_to_wgs_approx as ShiftFn),
            bd_gcj: Inverter::new(gcj_to_bd as ShiftFn, bd_to_gcj_approx as ShiftFn),
            bd_wgs: Inverter::new(wgs_to_bd as ShiftFn, bd_to_wgs_approx as ShiftFn),
        }
    }

    /// Solver for a reverse direction, `None` for forward or identity pairs.
    pub fn inverter(&self, from: Frame, to: Frame) -> Option<&Inverter<ShiftFn, ShiftFn>> {
        match (from, to) {
            (Frame::Gcj02, Frame::Wgs84) => Some(&self.gcj_wgs),
            (Frame::Bd09, Frame::Gcj02) => Some(&self.bd_gcj),
            (Frame::Bd09, Frame::Wgs84) => Some(&self.bd_wgs),
            _ => None,
        }
    }

    /// Convert `c` from `from` to `to`.
    pub fn convert(
        &self,
        c: Coordinate,
        from: Frame,
        to: Frame,
        options: &ConvertOptions,
    ) -> Result<Converted, GeoError> {
        if from == to {
            return Ok(Converted::plain(c));
        }
        if options.check_china && !in_china(c) {
            return Ok(Converted {
                coord: c,
                diagnostic: Some(Diagnostic::OutsideChina),
                solution: None,
            });
        }

        let forward: Option<ShiftFn> = match (from, to) {
            (Frame::Wgs84, Frame::Gcj02) => Some(wgs_to_gcj as ShiftFn),
            (Frame::Gcj02, Frame::Bd09) => Some(gcj_to_bd as ShiftFn),
            (Frame::Wgs84, Frame::Bd09) => Some(wgs_to_bd as ShiftFn),
            _ => None,
        };
        if let Some(f) = forward {
            return Ok(Converted::plain(f(c)));
        }

        let inverter = match self.inverter(from, to) {
            Some(inv) => inv,
            None => return Ok(Converted::plain(c)),
        };
        match options.method {
            Method::Approximate => Ok(Converted::plain(inverter.approx_inverse().apply(c))),
            Method::Precise => {
                let solution = inverter.solve(c, &options.tolerance)?;
                Ok(Converted {
                    coord: solution.coord,
                    diagnostic: None,
                    solution: Some(solution),
                })
            }
        }
    }

    /// Convert every coordinate, stopping at the first failure.
    pub fn convert_batch(
        &self,
        coords: &[Coordinate],
        from: Frame,
        to: Frame,
        options: &ConvertOptions,
    ) -> Result<Vec<Converted>, GeoError> {
        coords
            .iter()
            .map(|&c| self.convert(c, from, to, options))
            .collect()
    }

    /// Parallel [`convert_batch`](Self::convert_batch) on the current rayon
    /// pool. Output order matches input order.
    pub fn convert_batch_par(
        &self,
        coords: &[Coordinate],
        from: Frame,
        to: Frame,
        options: &ConvertOptions,
    ) -> Result<Vec<Converted>, GeoError> {
        coords
            .par_iter()
            .map(|&c| self.convert(c, from, to, options))
            .collect()
    }

    /// Convert and round-trip `c` through every directed frame pair and
    /// measure how far each result lands from where it started.
    pub fn accuracy_report(
        &self,
        c: Coordinate,
        options: &ReportOptions,
    ) -> Result<AccuracyReport, GeoError> {
        let input = round_opt(c, options.input_digits);
        let convert_options = ConvertOptions {
            check_china: false,
            method: options.method,
            tolerance: options.tolerance,
        };

        let entries = REPORT_PAIRS
            .iter()
            .map(|&(from, to)| -> Result<RoundTrip, GeoError> {
                let converted = self.convert(input, from, to, &convert_options)?.coord;
                let converted = round_opt(converted, options.output_digits);
                let round_trip = self.convert(converted, to, from, &convert_options)?.coord;
                let round_trip = round_opt(round_trip, options.input_digits);
                Ok(RoundTrip {
                    from,
                    to,
                    converted,
                    round_trip,
                    shift_m: haversine(input, converted),
                    round_trip_error_m: haversine(input, round_trip),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AccuracyReport { input, entries })
    }
}

/// Directed pairs covered by [`Converter::accuracy_report`].
pub const REPORT_PAIRS: [(Frame, Frame); 6] = [
    (Frame::Wgs84, Frame::Gcj02),
    (Frame::Wgs84, Frame::Bd09),
    (Frame::Gcj02, Frame::Wgs84),
    (Frame::Bd09, Frame::Wgs84),
    (Frame::Gcj02, Frame::Bd09),
    (Frame::Bd09, Frame::Gcj02),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    pub method: Method,
    pub tolerance: Tolerance,
    /// Round the input and the round-trip result to this many decimals.
    pub input_digits: Option<u32>,
    /// Round the converted result to this many decimals.
    pub output_digits: Option<u32>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            method: Method::Precise,
            tolerance: Tolerance::default(),
            input_digits: None,
            output_digits: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTrip {
    pub from: Frame,
    pub to: Frame,
    pub converted: Coordinate,
    pub round_trip: Coordinate,
    /// Distance between the input and the converted point (metres).
    pub shift_m: f64,
    /// Distance between the input and the round-trip point (metres).
    pub round_trip_error_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyReport {
    pub input: Coordinate,
    pub entries: Vec<RoundTrip>,
}

impl AccuracyReport {
    pub fn entry(&self, from: Frame, to: Frame) -> Option<&RoundTrip> {
        self.entries.iter().find(|e| e.from == from && e.to == to)
    }

    pub fn worst_round_trip_m(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.round_trip_error_m)
            .fold(0.0, f64::max)
    }
}

fn round_opt(c: Coordinate, digits: Option<u32>) -> Coordinate {
    match digits {
        Some(d) => c.round_to(d),
        None => c,
    }
}

/// Convenience wrappers mirroring the six directed conversions.
macro_rules! directed {
    ($($name:ident: $from:ident -> $to:ident),* $(,)?) => {
        $(
            pub fn $name(c: Coordinate, options: &ConvertOptions) -> Result<Converted, GeoError> {
                Converter::new().convert(c, Frame::$from, Frame::$to, options)
            }
        )*
    };
}

directed! {
    wgs_gcj: Wgs84 -> Gcj02,
    gcj_wgs: Gcj02 -> Wgs84,
    gcj_bd: Gcj02 -> Bd09,
    bd_gcj: Bd09 -> Gcj02,
    wgs_bd: Wgs84 -> Bd09,
    bd_wgs: Bd09 -> Wgs84,
}
