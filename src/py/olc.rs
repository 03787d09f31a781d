//! PyO3 binding for Open Location Code lookup.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::coord::Coordinate;
use crate::olc;

/// Centre of an Open Location Code area.
///
/// Short codes are recovered relative to the reference point (ref_lat, ref_lon).
///
/// Returns:
///     Tuple of (lat, lon) in degrees.
#[pyfunction]
#[pyo3(signature = (code, ref_lat=0.0, ref_lon=0.0))]
pub fn olc_to_coords(code: &str, ref_lat: f64, ref_lon: f64) -> PyResult<(f64, f64)> {
    let c = olc::olc_to_coordinate(code, Coordinate::new(ref_lat, ref_lon))
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok((c.lat, c.lon))
}
