//! PyO3 binding for batch datum conversion.

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::convert::{ConvertOptions, Converter, Method};
use crate::coord::Coordinate;
use crate::shift::Frame;

use super::owned_columns;

/// Convert arrays of coordinates between WGS-84, GCJ-02 and BD-09.
///
/// Args:
///     lat: 1D array of latitudes in degrees.
///     lon: 1D array of longitudes in degrees.
///     src: Source frame ("wgs84", "gcj02" or "bd09").
///     dst: Destination frame.
///     method: "precise" (iterative inverse) or "approximate".
///     check_china: Leave points outside China unchanged.
///
/// Returns:
///     Tuple of (lat_out, lon_out) arrays in the destination frame.
#[pyfunction]
#[pyo3(signature = (lat, lon, src, dst, method="precise", check_china=true))]
#[allow(clippy::type_complexity)]
pub fn convert_points<'py>(
    py: Python<'py>,
    lat: PyReadonlyArray1<'py, f64>,
    lon: PyReadonlyArray1<'py, f64>,
    src: &str,
    dst: &str,
    method: &str,
    check_china: bool,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let from: Frame = src.parse().map_err(PyValueError::new_err)?;
    let to: Frame = dst.parse().map_err(PyValueError::new_err)?;
    let method = match method {
        "precise" => Method::Precise,
        "approximate" | "approx" => Method::Approximate,
        other => {
            return Err(PyValueError::new_err(format!(
                "Unknown conversion method: {other}"
            )))
        }
    };
    let [lats, lons] = owned_columns(["lat", "lon"], [&lat, &lon])?;

    let options = ConvertOptions {
        check_china,
        method,
        ..ConvertOptions::default()
    };
    let coords: Vec<Coordinate> = lats
        .into_iter()
        .zip(lons)
        .map(|(lat, lon)| Coordinate::new(lat, lon))
        .collect();

    let converted = py.allow_threads(move || -> PyResult<Vec<Coordinate>> {
        let converter = Converter::new();
        let out = converter
            .convert_batch_par(&coords, from, to, &options)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(out.into_iter().map(|c| c.coord).collect())
    })?;

    let (lat_out, lon_out): (Vec<f64>, Vec<f64>) =
        converted.into_iter().map(|c| (c.lat, c.lon)).unzip();

    Ok((
        PyArray1::from_vec(py, lat_out),
        PyArray1::from_vec(py, lon_out),
    ))
}
