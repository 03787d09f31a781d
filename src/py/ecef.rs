//! PyO3 bindings for geodetic <-> ECEF conversion.

use ndarray::Array2;
use numpy::{PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::coord::{CartesianPoint, GeodeticPoint};
use crate::proj::ellipsoid::{Ellipsoid, EllipsoidParams};

use super::owned_columns;

fn ellipsoid(a: f64, invf: f64) -> PyResult<Ellipsoid> {
    Ellipsoid::from_params(EllipsoidParams::new(a, invf))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Convert geodetic coordinates to Earth-centred Cartesian coordinates.
///
/// Args:
///     lat: 1D array of latitudes in degrees.
///     lon: 1D array of longitudes in degrees.
///     height: 1D array of ellipsoidal heights in metres.
///     a: Semi-major axis in metres. Defaults to WGS-84.
///     invf: Inverse flattening. Defaults to WGS-84.
///
/// Returns:
///     (n, 3) array of x, y, z in metres.
#[pyfunction]
#[pyo3(signature = (lat, lon, height, a=6_378_137.0, invf=298.257_223_563))]
pub fn geodetic_to_ecef<'py>(
    py: Python<'py>,
    lat: PyReadonlyArray1<'py, f64>,
    lon: PyReadonlyArray1<'py, f64>,
    height: PyReadonlyArray1<'py, f64>,
    a: f64,
    invf: f64,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let ell = ellipsoid(a, invf)?;
    let [lats, lons, heights] =
        owned_columns(["lat", "lon", "height"], [&lat, &lon, &height])?;

    let result: Array2<f64> = py.allow_threads(move || {
        let mut out = Array2::zeros((lats.len(), 3));
        for (i, mut row) in out.rows_mut().into_iter().enumerate() {
            let p = ell.to_ecef(GeodeticPoint::new(lats[i], lons[i], heights[i]));
            row[0] = p.x;
            row[1] = p.y;
            row[2] = p.z;
        }
        out
    });

    Ok(PyArray2::from_owned_array(py, result))
}

/// Convert Earth-centred Cartesian coordinates to geodetic coordinates.
///
/// Args:
///     xyz: (n, 3) array of x, y, z in metres.
///     a: Semi-major axis in metres. Defaults to WGS-84.
///     invf: Inverse flattening. Defaults to WGS-84.
///
/// Returns:
///     (n, 3) array of latitude, longitude (degrees) and height (metres).
#[pyfunction]
#[pyo3(signature = (xyz, a=6_378_137.0, invf=298.257_223_563))]
pub fn ecef_to_geodetic<'py>(
    py: Python<'py>,
    xyz: PyReadonlyArray2<'py, f64>,
    a: f64,
    invf: f64,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let ell = ellipsoid(a, invf)?;
    let xyz: Array2<f64> = xyz.as_array().to_owned();
    if xyz.ncols() != 3 {
        return Err(PyValueError::new_err(format!(
            "xyz must have shape (n, 3), got (n, {})",
            xyz.ncols()
        )));
    }

    let result: Array2<f64> = py.allow_threads(move || {
        let mut out = Array2::zeros(xyz.raw_dim());
        for (src, mut dst) in xyz.rows().into_iter().zip(out.rows_mut()) {
            let g = ell.to_geodetic(CartesianPoint::new(src[0], src[1], src[2]));
            dst[0] = g.lat;
            dst[1] = g.lon;
            dst[2] = g.height;
        }
        out
    });

    Ok(PyArray2::from_owned_array(py, result))
}
