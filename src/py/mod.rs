use numpy::PyReadonlyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

mod convert;
mod ecef;
mod olc;

/// Register all Python-visible functions and types.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(convert::convert_points, m)?)?;
    m.add_function(wrap_pyfunction!(ecef::geodetic_to_ecef, m)?)?;
    m.add_function(wrap_pyfunction!(ecef::ecef_to_geodetic, m)?)?;
    m.add_function(wrap_pyfunction!(olc::olc_to_coords, m)?)?;
    Ok(())
}

/// Copy equally sized 1D arrays into owned vectors before releasing the GIL.
pub(crate) fn owned_columns<const N: usize>(
    names: [&str; N],
    arrays: [&PyReadonlyArray1<'_, f64>; N],
) -> PyResult<[Vec<f64>; N]> {
    let n = arrays[0].as_array().len();
    for (name, array) in names.iter().zip(arrays.iter()) {
        let len = array.as_array().len();
        if len != n {
            return Err(PyValueError::new_err(format!(
                "{} must have length {}, got {}",
                name, n, len
            )));
        }
    }
    Ok(arrays.map(|a| a.as_array().to_vec()))
}
