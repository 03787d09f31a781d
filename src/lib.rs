//! Conversion between WGS-84, GCJ-02 and BD-09 coordinates.
//!
//! The forward datum shifts are closed-form; their inverses are recovered
//! numerically by [`solve::Inverter`]. Geodetic/ECEF conversion, Web Mercator
//! and Open Location Code decoding round out the toolkit.

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod convert;
pub mod coord;
pub mod distance;
pub mod error;
pub mod olc;
pub mod proj;
pub mod region;
pub mod shift;
pub mod solve;
#[cfg(feature = "python")]
mod py;

pub use convert::{ConvertOptions, Converted, Converter, Diagnostic, Method};
pub use coord::{CartesianPoint, Coordinate, GeodeticPoint, MercatorPoint};
pub use error::GeoError;
pub use shift::Frame;
pub use solve::{invert, Inverter, Solution, Tolerance, Transform};

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn prc_geo(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}
