use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Ellipsoid error: {0}")]
    Ellipsoid(#[from] EllipsoidError),

    #[error("Solve error: {0}")]
    Solve(#[from] SolveError),

    #[error("Open Location Code error: {0}")]
    Olc(#[from] OlcError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EllipsoidError {
    #[error("Invalid semi-major axis: {0} (must be finite and > 0)")]
    InvalidSemiMajorAxis(f64),

    #[error("Invalid inverse flattening: {0} (must be finite and > 1)")]
    InvalidInverseFlattening(f64),
}

/// Which part of the inversion produced a non-finite forward image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStage {
    FixedPoint,
    DigitRefinement,
}

impl std::fmt::Display for SolveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStage::FixedPoint => f.write_str("fixed-point iteration"),
            SolveStage::DigitRefinement => f.write_str("digit refinement"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Target coordinate is not finite: ({lat}, {lon})")]
    NonFiniteTarget { lat: f64, lon: f64 },

    #[error("Approximate inverse produced a non-finite seed: ({lat}, {lon})")]
    NonFiniteSeed { lat: f64, lon: f64 },

    #[error(
        "Forward transform produced a non-finite value during {stage} (step {step}): ({lat}, {lon})"
    )]
    NonFiniteForward {
        stage: SolveStage,
        step: usize,
        lat: f64,
        lon: f64,
    },

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OlcError {
    #[error("Invalid code: {0}")]
    InvalidCode(String),

    #[error("Not a full code: {0}")]
    NotFullCode(String),

    #[error("Invalid code length: {0}")]
    InvalidLength(usize),

    #[error("Cannot encode a non-finite coordinate")]
    NonFiniteCoordinate,
}
