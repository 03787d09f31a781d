//! Forward obfuscation transforms between the Chinese map frames and their
//! cheap approximate inverses.
//!
//! These are plain functions with no region check; `crate::convert` decides
//! when they apply.

pub mod bd;
pub mod gcj;

use std::fmt;
use std::str::FromStr;

use crate::coord::Coordinate;

pub use bd::{bd_to_gcj_approx, gcj_to_bd};
pub use gcj::{gcj_to_wgs_approx, wgs_to_gcj};

/// Coordinate reference frames in use by Chinese map providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// GPS / international maps
    Wgs84,
    /// Mainland AMap, Tencent, Google China
    Gcj02,
    /// Baidu
    Bd09,
}

impl Frame {
    pub const ALL: [Frame; 3] = [Frame::Wgs84, Frame::Gcj02, Frame::Bd09];

    pub fn name(&self) -> &'static str {
        match self {
            Frame::Wgs84 => "wgs84",
            Frame::Gcj02 => "gcj02",
            Frame::Bd09 => "bd09",
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Frame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wgs84" | "wgs" | "epsg:4326" => Ok(Frame::Wgs84),
            "gcj02" | "gcj" => Ok(Frame::Gcj02),
            "bd09" | "bd" | "bd09ll" => Ok(Frame::Bd09),
            other => Err(format!("unknown coordinate frame: {other}")),
        }
    }
}

pub fn wgs_to_bd(wgs: Coordinate) -> Coordinate {
    gcj_to_bd(wgs_to_gcj(wgs))
}

pub fn bd_to_wgs_approx(bd: Coordinate) -> Coordinate {
    gcj_to_wgs_approx(bd_to_gcj_approx(bd))
}
