pub mod ecef;
pub mod ellipsoid;
pub mod mercator;

pub use ecef::{ecef_to_geodetic, geodetic_to_ecef};
pub use ellipsoid::{Ellipsoid, EllipsoidParams, GRS80, KRASOVSKY_1940, WGS84};
pub use mercator::{latlon_to_web_mercator, web_mercator_to_latlon, WebMercator};
