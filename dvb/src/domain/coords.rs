//! Geographic coordinates and the provider's two planar projections.
//!
//! The VVO endpoints never speak plain WGS84. Stops, pins and route
//! polylines arrive as integer metre values in one of two systems:
//!
//! - **GK4**: Gauss-Krüger zone 4 (transverse Mercator on the Bessel 1841
//!   ellipsoid, central meridian 12°E, false easting 4,500,000) using the
//!   Potsdam datum. Eastings around Dresden are roughly 4,600,000.
//! - **Web Mercator**: spherical EPSG:3857. Eastings around Dresden are
//!   roughly 1,530,000.
//!
//! Because the easting ranges don't overlap in the service area, the inverse
//! transform picks the system from the magnitude of the easting alone.
//!
//! The public coordinate order is always (longitude, latitude). The wire
//! order inside records is (northing, easting).

use std::fmt;

/// Eastings below this value are Web Mercator, everything else is GK4.
pub const MERCATOR_EASTING_LIMIT: i64 = 2_500_000;

/// Error returned when a projected pair cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid projected coordinate: {reason}")]
pub struct InvalidProjection {
    reason: &'static str,
}

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// True if both components are finite and within the WGS84 value ranges.
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.longitude, self.latitude)
    }
}

/// An integer position in one of the provider's planar systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectedPoint {
    pub easting: i64,
    pub northing: i64,
}

/// The provider's planar coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    GaussKrueger,
    WebMercator,
}

impl Projection {
    /// Guess the system a projected pair belongs to from its easting.
    pub fn detect(easting: i64) -> Self {
        if easting < MERCATOR_EASTING_LIMIT {
            Projection::WebMercator
        } else {
            Projection::GaussKrueger
        }
    }

    /// Project a WGS84 coordinate, rounding to whole metres.
    pub fn forward(self, coord: Coordinate) -> ProjectedPoint {
        let (easting, northing) = match self {
            Projection::GaussKrueger => gk4::forward(coord.longitude, coord.latitude),
            Projection::WebMercator => mercator::forward(coord.longitude, coord.latitude),
        };
        ProjectedPoint {
            easting: easting.round() as i64,
            northing: northing.round() as i64,
        }
    }

    /// Inverse-project a planar pair. The result is not rounded.
    pub fn inverse(self, easting: f64, northing: f64) -> Coordinate {
        let (longitude, latitude) = match self {
            Projection::GaussKrueger => gk4::inverse(easting, northing),
            Projection::WebMercator => mercator::inverse(easting, northing),
        };
        Coordinate {
            longitude,
            latitude,
        }
    }
}

/// Project a WGS84 coordinate into the given system.
pub fn to_projected(projection: Projection, coord: Coordinate) -> ProjectedPoint {
    projection.forward(coord)
}

/// Parse a projected pair in wire order (northing, easting).
///
/// Fails if either value is not an integer, or if both are zero: the
/// provider sends `0|0` for locations it has no position for.
pub fn parse_projected(northing: &str, easting: &str) -> Result<ProjectedPoint, InvalidProjection> {
    let northing = northing.trim().parse::<i64>().map_err(|_| InvalidProjection {
        reason: "northing is not an integer",
    })?;
    let easting = easting.trim().parse::<i64>().map_err(|_| InvalidProjection {
        reason: "easting is not an integer",
    })?;

    if northing == 0 && easting == 0 {
        return Err(InvalidProjection {
            reason: "0,0 marks a missing position",
        });
    }

    Ok(ProjectedPoint { easting, northing })
}

/// Decode a projected pair in wire order (northing, easting) to WGS84,
/// auto-detecting the system. Returns `None` for unparseable input or the
/// `0,0` sentinel.
pub fn from_projected(northing: &str, easting: &str) -> Option<Coordinate> {
    let point = parse_projected(northing, easting).ok()?;
    let projection = Projection::detect(point.easting);
    Some(projection.inverse(point.easting as f64, point.northing as f64))
}

/// Decode a route polyline.
///
/// The format is `HEADER|n1|e1|n2|e2|...|` with a trailing empty field. Pairs
/// are read from index 1 up to, but excluding, the final field. Pairs that
/// fail to decode are dropped, so the result may hold fewer points than
/// the input has pairs.
pub fn decode_polyline(encoded: &str) -> Vec<Coordinate> {
    if encoded.is_empty() {
        return Vec::new();
    }

    let fields: Vec<&str> = encoded.split('|').collect();
    if fields.len() < 3 {
        return Vec::new();
    }

    fields[1..fields.len() - 1]
        .chunks_exact(2)
        .filter_map(|pair| from_projected(pair[0], pair[1]))
        .collect()
}

struct Ellipsoid {
    a: f64,
    e2: f64,
}

impl Ellipsoid {
    const fn from_flattening(a: f64, inv_f: f64) -> Self {
        let f = 1.0 / inv_f;
        Self {
            a,
            e2: f * (2.0 - f),
        }
    }

    fn radius_of_curvature(&self, lat: f64) -> f64 {
        self.a / (1.0 - self.e2 * lat.sin().powi(2)).sqrt()
    }

    fn to_geocentric(&self, lon: f64, lat: f64) -> [f64; 3] {
        let n = self.radius_of_curvature(lat);
        [
            n * lat.cos() * lon.cos(),
            n * lat.cos() * lon.sin(),
            n * (1.0 - self.e2) * lat.sin(),
        ]
    }

    fn to_geodetic(&self, [x, y, z]: [f64; 3]) -> (f64, f64) {
        let p = x.hypot(y);
        let lon = y.atan2(x);
        let mut lat = z.atan2(p * (1.0 - self.e2));
        for _ in 0..8 {
            let n = self.radius_of_curvature(lat);
            let h = p / lat.cos() - n;
            lat = z.atan2(p * (1.0 - self.e2 * n / (n + h)));
        }
        (lon, lat)
    }
}

const BESSEL: Ellipsoid = Ellipsoid::from_flattening(6_377_397.155, 299.152_812_8);
const WGS84: Ellipsoid = Ellipsoid::from_flattening(6_378_137.0, 298.257_223_563);

mod gk4 {
    use super::{BESSEL, WGS84};

    const CENTRAL_MERIDIAN: f64 = 12.0;
    const FALSE_EASTING: f64 = 4_500_000.0;
    const SCALE: f64 = 1.0;

    // Potsdam -> WGS84, position-vector convention.
    const SHIFT: [f64; 3] = [598.1, 73.7, 418.2];
    const ROTATION_ARCSEC: [f64; 3] = [0.202, 0.045, -2.455];
    const SCALE_PPM: f64 = 6.7;

    fn rotation() -> [f64; 3] {
        ROTATION_ARCSEC.map(|r| (r / 3600.0).to_radians())
    }

    fn potsdam_to_wgs84(p: [f64; 3]) -> [f64; 3] {
        let [rx, ry, rz] = rotation();
        let m = 1.0 + SCALE_PPM * 1e-6;
        let [x, y, z] = p;
        [
            m * (x - rz * y + ry * z) + SHIFT[0],
            m * (rz * x + y - rx * z) + SHIFT[1],
            m * (-ry * x + rx * y + z) + SHIFT[2],
        ]
    }

    fn wgs84_to_potsdam(p: [f64; 3]) -> [f64; 3] {
        let [rx, ry, rz] = rotation();
        let m = 1.0 + SCALE_PPM * 1e-6;
        let x = (p[0] - SHIFT[0]) / m;
        let y = (p[1] - SHIFT[1]) / m;
        let z = (p[2] - SHIFT[2]) / m;
        [x + rz * y - ry * z, -rz * x + y + rx * z, ry * x - rx * y + z]
    }

    fn meridian_arc(lat: f64) -> f64 {
        let e2 = BESSEL.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        BESSEL.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
    }

    /// WGS84 degrees to (easting, northing) in metres.
    pub(super) fn forward(lon: f64, lat: f64) -> (f64, f64) {
        let geocentric = WGS84.to_geocentric(lon.to_radians(), lat.to_radians());
        let (lon, lat) = BESSEL.to_geodetic(wgs84_to_potsdam(geocentric));

        let e2 = BESSEL.e2;
        let ep2 = e2 / (1.0 - e2);
        let n = BESSEL.radius_of_curvature(lat);
        let t = lat.tan().powi(2);
        let c = ep2 * lat.cos().powi(2);
        let a = (lon - CENTRAL_MERIDIAN.to_radians()) * lat.cos();

        let easting = SCALE
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0);
        let northing = SCALE
            * (meridian_arc(lat)
                + n * lat.tan()
                    * (a * a / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6)
                            / 720.0));

        (easting + FALSE_EASTING, northing)
    }

    /// (easting, northing) in metres to WGS84 degrees.
    pub(super) fn inverse(easting: f64, northing: f64) -> (f64, f64) {
        let e2 = BESSEL.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let ep2 = e2 / (1.0 - e2);
        let x = easting - FALSE_EASTING;

        let mu = northing
            / SCALE
            / (BESSEL.a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let c1 = ep2 * phi1.cos().powi(2);
        let t1 = phi1.tan().powi(2);
        let n1 = BESSEL.radius_of_curvature(phi1);
        let r1 = BESSEL.a * (1.0 - e2) / (1.0 - e2 * phi1.sin().powi(2)).powf(1.5);
        let d = x / (n1 * SCALE);

        let lat = phi1
            - (n1 * phi1.tan() / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * ep2
                        - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);
        let lon = CENTRAL_MERIDIAN.to_radians()
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                    * d.powi(5)
                    / 120.0)
                / phi1.cos();

        let geocentric = potsdam_to_wgs84(BESSEL.to_geocentric(lon, lat));
        let (lon, lat) = WGS84.to_geodetic(geocentric);
        (lon.to_degrees(), lat.to_degrees())
    }
}

mod mercator {
    use std::f64::consts::FRAC_PI_4;

    const RADIUS: f64 = 6_378_137.0;

    pub(super) fn forward(lon: f64, lat: f64) -> (f64, f64) {
        let easting = RADIUS * lon.to_radians();
        let northing = RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        (easting, northing)
    }

    pub(super) fn inverse(easting: f64, northing: f64) -> (f64, f64) {
        let lon = (easting / RADIUS).to_degrees();
        let lat = (2.0 * (northing / RADIUS).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
        (lon, lat)
    }
}
