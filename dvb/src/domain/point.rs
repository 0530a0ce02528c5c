//! Search results from the point finder.

use super::coords::{Coordinate, from_projected};

/// City assumed when a point record leaves the field empty.
pub const DEFAULT_CITY: &str = "Dresden";

/// What kind of place a point identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointType {
    Address,
    Coords,
    Poi,
    Stop,
}

/// A place returned by the point finder.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Provider identifier. For stops this is the numeric stop ID.
    pub id: String,
    pub name: String,
    pub city: String,
    pub coords: Coordinate,
    pub kind: PointType,
}

/// An address together with the stops the provider assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub point: Point,
    pub stops: Vec<Point>,
}

/// Classify a point identifier by its colon-delimited prefix.
///
/// Identifiers with at least four segments and a known first segment are
/// trimmed to their first four segments. Everything else is a stop and is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use dvb::domain::{PointType, parse_poi_id};
///
/// let (id, kind) = parse_poi_id("poiID:2104107859:14612000:");
/// assert_eq!(id, "poiID:2104107859:14612000:");
/// assert_eq!(kind, PointType::Poi);
///
/// let (id, kind) = parse_poi_id("33000028");
/// assert_eq!(id, "33000028");
/// assert_eq!(kind, PointType::Stop);
/// ```
pub fn parse_poi_id(id: &str) -> (String, PointType) {
    let segments: Vec<&str> = id.split(':').collect();
    if segments.len() >= 4 {
        let kind = match segments[0] {
            "streetID" => Some(PointType::Address),
            "coord" => Some(PointType::Coords),
            "poiID" => Some(PointType::Poi),
            _ => None,
        };
        if let Some(kind) = kind {
            return (segments[..4].join(":"), kind);
        }
    }
    (id.to_string(), PointType::Stop)
}

/// Decode one point finder record: `id|type|city|name|northing|easting|...`.
///
/// Returns `None` for records without a name or a usable position; callers
/// drop those from their result lists.
pub fn parse_point(record: &str) -> Option<Point> {
    let fields: Vec<&str> = record.split('|').collect();
    let field = |i: usize| fields.get(i).copied().unwrap_or("");

    let name = field(3).replace('\'', "");
    if name.trim().is_empty() {
        return None;
    }

    let coords = from_projected(field(4), field(5))?;

    let city = match field(2) {
        "" => DEFAULT_CITY.to_string(),
        city => city.to_string(),
    };

    let (id, kind) = parse_poi_id(field(0));

    Some(Point {
        id,
        name,
        city,
        coords,
        kind,
    })
}
