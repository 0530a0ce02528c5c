//! Domain types for the Dresden transit API.
//!
//! Everything here is plain data built fresh from one response. Positions
//! are always WGS84 (longitude, latitude); the provider's projected systems
//! never leave [`coords`].

mod coords;
mod departure;
mod line;
mod mode;
mod pin;
mod point;
mod time;
mod trip;

pub use coords::{
    Coordinate, InvalidProjection, MERCATOR_EASTING_LIMIT, ProjectedPoint, Projection,
    decode_polyline, from_projected, parse_projected, to_projected,
};
pub use departure::{Departure, Platform};
pub use line::Line;
pub use mode::{Diva, Mode};
pub use pin::{Connection, Pin, PinKind, PinType, parse_connections, parse_pin};
pub use point::{Address, DEFAULT_CITY, Point, PointType, parse_poi_id, parse_point};
pub use time::{TimeError, date_difference, parse_date};
pub use trip::{LegInfo, Location, MIN_DURATION_MINS, Node, Route, Stop, StopLocation, Trip};
