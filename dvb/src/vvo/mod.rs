//! VVO (Verkehrsverbund Oberelbe) web API client.
//!
//! This module provides an HTTP client for the public transit API behind
//! dvb.de and vvo-online.de, which serves stop search, departure monitors,
//! line listings, trip planning and map pins for the Dresden region.
//!
//! Key characteristics of the API:
//! - Every JSON response carries a `Status` block; a `Code` other than
//!   `"Ok"` is a failure even on HTTP 200
//! - Timestamps are `/Date(<millis><offset>)/` strings
//! - Points, pins and polylines are `|`-delimited records with Gauss-Krüger
//!   zone 4 (or Web Mercator) coordinates, northing first

mod client;
mod convert;
mod error;
mod status;
mod types;

pub use client::{DEFAULT_SEARCH_LIMIT, VvoClient, VvoConfig};
pub use convert::{
    ConversionError, convert_address, convert_coordinates, convert_departures, convert_lines,
    convert_pins, convert_points, convert_route,
};
pub use error::{GENERIC_ERROR, VALIDATION_ERROR, VvoError};
pub use status::{check_status, construct_error, convert_error};
pub use types::{
    DepartureDto, DepartureMonitorResponse, DirectionDto, DivaDto, LineDto, LinesResponse,
    MotDto, PartialRouteDto, PlatformDto, PointFinderResponse, RegularStopDto, RouteDto, Status,
    StatusEnvelope, TripsResponse,
};
