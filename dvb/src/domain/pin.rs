//! Map pins from the dvb.de map endpoint.
//!
//! Pins arrive as pipe-delimited records:
//!
//! ```text
//! id|type|?|name|northing|easting|extra|connections
//! ```
//!
//! Which trailing field carries data depends on the type discriminator in
//! field 1, so decoding branches on it first and builds one variant.

use std::fmt;

use super::coords::{Coordinate, from_projected};
use super::mode::Mode;

/// Pin categories as named by the map endpoint's `pintypes` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinType {
    Stop,
    Platform,
    Poi,
    RentABike,
    TicketMachine,
    CarSharing,
    ParkAndRide,
    Unknown,
}

impl PinType {
    /// Decode the short discriminator used inside pin records.
    pub fn from_record_tag(tag: &str) -> Self {
        match tag {
            "" => PinType::Stop,
            "p" => PinType::Poi,
            "pf" => PinType::Platform,
            "pr" => PinType::ParkAndRide,
            "r" => PinType::RentABike,
            "c" => PinType::CarSharing,
            "t" => PinType::TicketMachine,
            _ => PinType::Unknown,
        }
    }

    /// Value sent in the `pintypes` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            PinType::Stop => "stop",
            PinType::Platform => "platform",
            PinType::Poi => "poi",
            PinType::RentABike => "rentabike",
            PinType::TicketMachine => "ticketmachine",
            PinType::CarSharing => "carsharing",
            PinType::ParkAndRide => "parkandride",
            PinType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

/// A line serving a stop pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub line: String,
    pub mode: Mode,
}

/// Type-specific pin payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PinKind {
    Stop { connections: Vec<Connection> },
    Platform { platform_nr: String },
    ParkAndRide { info: String },
    Poi,
    RentABike,
    TicketMachine,
    CarSharing,
    Unknown,
}

impl PinKind {
    pub fn pin_type(&self) -> PinType {
        match self {
            PinKind::Stop { .. } => PinType::Stop,
            PinKind::Platform { .. } => PinType::Platform,
            PinKind::ParkAndRide { .. } => PinType::ParkAndRide,
            PinKind::Poi => PinType::Poi,
            PinKind::RentABike => PinType::RentABike,
            PinKind::TicketMachine => PinType::TicketMachine,
            PinKind::CarSharing => PinType::CarSharing,
            PinKind::Unknown => PinType::Unknown,
        }
    }
}

/// A map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    /// Provider identifier. Empty for platforms.
    pub id: String,
    pub name: String,
    /// Zero if the record carried no usable position.
    pub coords: Coordinate,
    pub kind: PinKind,
}

impl Pin {
    pub fn pin_type(&self) -> PinType {
        self.kind.pin_type()
    }

    /// Lines serving this pin, if it is a stop.
    pub fn connections(&self) -> Option<&[Connection]> {
        match &self.kind {
            PinKind::Stop { connections } => Some(connections),
            _ => None,
        }
    }

    /// Platform number, if this pin is a platform.
    pub fn platform_nr(&self) -> Option<&str> {
        match &self.kind {
            PinKind::Platform { platform_nr } => Some(platform_nr),
            _ => None,
        }
    }

    /// Free-text info, if this pin is a park-and-ride site.
    pub fn info(&self) -> Option<&str> {
        match &self.kind {
            PinKind::ParkAndRide { info } => Some(info),
            _ => None,
        }
    }
}

/// Decode one pin record.
pub fn parse_pin(record: &str) -> Pin {
    let fields: Vec<&str> = record.split('|').collect();
    let field = |i: usize| fields.get(i).copied().unwrap_or("");

    let kind = match PinType::from_record_tag(field(1)) {
        PinType::Stop => PinKind::Stop {
            connections: parse_connections(field(7)),
        },
        PinType::Platform => PinKind::Platform {
            platform_nr: field(6).to_string(),
        },
        PinType::ParkAndRide => PinKind::ParkAndRide {
            info: field(6).to_string(),
        },
        PinType::Poi => PinKind::Poi,
        PinType::RentABike => PinKind::RentABike,
        PinType::TicketMachine => PinKind::TicketMachine,
        PinType::CarSharing => PinKind::CarSharing,
        PinType::Unknown => PinKind::Unknown,
    };

    Pin {
        id: field(0).to_string(),
        name: field(3).to_string(),
        coords: from_projected(field(4), field(5)).unwrap_or_default(),
        kind,
    }
}

/// Decode a packed connection list: `1:3~6~7#2:66~H/S`.
///
/// Groups are `#`-separated, each `code:line~line~...`. Groups with an
/// unknown code, no separator or no lines are skipped.
pub fn parse_connections(data: &str) -> Vec<Connection> {
    data.split('#')
        .filter_map(|group| {
            let (code, lines) = group.split_once(':')?;
            let mode = Mode::from_connection_code(code)?;
            Some((mode, lines))
        })
        .flat_map(|(mode, lines)| {
            lines
                .split('~')
                .filter(|line| !line.is_empty())
                .map(move |line| Connection {
                    line: line.to_string(),
                    mode: mode.clone(),
                })
        })
        .collect()
}
