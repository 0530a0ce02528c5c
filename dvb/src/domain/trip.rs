//! Trips returned by the router.
//!
//! A [`Route`] holds alternative [`Trip`]s from origin to destination. Each
//! trip is a sequence of [`Node`]s (legs), and each leg lists the [`Stop`]s
//! it serves. The leg and trip summaries are derived here, so they always
//! agree with the underlying stops.

use chrono::{DateTime, Utc};

use super::coords::Coordinate;
use super::departure::Platform;
use super::mode::{Diva, Mode};

/// Legs and trips without a provider duration are taken to last this long.
pub const MIN_DURATION_MINS: u32 = 1;

/// A station served by a leg.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub name: String,
    pub city: String,
    /// `None` when the provider has no position for the stop.
    pub coords: Option<Coordinate>,
    pub kind: String,
    pub platform: Option<Platform>,
    pub arrival: DateTime<Utc>,
    pub departure: DateTime<Utc>,
}

/// One end of a leg or trip.
#[derive(Debug, Clone, PartialEq)]
pub struct StopLocation {
    pub name: String,
    pub city: String,
    pub coords: Option<Coordinate>,
    pub platform: Option<Platform>,
    pub time: DateTime<Utc>,
    pub kind: String,
}

impl StopLocation {
    /// Where a leg starts: the stop, at its departure time.
    pub fn departing(stop: &Stop) -> Self {
        Self::at(stop, stop.departure)
    }

    /// Where a leg ends: the stop, at its arrival time.
    pub fn arriving(stop: &Stop) -> Self {
        Self::at(stop, stop.arrival)
    }

    fn at(stop: &Stop, time: DateTime<Utc>) -> Self {
        Self {
            name: stop.name.clone(),
            city: stop.city.clone(),
            coords: stop.coords,
            platform: stop.platform.clone(),
            time,
            kind: stop.kind.clone(),
        }
    }
}

/// The origin or destination of a route query.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub city: String,
    pub coords: Option<Coordinate>,
}

impl From<&StopLocation> for Location {
    fn from(location: &StopLocation) -> Self {
        Self {
            name: location.name.clone(),
            city: location.city.clone(),
            coords: location.coords,
        }
    }
}

/// One leg of a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// `None` for legs with fewer than two stops, e.g. walks.
    pub departure: Option<StopLocation>,
    pub arrival: Option<StopLocation>,
    pub mode: Mode,
    pub line: String,
    pub direction: String,
    pub diva: Option<Diva>,
    pub duration: u32,
    pub stops: Vec<Stop>,
    pub path: Vec<Coordinate>,
}

/// Leg attributes that don't come from the stop list.
#[derive(Debug, Clone, PartialEq)]
pub struct LegInfo {
    pub mode: Mode,
    pub line: String,
    pub direction: String,
    pub diva: Option<Diva>,
    pub duration: Option<u32>,
}

impl Node {
    /// Build a leg, deriving its end points from the stop list.
    ///
    /// The Diva is discarded for modes that can't carry one, and the path is
    /// cleared for connection holds, which don't move.
    pub fn new(info: LegInfo, stops: Vec<Stop>, path: Vec<Coordinate>) -> Self {
        let (departure, arrival) = match stops.as_slice() {
            [first, .., last] => (
                Some(StopLocation::departing(first)),
                Some(StopLocation::arriving(last)),
            ),
            _ => (None, None),
        };

        let diva = info.diva.filter(|_| info.mode.carries_diva());
        let path = if info.mode == Mode::StayForConnection {
            Vec::new()
        } else {
            path
        };

        Self {
            departure,
            arrival,
            diva,
            duration: floor_duration(info.duration),
            line: info.line,
            direction: info.direction,
            mode: info.mode,
            stops,
            path,
        }
    }
}

/// One way of getting from origin to destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    /// Copied from the first leg.
    pub departure: Option<StopLocation>,
    /// Copied from the last leg.
    pub arrival: Option<StopLocation>,
    pub duration: u32,
    pub interchanges: u32,
    pub nodes: Vec<Node>,
}

impl Trip {
    pub fn new(nodes: Vec<Node>, duration: Option<u32>, interchanges: u32) -> Self {
        let departure = nodes.first().and_then(|node| node.departure.clone());
        let arrival = nodes.last().and_then(|node| node.arrival.clone());
        Self {
            departure,
            arrival,
            duration: floor_duration(duration),
            interchanges,
            nodes,
        }
    }
}

/// Result of a route query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Route {
    pub origin: Option<Location>,
    pub destination: Option<Location>,
    pub trips: Vec<Trip>,
}

impl Route {
    /// Build a route, taking origin and destination from the first trip.
    pub fn new(trips: Vec<Trip>) -> Self {
        let first = trips.first();
        Self {
            origin: first
                .and_then(|trip| trip.departure.as_ref())
                .map(Location::from),
            destination: first
                .and_then(|trip| trip.arrival.as_ref())
                .map(Location::from),
            trips,
        }
    }
}

fn floor_duration(duration: Option<u32>) -> u32 {
    duration.unwrap_or(MIN_DURATION_MINS).max(MIN_DURATION_MINS)
}
