//! Conversion from VVO DTOs to domain types.
//!
//! Every converter first checks the response's status block, then decodes.
//! Malformed list elements are dropped instead of failing the whole
//! response: points without a name or position with a warning, polyline
//! pairs without a position silently. Malformed timestamps are not: they
//! fail the conversion.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{
    Address, Coordinate, Departure, Diva, LegInfo, Line, Mode, Node, Pin, Platform, Point,
    PointType, Route, Stop, Trip, date_difference, decode_polyline, from_projected, parse_date,
    parse_pin, parse_point,
};

use super::error::VvoError;
use super::status::check_status;
use super::types::{
    DepartureDto, DepartureMonitorResponse, DivaDto, LineDto, LinesResponse, PartialRouteDto,
    PlatformDto, PointFinderResponse, RegularStopDto, RouteDto, TripsResponse,
};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a timestamp
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, ConversionError> {
    parse_date(s).map_err(|e| ConversionError::InvalidTime(e.to_string()))
}

fn convert_platform(dto: Option<&PlatformDto>) -> Option<Platform> {
    dto.map(|p| Platform {
        name: p.name.clone(),
        kind: p.kind.clone().unwrap_or_default(),
    })
}

fn convert_diva(dto: Option<&DivaDto>) -> Option<Diva> {
    let dto = dto?;
    Diva::parse(
        dto.number.as_deref()?,
        dto.network.as_deref().unwrap_or_default(),
    )
}

/// Decode point finder results, dropping records without a name or position.
pub fn convert_points(response: &PointFinderResponse) -> Result<Vec<Point>, VvoError> {
    check_status(response.status.as_ref())?;

    let records = response.points.as_deref().unwrap_or(&[]);
    Ok(decode_points(records))
}

fn decode_points(records: &[String]) -> Vec<Point> {
    records
        .iter()
        .filter_map(|record| {
            let point = parse_point(record);
            if point.is_none() {
                warn!(record = %record, "skipping point without name or position");
            }
            point
        })
        .collect()
}

/// Decode a reverse-geocoding lookup.
///
/// The first record is the address itself; the stops the provider assigned
/// to it follow. Returns `None` if nothing usable was found.
pub fn convert_address(response: &PointFinderResponse) -> Result<Option<Address>, VvoError> {
    check_status(response.status.as_ref())?;

    let records = response.points.as_deref().unwrap_or(&[]);
    let Some((first, rest)) = records.split_first() else {
        return Ok(None);
    };

    let Some(point) = parse_point(first) else {
        warn!(record = %first, "address lookup returned an unusable record");
        return Ok(None);
    };

    let stops = decode_points(rest)
        .into_iter()
        .filter(|p| p.kind == PointType::Stop)
        .collect();

    Ok(Some(Address { point, stops }))
}

/// Decode a departure monitor, computing relative times against `now`.
pub fn convert_departures(
    response: &DepartureMonitorResponse,
    now: DateTime<Utc>,
) -> Result<Vec<Departure>, VvoError> {
    check_status(response.status.as_ref())?;

    let departures = response.departures.as_deref().unwrap_or(&[]);
    let converted = departures
        .iter()
        .map(|d| convert_departure(d, now))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(converted)
}

fn convert_departure(
    dto: &DepartureDto,
    now: DateTime<Utc>,
) -> Result<Departure, ConversionError> {
    let scheduled_time = parse_time(&dto.scheduled_time)?;
    let arrival_time = match &dto.real_time {
        Some(real_time) => parse_time(real_time)?,
        None => scheduled_time,
    };

    Ok(Departure {
        id: dto.id.clone(),
        line: dto.line_name.clone().unwrap_or_default(),
        direction: dto.direction.clone().unwrap_or_default(),
        platform: convert_platform(dto.platform.as_ref()),
        arrival_time,
        scheduled_time,
        arrival_time_relative: date_difference(now, arrival_time),
        scheduled_time_relative: date_difference(now, scheduled_time),
        delay_time: date_difference(scheduled_time, arrival_time),
        state: dto.state.clone().unwrap_or_else(|| "Unknown".to_string()),
        mode: Mode::parse(dto.mot.as_deref().unwrap_or_default()),
        diva: convert_diva(dto.diva.as_ref()),
    })
}

/// Decode the lines serving a stop.
pub fn convert_lines(response: &LinesResponse) -> Result<Vec<Line>, VvoError> {
    check_status(response.status.as_ref())?;

    Ok(response
        .lines
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(convert_line)
        .collect())
}

fn convert_line(dto: &LineDto) -> Line {
    Line {
        name: dto.name.clone(),
        mode: Mode::parse(dto.mot.as_deref().unwrap_or_default()),
        diva: convert_diva(dto.diva.as_ref()),
        directions: dto
            .directions
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|d| d.name.clone())
            .collect(),
    }
}

/// Rebuild the trip graph from a router response.
///
/// A response without a routes collection is a valid "nothing found" and
/// decodes to an empty [`Route`].
pub fn convert_route(response: &TripsResponse) -> Result<Route, VvoError> {
    check_status(response.status.as_ref())?;

    let Some(routes) = &response.routes else {
        return Ok(Route::default());
    };

    let trips = routes
        .iter()
        .map(convert_trip)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Route::new(trips))
}

fn convert_trip(dto: &RouteDto) -> Result<Trip, ConversionError> {
    let nodes = dto
        .partial_routes
        .iter()
        .map(|leg| convert_node(leg, &dto.map_data))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Trip::new(nodes, dto.duration, dto.interchanges))
}

fn convert_node(dto: &PartialRouteDto, map_data: &[String]) -> Result<Node, ConversionError> {
    let stops = dto
        .regular_stops
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(convert_stop)
        .collect::<Result<Vec<_>, _>>()?;

    let mot = dto.mot.as_ref().ok_or(ConversionError::MissingField("Mot"))?;
    let info = LegInfo {
        mode: Mode::parse(mot.kind.as_deref().unwrap_or_default()),
        line: mot.name.clone().unwrap_or_default(),
        direction: mot
            .direction
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        diva: convert_diva(mot.diva.as_ref()),
        duration: dto.duration,
    };

    let path = dto
        .map_data_index
        .and_then(|idx| map_data.get(idx))
        .map(|encoded| decode_polyline(encoded))
        .unwrap_or_default();

    Ok(Node::new(info, stops, path))
}

fn convert_stop(dto: &RegularStopDto) -> Result<Stop, ConversionError> {
    let coords = match (&dto.latitude, &dto.longitude) {
        (Some(northing), Some(easting)) => from_projected(northing, easting),
        _ => None,
    };

    Ok(Stop {
        name: dto.name.trim().to_string(),
        city: dto.place.clone().unwrap_or_default(),
        coords,
        kind: "Stop".to_string(),
        platform: convert_platform(dto.platform.as_ref()),
        arrival: parse_time(&dto.arrival_time)?,
        departure: parse_time(&dto.departure_time)?,
    })
}

/// Decode map pin records.
pub fn convert_pins(records: &[String]) -> Vec<Pin> {
    records.iter().map(|record| parse_pin(record)).collect()
}

/// Decode the `northing|easting` body of the coordinate lookup.
pub fn convert_coordinates(body: &str) -> Option<Coordinate> {
    let body = body.trim().trim_matches('"');
    let (northing, easting) = body.split_once('|')?;
    let easting = easting.split('|').next().unwrap_or(easting);
    from_projected(northing, easting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn trips_response(json: &str) -> TripsResponse {
        serde_json::from_str(json).unwrap()
    }

    const TRIP_JSON: &str = r#"{
        "Status": {"Code": "Ok"},
        "Routes": [{
            "Duration": 15,
            "Interchanges": 0,
            "MapData": [
                "Footpath|5657516|4621644|5657497|4621393|",
                "Tram|5657497|4621393|0|0|5658000|4621000|"
            ],
            "PartialRoutes": [
                {
                    "Duration": 3,
                    "Mot": {"Type": "Footpath"},
                    "MapDataIndex": 0
                },
                {
                    "Mot": {
                        "Type": "Tram",
                        "Name": "3",
                        "Direction": " Wilder Mann ",
                        "Diva": {"Number": "11003", "Network": "voe"}
                    },
                    "MapDataIndex": 1,
                    "RegularStops": [
                        {
                            "ArrivalTime": "/Date(1532818920000-0000)/",
                            "DepartureTime": "/Date(1532818980000-0000)/",
                            "Place": "Dresden",
                            "Name": " Hauptbahnhof ",
                            "Type": "Stop",
                            "Platform": {"Name": "3", "Type": "Platform"},
                            "Latitude": 5657497,
                            "Longitude": 4621393
                        },
                        {
                            "ArrivalTime": "/Date(1532819400000-0000)/",
                            "DepartureTime": "/Date(1532819400000-0000)/",
                            "Place": "Dresden",
                            "Name": "Postplatz",
                            "Type": "Stop",
                            "Latitude": 0,
                            "Longitude": 0
                        }
                    ]
                }
            ]
        }]
    }"#;

    #[test]
    fn route_without_routes_is_empty() {
        let route = convert_route(&trips_response(r#"{"Status": {"Code": "Ok"}}"#)).unwrap();
        assert!(route.origin.is_none());
        assert!(route.destination.is_none());
        assert!(route.trips.is_empty());
    }

    #[test]
    fn route_status_error() {
        let err = convert_route(&trips_response(
            r#"{"Status": {"Code": "ServiceError", "Message": "no route"}}"#,
        ))
        .unwrap_err();
        assert_eq!(err.kind(), "ServiceError");
    }

    #[test]
    fn route_reconstruction() {
        let route = convert_route(&trips_response(TRIP_JSON)).unwrap();
        assert_eq!(route.trips.len(), 1);

        let trip = &route.trips[0];
        assert_eq!(trip.duration, 15);
        assert_eq!(trip.interchanges, 0);
        assert_eq!(trip.nodes.len(), 2);

        let walk = &trip.nodes[0];
        assert_eq!(walk.mode, Mode::Footpath);
        assert_eq!(walk.duration, 3);
        assert_eq!(walk.line, "");
        assert_eq!(walk.direction, "");
        assert!(walk.departure.is_none());
        assert!(walk.diva.is_none());
        assert_eq!(walk.path.len(), 2);

        let tram = &trip.nodes[1];
        assert_eq!(tram.mode, Mode::Tram);
        assert_eq!(tram.line, "3");
        assert_eq!(tram.direction, "Wilder Mann");
        assert_eq!(tram.duration, 1);
        assert_eq!(tram.diva.as_ref().unwrap().number, 11003);
        // The 0|0 pair is dropped.
        assert_eq!(tram.path.len(), 2);

        assert_eq!(tram.stops[0].name, "Hauptbahnhof");
        assert!(tram.stops[0].coords.is_some());
        assert!(tram.stops[1].coords.is_none());

        let departure = tram.departure.as_ref().unwrap();
        assert_eq!(departure.time.timestamp_millis(), 1_532_818_980_000);
        assert_eq!(departure.platform.as_ref().unwrap().name, "3");
        let arrival = tram.arrival.as_ref().unwrap();
        assert_eq!(arrival.name, "Postplatz");

        // The trip starts with a walk, so only the arrival is known.
        assert!(trip.departure.is_none());
        assert_eq!(trip.arrival.as_ref().unwrap().name, "Postplatz");
        assert!(route.origin.is_none());
        assert_eq!(route.destination.as_ref().unwrap().name, "Postplatz");
    }

    #[test]
    fn trip_stops_are_always_tagged_stop() {
        let json = TRIP_JSON.replacen(r#""Type": "Stop""#, r#""Type": "Platform""#, 1);
        let route = convert_route(&trips_response(&json)).unwrap();
        let tram = &route.trips[0].nodes[1];
        assert!(tram.stops.iter().all(|s| s.kind == "Stop"));
        assert_eq!(tram.departure.as_ref().unwrap().kind, "Stop");
    }

    #[test]
    fn bad_timestamp_fails_the_route() {
        let json = TRIP_JSON.replace("/Date(1532819400000-0000)/", "/Date()/");
        let err = convert_route(&trips_response(&json)).unwrap_err();
        assert!(matches!(err, VvoError::Conversion(ConversionError::InvalidTime(_))));
    }

    #[test]
    fn leg_without_mot_fails() {
        let json = r#"{
            "Status": {"Code": "Ok"},
            "Routes": [{"PartialRoutes": [{"Duration": 2}]}]
        }"#;
        let err = convert_route(&trips_response(json)).unwrap_err();
        assert!(matches!(err, VvoError::Conversion(ConversionError::MissingField("Mot"))));
    }

    #[test]
    fn departures_relative_times() {
        let json = r#"{
            "Status": {"Code": "Ok"},
            "Name": "Postplatz",
            "Departures": [
                {
                    "Id": "1",
                    "LineName": "8",
                    "Direction": "Hellerau",
                    "Platform": {"Name": "4", "Type": "Platform"},
                    "Mot": "Tram",
                    "RealTime": "/Date(1532819040000-0000)/",
                    "ScheduledTime": "/Date(1532818920000-0000)/",
                    "State": "Delayed",
                    "Diva": {"Number": "11008", "Network": "voe"}
                },
                {
                    "Id": "2",
                    "LineName": "62",
                    "Direction": "Löbtau",
                    "Mot": "CityBus",
                    "ScheduledTime": "/Date(1532819100000-0000)/"
                }
            ]
        }"#;
        let response: DepartureMonitorResponse = serde_json::from_str(json).unwrap();
        let now = Utc.timestamp_millis_opt(1_532_818_800_000).unwrap();

        let departures = convert_departures(&response, now).unwrap();
        assert_eq!(departures.len(), 2);

        let tram = &departures[0];
        assert_eq!(tram.arrival_time_relative, 4);
        assert_eq!(tram.scheduled_time_relative, 2);
        assert_eq!(tram.delay_time, 2);
        assert!(tram.is_delayed());
        assert_eq!(tram.state, "Delayed");
        assert_eq!(tram.platform.as_ref().unwrap().kind, "Platform");
        assert_eq!(tram.diva.as_ref().unwrap().network, "voe");

        let bus = &departures[1];
        assert_eq!(bus.arrival_time, bus.scheduled_time);
        assert_eq!(bus.delay_time, 0);
        assert_eq!(bus.state, "Unknown");
        assert_eq!(bus.mode, Mode::CityBus);
        assert!(bus.platform.is_none());
    }

    #[test]
    fn departures_missing_list_is_empty() {
        let response: DepartureMonitorResponse =
            serde_json::from_str(r#"{"Status": {"Code": "Ok"}}"#).unwrap();
        assert!(convert_departures(&response, Utc::now()).unwrap().is_empty());
    }

    #[test]
    fn points_skip_unusable_records() {
        let response: PointFinderResponse = serde_json::from_str(
            r#"{
                "Status": {"Code": "Ok"},
                "PointStatus": "List",
                "Points": [
                    "33000028|||Hauptbahnhof|5657516|4621644|0||",
                    "33000999||||5657516|4621644|0||",
                    "poiID:2104107859:14612000:|p||Zwinger|5657930|4621460|0||"
                ]
            }"#,
        )
        .unwrap();

        let points = convert_points(&response).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].kind, PointType::Stop);
        assert_eq!(points[1].kind, PointType::Poi);
    }

    #[test]
    fn address_keeps_only_stops() {
        let response: PointFinderResponse = serde_json::from_str(
            r#"{
                "Status": {"Code": "Ok"},
                "PointStatus": "Identified",
                "Points": [
                    "coord:4621644:5657516:NAV4:Dresden|c|Dresden|Wiener Platz|5657516|4621644|0||",
                    "33000028|||Hauptbahnhof|5657497|4621393|120||",
                    "poiID:2104107859:14612000:|p||Zwinger|5657930|4621460|0||",
                    "33000031|||Hauptbahnhof Nord|5657800|4621500|300||"
                ]
            }"#,
        )
        .unwrap();

        let address = convert_address(&response).unwrap().unwrap();
        assert_eq!(address.point.kind, PointType::Coords);
        assert_eq!(address.point.name, "Wiener Platz");
        let names: Vec<&str> = address.stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Hauptbahnhof", "Hauptbahnhof Nord"]);
    }

    #[test]
    fn address_empty() {
        let response: PointFinderResponse =
            serde_json::from_str(r#"{"Status": {"Code": "Ok"}, "PointStatus": "NotIdentified"}"#)
                .unwrap();
        assert!(convert_address(&response).unwrap().is_none());
    }

    #[test]
    fn lines_with_directions() {
        let response: LinesResponse = serde_json::from_str(
            r#"{
                "Status": {"Code": "Ok"},
                "Lines": [{
                    "Name": "3",
                    "Mot": "Tram",
                    "Diva": {"Number": "11003", "Network": "voe"},
                    "Directions": [{"Name": "Wilder Mann"}, {"Name": "Coschütz"}]
                }, {
                    "Name": "Alita",
                    "Mot": "HailedSharedTaxi"
                }]
            }"#,
        )
        .unwrap();

        let lines = convert_lines(&response).unwrap();
        assert_eq!(lines[0].mode, Mode::Tram);
        assert_eq!(lines[0].directions, ["Wilder Mann", "Coschütz"]);
        assert!(lines[1].diva.is_none());
        assert!(lines[1].directions.is_empty());
    }

    #[test]
    fn coordinates_body() {
        let coord = convert_coordinates("5657516|4621644").unwrap();
        assert!((coord.latitude - 51.04).abs() < 0.01);
        assert!(convert_coordinates("\"5657516|4621644|\"").is_some());
        assert!(convert_coordinates("0|0").is_none());
        assert!(convert_coordinates("").is_none());
    }
}
