//! VVO web API request bodies and response DTOs.
//!
//! Responses map directly to the JSON the web API returns, with PascalCase
//! field names. Requests use the provider's lowercase/camelCase keys.
//! Almost everything in a response is optional because the API omits
//! fields freely, and numeric fields sometimes arrive as strings.

use serde::{Deserialize, Deserializer, Serialize};

/// The status block every web API response carries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Status {
    /// `"Ok"` on success, otherwise an error code such as `"ServiceError"`.
    pub code: String,
    pub message: Option<String>,
}

impl Status {
    pub const OK: &'static str = "Ok";

    pub fn is_ok(&self) -> bool {
        self.code == Self::OK
    }
}

/// Just the status block, for reading error bodies.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusEnvelope {
    pub status: Option<Status>,
}

/// Response from `tr/pointfinder`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PointFinderResponse {
    pub status: Option<Status>,
    /// `"List"`, `"Identified"` or `"NotIdentified"`.
    pub point_status: Option<String>,
    /// Pipe-delimited point records.
    pub points: Option<Vec<String>>,
}

/// Response from `dm` (departure monitor).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepartureMonitorResponse {
    pub status: Option<Status>,
    /// Stop name.
    pub name: Option<String>,
    /// Stop city.
    pub place: Option<String>,
    pub departures: Option<Vec<DepartureDto>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepartureDto {
    pub id: String,
    pub line_name: Option<String>,
    pub direction: Option<String>,
    pub platform: Option<PlatformDto>,
    /// Mode name, e.g. `"Tram"`.
    pub mot: Option<String>,
    /// Real-time prediction, absent when none is available.
    pub real_time: Option<String>,
    pub scheduled_time: String,
    /// `"InTime"`, `"Delayed"`, `"Cancelled"`, ...
    pub state: Option<String>,
    pub diva: Option<DivaDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlatformDto {
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DivaDto {
    #[serde(default, deserialize_with = "string_or_number")]
    pub number: Option<String>,
    pub network: Option<String>,
}

/// Response from `stt/lines`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LinesResponse {
    pub status: Option<Status>,
    pub lines: Option<Vec<LineDto>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineDto {
    pub name: String,
    pub mot: Option<String>,
    pub diva: Option<DivaDto>,
    pub directions: Option<Vec<DirectionDto>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectionDto {
    pub name: String,
}

/// Response from `tr/trips`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TripsResponse {
    pub status: Option<Status>,
    pub routes: Option<Vec<RouteDto>>,
}

/// One alternative trip.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteDto {
    pub duration: Option<u32>,
    #[serde(default)]
    pub interchanges: u32,
    /// Encoded polylines, indexed by `PartialRouteDto::map_data_index`.
    #[serde(default)]
    pub map_data: Vec<String>,
    #[serde(default)]
    pub partial_routes: Vec<PartialRouteDto>,
}

/// One leg of a trip.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartialRouteDto {
    pub duration: Option<u32>,
    pub mot: Option<MotDto>,
    pub map_data_index: Option<usize>,
    pub regular_stops: Option<Vec<RegularStopDto>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MotDto {
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub direction: Option<String>,
    pub diva: Option<DivaDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegularStopDto {
    pub name: String,
    pub place: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub platform: Option<PlatformDto>,
    /// GK4 northing, despite the name.
    #[serde(default, deserialize_with = "string_or_number")]
    pub latitude: Option<String>,
    /// GK4 easting, despite the name.
    #[serde(default, deserialize_with = "string_or_number")]
    pub longitude: Option<String>,
    pub arrival_time: String,
    pub departure_time: String,
}

/// Request body for `tr/pointfinder`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointFinderRequest<'a> {
    pub query: &'a str,
    pub limit: u32,
    pub stops_only: bool,
    #[serde(rename = "assignedstops")]
    pub assigned_stops: bool,
    pub dvb: bool,
    pub format: &'static str,
}

/// Request body for `dm`.
#[derive(Debug, Clone, Serialize)]
pub struct DepartureMonitorRequest<'a> {
    #[serde(rename = "stopid")]
    pub stop_id: &'a str,
    /// ISO 8601 instant.
    pub time: String,
    #[serde(rename = "isarrival")]
    pub is_arrival: bool,
    pub limit: u32,
    #[serde(rename = "shorttermchanges")]
    pub short_term_changes: bool,
    #[serde(rename = "mentzonly")]
    pub mentz_only: bool,
    pub format: &'static str,
}

/// Request body for `stt/lines`.
#[derive(Debug, Clone, Serialize)]
pub struct LinesRequest<'a> {
    #[serde(rename = "stopid")]
    pub stop_id: &'a str,
    pub format: &'static str,
}

/// Request body for `tr/trips`.
#[derive(Debug, Clone, Serialize)]
pub struct TripsRequest<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<&'a str>,
    /// ISO 8601 instant.
    pub time: String,
    #[serde(rename = "isarrivaltime")]
    pub is_arrival_time: bool,
    #[serde(rename = "shorttermchanges")]
    pub short_term_changes: bool,
    #[serde(rename = "mobilitySettings")]
    pub mobility_settings: MobilitySettings,
    #[serde(rename = "standardSettings")]
    pub standard_settings: StandardSettings,
    pub format: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MobilitySettings {
    pub mobility_restriction: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardSettings {
    pub max_changes: &'static str,
    pub walking_speed: &'static str,
    pub footpath_to_stop: u32,
    pub include_alternative_stops: bool,
    /// Mode names to route with.
    pub mot: Vec<String>,
}

/// Accept a JSON string or number and keep its text.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}
