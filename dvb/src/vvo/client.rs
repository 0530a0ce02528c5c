//! VVO web API HTTP client.
//!
//! Provides async methods for the point finder, departure monitor, line
//! listing, router and the dvb.de map endpoints. Each method issues exactly
//! one request and hands the body to [`super::convert`].

use chrono::{DateTime, Duration, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{
    Address, Coordinate, Departure, Line, Mode, Pin, PinType, Point, PointType, Projection,
    Route,
};

use super::convert::{
    convert_address, convert_coordinates, convert_departures, convert_lines, convert_pins,
    convert_points, convert_route,
};
use super::error::VvoError;
use super::status::convert_error;
use super::types::{
    DepartureMonitorRequest, DepartureMonitorResponse, LinesRequest, LinesResponse,
    MobilitySettings, PointFinderRequest, PointFinderResponse, StandardSettings, TripsRequest,
    TripsResponse,
};

/// Default base URL for the VVO web API.
const DEFAULT_WEBAPI_BASE_URL: &str = "https://webapi.vvo-online.de";

/// Default base URL for the dvb.de map endpoints.
const DEFAULT_MAP_BASE_URL: &str = "https://www.dvb.de/apps/map";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How many point finder results to ask for by default.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// How much of an unparseable body to keep for diagnosis.
const BODY_PREVIEW_CHARS: usize = 500;

/// Configuration for the VVO client.
#[derive(Debug, Clone)]
pub struct VvoConfig {
    /// Base URL for the web API (point finder, monitor, lines, router)
    pub webapi_base_url: String,
    /// Base URL for the map endpoints (pins, coordinates)
    pub map_base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl VvoConfig {
    /// Create a config pointing at the production endpoints.
    pub fn new() -> Self {
        Self {
            webapi_base_url: DEFAULT_WEBAPI_BASE_URL.to_string(),
            map_base_url: DEFAULT_MAP_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("dvb-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set a custom web API base URL (for testing).
    pub fn with_webapi_base_url(mut self, url: impl Into<String>) -> Self {
        self.webapi_base_url = url.into();
        self
    }

    /// Set a custom map base URL (for testing).
    pub fn with_map_base_url(mut self, url: impl Into<String>) -> Self {
        self.map_base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for VvoConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// VVO web API client.
///
/// Holds no state besides the connection pool, so clones are cheap and
/// independent queries can run concurrently.
#[derive(Debug, Clone)]
pub struct VvoClient {
    http: reqwest::Client,
    webapi_base_url: String,
    map_base_url: String,
}

impl VvoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: VvoConfig) -> Result<Self, VvoError> {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| VvoError::Validation("invalid User-Agent header".to_string()))?;
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            webapi_base_url: config.webapi_base_url.trim_end_matches('/').to_string(),
            map_base_url: config.map_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for the production endpoints.
    pub fn with_defaults() -> Result<Self, VvoError> {
        Self::new(VvoConfig::default())
    }

    /// Search stops, addresses and POIs by name.
    pub async fn search_point(&self, query: &str, limit: u32) -> Result<Vec<Point>, VvoError> {
        let response = self.point_finder(query, limit, false, false).await?;
        convert_points(&response)
    }

    /// Search stops by name.
    pub async fn find_stop(&self, query: &str) -> Result<Vec<Point>, VvoError> {
        let response = self
            .point_finder(query, DEFAULT_SEARCH_LIMIT, true, false)
            .await?;
        let points = convert_points(&response)?;
        Ok(points
            .into_iter()
            .filter(|p| p.kind == PointType::Stop)
            .collect())
    }

    /// Search addresses, coordinates and POIs by name.
    pub async fn find_poi(&self, query: &str) -> Result<Vec<Point>, VvoError> {
        let response = self
            .point_finder(query, DEFAULT_SEARCH_LIMIT, false, false)
            .await?;
        let points = convert_points(&response)?;
        Ok(points
            .into_iter()
            .filter(|p| p.kind != PointType::Stop)
            .collect())
    }

    /// Look up the address at a position, with the stops assigned to it.
    pub async fn find_address(&self, coord: Coordinate) -> Result<Option<Address>, VvoError> {
        validate_coordinate(coord)?;

        let gk4 = Projection::GaussKrueger.forward(coord);
        let query = format!("coord:{}:{}", gk4.easting, gk4.northing);
        let response = self.point_finder(&query, 0, false, true).await?;
        convert_address(&response)
    }

    async fn point_finder(
        &self,
        query: &str,
        limit: u32,
        stops_only: bool,
        assigned_stops: bool,
    ) -> Result<PointFinderResponse, VvoError> {
        if query.trim().is_empty() {
            return Err(VvoError::Validation("query must not be empty".to_string()));
        }

        debug!(query, limit, stops_only, "searching points");
        let request = PointFinderRequest {
            query,
            limit,
            stops_only,
            assigned_stops,
            dvb: true,
            format: "json",
        };
        self.post_json("tr/pointfinder", &request).await
    }

    /// Upcoming departures at a stop.
    ///
    /// * `stop_id` - Numeric stop ID, e.g. `"33000037"`
    /// * `offset_mins` - Start the monitor this many minutes from now
    /// * `amount` - Maximum number of departures
    pub async fn monitor(
        &self,
        stop_id: &str,
        offset_mins: i64,
        amount: u32,
    ) -> Result<Vec<Departure>, VvoError> {
        validate_id("stop_id", stop_id)?;
        if amount == 0 {
            return Err(VvoError::Validation("amount must be positive".to_string()));
        }

        let now = Utc::now();
        let time = Duration::try_minutes(offset_mins)
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or_else(|| VvoError::Validation("offset_mins out of range".to_string()))?;
        debug!(stop_id, offset_mins, amount, "fetching departures");

        let request = DepartureMonitorRequest {
            stop_id,
            time: time.to_rfc3339(),
            is_arrival: false,
            limit: amount,
            short_term_changes: true,
            mentz_only: false,
            format: "json",
        };
        let response: DepartureMonitorResponse = self.post_json("dm", &request).await?;
        let departures = convert_departures(&response, now)?;
        debug!(stop_id, count = departures.len(), "decoded departures");
        Ok(departures)
    }

    /// Lines serving a stop.
    pub async fn lines(&self, stop_id: &str) -> Result<Vec<Line>, VvoError> {
        validate_id("stop_id", stop_id)?;
        debug!(stop_id, "fetching lines");

        let request = LinesRequest {
            stop_id,
            format: "json",
        };
        let response: LinesResponse = self.post_json("stt/lines", &request).await?;
        convert_lines(&response)
    }

    /// Plan trips between two stops.
    ///
    /// * `time` - Departure time, or arrival time if `is_arrival_time`
    /// * `via` - Optional stop ID the trips must pass through
    pub async fn route(
        &self,
        origin_id: &str,
        destination_id: &str,
        time: DateTime<Utc>,
        is_arrival_time: bool,
        via: Option<&str>,
    ) -> Result<Route, VvoError> {
        validate_id("origin_id", origin_id)?;
        validate_id("destination_id", destination_id)?;
        if let Some(via) = via {
            validate_id("via", via)?;
        }
        debug!(origin_id, destination_id, %time, is_arrival_time, "planning route");

        let request = TripsRequest {
            origin: origin_id,
            destination: destination_id,
            via,
            time: time.to_rfc3339(),
            is_arrival_time,
            short_term_changes: true,
            mobility_settings: MobilitySettings {
                mobility_restriction: "None",
            },
            standard_settings: StandardSettings {
                max_changes: "Unlimited",
                walking_speed: "normal",
                footpath_to_stop: 5,
                include_alternative_stops: true,
                mot: Mode::standard_modes()
                    .iter()
                    .map(|m| m.name().to_string())
                    .collect(),
            },
            format: "json",
        };
        let response: TripsResponse = self.post_json("tr/trips", &request).await?;
        let route = convert_route(&response)?;
        debug!(trips = route.trips.len(), "decoded route");
        Ok(route)
    }

    /// Map pins inside a bounding box.
    ///
    /// * `south_west`, `north_east` - Corners of the box
    /// * `pin_types` - Categories to include
    pub async fn pins(
        &self,
        south_west: Coordinate,
        north_east: Coordinate,
        pin_types: &[PinType],
    ) -> Result<Vec<Pin>, VvoError> {
        validate_coordinate(south_west)?;
        validate_coordinate(north_east)?;
        if pin_types.is_empty() {
            return Err(VvoError::Validation(
                "at least one pin type is required".to_string(),
            ));
        }

        let sw = Projection::GaussKrueger.forward(south_west);
        let ne = Projection::GaussKrueger.forward(north_east);
        let mut query: Vec<(&str, String)> = vec![
            ("showlines", "true".to_string()),
            ("swlng", sw.easting.to_string()),
            ("swlat", sw.northing.to_string()),
            ("nelng", ne.easting.to_string()),
            ("nelat", ne.northing.to_string()),
        ];
        query.extend(
            pin_types
                .iter()
                .map(|t| ("pintypes", t.as_query_value().to_string())),
        );
        debug!(%south_west, %north_east, ?pin_types, "fetching pins");

        let body = self.get_text("pins", &query).await?;
        let records: Vec<String> = parse_body(&body)?;
        let pins = convert_pins(&records);
        debug!(count = pins.len(), "decoded pins");
        Ok(pins)
    }

    /// Position of a stop or point by ID. `None` if the provider has none.
    pub async fn coords(&self, id: &str) -> Result<Option<Coordinate>, VvoError> {
        validate_id("id", id)?;
        debug!(id, "fetching coordinates");

        let body = self.get_text("coordinates", &[("id", id.to_string())]).await?;
        Ok(convert_coordinates(&body))
    }

    async fn post_json<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, VvoError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{}", self.webapi_base_url, path);
        let response = self.http.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(convert_error(status, &body));
        }

        let body = response.text().await?;
        parse_body(&body)
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String, VvoError> {
        let url = format!("{}/{}", self.map_base_url, path);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(convert_error(status, &body));
        }

        Ok(response.text().await?)
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, VvoError> {
    serde_json::from_str(body).map_err(|e| VvoError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(BODY_PREVIEW_CHARS).collect()),
    })
}

fn validate_id(name: &str, id: &str) -> Result<(), VvoError> {
    if id.trim().is_empty() {
        return Err(VvoError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}

fn validate_coordinate(coord: Coordinate) -> Result<(), VvoError> {
    if !coord.is_valid() {
        return Err(VvoError::Validation(format!(
            "coordinate {coord} is not a valid WGS84 position"
        )));
    }
    Ok(())
}
