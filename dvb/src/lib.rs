//! Client library for the Dresden public transit (DVB/VVO) web API.
//!
//! [`vvo::VvoClient`] queries stops, departures, lines, trips and map pins.
//! The decoded values live in [`domain`], together with the coordinate
//! transforms and record parsers the provider's text formats need.

pub mod domain;
pub mod vvo;
