//! Lines serving a stop.

use super::mode::{Diva, Mode};

/// A line and the directions it runs in from a given stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub name: String,
    pub mode: Mode,
    pub diva: Option<Diva>,
    pub directions: Vec<String>,
}
