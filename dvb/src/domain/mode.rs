//! Transport modes and the provider's Diva line identifiers.

use std::borrow::Cow;
use std::fmt;

const ICON_BASE: &str = "https://www.dvb.de/assets/img/trans-icon";

/// A transport mode.
///
/// The provider's vocabulary is undocumented and grows over time, so
/// anything not in the catalogue is kept as [`Mode::Unknown`] with the raw
/// name rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    Tram,
    CityBus,
    IntercityBus,
    SuburbanRailway,
    Train,
    Cableway,
    Ferry,
    HailedSharedTaxi,
    Footpath,
    StairsUp,
    StairsDown,
    EscalatorUp,
    EscalatorDown,
    ElevatorUp,
    ElevatorDown,
    StayForConnection,
    Unknown(String),
}

impl Mode {
    /// Classify a mode name from the web API (`Mot`, `Mot.Type`).
    ///
    /// Matching is case-insensitive. Never fails.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "tram" => Mode::Tram,
            "bus" | "citybus" => Mode::CityBus,
            "intercitybus" => Mode::IntercityBus,
            "suburbanrailway" => Mode::SuburbanRailway,
            "train" | "rapidtransit" => Mode::Train,
            "cableway" | "overheadrailway" => Mode::Cableway,
            "ferry" => Mode::Ferry,
            "hailedsharedtaxi" => Mode::HailedSharedTaxi,
            "footpath" => Mode::Footpath,
            "mobilitystairsup" => Mode::StairsUp,
            "mobilitystairsdown" => Mode::StairsDown,
            "mobilityescalatorup" => Mode::EscalatorUp,
            "mobilityescalatordown" => Mode::EscalatorDown,
            "mobilityelevatorup" => Mode::ElevatorUp,
            "mobilityelevatordown" => Mode::ElevatorDown,
            "stayforconnection" => Mode::StayForConnection,
            _ => Mode::Unknown(name.to_string()),
        }
    }

    /// Map the numeric mode code used in packed pin connection lists.
    pub fn from_connection_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Mode::Tram),
            "2" => Some(Mode::CityBus),
            "3" => Some(Mode::IntercityBus),
            "4" => Some(Mode::Train),
            "5" => Some(Mode::SuburbanRailway),
            "6" => Some(Mode::HailedSharedTaxi),
            "7" => Some(Mode::Ferry),
            "8" => Some(Mode::Cableway),
            _ => None,
        }
    }

    /// Short machine name, e.g. `"CityBus"`.
    pub fn name(&self) -> &str {
        match self {
            Mode::Tram => "Tram",
            Mode::CityBus => "CityBus",
            Mode::IntercityBus => "IntercityBus",
            Mode::SuburbanRailway => "SuburbanRailway",
            Mode::Train => "Train",
            Mode::Cableway => "Cableway",
            Mode::Ferry => "Ferry",
            Mode::HailedSharedTaxi => "HailedSharedTaxi",
            Mode::Footpath => "Footpath",
            Mode::StairsUp => "StairsUp",
            Mode::StairsDown => "StairsDown",
            Mode::EscalatorUp => "EscalatorUp",
            Mode::EscalatorDown => "EscalatorDown",
            Mode::ElevatorUp => "ElevatorUp",
            Mode::ElevatorDown => "ElevatorDown",
            Mode::StayForConnection => "StayForConnection",
            Mode::Unknown(raw) => raw,
        }
    }

    /// Localized display title.
    pub fn title(&self) -> Cow<'_, str> {
        let title = match self {
            Mode::Tram => "Straßenbahn",
            Mode::CityBus => "Bus",
            Mode::IntercityBus => "Regionalbus",
            Mode::SuburbanRailway => "S-Bahn",
            Mode::Train => "Zug",
            Mode::Cableway => "Seil-/Schwebebahn",
            Mode::Ferry => "Fähre",
            Mode::HailedSharedTaxi => "Anrufsammeltaxi (AST)/ Rufbus",
            Mode::Footpath => "Fussweg",
            Mode::StairsUp => "Treppe aufwärts",
            Mode::StairsDown => "Treppe abwärts",
            Mode::EscalatorUp => "Rolltreppe aufwärts",
            Mode::EscalatorDown => "Rolltreppe abwärts",
            Mode::ElevatorUp => "Fahrstuhl aufwärts",
            Mode::ElevatorDown => "Fahrstuhl abwärts",
            Mode::StayForConnection => "gesicherter Anschluss",
            Mode::Unknown(raw) => return Cow::Owned(raw.to_lowercase()),
        };
        Cow::Borrowed(title)
    }

    /// Icon URL for the catalogue entries that have one.
    pub fn icon_url(&self) -> Option<String> {
        let icon = match self {
            Mode::Tram => "transport-tram.svg",
            Mode::CityBus | Mode::IntercityBus => "transport-bus.svg",
            Mode::SuburbanRailway => "transport-metropolitan.svg",
            Mode::Train => "transport-train.svg",
            Mode::Cableway => "transport-lift.svg",
            Mode::Ferry => "transport-ferry.svg",
            Mode::HailedSharedTaxi => "transport-alita.svg",
            Mode::Footpath => "transport-walk.svg",
            Mode::StairsUp | Mode::StairsDown => "transport-stairs.svg",
            Mode::EscalatorUp | Mode::EscalatorDown => "transport-escalator.svg",
            Mode::ElevatorUp | Mode::ElevatorDown => "transport-elevator.svg",
            Mode::StayForConnection => "transport-sit.svg",
            Mode::Unknown(_) => return None,
        };
        Some(format!("{ICON_BASE}/{icon}"))
    }

    /// Whether legs of this mode can carry a Diva line identifier.
    ///
    /// Walking, station furniture and connection holds are not revenue
    /// services, so the provider's Diva block is meaningless for them.
    pub fn carries_diva(&self) -> bool {
        !matches!(
            self,
            Mode::Footpath
                | Mode::StairsUp
                | Mode::StairsDown
                | Mode::EscalatorUp
                | Mode::EscalatorDown
                | Mode::ElevatorUp
                | Mode::ElevatorDown
                | Mode::StayForConnection
        )
    }

    /// Modes requested by default when routing.
    pub fn standard_modes() -> [Mode; 8] {
        [
            Mode::Tram,
            Mode::CityBus,
            Mode::IntercityBus,
            Mode::SuburbanRailway,
            Mode::Train,
            Mode::Cableway,
            Mode::Ferry,
            Mode::HailedSharedTaxi,
        ]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Provider-internal line identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diva {
    pub number: u32,
    pub network: String,
}

impl Diva {
    /// Build a Diva from the raw web API fields.
    ///
    /// Returns `None` unless the number parses to something nonzero.
    pub fn parse(number: &str, network: &str) -> Option<Self> {
        let number = number.trim().parse::<u32>().ok().filter(|n| *n != 0)?;
        Some(Self {
            number,
            network: network.to_string(),
        })
    }
}
