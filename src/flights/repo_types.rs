use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Closed set of aircraft families a flight can be flown with.
///
/// Serialized by name. On input the name is matched case-insensitively, and
/// the numeric form `0..=3` (in declaration order) is accepted as well.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "AircraftInput")]
pub enum AircraftType {
    Embraer,
    Boeing,
    Airbus,
    Other,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AircraftInput {
    Index(u64),
    Name(String),
}

impl TryFrom<AircraftInput> for AircraftType {
    type Error = String;

    fn try_from(input: AircraftInput) -> Result<Self, Self::Error> {
        const ALL: [AircraftType; 4] = [
            AircraftType::Embraer,
            AircraftType::Boeing,
            AircraftType::Airbus,
            AircraftType::Other,
        ];
        match input {
            AircraftInput::Index(i) => usize::try_from(i)
                .ok()
                .and_then(|i| ALL.get(i).copied())
                .ok_or_else(|| format!("unknown aircraft type {}", i)),
            AircraftInput::Name(name) => ALL
                .into_iter()
                .find(|t| t.as_str().eq_ignore_ascii_case(&name))
                .ok_or_else(|| format!("unknown aircraft type {:?}", name)),
        }
    }
}

impl AircraftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AircraftType::Embraer => "Embraer",
            AircraftType::Boeing => "Boeing",
            AircraftType::Airbus => "Airbus",
            AircraftType::Other => "Other",
        }
    }
}

impl fmt::Display for AircraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AircraftType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Embraer" => Ok(AircraftType::Embraer),
            "Boeing" => Ok(AircraftType::Boeing),
            "Airbus" => Ok(AircraftType::Airbus),
            "Other" => Ok(AircraftType::Other),
            other => anyhow::bail!("unknown aircraft type {:?}", other),
        }
    }
}

/// A stored flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: i64,
    pub flight_number: String,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_date: OffsetDateTime,
    pub departure_location: String,
    pub destination_location: String,
    pub aircraft_type: AircraftType,
}

/// Every mutable field of a flight; the input to create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightDraft {
    pub flight_number: String,
    pub departure_date: OffsetDateTime,
    pub departure_location: String,
    pub destination_location: String,
    pub aircraft_type: AircraftType,
}

impl FlightDraft {
    pub fn into_flight(self, id: i64) -> Flight {
        Flight {
            id,
            flight_number: self.flight_number,
            departure_date: self.departure_date,
            departure_location: self.departure_location,
            destination_location: self.destination_location,
            aircraft_type: self.aircraft_type,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct FlightRow {
    pub id: i64,
    pub flight_number: String,
    pub departure_date: OffsetDateTime,
    pub departure_location: String,
    pub destination_location: String,
    pub aircraft_type: String,
}

impl TryFrom<FlightRow> for Flight {
    type Error = anyhow::Error;

    fn try_from(r: FlightRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            aircraft_type: r.aircraft_type.parse()?,
            flight_number: r.flight_number,
            departure_date: r.departure_date,
            departure_location: r.departure_location,
            destination_location: r.destination_location,
        })
    }
}
