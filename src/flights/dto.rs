use serde::{Deserialize, Deserializer};
use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    OffsetDateTime, PrimitiveDateTime,
};

use crate::{
    error::{AppError, AppResult},
    flights::repo_types::{AircraftType, FlightDraft},
};

/// Body of `POST /flights` and `PUT /flights/:id`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRequest {
    pub flight_number: Option<String>,
    #[serde(default, deserialize_with = "departure_date")]
    pub departure_date: Option<OffsetDateTime>,
    pub departure_location: Option<String>,
    pub destination_location: Option<String>,
    pub aircraft_type: Option<AircraftType>,
}

impl FlightRequest {
    pub fn validate(self) -> AppResult<FlightDraft> {
        Ok(FlightDraft {
            flight_number: required_text(self.flight_number, "Flight number is required.")?,
            departure_date: self
                .departure_date
                .ok_or_else(|| AppError::Validation("Departure date is required.".into()))?,
            departure_location: required_text(
                self.departure_location,
                "Departure location is required.",
            )?,
            destination_location: required_text(
                self.destination_location,
                "Destination location is required.",
            )?,
            aircraft_type: self
                .aircraft_type
                .ok_or_else(|| AppError::Validation("Aircraft type is required.".into()))?,
        })
    }
}

/// RFC 3339 first; a date-time without an offset is taken as UTC.
fn departure_date<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(dt) = OffsetDateTime::parse(&raw, &Rfc3339) {
        return Ok(Some(dt));
    }
    PrimitiveDateTime::parse(&raw, &Iso8601::DEFAULT)
        .map(|dt| Some(dt.assume_utc()))
        .map_err(|e| serde::de::Error::custom(format!("invalid departureDate {:?}: {}", raw, e)))
}

fn required_text(value: Option<String>, message: &str) -> AppResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(message.into())),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn parse(json: &str) -> FlightRequest {
        serde_json::from_str(json).expect("valid json")
    }

    #[test]
    fn complete_request_validates() {
        let draft = parse(
            r#"{"flightNumber":" FA101 ","departureDate":"2024-05-01T10:30:00Z",
                "departureLocation":"Warszawa","destinationLocation":"Bydgoszcz",
                "aircraftType":"Boeing"}"#,
        )
        .validate()
        .unwrap();
        assert_eq!(draft.flight_number, "FA101");
        assert_eq!(draft.aircraft_type, AircraftType::Boeing);
    }

    #[test]
    fn departure_date_without_offset_is_utc() {
        let draft = parse(
            r#"{"flightNumber":"FA101","departureDate":"2024-05-01T10:30:00",
                "departureLocation":"Warszawa","destinationLocation":"Bydgoszcz",
                "aircraftType":"Boeing"}"#,
        )
        .validate()
        .unwrap();
        assert_eq!(draft.departure_date, datetime!(2024-05-01 10:30 UTC));
    }

    #[test]
    fn departure_date_keeps_explicit_offset() {
        let req = parse(r#"{"departureDate":"2024-05-01T12:30:00+02:00"}"#);
        assert_eq!(req.departure_date, Some(datetime!(2024-05-01 10:30 UTC)));
    }

    #[test]
    fn garbage_departure_date_fails_to_parse() {
        let res = serde_json::from_str::<FlightRequest>(r#"{"departureDate":"next tuesday"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn blank_flight_number_is_rejected() {
        let err = parse(
            r#"{"flightNumber":"  ","departureDate":"2024-05-01T10:30:00Z",
                "departureLocation":"Warszawa","destinationLocation":"Bydgoszcz",
                "aircraftType":"Boeing"}"#,
        )
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Flight number is required."));
    }

    #[test]
    fn missing_departure_date_is_rejected() {
        let err = parse(
            r#"{"flightNumber":"FA101","departureLocation":"Warszawa",
                "destinationLocation":"Bydgoszcz","aircraftType":"Other"}"#,
        )
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("Departure date")));
    }

    #[test]
    fn unknown_aircraft_fails_to_parse() {
        let res = serde_json::from_str::<FlightRequest>(r#"{"aircraftType":"Zeppelin"}"#);
        assert!(res.is_err());
    }
}
