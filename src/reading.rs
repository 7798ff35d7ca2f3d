//! Pollution readings and their ingestion from the measurements API.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::pollutant::Pollutant;
use crate::synthetic::fallback_coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Measurement time in both UTC and station-local ISO-8601 form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub utc: String,
    pub local: String,
}

/// One pollutant measurement at a station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Station name.
    pub location: String,
    #[serde(rename = "parameter")]
    pub pollutant: Pollutant,
    pub value: f64,
    pub unit: String,
    #[serde(rename = "date")]
    pub timestamp: Timestamp,
    pub coordinates: Coordinates,
    pub country: String,
    pub city: String,
}

/// Loosely-typed row as the API hands it over. Every field may be missing
/// or `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawReading {
    location: Option<String>,
    parameter: Option<String>,
    value: Option<f64>,
    unit: Option<String>,
    date: Option<RawTimestamp>,
    coordinates: Option<RawCoordinates>,
    country: Option<String>,
    city: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTimestamp {
    utc: Option<String>,
    local: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCoordinates {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl RawCoordinates {
    fn usable(&self) -> Option<Coordinates> {
        let c = Coordinates { latitude: self.latitude?, longitude: self.longitude? };
        c.is_valid().then_some(c)
    }
}

impl RawReading {
    fn into_reading<R: Rng + ?Sized>(self, rng: &mut R) -> Option<Reading> {
        let location = self.location.unwrap_or_default();
        let city = self.city.unwrap_or_default();
        let pollutant = match self.parameter.as_deref().unwrap_or_default().parse::<Pollutant>() {
            Ok(p) => p,
            Err(e) => {
                debug!("skipping reading from '{}': {}", location, e);
                return None;
            }
        };
        let coordinates = match self.coordinates.as_ref().and_then(RawCoordinates::usable) {
            Some(c) => c,
            None => {
                debug!("substituting coordinates for '{}' near '{}'", location, city);
                fallback_coordinates(rng, &city)
            }
        };
        let value = match self.value {
            Some(v) if v.is_finite() => v.max(0.0),
            _ => 0.0,
        };
        let date = self.date.unwrap_or_default();
        Some(Reading {
            location,
            pollutant,
            value,
            unit: self.unit.unwrap_or_default(),
            timestamp: Timestamp {
                utc: date.utc.unwrap_or_default(),
                local: date.local.unwrap_or_default(),
            },
            coordinates,
            country: self.country.unwrap_or_default(),
            city,
        })
    }
}

/// Decodes readings from either a bare JSON array or a `{"results": [...]}`
/// envelope.
///
/// Rows are decoded one at a time: a row that does not decode, or that names
/// an unknown `parameter`, is dropped on its own. Rows without usable
/// coordinates are kept and placed near their city.
pub fn parse_readings<R: Rng + ?Sized>(json: &str, rng: &mut R) -> Result<Vec<Reading>> {
    let rows = match serde_json::from_str::<Value>(json)? {
        Value::Array(rows) => rows,
        Value::Object(mut envelope) => match envelope.remove("results") {
            Some(Value::Array(rows)) => rows,
            _ => return Err(Error::Payload("object has no `results` array".into())),
        },
        _ => return Err(Error::Payload("expected an array of rows or a `results` envelope".into())),
    };
    let total = rows.len();
    let readings: Vec<Reading> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| match serde_json::from_value::<RawReading>(row) {
            Ok(raw) => raw.into_reading(rng),
            Err(e) => {
                debug!("skipping malformed row {}: {}", i, e);
                None
            }
        })
        .collect();
    if readings.len() < total {
        debug!("kept {} of {} rows", readings.len(), total);
    }
    Ok(readings)
}
