//! Stand-in data for when the measurements API is unreachable.
//!
//! The city table, value ranges and jitter are fixtures. Nothing downstream
//! depends on their exact values.

use std::f64::consts::TAU;

use rand::Rng;

use crate::pollutant::{Pollutant, MICROGRAMS_PER_CUBIC_METER};
use crate::reading::{Coordinates, Reading, Timestamp};
use crate::time::{iso8601_from_ms, MS_PER_HOUR};
use crate::wind::{Direction, WindVector};

pub const CITIES: [(&str, Coordinates); 5] = [
    ("New York", Coordinates { latitude: 40.7128, longitude: -74.006 }),
    ("Los Angeles", Coordinates { latitude: 34.0522, longitude: -118.2437 }),
    ("Chicago", Coordinates { latitude: 41.8781, longitude: -87.6298 }),
    ("Houston", Coordinates { latitude: 29.7604, longitude: -95.3698 }),
    ("Phoenix", Coordinates { latitude: 33.4484, longitude: -112.074 }),
];

const STATIONS_PER_CITY: usize = 5;
const JITTER_DEGREES: f64 = 0.1;

fn city_center(city: &str) -> Coordinates {
    CITIES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(city))
        .map(|(_, c)| *c)
        .unwrap_or(CITIES[0].1)
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, center: Coordinates) -> Coordinates {
    Coordinates {
        latitude: center.latitude + (rng.gen::<f64>() - 0.5) * JITTER_DEGREES,
        longitude: center.longitude + (rng.gen::<f64>() - 0.5) * JITTER_DEGREES,
    }
}

/// A point within ±0.05° of `city`'s center. Unknown cities use New York.
pub fn fallback_coordinates<R: Rng + ?Sized>(rng: &mut R, city: &str) -> Coordinates {
    jitter(rng, city_center(city))
}

fn base_value<R: Rng + ?Sized>(rng: &mut R, pollutant: Pollutant) -> f64 {
    match pollutant {
        Pollutant::Pm25 => rng.gen_range(10.0..90.0),
        Pollutant::O3 => rng.gen_range(20.0..170.0),
        Pollutant::No2 => rng.gen_range(15.0..115.0),
    }
}

/// Five stations per city and pollutant, measured within the last hour.
pub fn synthetic_readings<R: Rng + ?Sized>(rng: &mut R, now_ms: i64) -> Vec<Reading> {
    let mut readings = Vec::with_capacity(CITIES.len() * Pollutant::ALL.len() * STATIONS_PER_CITY);
    for (city, center) in CITIES {
        for pollutant in Pollutant::ALL {
            for station in 1..=STATIONS_PER_CITY {
                let value = (base_value(rng, pollutant) + rng.gen_range(-10.0..10.0)).max(0.0);
                let utc = now_ms - rng.gen_range(0..MS_PER_HOUR);
                let local = now_ms - rng.gen_range(0..MS_PER_HOUR);
                readings.push(Reading {
                    location: format!("{city} Station {station}"),
                    pollutant,
                    value,
                    unit: MICROGRAMS_PER_CUBIC_METER.to_string(),
                    timestamp: Timestamp { utc: iso8601_from_ms(utc), local: iso8601_from_ms(local) },
                    coordinates: jitter(rng, center),
                    country: "US".to_string(),
                    city: city.to_string(),
                });
            }
        }
    }
    readings
}

/// Random heading, 5 to 15 m/s.
pub fn synthetic_wind<R: Rng + ?Sized>(rng: &mut R, now_ms: i64) -> WindVector {
    let direction = Direction::from_angle(rng.gen_range(0.0..TAU));
    WindVector::new(rng.gen_range(5.0..15.0), direction, now_ms)
}
