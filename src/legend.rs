//! Legend summary for the active pollutants.

use serde::Serialize;

use crate::pollutant::Pollutant;
use crate::reading::Reading;

/// Simplified AQI category. Only PM2.5 is graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    Unknown,
}

impl AqiLevel {
    pub fn label(self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::UnhealthyForSensitive => "Unhealthy for Sensitive Groups",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::Unknown => "Unknown",
        }
    }
}

pub fn aqi_level(pollutant: Pollutant, value: f64) -> AqiLevel {
    match pollutant {
        Pollutant::Pm25 if value <= 12.0 => AqiLevel::Good,
        Pollutant::Pm25 if value <= 35.0 => AqiLevel::Moderate,
        Pollutant::Pm25 if value <= 55.0 => AqiLevel::UnhealthyForSensitive,
        Pollutant::Pm25 => AqiLevel::Unhealthy,
        Pollutant::O3 | Pollutant::No2 => AqiLevel::Unknown,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub pollutant: Pollutant,
    pub name: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub count: usize,
    pub average: f64,
    pub level: AqiLevel,
    pub label: &'static str,
}

/// One entry per active pollutant, averaging the (filtered) readings.
pub fn legend_entries(active: &[Pollutant], readings: &[&Reading]) -> Vec<LegendEntry> {
    active
        .iter()
        .map(|&pollutant| {
            let (count, sum) = readings
                .iter()
                .filter(|r| r.pollutant == pollutant)
                .fold((0usize, 0.0), |(n, s), r| (n + 1, s + r.value));
            let average = if count == 0 { 0.0 } else { sum / count as f64 };
            let info = pollutant.info();
            let level = aqi_level(pollutant, average);
            LegendEntry {
                pollutant,
                name: info.name,
                description: info.description,
                unit: info.unit,
                count,
                average,
                level,
                label: level.label(),
            }
        })
        .collect()
}
