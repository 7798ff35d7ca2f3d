use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The pollutants the dashboard knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    O3,
    No2,
}

/// Display metadata shown in the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollutantInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub health_impact: &'static str,
}

/// Linear hue ramp: `hue = start - intensity * span`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueBand {
    pub start: f64,
    pub span: f64,
}

pub const MICROGRAMS_PER_CUBIC_METER: &str = "µg/m³";

impl Pollutant {
    pub const ALL: [Pollutant; 3] = [Pollutant::Pm25, Pollutant::O3, Pollutant::No2];

    /// Wire key used by the measurements API and the page controls.
    pub fn key(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
        }
    }

    /// Concentration (µg/m³) that maps to full intensity.
    pub fn reference_max(self) -> f64 {
        match self {
            Pollutant::Pm25 => 100.0,
            Pollutant::O3 => 200.0,
            Pollutant::No2 => 150.0,
        }
    }

    pub fn hue_band(self) -> HueBand {
        match self {
            // red sweeping toward magenta
            Pollutant::Pm25 => HueBand { start: 360.0, span: 60.0 },
            // yellow toward orange
            Pollutant::O3 => HueBand { start: 60.0, span: 20.0 },
            // green toward yellow-green
            Pollutant::No2 => HueBand { start: 120.0, span: 40.0 },
        }
    }

    pub fn info(self) -> PollutantInfo {
        match self {
            Pollutant::Pm25 => PollutantInfo {
                name: "PM2.5",
                description: "Fine particulate matter",
                unit: MICROGRAMS_PER_CUBIC_METER,
                health_impact: "Respiratory and cardiovascular effects",
            },
            Pollutant::O3 => PollutantInfo {
                name: "Ozone",
                description: "Ground-level ozone",
                unit: MICROGRAMS_PER_CUBIC_METER,
                health_impact: "Respiratory irritation",
            },
            Pollutant::No2 => PollutantInfo {
                name: "Nitrogen Dioxide",
                description: "Traffic-related pollutant",
                unit: MICROGRAMS_PER_CUBIC_METER,
                health_impact: "Respiratory inflammation",
            },
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPollutant(pub String);

impl fmt::Display for UnknownPollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown pollutant key '{}'", self.0)
    }
}

impl std::error::Error for UnknownPollutant {}

impl FromStr for Pollutant {
    type Err = UnknownPollutant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pm25" | "pm2.5" => Ok(Pollutant::Pm25),
            "o3" => Ok(Pollutant::O3),
            "no2" => Ok(Pollutant::No2),
            _ => Err(UnknownPollutant(s.to_string())),
        }
    }
}
