//! Normalized severity and marker color for a reading.

use std::fmt;

use crate::pollutant::Pollutant;

/// Scale used for pollutant keys the dashboard does not recognize.
pub const DEFAULT_REFERENCE_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    /// Percent.
    pub saturation: f64,
    /// Percent.
    pub lightness: f64,
}

impl Hsl {
    /// White, for pollutants without a band.
    pub const NEUTRAL: Hsl = Hsl { hue: 0.0, saturation: 0.0, lightness: 100.0 };

    /// CSS `hsl()` notation.
    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({:.1}, {:.0}%, {:.1}%)", self.hue, self.saturation, self.lightness)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intensity {
    /// In `[0, 1]`.
    pub value: f64,
    pub color: Hsl,
}

fn normalize(value: f64, reference_max: f64) -> f64 {
    let ratio = value / reference_max;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

pub fn color_for(pollutant: Pollutant, intensity: f64) -> Hsl {
    let band = pollutant.hue_band();
    Hsl {
        hue: band.start - intensity * band.span,
        saturation: 100.0,
        lightness: 50.0 + intensity * 30.0,
    }
}

pub fn map_intensity(pollutant: Pollutant, value: f64) -> Intensity {
    let value = normalize(value, pollutant.reference_max());
    Intensity { value, color: color_for(pollutant, value) }
}

pub fn reference_max_for_key(key: &str) -> f64 {
    key.parse::<Pollutant>()
        .map(Pollutant::reference_max)
        .unwrap_or(DEFAULT_REFERENCE_MAX)
}

/// String-keyed variant for callers holding a raw API key. Unknown keys get
/// the default scale and the neutral color.
pub fn map_intensity_key(key: &str, value: f64) -> Intensity {
    match key.parse::<Pollutant>() {
        Ok(p) => map_intensity(p, value),
        Err(_) => Intensity { value: normalize(value, DEFAULT_REFERENCE_MAX), color: Hsl::NEUTRAL },
    }
}
