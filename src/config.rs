//! Tunables for the particle overlay and the marker layers.
//!
//! All fields have defaults, so the page can hand over a partial JSON object
//! such as `{"particles": {"count": 400}}` and keep everything else.

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Pool size.
    pub count: usize,
    /// Frames a particle lives before it respawns.
    pub max_life: u32,
    /// Velocity multiplier applied every tick.
    pub damping: f64,
    /// How strongly the wind direction accelerates each particle.
    pub wind_coupling: f64,
    /// Opacity of a particle at full life.
    pub base_opacity: f64,
    pub min_size: f64,
    pub max_size: f64,
    /// Magnitude bound for the initial random velocity components.
    pub initial_speed: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 200,
            max_life: 100,
            damping: 0.99,
            wind_coupling: 0.1,
            base_opacity: 0.6,
            min_size: 1.0,
            max_size: 4.0,
            initial_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Radius in pixels of a zero-intensity marker.
    pub base_radius: f64,
    /// Extra radius at full intensity.
    pub radius_scale: f64,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
    pub stroke_weight: f64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            base_radius: 8.0,
            radius_scale: 12.0,
            fill_opacity: 0.6,
            stroke_opacity: 0.8,
            stroke_weight: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub particles: ParticleConfig,
    pub markers: MarkerConfig,
}

impl ViewConfig {
    /// Parses a (possibly partial) JSON object and validates the result.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ViewConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.particles;
        let m = &self.markers;
        check_non_negative("particles.damping", p.damping)?;
        check_non_negative("particles.wind_coupling", p.wind_coupling)?;
        check_unit("particles.base_opacity", p.base_opacity)?;
        check_non_negative("particles.min_size", p.min_size)?;
        check_non_negative("particles.initial_speed", p.initial_speed)?;
        if !(p.max_size.is_finite() && p.max_size > p.min_size) {
            return Err(Error::Config(format!(
                "particles.max_size must exceed min_size ({} <= {})",
                p.max_size, p.min_size
            )));
        }
        if p.max_life == 0 {
            return Err(Error::Config("particles.max_life must be at least 1".into()));
        }
        check_non_negative("markers.base_radius", m.base_radius)?;
        check_non_negative("markers.radius_scale", m.radius_scale)?;
        check_non_negative("markers.stroke_weight", m.stroke_weight)?;
        check_unit("markers.fill_opacity", m.fill_opacity)?;
        check_unit("markers.stroke_opacity", m.stroke_opacity)?;
        Ok(())
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must be a finite non-negative number, got {value}")))
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must lie in [0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ViewConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = ViewConfig::from_json(r#"{"particles": {"count": 50}}"#).unwrap();
        assert_eq!(config.particles.count, 50);
        assert_eq!(config.particles.damping, 0.99);
        assert_eq!(config.markers, MarkerConfig::default());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(ViewConfig::from_json("{}").unwrap(), ViewConfig::default());
    }

    #[test]
    fn rejects_out_of_range_opacity() {
        let err = ViewConfig::from_json(r#"{"markers": {"fill_opacity": 1.5}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_zero_life() {
        let err = ViewConfig::from_json(r#"{"particles": {"max_life": 0}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(ViewConfig::from_json("{"), Err(Error::Json(_))));
    }
}
