//! Per-pollutant marker layers.
//!
//! Every pass tears down all groups and rebuilds one group per active
//! pollutant, so the attached groups always mirror the active set.

use log::debug;

use crate::config::MarkerConfig;
use crate::intensity::map_intensity;
use crate::pollutant::Pollutant;
use crate::reading::Reading;
use crate::surface::{MapSurface, Marker, MarkerStyle};
use crate::time::format_timestamp;

/// Popup body for a marker.
pub fn popup_text(reading: &Reading) -> String {
    format!(
        "{}\nValue: {:.2} {}\nLocation: {}\nTime: {}",
        reading.pollutant.key().to_uppercase(),
        reading.value,
        reading.unit,
        reading.location,
        format_timestamp(&reading.timestamp.utc),
    )
}

pub fn marker_for(reading: &Reading, config: &MarkerConfig) -> Marker {
    let intensity = map_intensity(reading.pollutant, reading.value);
    Marker {
        position: reading.coordinates,
        style: MarkerStyle {
            radius: config.base_radius + intensity.value * config.radius_scale,
            color: intensity.color.css(),
            fill_opacity: config.fill_opacity,
            stroke_opacity: config.stroke_opacity,
            stroke_weight: config.stroke_weight,
        },
        popup: popup_text(reading),
    }
}

pub struct LayerRenderer<M: MapSurface> {
    map: M,
    config: MarkerConfig,
    groups: Vec<(Pollutant, M::Group)>,
}

impl<M: MapSurface> LayerRenderer<M> {
    pub fn new(map: M, config: MarkerConfig) -> Self {
        Self { map, config, groups: Vec::new() }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// Pollutants that currently have a group on the map, in render order.
    pub fn rendered(&self) -> Vec<Pollutant> {
        self.groups.iter().map(|(p, _)| *p).collect()
    }

    /// Replaces all groups with one per entry of `active`. `readings` should
    /// already be location-filtered. Returns the number of markers placed.
    pub fn render(&mut self, active: &[Pollutant], readings: &[&Reading]) -> usize {
        self.clear();
        let mut placed = 0;
        for &pollutant in active {
            if self.groups.iter().any(|(p, _)| *p == pollutant) {
                continue;
            }
            let group = self.map.add_layer_group();
            for reading in readings.iter().filter(|r| r.pollutant == pollutant) {
                self.map.add_marker(&group, &marker_for(reading, &self.config));
                placed += 1;
            }
            self.groups.push((pollutant, group));
        }
        debug!("rendered {} markers across {} layers", placed, self.groups.len());
        placed
    }

    /// Removes every group from the map.
    pub fn clear(&mut self) {
        for (_, group) in self.groups.drain(..) {
            self.map.remove_layer_group(group);
        }
    }
}

impl<M: MapSurface> Drop for LayerRenderer<M> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{Coordinates, Timestamp};
    use crate::surface::RecordingMap;

    fn reading(pollutant: Pollutant, value: f64) -> Reading {
        Reading {
            location: "Queens Station".to_string(),
            pollutant,
            value,
            unit: "µg/m³".to_string(),
            timestamp: Timestamp {
                utc: "2024-05-01T10:15:00Z".to_string(),
                local: "2024-05-01T06:15:00-04:00".to_string(),
            },
            coordinates: Coordinates { latitude: 40.7, longitude: -73.8 },
            country: "US".to_string(),
            city: "New York".to_string(),
        }
    }

    fn renderer() -> LayerRenderer<RecordingMap> {
        LayerRenderer::new(RecordingMap::new(), MarkerConfig::default())
    }

    #[test]
    fn radius_and_alpha_follow_intensity() {
        let marker = marker_for(&reading(Pollutant::Pm25, 50.0), &MarkerConfig::default());
        assert_eq!(marker.style.radius, 14.0);
        assert_eq!(marker.style.fill_opacity, 0.6);
        assert_eq!(marker.style.stroke_opacity, 0.8);
        assert_eq!(marker.position, Coordinates { latitude: 40.7, longitude: -73.8 });
        let full = marker_for(&reading(Pollutant::Pm25, 500.0), &MarkerConfig::default());
        assert_eq!(full.style.radius, 20.0);
    }

    #[test]
    fn popup_lists_pollutant_value_station_and_time() {
        assert_eq!(
            popup_text(&reading(Pollutant::No2, 12.346)),
            "NO2\nValue: 12.35 µg/m³\nLocation: Queens Station\nTime: 2024-05-01 10:15 UTC"
        );
    }

    #[test]
    fn one_group_per_active_pollutant() {
        let readings = vec![
            reading(Pollutant::Pm25, 10.0),
            reading(Pollutant::O3, 20.0),
            reading(Pollutant::Pm25, 40.0),
        ];
        let refs: Vec<&Reading> = readings.iter().collect();
        let mut r = renderer();
        assert_eq!(r.render(&[Pollutant::Pm25, Pollutant::No2], &refs), 2);
        assert_eq!(r.rendered(), vec![Pollutant::Pm25, Pollutant::No2]);
        assert_eq!(r.map().group_count(), 2);
        // NO2 has no readings but still gets an empty group
        assert_eq!(r.map().group_markers(1), Some(&[][..]));
    }

    #[test]
    fn rerender_is_idempotent() {
        let readings = vec![reading(Pollutant::Pm25, 10.0), reading(Pollutant::O3, 90.0)];
        let refs: Vec<&Reading> = readings.iter().collect();
        let active = [Pollutant::Pm25, Pollutant::O3];
        let mut r = renderer();
        r.render(&active, &refs);
        let first: Vec<Marker> = r.map().markers().cloned().collect();
        r.render(&active, &refs);
        let second: Vec<Marker> = r.map().markers().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(r.map().group_count(), 2);
        assert_eq!(r.map().removed_count(), 2);
    }

    #[test]
    fn deactivated_pollutants_leave_no_groups() {
        let readings = vec![reading(Pollutant::Pm25, 10.0), reading(Pollutant::O3, 90.0)];
        let refs: Vec<&Reading> = readings.iter().collect();
        let mut r = renderer();
        r.render(&[Pollutant::Pm25, Pollutant::O3], &refs);
        r.render(&[Pollutant::O3], &refs);
        assert_eq!(r.rendered(), vec![Pollutant::O3]);
        assert_eq!(r.map().group_count(), 1);
        r.render(&[], &refs);
        assert_eq!(r.map().group_count(), 0);
    }

    #[test]
    fn duplicate_active_entries_render_once() {
        let readings = vec![reading(Pollutant::Pm25, 10.0)];
        let refs: Vec<&Reading> = readings.iter().collect();
        let mut r = renderer();
        assert_eq!(r.render(&[Pollutant::Pm25, Pollutant::Pm25], &refs), 1);
        assert_eq!(r.map().group_count(), 1);
    }

    #[test]
    fn clear_detaches_everything() {
        let readings = vec![reading(Pollutant::Pm25, 10.0)];
        let refs: Vec<&Reading> = readings.iter().collect();
        let mut r = renderer();
        r.render(&Pollutant::ALL, &refs);
        r.clear();
        assert!(r.rendered().is_empty());
        assert_eq!(r.map().group_count(), 0);
    }
}
