//! End-to-end runs of the store → filter → layers and wind → particles paths
//! against the recording surfaces.

use airviz::animation::AnimationDriver;
use airviz::config::ViewConfig;
use airviz::intensity::map_intensity;
use airviz::layers::LayerRenderer;
use airviz::pollutant::Pollutant;
use airviz::reading::parse_readings;
use airviz::store::DashboardState;
use airviz::surface::{ManualScheduler, RecordingCanvas, RecordingMap};
use airviz::synthetic::synthetic_readings;
use airviz::wind::{Direction, WindVector};
use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const NOW: i64 = 1_714_557_600_000;

fn seeded_state() -> DashboardState {
    let mut state = DashboardState::new(NOW);
    state.replace_readings(synthetic_readings(&mut ChaCha8Rng::seed_from_u64(21), NOW));
    state
}

fn render(state: &DashboardState, layers: &mut LayerRenderer<RecordingMap>) -> usize {
    let filtered = state.filtered_readings();
    layers.render(state.active_layers(), &filtered)
}

#[test]
fn groups_track_the_active_set_through_toggles() {
    let mut state = seeded_state();
    let mut layers = LayerRenderer::new(RecordingMap::new(), ViewConfig::default().markers);

    assert_eq!(render(&state, &mut layers), 25);
    state.toggle_layer(Pollutant::No2);
    assert_eq!(render(&state, &mut layers), 50);
    assert_eq!(layers.rendered(), state.active_layers());
    state.toggle_layer(Pollutant::Pm25);
    assert_eq!(render(&state, &mut layers), 25);
    assert_eq!(layers.rendered(), vec![Pollutant::No2]);
    assert_eq!(layers.map().group_count(), 1);
}

#[test]
fn location_filter_narrows_markers() {
    let mut state = seeded_state();
    let mut layers = LayerRenderer::new(RecordingMap::new(), ViewConfig::default().markers);
    state.set_location_filter("Houston");
    assert_eq!(render(&state, &mut layers), 5);
    assert!(layers.map().markers().all(|m| m.popup.contains("Houston Station")));

    state.set_location_filter("nowhere");
    assert_eq!(render(&state, &mut layers), 0);
    // still one (empty) group for the active pollutant
    assert_eq!(layers.map().group_count(), 1);
}

#[test]
fn marker_styles_come_from_intensity() {
    let state = seeded_state();
    let mut layers = LayerRenderer::new(RecordingMap::new(), ViewConfig::default().markers);
    render(&state, &mut layers);
    let pm25: Vec<_> = state.readings().iter().filter(|r| r.pollutant == Pollutant::Pm25).collect();
    for (marker, reading) in layers.map().markers().zip(pm25) {
        let i = map_intensity(reading.pollutant, reading.value);
        assert_relative_eq!(marker.style.radius, 8.0 + i.value * 12.0);
        assert_eq!(marker.style.color, i.color.css());
    }
}

#[test]
fn ingested_readings_render_like_synthetic_ones() {
    let json = r#"{"results": [
        {"location": "Midtown", "parameter": "pm25", "value": 10, "unit": "µg/m³",
         "date": {"utc": "2024-05-01T10:00:00Z", "local": "2024-05-01T06:00:00-04:00"},
         "coordinates": {"latitude": 40.75, "longitude": -73.98}, "country": "US", "city": "New York"},
        {"location": "Harlem", "parameter": "pm25", "value": 40, "unit": "µg/m³",
         "date": {"utc": "2024-05-01T10:00:00Z", "local": "2024-05-01T06:00:00-04:00"},
         "coordinates": null, "country": "US", "city": "New York"}
    ]}"#;
    let mut state = DashboardState::new(NOW);
    state.replace_readings(parse_readings(json, &mut ChaCha8Rng::seed_from_u64(0)).unwrap());
    state.set_location_filter("new york");
    let mut layers = LayerRenderer::new(RecordingMap::new(), ViewConfig::default().markers);
    assert_eq!(render(&state, &mut layers), 2);
    let radii: Vec<f64> = layers.map().markers().map(|m| m.style.radius).collect();
    assert_relative_eq!(radii[0], 8.0 + 0.1 * 12.0);
    assert_relative_eq!(radii[1], 8.0 + 0.4 * 12.0);

    state.set_location_filter("chicago");
    assert_eq!(render(&state, &mut layers), 0);
}

#[test]
fn animation_follows_store_wind() {
    let mut state = seeded_state();
    let config = ViewConfig::default().particles;
    let mut driver = AnimationDriver::new(ManualScheduler::new(), RecordingCanvas::new(320.0, 240.0), config, 9);

    assert!(!driver.enable(state.wind()));

    state.set_wind(Some(WindVector::new(7.0, Direction::new(1.0, 0.0).unwrap(), NOW)));
    assert!(driver.enable(state.wind()));
    for _ in 0..300 {
        assert!(driver.scheduler_mut().fire().is_some());
        assert!(driver.on_frame(state.wind()));
        for c in &driver.surface().circles {
            assert!((0.0..=320.0).contains(&c.center.0));
            assert!((0.0..=240.0).contains(&c.center.1));
            assert!((0.0..=0.6).contains(&c.alpha));
        }
    }
    assert_eq!(driver.frames(), 300);

    driver.disable();
    assert!(driver.scheduler_mut().fire().is_none());
}
