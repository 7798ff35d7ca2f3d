//! Dashboard state: the data on screen and every user-facing toggle.
//!
//! One `DashboardState` is built per view session and handed by reference
//! to the layer renderer and the animation driver.

use crate::filter::filter_by_location;
use crate::pollutant::Pollutant;
use crate::reading::Reading;
use crate::time::{MS_PER_DAY, MS_PER_HOUR};
use crate::wind::WindVector;

pub const MIN_PLAYBACK_SPEED: f64 = 0.5;
pub const MAX_PLAYBACK_SPEED: f64 = 4.0;
const PLAYBACK_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    /// The 24 hours ending at `now`.
    pub fn last_day(now: i64) -> Self {
        Self { start: now - MS_PER_DAY, end: now }
    }

    pub fn clamp(&self, t: i64) -> i64 {
        t.clamp(self.start, self.end)
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    readings: Vec<Reading>,
    wind: Option<WindVector>,
    active_layers: Vec<Pollutant>,
    location_filter: String,
    is_animating: bool,
    now: i64,
    time_range: TimeRange,
    current_time: i64,
    is_time_lapse: bool,
    playback_speed: f64,
}

impl DashboardState {
    pub fn new(now: i64) -> Self {
        Self {
            readings: Vec::new(),
            wind: None,
            active_layers: vec![Pollutant::Pm25],
            location_filter: String::new(),
            is_animating: false,
            now,
            time_range: TimeRange::last_day(now),
            current_time: now,
            is_time_lapse: false,
            playback_speed: 1.0,
        }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Swaps in a new reading set wholesale.
    pub fn replace_readings(&mut self, readings: Vec<Reading>) {
        self.readings = readings;
    }

    pub fn wind(&self) -> Option<&WindVector> {
        self.wind.as_ref()
    }

    pub fn set_wind(&mut self, wind: Option<WindVector>) {
        self.wind = wind;
    }

    pub fn active_layers(&self) -> &[Pollutant] {
        &self.active_layers
    }

    pub fn is_active(&self, pollutant: Pollutant) -> bool {
        self.active_layers.contains(&pollutant)
    }

    /// Adds `pollutant` at the end of the active list or removes it.
    pub fn toggle_layer(&mut self, pollutant: Pollutant) {
        if let Some(i) = self.active_layers.iter().position(|p| *p == pollutant) {
            self.active_layers.remove(i);
        } else {
            self.active_layers.push(pollutant);
        }
    }

    pub fn location_filter(&self) -> &str {
        &self.location_filter
    }

    pub fn set_location_filter(&mut self, text: impl Into<String>) {
        self.location_filter = text.into();
    }

    pub fn filtered_readings(&self) -> Vec<&Reading> {
        filter_by_location(&self.readings, &self.location_filter)
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn set_animating(&mut self, on: bool) {
        self.is_animating = on;
    }

    pub fn toggle_animation(&mut self) -> bool {
        self.is_animating = !self.is_animating;
        self.is_animating
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    /// Moves the scrubber, clamped to the time range.
    pub fn set_current_time(&mut self, t: i64) {
        self.current_time = self.time_range.clamp(t);
    }

    /// Jumps to `hours` before the moment the session started.
    pub fn jump_hours_ago(&mut self, hours: u32) {
        self.set_current_time(self.now - i64::from(hours) * MS_PER_HOUR);
    }

    /// Re-anchors the time range on a refresh.
    pub fn reset_clock(&mut self, now: i64) {
        self.now = now;
        self.time_range = TimeRange::last_day(now);
        self.current_time = self.time_range.clamp(self.current_time);
    }

    pub fn is_time_lapse(&self) -> bool {
        self.is_time_lapse
    }

    pub fn toggle_time_lapse(&mut self) -> bool {
        self.is_time_lapse = !self.is_time_lapse;
        self.is_time_lapse
    }

    pub fn playback_speed(&self) -> f64 {
        self.playback_speed
    }

    /// Snaps to the nearest half step within `0.5..=4.0`.
    pub fn set_playback_speed(&mut self, speed: f64) {
        if !speed.is_finite() {
            return;
        }
        let snapped = (speed / PLAYBACK_STEP).round() * PLAYBACK_STEP;
        self.playback_speed = snapped.clamp(MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED);
    }

    /// One time-lapse step: an hour scaled by the playback speed, wrapping to
    /// the start of the range once past its end. No-op when the lapse is off.
    pub fn advance_time_lapse(&mut self) -> i64 {
        if self.is_time_lapse {
            let step = (MS_PER_HOUR as f64 * self.playback_speed) as i64;
            let next = self.current_time + step;
            self.current_time = if next > self.time_range.end { self.time_range.start } else { next };
        }
        self.current_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::synthetic_readings;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn starts_with_pm25_active() {
        let s = DashboardState::new(NOW);
        assert_eq!(s.active_layers(), &[Pollutant::Pm25]);
        assert!(!s.is_animating());
        assert_eq!(s.current_time(), NOW);
        assert_eq!(s.time_range(), TimeRange { start: NOW - MS_PER_DAY, end: NOW });
    }

    #[test]
    fn toggle_twice_restores_layers() {
        let mut s = DashboardState::new(NOW);
        s.toggle_layer(Pollutant::O3);
        assert_eq!(s.active_layers(), &[Pollutant::Pm25, Pollutant::O3]);
        s.toggle_layer(Pollutant::O3);
        assert_eq!(s.active_layers(), &[Pollutant::Pm25]);
        s.toggle_layer(Pollutant::Pm25);
        assert!(s.active_layers().is_empty());
    }

    #[test]
    fn filtered_readings_follow_the_filter() {
        let mut s = DashboardState::new(NOW);
        s.replace_readings(synthetic_readings(&mut ChaCha8Rng::seed_from_u64(2), NOW));
        assert_eq!(s.filtered_readings().len(), 75);
        s.set_location_filter("chicago");
        assert_eq!(s.filtered_readings().len(), 15);
        s.set_location_filter("station 3");
        assert_eq!(s.filtered_readings().len(), 15);
    }

    #[test]
    fn current_time_is_clamped() {
        let mut s = DashboardState::new(NOW);
        s.set_current_time(NOW + 5);
        assert_eq!(s.current_time(), NOW);
        s.set_current_time(0);
        assert_eq!(s.current_time(), NOW - MS_PER_DAY);
        s.jump_hours_ago(12);
        assert_eq!(s.current_time(), NOW - 12 * MS_PER_HOUR);
    }

    #[test]
    fn time_lapse_steps_and_wraps() {
        let mut s = DashboardState::new(NOW);
        s.set_current_time(NOW - 2 * MS_PER_HOUR);
        assert_eq!(s.advance_time_lapse(), NOW - 2 * MS_PER_HOUR);
        s.toggle_time_lapse();
        s.set_playback_speed(2.0);
        assert_eq!(s.advance_time_lapse(), NOW);
        assert_eq!(s.advance_time_lapse(), NOW - MS_PER_DAY);
    }

    #[test]
    fn playback_speed_snaps_and_clamps() {
        let mut s = DashboardState::new(NOW);
        s.set_playback_speed(1.3);
        assert_eq!(s.playback_speed(), 1.5);
        s.set_playback_speed(10.0);
        assert_eq!(s.playback_speed(), MAX_PLAYBACK_SPEED);
        s.set_playback_speed(0.0);
        assert_eq!(s.playback_speed(), MIN_PLAYBACK_SPEED);
        s.set_playback_speed(f64::NAN);
        assert_eq!(s.playback_speed(), MIN_PLAYBACK_SPEED);
    }
}
