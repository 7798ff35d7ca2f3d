//! Frame loop for the particle overlay.
//!
//! The driver owns one recurring task on the display clock. `enable` starts
//! it with a fresh pool, each fired frame runs exactly one update and one
//! draw and then books the next frame, and `disable` cancels whatever is
//! pending.

use log::{debug, info};

use crate::config::ParticleConfig;
use crate::particles::ParticleField;
use crate::surface::{DrawSurface, FrameHandle, FrameScheduler};
use crate::wind::WindVector;

pub struct AnimationDriver<S: FrameScheduler, D: DrawSurface> {
    scheduler: S,
    surface: D,
    config: ParticleConfig,
    field: Option<ParticleField>,
    pending: Option<FrameHandle>,
    seed: u64,
    generation: u64,
    frames: u64,
}

impl<S: FrameScheduler, D: DrawSurface> AnimationDriver<S, D> {
    pub fn new(scheduler: S, surface: D, config: ParticleConfig, seed: u64) -> Self {
        Self {
            scheduler,
            surface,
            config,
            field: None,
            pending: None,
            seed,
            generation: 0,
            frames: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.field.is_some()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frames drawn since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Starts the loop with a freshly seeded pool. Without wind nothing is
    /// scheduled and `false` is returned.
    pub fn enable(&mut self, wind: Option<&WindVector>) -> bool {
        if wind.is_none() {
            debug!("no wind data, particle animation stays off");
            return false;
        }
        if self.is_running() {
            return true;
        }
        let bounds = self.surface.size();
        self.generation += 1;
        let seed = self.seed.wrapping_add(self.generation);
        self.field = Some(ParticleField::new(self.config, bounds, seed));
        self.pending = Some(self.scheduler.request_frame());
        info!("particle animation started with {} particles", self.config.count);
        true
    }

    /// Cancels the pending frame, drops the pool and wipes the overlay.
    pub fn disable(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        if self.field.take().is_some() {
            self.surface.clear();
            info!("particle animation stopped after {} frames", self.frames);
        }
    }

    /// Body of the frame callback. Uses whatever wind is current, so a new
    /// vector applies from the next frame on. Returns whether a pass ran.
    pub fn on_frame(&mut self, wind: Option<&WindVector>) -> bool {
        self.pending = None;
        if !self.is_running() {
            return false;
        }
        let Some(wind) = wind else {
            self.disable();
            return false;
        };
        let bounds = self.surface.size();
        if let Some(field) = self.field.as_mut() {
            field.update(wind, bounds);
            field.draw(&mut self.surface);
        }
        self.frames += 1;
        self.pending = Some(self.scheduler.request_frame());
        true
    }
}

impl<S: FrameScheduler, D: DrawSurface> Drop for AnimationDriver<S, D> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{ManualScheduler, RecordingCanvas};
    use crate::wind::Direction;

    type Driver = AnimationDriver<ManualScheduler, RecordingCanvas>;

    fn driver() -> Driver {
        AnimationDriver::new(ManualScheduler::new(), RecordingCanvas::new(400.0, 300.0), ParticleConfig::default(), 1)
    }

    fn wind(x: f64, y: f64) -> WindVector {
        WindVector::new(6.0, Direction::new(x, y).unwrap(), 0)
    }

    #[test]
    fn without_wind_nothing_is_scheduled() {
        let mut d = driver();
        assert!(!d.enable(None));
        assert!(!d.is_running());
        assert_eq!(d.scheduler().requested, 0);
    }

    #[test]
    fn each_frame_runs_one_pass_and_books_the_next() {
        let mut d = driver();
        let w = wind(1.0, 0.0);
        assert!(d.enable(Some(&w)));
        assert_eq!(d.scheduler().requested, 1);
        for n in 1..=5 {
            assert!(d.scheduler_mut().fire().is_some());
            assert!(d.on_frame(Some(&w)));
            assert_eq!(d.frames(), n);
            assert_eq!(d.surface().clears, n as usize);
            assert_eq!(d.surface().circles.len(), 200);
            assert_eq!(d.scheduler().requested, n as usize + 1);
        }
    }

    #[test]
    fn enabling_twice_keeps_one_loop() {
        let mut d = driver();
        let w = wind(0.0, 1.0);
        d.enable(Some(&w));
        d.enable(Some(&w));
        assert_eq!(d.scheduler().requested, 1);
    }

    #[test]
    fn disable_cancels_the_pending_frame() {
        let mut d = driver();
        let w = wind(1.0, 0.0);
        d.enable(Some(&w));
        let handle = d.pending_frame().unwrap();
        d.disable();
        assert!(!d.is_running());
        assert_eq!(d.scheduler().cancelled, vec![handle]);
        assert!(d.scheduler().pending.is_none());
        assert!(d.surface().circles.is_empty());
    }

    #[test]
    fn stale_frame_after_disable_draws_nothing() {
        let mut d = driver();
        let w = wind(1.0, 0.0);
        d.enable(Some(&w));
        d.on_frame(Some(&w));
        d.disable();
        let clears = d.surface().clears;
        assert!(!d.on_frame(Some(&w)));
        assert_eq!(d.surface().clears, clears);
        assert!(d.pending_frame().is_none());
    }

    #[test]
    fn reenabling_starts_a_fresh_pool() {
        let mut d = driver();
        let w = wind(1.0, 0.0);
        d.enable(Some(&w));
        let first = d.field().unwrap().particles().to_vec();
        d.disable();
        d.enable(Some(&w));
        assert_ne!(d.field().unwrap().particles(), &first[..]);
    }

    #[test]
    fn wind_change_applies_on_the_next_frame() {
        let mut d = driver();
        let east = wind(1.0, 0.0);
        d.enable(Some(&east));
        d.on_frame(Some(&east));
        let before: Vec<f64> = d.field().unwrap().particles().iter().map(|p| p.vy).collect();
        let south = wind(0.0, 1.0);
        d.on_frame(Some(&south));
        for (p, vy) in d.field().unwrap().particles().iter().zip(before) {
            assert!((p.vy - (vy + 0.1) * 0.99).abs() < 1e-9);
        }
    }

    #[test]
    fn losing_wind_stops_the_loop() {
        let mut d = driver();
        let w = wind(1.0, 0.0);
        d.enable(Some(&w));
        assert!(!d.on_frame(None));
        assert!(!d.is_running());
        assert!(d.pending_frame().is_none());
    }

    #[test]
    fn resize_applies_on_the_next_frame() {
        let mut d = driver();
        let w = wind(1.0, 1.0);
        d.enable(Some(&w));
        d.surface_mut().resize(40.0, 30.0);
        d.on_frame(Some(&w));
        for c in &d.surface().circles {
            assert!(c.center.0 <= 40.0 && c.center.1 <= 30.0);
        }
    }
}
