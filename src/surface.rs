//! Seams to the display: the map, the overlay canvas and the frame clock.
//!
//! The browser implementations live in the `wasm` module. The recording
//! implementations here back the host preview and the tests.

use crate::reading::Coordinates;

/// Style of one circle marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    /// CSS color used for both fill and stroke.
    pub color: String,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
    pub stroke_weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinates,
    pub style: MarkerStyle,
    pub popup: String,
}

/// A map that holds markers in removable groups.
pub trait MapSurface {
    type Group;

    /// Creates an empty group and attaches it to the map.
    fn add_layer_group(&mut self) -> Self::Group;

    fn add_marker(&mut self, group: &Self::Group, marker: &Marker);

    /// Detaches the group and everything in it.
    fn remove_layer_group(&mut self, group: Self::Group);
}

/// 2D overlay in pixel space.
pub trait DrawSurface {
    /// `(width, height)` in pixels, read fresh on every call.
    fn size(&self) -> (f64, f64);

    fn clear(&mut self);

    fn draw_circle(&mut self, center: (f64, f64), radius: f64, color: &str, alpha: f64);
}

/// Opaque id of a pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Display-refresh clock. A requested frame fires once and then is spent.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// In-memory map that keeps every attached group and its markers.
#[derive(Debug, Default)]
pub struct RecordingMap {
    next_id: usize,
    groups: Vec<(usize, Vec<Marker>)>,
    removed: usize,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups currently attached.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.groups.iter().flat_map(|(_, markers)| markers.iter())
    }

    pub fn group_markers(&self, group: usize) -> Option<&[Marker]> {
        self.groups
            .iter()
            .find(|(id, _)| *id == group)
            .map(|(_, markers)| markers.as_slice())
    }
}

impl MapSurface for RecordingMap {
    type Group = usize;

    fn add_layer_group(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.groups.push((id, Vec::new()));
        id
    }

    fn add_marker(&mut self, group: &usize, marker: &Marker) {
        if let Some((_, markers)) = self.groups.iter_mut().find(|(id, _)| id == group) {
            markers.push(marker.clone());
        }
    }

    fn remove_layer_group(&mut self, group: usize) {
        let before = self.groups.len();
        self.groups.retain(|(id, _)| *id != group);
        self.removed += before - self.groups.len();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: (f64, f64),
    pub radius: f64,
    pub color: String,
    pub alpha: f64,
}

/// Canvas stand-in that keeps the circles drawn since the last clear.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    pub circles: Vec<Circle>,
    pub clears: usize,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, ..Default::default() }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

impl DrawSurface for RecordingCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.circles.clear();
        self.clears += 1;
    }

    fn draw_circle(&mut self, center: (f64, f64), radius: f64, color: &str, alpha: f64) {
        self.circles.push(Circle { center, radius, color: color.to_string(), alpha });
    }
}

/// Scheduler driven by hand: the test or preview loop fires frames itself.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: i32,
    pub pending: Option<FrameHandle>,
    pub requested: usize,
    pub cancelled: Vec<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the pending frame, as the display does when it fires one.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        self.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}
