use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement, Window};

use super::map::LeafletMap;
use super::render::{CanvasSurface, RafScheduler};
use crate::animation::AnimationDriver;
use crate::config::ViewConfig;
use crate::error::Error;
use crate::filter::unique_cities;
use crate::layers::LayerRenderer;
use crate::legend::legend_entries;
use crate::pollutant::Pollutant;
use crate::reading::parse_readings;
use crate::store::DashboardState;
use crate::synthetic::{synthetic_readings, synthetic_wind};
use crate::time::now_ms;
use crate::wind::{Direction, WindVector};

impl From<Error> for JsValue {
    fn from(e: Error) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

struct Inner {
    state: DashboardState,
    layers: LayerRenderer<LeafletMap>,
    driver: AnimationDriver<RafScheduler, CanvasSurface>,
    container: HtmlElement,
    rng: ChaCha8Rng,
}

impl Inner {
    fn render_layers(&mut self) {
        let filtered = self.state.filtered_readings();
        self.layers.render(self.state.active_layers(), &filtered);
    }

    fn sync_animation(&mut self) {
        if self.state.is_animating() {
            self.driver.enable(self.state.wind());
        } else {
            self.driver.disable();
        }
    }

    fn frame(&mut self) {
        let wind = self.state.wind().copied();
        self.driver.on_frame(wind.as_ref());
    }

    fn fit_canvas(&mut self) {
        let width = self.container.offset_width().max(0) as u32;
        let height = self.container.offset_height().max(0) as u32;
        self.driver.surface().resize(width, height);
        self.layers.map().invalidate_size();
    }

    fn load_synthetic(&mut self) {
        let now = now_ms();
        let readings = synthetic_readings(&mut self.rng, now);
        let wind = synthetic_wind(&mut self.rng, now);
        self.state.replace_readings(readings);
        self.state.set_wind(Some(wind));
        self.state.reset_clock(now);
    }

    /// Stops the loop and removes everything this dashboard put on the page.
    fn teardown(&mut self) {
        self.driver.disable();
        self.driver.scheduler().clear_callback();
        self.layers.clear();
        self.layers.map().teardown();
        self.driver.surface().canvas().remove();
    }
}

/// Dashboard mounted into a page: Leaflet map, particle canvas and state.
#[wasm_bindgen]
pub struct Dashboard {
    inner: Rc<RefCell<Inner>>,
    window: Window,
    on_resize: Option<Closure<dyn FnMut()>>,
}

fn surface_err(what: &str) -> Error {
    Error::Surface(what.to_string())
}

// Removes the canvas again when no 2D context can be had from it.
fn attach_surface(canvas: HtmlCanvasElement) -> Result<CanvasSurface, Error> {
    CanvasSurface::new(canvas.clone()).map_err(|e| {
        canvas.remove();
        e
    })
}

fn overlay_canvas(window: &Window, container: &HtmlElement) -> Result<HtmlCanvasElement, Error> {
    let document = window.document().ok_or_else(|| surface_err("no document"))?;
    let canvas = document
        .create_element("canvas")
        .map_err(|_| surface_err("cannot create canvas"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| surface_err("created element is not a canvas"))?;
    let style = canvas.style();
    for (prop, value) in [
        ("position", "absolute"),
        ("top", "0"),
        ("left", "0"),
        ("pointer-events", "none"),
        ("z-index", "1000"),
    ] {
        style
            .set_property(prop, value)
            .map_err(|_| surface_err("cannot style canvas"))?;
    }
    container
        .append_child(&canvas)
        .map_err(|_| surface_err("cannot attach canvas"))?;
    Ok(canvas)
}

#[wasm_bindgen]
impl Dashboard {
    /// Mounts into the element with id `container_id`. `config_json` may
    /// override any subset of the view configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, config_json: Option<String>) -> Result<Dashboard, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or("map container not found")?
            .dyn_into::<HtmlElement>()?;

        let config = match config_json {
            Some(json) => ViewConfig::from_json(&json)?,
            None => ViewConfig::default(),
        };

        let map = LeafletMap::mount(&container)?;
        let surface = match overlay_canvas(&window, &container).and_then(attach_surface) {
            Ok(surface) => surface,
            Err(e) => {
                map.teardown();
                return Err(e.into());
            }
        };
        let seed = (js_sys::Math::random() * f64::from(u32::MAX)) as u64 ^ now_ms() as u64;

        let inner = Rc::new(RefCell::new(Inner {
            state: DashboardState::new(now_ms()),
            layers: LayerRenderer::new(map, config.markers),
            driver: AnimationDriver::new(RafScheduler::new(window.clone()), surface, config.particles, seed),
            container,
            rng: ChaCha8Rng::seed_from_u64(seed.rotate_left(17)),
        }));

        let weak = Rc::downgrade(&inner);
        inner.borrow().driver.scheduler().set_callback(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().frame();
            }
        });

        let weak = Rc::downgrade(&inner);
        let on_resize = Closure::wrap(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().fit_canvas();
            }
        }) as Box<dyn FnMut()>);
        if let Err(e) = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref()) {
            inner.borrow_mut().teardown();
            return Err(e);
        }

        inner.borrow_mut().fit_canvas();
            }
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        inner.borrow_mut().fit_canvas();
        info!("dashboard mounted in #{}", container_id);
        Ok(Dashboard { inner, window, on_resize: Some(on_resize) })
    }

    /// Replaces the readings with the API payload. Fetch failures upstream
    /// and unusable payloads fall back to synthetic data. Returns the
    /// number of readings loaded.
    pub fn load_readings_json(&mut self, json: &str) -> usize {
        let mut inner = self.inner.borrow_mut();
        let parsed = parse_readings(json, &mut inner.rng);
        match parsed {
            Ok(readings) if !readings.is_empty() => {
                let now = now_ms();
                inner.state.replace_readings(readings);
                inner.state.reset_clock(now);
                // there is no wind feed; keep the overlay moving with a synthetic vector
                if inner.state.wind().is_none() {
                    let wind = synthetic_wind(&mut inner.rng, now);
                    inner.state.set_wind(Some(wind));
                }
            }
            Ok(_) => {
                warn!("measurements payload was empty, using synthetic readings");
                inner.load_synthetic();
            }
            Err(e) => {
                warn!("{}, using synthetic readings", e);
                inner.load_synthetic();
            }
        }
        inner.render_layers();
        inner.sync_animation();
        inner.state.readings().len()
    }

    /// Loads synthetic readings and wind.
    pub fn load_synthetic(&mut self) -> usize {
        let mut inner = self.inner.borrow_mut();
        inner.load_synthetic();
        inner.render_layers();
        inner.sync_animation();
        inner.state.readings().len()
    }

    /// Sets the shared wind. A zero direction clears it, which stops the
    /// particles on the next frame.
    pub fn set_wind(&mut self, speed: f64, dx: f64, dy: f64) -> bool {
        let mut inner = self.inner.borrow_mut();
        let wind = Direction::new(dx, dy).map(|d| WindVector::new(speed, d, now_ms()));
        let accepted = wind.is_some();
        inner.state.set_wind(wind);
        inner.sync_animation();
        accepted
    }

    /// Returns whether the layer is active afterwards. Unknown keys are
    /// ignored.
    pub fn toggle_layer(&mut self, key: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        let pollutant = match key.parse::<Pollutant>() {
            Ok(p) => p,
            Err(e) => {
                warn!("{}", e);
                return false;
            }
        };
        inner.state.toggle_layer(pollutant);
        inner.render_layers();
        inner.state.is_active(pollutant)
    }

    pub fn set_location_filter(&mut self, text: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.state.set_location_filter(text);
        inner.render_layers();
    }

    pub fn set_animating(&mut self, on: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.state.set_animating(on);
        inner.sync_animation();
    }

    pub fn toggle_animation(&mut self) -> bool {
        let mut inner = self.inner.borrow_mut();
        let on = inner.state.toggle_animation();
        inner.sync_animation();
        on
    }

    pub fn is_animating(&self) -> bool {
        self.inner.borrow().driver.is_running()
    }

    pub fn set_current_time(&mut self, ms: f64) {
        self.inner.borrow_mut().state.set_current_time(ms as i64);
    }

    pub fn current_time(&self) -> f64 {
        self.inner.borrow().state.current_time() as f64
    }

    pub fn jump_hours_ago(&mut self, hours: u32) -> f64 {
        let mut inner = self.inner.borrow_mut();
        inner.state.jump_hours_ago(hours);
        inner.state.current_time() as f64
    }

    pub fn toggle_time_lapse(&mut self) -> bool {
        self.inner.borrow_mut().state.toggle_time_lapse()
    }

    pub fn set_playback_speed(&mut self, speed: f64) -> f64 {
        let mut inner = self.inner.borrow_mut();
        inner.state.set_playback_speed(speed);
        inner.state.playback_speed()
    }

    pub fn advance_time_lapse(&mut self) -> f64 {
        self.inner.borrow_mut().state.advance_time_lapse() as f64
    }

    /// Legend entries for the active pollutants as JSON.
    pub fn legend_json(&self) -> Result<String, JsValue> {
        let inner = self.inner.borrow();
        let filtered = inner.state.filtered_readings();
        let entries = legend_entries(inner.state.active_layers(), &filtered);
        serde_json::to_string(&entries).map_err(|e| Error::from(e).into())
    }

    /// Sorted city names as a JSON array, for quick filters.
    pub fn cities_json(&self) -> Result<String, JsValue> {
        let inner = self.inner.borrow();
        serde_json::to_string(&unique_cities(inner.state.readings())).map_err(|e| Error::from(e).into())
    }

    /// Stops the animation, removes the layers, the map, the canvas and the
    /// resize listener. Safe to call more than once.
    pub fn destroy(&mut self) {
        let Some(on_resize) = self.on_resize.take() else {
            return;
        };
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        {
            warn!("could not remove resize listener: {:?}", e);
        }
        self.inner.borrow_mut().teardown();
        info!("dashboard destroyed");
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.destroy();
    }
}
