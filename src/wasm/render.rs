use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::error::Error;
use crate::surface::{DrawSurface, FrameHandle, FrameScheduler};

/// Particle overlay backed by a 2D canvas context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, Error> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| Error::Surface("getContext('2d') threw".into()))?
            .ok_or_else(|| Error::Surface("2D canvas not supported".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::Surface("context is not a CanvasRenderingContext2D".into()))?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Matches the backing store to the given CSS pixel size.
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn draw_circle(&mut self, (x, y): (f64, f64), radius: f64, color: &str, alpha: f64) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(alpha);
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        if ctx.arc(x, y, radius, 0.0, TAU).is_ok() {
            ctx.fill();
        }
        ctx.restore();
    }
}

/// `requestAnimationFrame` clock.
///
/// The callback lives in an `Rc<RefCell<Option<Closure>>>` so the frame body
/// can be installed after the state it needs exists, and so it can book
/// itself again from inside the callback.
pub struct RafScheduler {
    window: Window,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self { window, callback: Rc::new(RefCell::new(None)) }
    }

    pub fn set_callback(&self, f: impl FnMut() + 'static) {
        *self.callback.borrow_mut() = Some(Closure::wrap(Box::new(f) as Box<dyn FnMut()>));
    }

    pub fn clear_callback(&self) {
        self.callback.borrow_mut().take();
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let callback = self.callback.borrow();
        let Some(closure) = callback.as_ref() else {
            warn!("frame requested before a callback was installed");
            return FrameHandle(0);
        };
        match self.window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => FrameHandle(id),
            Err(e) => {
                warn!("requestAnimationFrame failed: {:?}", e);
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}
