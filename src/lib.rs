//! Air-quality map overlay: per-pollutant marker layers plus a wind-driven
//! particle animation.
//!
//! The core is plain Rust over three small traits in [`surface`]. On
//! `wasm32` the `wasm` module binds them to Leaflet, a 2D canvas and
//! `requestAnimationFrame`, and exports a `Dashboard` to JavaScript.

#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod animation;
pub mod config;
pub mod error;
pub mod filter;
pub mod intensity;
pub mod layers;
pub mod legend;
pub mod logging;
pub mod particles;
pub mod pollutant;
pub mod reading;
pub mod store;
pub mod surface;
pub mod synthetic;
pub mod time;
pub mod wind;

pub use error::{Error, Result};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod dashboard;
    mod map;
    mod render;

    pub use dashboard::Dashboard;

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        crate::logging::init(log::LevelFilter::Info);
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::Dashboard;
