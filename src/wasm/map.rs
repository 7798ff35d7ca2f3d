//! Leaflet (`window.L`) as a [`MapSurface`].

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::error::Error;
use crate::surface::{MapSurface, Marker};

const TILE_URL: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png";
const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors © CARTO";
const NYC: (f64, f64) = (40.7128, -74.006);

#[wasm_bindgen]
extern "C" {
    pub type LMap;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn l_map(container: &HtmlElement, options: &JsValue) -> Result<LMap, JsValue>;

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &LMap, layer: &JsValue) -> LMap;

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LMap, layer: &JsValue) -> LMap;

    #[wasm_bindgen(method)]
    fn remove(this: &LMap) -> LMap;

    #[wasm_bindgen(method, js_name = invalidateSize)]
    fn invalidate_size(this: &LMap) -> LMap;

    pub type LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    fn l_layer_group() -> LayerGroup;

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_member(this: &LayerGroup, layer: &JsValue) -> LayerGroup;

    type CircleMarker;

    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    fn l_circle_marker(latlng: &Array, options: &JsValue) -> CircleMarker;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &CircleMarker, content: &str) -> CircleMarker;

    type Layer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn l_tile_layer(url: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = ["L", "control"], js_name = zoom)]
    fn l_control_zoom(options: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, map: &LMap) -> Layer;
}

fn options(pairs: &[(&str, JsValue)]) -> Object {
    let obj = Object::new();
    for (key, value) in pairs {
        // Reflect::set on a fresh plain object cannot fail.
        let _ = Reflect::set(&obj, &JsValue::from_str(key), value);
    }
    obj
}

/// Popup text as HTML: escaped, one line per `<br>`.
fn popup_html(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\n', "<br>");
    format!("<div class=\"text-black\">{escaped}</div>")
}

pub struct LeafletMap {
    map: LMap,
}

impl LeafletMap {
    /// Creates a dark-tiled map centered on New York inside `container`.
    pub fn mount(container: &HtmlElement) -> Result<Self, Error> {
        let center = Array::of2(&NYC.0.into(), &NYC.1.into());
        let map_options = options(&[
            ("center", center.into()),
            ("zoom", JsValue::from(10)),
            ("zoomControl", false.into()),
            ("attributionControl", false.into()),
        ]);
        let map = l_map(container, &map_options)
            .map_err(|e| Error::Surface(format!("Leaflet map creation failed: {:?}", e)))?;

        let tile_options = options(&[
            ("attribution", TILE_ATTRIBUTION.into()),
            ("subdomains", "abcd".into()),
            ("maxZoom", JsValue::from(19)),
        ]);
        l_tile_layer(TILE_URL, &tile_options).add_to(&map);
        l_control_zoom(&options(&[("position", "topright".into())])).add_to(&map);

        Ok(Self { map })
    }

    pub fn invalidate_size(&self) {
        self.map.invalidate_size();
    }

    /// Detaches the map from its container. Groups must be removed first.
    pub fn teardown(&self) {
        self.map.remove();
    }
}

impl MapSurface for LeafletMap {
    type Group = LayerGroup;

    fn add_layer_group(&mut self) -> LayerGroup {
        let group = l_layer_group();
        self.map.add_layer(&group);
        group
    }

    fn add_marker(&mut self, group: &LayerGroup, marker: &Marker) {
        let style = &marker.style;
        let latlng = Array::of2(&marker.position.latitude.into(), &marker.position.longitude.into());
        let marker_options = options(&[
            ("radius", style.radius.into()),
            ("fillColor", style.color.as_str().into()),
            ("color", style.color.as_str().into()),
            ("weight", style.stroke_weight.into()),
            ("opacity", style.stroke_opacity.into()),
            ("fillOpacity", style.fill_opacity.into()),
        ]);
        let circle = l_circle_marker(&latlng, &marker_options);
        circle.bind_popup(&popup_html(&marker.popup));
        group.add_member(&circle);
    }

    fn remove_layer_group(&mut self, group: LayerGroup) {
        self.map.remove_layer(&group);
    }
}
