use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use yew::prelude::*;

use crate::models::coordinate::Coordinate;
use crate::routing::resolver::{RouteResult, RouteSource};

#[wasm_bindgen]
extern "C" {
    type LeafletMap;
    type Layer;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    fn leaflet_map(container_id: &str, options: &JsValue) -> LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(lat_lng: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    fn div_icon(options: &JsValue) -> JsValue;

    #[wasm_bindgen(js_namespace = L, js_name = polyline)]
    fn polyline(lat_lngs: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &LeafletMap, bounds: &JsValue, options: &JsValue);

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LeafletMap, layer: &Layer);

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, map: &LeafletMap) -> Layer;

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &Layer, lat_lng: &JsValue);
}

fn js(value: &Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn lat_lng(c: Coordinate) -> JsValue {
    js(&json!(c.as_lat_lng()))
}

fn fit_options() -> JsValue {
    js(&json!({ "padding": [50, 50] }))
}

/// Leaflet objects owned by one mounted map.
struct MapView {
    map: LeafletMap,
    current: Layer,
    route_layers: Vec<Layer>,
}

impl MapView {
    fn create(container_id: &str, style_url: &str, start: Coordinate, destination: Coordinate) -> Self {
        let center = start.midpoint(&destination);
        let map = leaflet_map(
            container_id,
            &js(&json!({
                "center": center.as_lat_lng(),
                "zoom": 17,
                "zoomControl": false,
                "attributionControl": false,
                "dragging": false,
                "scrollWheelZoom": false,
                "doubleClickZoom": false,
                "touchZoom": false,
                "boxZoom": false,
                "keyboard": false,
            })),
        );
        tile_layer(style_url, &js(&json!({ "attribution": "" }))).add_to(&map);

        let current_icon = div_icon(&js(&json!({
            "className": "custom-marker",
            "html": "<div class=\"marker-current\"></div>",
            "iconSize": [14, 14],
            "iconAnchor": [7, 7],
        })));
        let destination_icon = div_icon(&js(&json!({
            "className": "custom-marker",
            "html": "<div class=\"marker-destination-wrap\"><img src=\"/favicon.png\" class=\"marker-logo\" alt=\"Hands Free\"></div>",
            "iconSize": [20, 20],
            "iconAnchor": [10, 10],
        })));

        let current = marker(&lat_lng(start), &icon_options(current_icon)).add_to(&map);
        marker(&lat_lng(destination), &icon_options(destination_icon)).add_to(&map);

        let view = Self { map, current, route_layers: Vec::new() };
        view.fit(&[start, destination]);
        view
    }

    fn fit(&self, points: &[Coordinate]) {
        let bounds: Vec<[f64; 2]> = points.iter().map(|p| p.as_lat_lng()).collect();
        self.map.fit_bounds(&js(&json!(bounds)), &fit_options());
    }

    fn move_user(&self, user: Coordinate, destination: Coordinate) {
        self.current.set_lat_lng(&lat_lng(user));
        self.fit(&[user, destination]);
    }

    /// Replaces whatever route was drawn before. Estimates are dashed.
    fn draw_route(&mut self, route: &RouteResult) {
        for layer in self.route_layers.drain(..) {
            self.map.remove_layer(&layer);
        }
        let points: Vec<[f64; 2]> = route.polyline.iter().map(|p| p.as_lat_lng()).collect();
        let points = js(&json!(points));

        let (glow, line) = match route.source {
            RouteSource::Routed => (
                json!({ "color": "#ffffff", "weight": 8, "opacity": 0.2, "lineCap": "round", "lineJoin": "round" }),
                json!({ "color": "#ffffff", "weight": 4, "opacity": 0.9, "lineCap": "round", "lineJoin": "round" }),
            ),
            RouteSource::Fallback => (
                json!({ "color": "#ffffff", "weight": 6, "opacity": 0.15, "lineCap": "round", "dashArray": "8, 12" }),
                json!({ "color": "#ffffff", "weight": 3, "opacity": 0.6, "lineCap": "round", "dashArray": "8, 12" }),
            ),
        };
        self.route_layers.push(polyline(&points, &js(&glow)).add_to(&self.map));
        self.route_layers.push(polyline(&points, &js(&line)).add_to(&self.map));

        if route.source == RouteSource::Routed {
            self.fit(&route.polyline);
        }
    }
}

fn icon_options(icon: JsValue) -> JsValue {
    let options = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&options, &"icon".into(), &icon);
    options.into()
}

#[derive(Properties, PartialEq)]
pub struct RouteMapProps {
    pub style_url: String,
    pub destination: Coordinate,
    /// Marker position before any fix arrives.
    pub start: Coordinate,
    pub user: Option<Coordinate>,
    pub route: Option<RouteResult>,
}

#[function_component(RouteMap)]
pub fn route_map(props: &RouteMapProps) -> Html {
    let view = use_mut_ref(|| None::<MapView>);

    {
        let view = view.clone();
        let style_url = props.style_url.clone();
        let start = props.start;
        let destination = props.destination;
        use_effect_with_deps(
            move |_| {
                *view.borrow_mut() = Some(MapView::create("map", &style_url, start, destination));
                || ()
            },
            (),
        );
    }

    {
        let view = view.clone();
        let destination = props.destination;
        use_effect_with_deps(
            move |user: &Option<Coordinate>| {
                if let (Some(view), Some(user)) = (view.borrow().as_ref(), user) {
                    view.move_user(*user, destination);
                }
                || ()
            },
            props.user,
        );
    }

    {
        let view = view.clone();
        use_effect_with_deps(
            move |route: &Option<RouteResult>| {
                if let (Some(view), Some(route)) = (view.borrow_mut().as_mut(), route) {
                    view.draw_route(route);
                }
                || ()
            },
            props.route.clone(),
        );
    }

    html! {
        <div id="map" class="route-map"></div>
    }
}
