//! Console helpers for poking at a running page.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;
use yew::Callback;

use crate::controller::PageController;

struct DebugHandles {
    controller: Rc<RefCell<PageController>>,
    recalculate: Callback<()>,
}

thread_local! {
    static HANDLES: RefCell<Option<DebugHandles>> = RefCell::new(None);
}

pub fn register(controller: Rc<RefCell<PageController>>, recalculate: Callback<()>) {
    HANDLES.with(|h| {
        *h.borrow_mut() = Some(DebugHandles { controller, recalculate });
    });
}

pub fn unregister() {
    HANDLES.with(|h| {
        h.borrow_mut().take();
    });
}

fn to_js(value: &serde_json::Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

#[wasm_bindgen(js_name = viewAnalytics)]
pub fn view_analytics() -> JsValue {
    HANDLES.with(|h| match &*h.borrow() {
        Some(handles) => {
            let events = to_js(&handles.controller.borrow().analytics().to_json());
            gloo_console::log!("[Hands Free] Analytics events:", events.clone());
            events
        }
        None => JsValue::NULL,
    })
}

#[wasm_bindgen(js_name = debugLocation)]
pub fn debug_location() -> JsValue {
    HANDLES.with(|h| {
        let Some(handles) = &*h.borrow() else {
            return JsValue::NULL;
        };
        let controller = handles.controller.borrow();
        let destination = controller.config().destination.location;
        let report = match controller.session().user_location {
            Some(user) => {
                let distance = user.distance_to(&destination);
                let params = controller.routing_params();
                json!({
                    "user": user,
                    "destination": destination,
                    "isFallback": controller.session().is_fallback_location,
                    "straightDistanceM": distance.round(),
                    "estimatedWalkMin": (distance * params.detour_factor / params.walking_speed_m_per_min).ceil(),
                })
            }
            None => json!({ "user": null, "destination": destination }),
        };
        log::info!("[Hands Free] Debug location: {}", report);
        to_js(&report)
    })
}

#[wasm_bindgen(js_name = forceRecalculate)]
pub fn force_recalculate() {
    log::info!("[Hands Free] Force recalculating route...");
    HANDLES.with(|h| {
        if let Some(handles) = &*h.borrow() {
            handles.recalculate.emit(());
        }
    });
}

#[wasm_bindgen(js_name = sendAnalytics)]
pub fn send_analytics() {
    HANDLES.with(|h| {
        if let Some(handles) = &*h.borrow() {
            handles.controller.borrow().analytics().flush_to_server();
        }
    });
}
