use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use js_sys::{Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::PositionOptions;

use crate::error::GeoError;
use crate::models::coordinate::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub coordinate: Coordinate,
    pub accuracy: f64,
}

fn read_f64(obj: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(obj, &JsValue::from_str(key)).ok()?.as_f64()
}

fn position_options(timeout_ms: u32) -> PositionOptions {
    let options = Object::new();
    let _ = Reflect::set(&options, &"enableHighAccuracy".into(), &JsValue::TRUE);
    let _ = Reflect::set(&options, &"timeout".into(), &JsValue::from(timeout_ms));
    let _ = Reflect::set(&options, &"maximumAge".into(), &JsValue::from(0));
    options.unchecked_into::<PositionOptions>()
}

/// One high-accuracy fix, no cached positions. The platform enforces the
/// timeout and reports it as [`GeoError::Timeout`].
pub async fn request_position(timeout_ms: u32) -> Result<PositionFix, GeoError> {
    let navigator = web_sys::window().ok_or(GeoError::NotSupported)?.navigator();
    if !Reflect::has(&navigator, &"geolocation".into()).unwrap_or(false) {
        return Err(GeoError::NotSupported);
    }
    let geolocation = navigator.geolocation().map_err(|_| GeoError::NotSupported)?;

    let (tx, rx) = oneshot::channel::<Result<PositionFix, GeoError>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let tx = tx.clone();
        Closure::wrap(Box::new(move |position: JsValue| {
            let coords = Reflect::get(&position, &"coords".into()).unwrap_or(JsValue::UNDEFINED);
            let fix = match (read_f64(&coords, "latitude"), read_f64(&coords, "longitude")) {
                (Some(lat), Some(lng)) => Ok(PositionFix {
                    coordinate: Coordinate::new(lat, lng),
                    accuracy: read_f64(&coords, "accuracy").unwrap_or(f64::NAN),
                }),
                _ => Err(GeoError::PositionUnavailable),
            };
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(fix);
            }
        }) as Box<dyn FnMut(JsValue)>)
    };

    let on_error = {
        let tx = tx.clone();
        Closure::wrap(Box::new(move |error: JsValue| {
            let code = read_f64(&error, "code").unwrap_or(2.0) as u16;
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(GeoError::from_code(code)));
            }
        }) as Box<dyn FnMut(JsValue)>)
    };

    log::info!("[Hands Free] Requesting geolocation...");
    geolocation
        .get_current_position_with_error_callback_and_options(
            on_success.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
            &position_options(timeout_ms),
        )
        .map_err(|_| GeoError::NotSupported)?;

    // closures stay alive until one of them has answered
    rx.await.unwrap_or(Err(GeoError::PositionUnavailable))
}
