use chrono::{DateTime, Utc};
use gloo_net::http::Request;
use serde::Serialize;
use serde_json::{json, Map, Value};
use wasm_bindgen::{JsCast, JsValue};

use crate::config;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    #[serde(rename = "event")]
    pub name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "timeOnPage")]
    pub seconds_since_page_load: i64,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// External tag manager. Failures are reported back and ignored by the sink.
pub trait TagHook {
    fn forward(&self, name: &str, properties: &Value) -> Result<(), String>;
}

/// Calls `window.gtag('event', name, properties)` when the page loaded it.
pub struct GtagHook;

impl TagHook for GtagHook {
    fn forward(&self, name: &str, properties: &Value) -> Result<(), String> {
        let window = web_sys::window().ok_or("no window")?;
        let gtag = js_sys::Reflect::get(&window, &JsValue::from_str("gtag")).map_err(|e| format!("{:?}", e))?;
        let Some(gtag) = gtag.dyn_ref::<js_sys::Function>() else {
            return Ok(());
        };
        let props = properties
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| e.to_string())?;
        gtag.call3(&JsValue::NULL, &JsValue::from_str("event"), &JsValue::from_str(name), &props)
            .map(|_| ())
            .map_err(|e| format!("{:?}", e))
    }
}

/// Append-only event log for one page view.
pub struct AnalyticsSink {
    session_id: String,
    page_loaded_at: DateTime<Utc>,
    events: Vec<AnalyticsEvent>,
    hook: Option<Box<dyn TagHook>>,
}

impl AnalyticsSink {
    pub fn new(session_id: String, page_loaded_at: DateTime<Utc>, hook: Option<Box<dyn TagHook>>) -> Self {
        Self {
            session_id,
            page_loaded_at,
            events: Vec::new(),
            hook,
        }
    }

    pub fn track(&mut self, name: &str, properties: Value) {
        self.track_at(name, properties, Utc::now());
    }

    pub fn track_at(&mut self, name: &str, properties: Value, now: DateTime<Utc>) {
        let properties = match properties {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };

        if let Some(hook) = &self.hook {
            if let Err(e) = hook.forward(name, &Value::Object(properties.clone())) {
                log::debug!("[Hands Free] tag hook failed for {}: {}", name, e);
            }
        }

        self.events.push(AnalyticsEvent {
            name: name.to_string(),
            timestamp: now,
            session_id: self.session_id.clone(),
            seconds_since_page_load: (now - self.page_loaded_at).num_milliseconds().max(0) / 1000,
            properties,
        });
    }

    pub fn events(&self) -> &[AnalyticsEvent] {
        &self.events
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.events).unwrap_or_else(|_| json!([]))
    }

    /// Posts every event to the analytics endpoint. Only reachable from the
    /// console debug hook.
    pub fn flush_to_server(&self) {
        for event in &self.events {
            send_to_server(event.clone());
        }
    }
}

pub fn send_to_server(event: AnalyticsEvent) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Ok(request) = Request::post(config::get_analytics_url()).json(&event) {
            let _ = request.send().await;
        }
    });
}

pub const SCROLL_MILESTONES: [u32; 4] = [25, 50, 75, 100];

/// Remembers the deepest scroll position and which milestones were reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollDepth {
    max_percent: u32,
    reported: Vec<u32>,
}

impl ScrollDepth {
    /// Returns milestones crossed for the first time.
    pub fn record(&mut self, percent: u32) -> Vec<u32> {
        if percent <= self.max_percent {
            return Vec::new();
        }
        self.max_percent = percent;
        let crossed: Vec<u32> = SCROLL_MILESTONES
            .iter()
            .copied()
            .filter(|m| percent >= *m && !self.reported.contains(m))
            .collect();
        self.reported.extend(&crossed);
        crossed
    }

    pub fn max_percent(&self) -> u32 {
        self.max_percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingHook {
        seen: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl TagHook for RecordingHook {
        fn forward(&self, name: &str, _properties: &Value) -> Result<(), String> {
            self.seen.borrow_mut().push(name.to_string());
            if self.fail {
                Err("gtag exploded".to_string())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_events_keep_insertion_order_and_context() {
        let loaded = Utc::now();
        let mut sink = AnalyticsSink::new("sess_x".to_string(), loaded, None);
        sink.track_at("page_view", json!({"language": "ko"}), loaded);
        sink.track_at("reserve_click", json!({"attempt": 1}), loaded + Duration::seconds(42));
        sink.track_at("modal_close", Value::Null, loaded + Duration::seconds(50));

        let names: Vec<&str> = sink.events().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["page_view", "reserve_click", "modal_close"]);
        assert_eq!(sink.events()[1].seconds_since_page_load, 42);
        assert_eq!(sink.events()[1].session_id, "sess_x");
        assert!(sink.events()[2].properties.is_empty());
    }

    #[test]
    fn test_hook_failures_are_swallowed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let hook = RecordingHook { seen: seen.clone(), fail: true };
        let mut sink = AnalyticsSink::new("sess_y".to_string(), Utc::now(), Some(Box::new(hook)));
        sink.track("copy_address", json!({}));
        sink.track("copy_address", json!({}));
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(sink.events().len(), 2);
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let loaded = Utc::now();
        let mut sink = AnalyticsSink::new("sess_z".to_string(), loaded, None);
        sink.track_at("scroll_depth", json!({"depth": 50}), loaded);
        let value = sink.to_json();
        assert_eq!(value[0]["event"], "scroll_depth");
        assert_eq!(value[0]["sessionId"], "sess_z");
        assert_eq!(value[0]["depth"], 50);
        assert_eq!(value[0]["timeOnPage"], 0);
    }

    #[test]
    fn test_non_object_properties_are_wrapped() {
        let mut sink = AnalyticsSink::new("s".to_string(), Utc::now(), None);
        sink.track("odd", json!(3));
        assert_eq!(sink.events()[0].properties["value"], 3);
    }

    #[test]
    fn test_scroll_milestones_fire_once() {
        let mut depth = ScrollDepth::default();
        assert_eq!(depth.record(30), vec![25]);
        assert_eq!(depth.record(20), Vec::<u32>::new());
        assert_eq!(depth.record(80), vec![50, 75]);
        assert_eq!(depth.record(80), Vec::<u32>::new());
        assert_eq!(depth.record(100), vec![100]);
        assert_eq!(depth.max_percent(), 100);
    }
}
