use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::coordinate::Coordinate;
use crate::pricing::{AvailabilityTable, HoursRow, PriceTable};

#[cfg(debug_assertions)]
pub fn get_analytics_url() -> &'static str {
    "http://localhost:3001/api/analytics"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_analytics_url() -> &'static str {
    "/api/analytics"
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Destination {
    pub location: Coordinate,
    pub name: String,
    pub full_address: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricingConfig {
    pub original: PriceTable,
    pub discounted: PriceTable,
    /// Last day (inclusive) promotional prices apply.
    pub discount_cutoff: NaiveDate,
    pub availability: AvailabilityTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RoutingConfig {
    pub timeout_ms: u32,
    /// Straight-line distance beyond which no route is requested.
    pub max_routed_distance_m: f64,
    pub detour_factor: f64,
    pub walking_speed_m_per_min: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Features {
    pub in_app_banner: bool,
    pub channel_modal: bool,
    pub location_permission_modal: bool,
}

/// One landing page variant. Selected once at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LandingConfig {
    pub variant: String,
    pub destination: Destination,
    pub fallback_location: Coordinate,
    pub map_style_url: String,
    pub routing_base_url: String,
    pub routing: RoutingConfig,
    pub geolocation_timeout_ms: u32,
    /// Minutes to arrive after the reserved start.
    pub arrival_buffer_minutes: i64,
    /// Walk time shown whenever the fallback location is in use.
    pub fallback_walk_minutes: Option<u32>,
    pub picker_months_ahead: u32,
    pub pricing: PricingConfig,
    pub channel_url: Option<String>,
    pub features: Features,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            variant: "default".to_string(),
            destination: Destination {
                location: Coordinate::new(37.5448, 127.0568),
                name: "연무장길 81-1, 2층".to_string(),
                full_address: "서울 성동구 연무장길 81-1, 2층".to_string(),
            },
            fallback_location: Coordinate::new(37.5462, 127.0553),
            map_style_url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".to_string(),
            routing_base_url: "https://router.project-osrm.org".to_string(),
            routing: RoutingConfig {
                timeout_ms: 10_000,
                max_routed_distance_m: 20_000.0,
                detour_factor: 1.4,
                walking_speed_m_per_min: 80.0,
            },
            geolocation_timeout_ms: 15_000,
            arrival_buffer_minutes: 30,
            fallback_walk_minutes: Some(6),
            picker_months_ahead: 3,
            pricing: PricingConfig {
                original: PriceTable {
                    s: HoursRow { four: 4000, eight: 7000 },
                    m: HoursRow { four: 4000, eight: 7000 },
                    l: HoursRow { four: 5000, eight: 8000 },
                },
                discounted: PriceTable {
                    s: HoursRow { four: 3000, eight: 5500 },
                    m: HoursRow { four: 3000, eight: 5500 },
                    l: HoursRow { four: 4000, eight: 6500 },
                },
                discount_cutoff: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap_or(NaiveDate::MAX),
                availability: AvailabilityTable {
                    s: HoursRow { four: 3, eight: 2 },
                    m: HoursRow { four: 5, eight: 2 },
                    l: HoursRow { four: 2, eight: 0 },
                },
            },
            channel_url: Some("https://pf.kakao.com/_handsfree".to_string()),
            features: Features {
                in_app_banner: true,
                channel_modal: false,
                location_permission_modal: true,
            },
        }
    }
}

impl LandingConfig {
    /// Looks up a named variant, falling back to the default one.
    pub fn for_variant(name: &str) -> Self {
        let base = LandingConfig::default();
        match name {
            "default" | "" => base,
            "campaign" => LandingConfig {
                variant: "campaign".to_string(),
                features: Features {
                    in_app_banner: true,
                    channel_modal: true,
                    location_permission_modal: false,
                },
                ..base
            },
            "minimal" => LandingConfig {
                variant: "minimal".to_string(),
                fallback_walk_minutes: None,
                channel_url: None,
                features: Features::default(),
                ..base
            },
            other => {
                log::warn!("[Hands Free] Unknown variant '{}', using default", other);
                base
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_is_default() {
        assert_eq!(LandingConfig::for_variant("nope"), LandingConfig::default());
    }

    #[test]
    fn test_variants_toggle_features() {
        let campaign = LandingConfig::for_variant("campaign");
        assert!(campaign.features.channel_modal);
        assert!(!campaign.features.location_permission_modal);

        let minimal = LandingConfig::for_variant("minimal");
        assert_eq!(minimal.features, Features::default());
        assert_eq!(minimal.fallback_walk_minutes, None);
        assert_eq!(minimal.destination, LandingConfig::default().destination);
    }

    #[test]
    fn test_config_deserializes() {
        let mut value = serde_json::json!({
            "variant": "json",
            "destination": {
                "location": {"lat": 37.5, "lng": 127.0},
                "name": "a",
                "full_address": "b"
            },
            "fallback_location": {"lat": 37.51, "lng": 127.01},
            "map_style_url": "https://tiles/{z}/{x}/{y}.png",
            "routing_base_url": "https://router.example",
            "routing": {
                "timeout_ms": 5000,
                "max_routed_distance_m": 10000.0,
                "detour_factor": 1.3,
                "walking_speed_m_per_min": 75.0
            },
            "geolocation_timeout_ms": 15000,
            "arrival_buffer_minutes": 20,
            "fallback_walk_minutes": null,
            "picker_months_ahead": 2,
            "channel_url": null,
            "features": {"in_app_banner": false, "channel_modal": false, "location_permission_modal": true}
        });
        value["pricing"] = serde_json::json!({
            "original": {"s": {"four": 1, "eight": 2}, "m": {"four": 1, "eight": 2}, "l": {"four": 1, "eight": 2}},
            "discounted": {"s": {"four": 1, "eight": 1}, "m": {"four": 1, "eight": 1}, "l": {"four": 1, "eight": 1}},
            "discount_cutoff": "2027-03-31",
            "availability": {"s": {"four": 1, "eight": 0}, "m": {"four": 1, "eight": 0}, "l": {"four": 0, "eight": 0}}
        });
        let config: LandingConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.routing.timeout_ms, 5000);
        assert_eq!(config.pricing.discount_cutoff, NaiveDate::from_ymd_opt(2027, 3, 31).unwrap());
        assert!(config.features.location_permission_modal);
    }
}
