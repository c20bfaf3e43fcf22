use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Value};

use crate::analytics::{AnalyticsSink, ScrollDepth, TagHook};
use crate::config::LandingConfig;
use crate::error::{ConfigError, GeoError};
use crate::format;
use crate::funnel::FunnelState;
use crate::geolocation::PositionFix;
use crate::in_app::InAppBrowser;
use crate::models::coordinate::Coordinate;
use crate::models::session::{LockerSize, RentalHours, ReservationTime, SessionState};
use crate::pricing::{PriceQuote, PricingEngine};
use crate::routing::resolver::{GeoRouteResolver, RoutePlan, RouteResult, RouteTicket};
use crate::schedule::{DatePicker, DateWindow, TimePicker, UsageWindow};
use crate::storage::VisitRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct PageViewInfo {
    pub referrer: String,
    pub user_agent: String,
    pub screen_width: f64,
    pub screen_height: f64,
    pub language: String,
    pub visit: VisitRecord,
    pub in_app: Option<InAppBrowser>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeCard {
    pub size: LockerSize,
    pub label: &'static str,
    pub selected: bool,
    pub unavailable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationCard {
    pub hours: RentalHours,
    pub price_label: String,
    /// Struck-through price while the promotion runs.
    pub original_price_label: Option<String>,
    pub remaining: u32,
    pub sold_out: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub size_label: &'static str,
    pub hours_label: String,
    pub price_label: String,
    pub original_price_label: Option<String>,
    pub is_discount_active: bool,
    pub remaining: u32,
}

/// Owns the session and every core component for one page view. All UI
/// events go through here; views only read the derived values.
pub struct PageController {
    config: LandingConfig,
    session: SessionState,
    pricing: PricingEngine,
    resolver: GeoRouteResolver,
    analytics: AnalyticsSink,
    date_picker: DatePicker,
    time_picker: TimePicker,
    scroll: ScrollDepth,
}

impl PageController {
    pub fn new(
        config: LandingConfig,
        loaded_at: DateTime<Utc>,
        local_now: NaiveDateTime,
        hook: Option<Box<dyn TagHook>>,
    ) -> Result<Self, ConfigError> {
        let pricing = PricingEngine::new(&config.pricing)?;
        let resolver = GeoRouteResolver::new(config.routing);
        let window = DateWindow::new(local_now.date(), config.picker_months_ahead);

        let mut session = SessionState::new(loaded_at);
        session.selected_date = Some(local_now.date());
        session.selected_time = Some(ReservationTime::from_naive(local_now.time()));
        session.selected_hours = pricing.reconcile_selection(session.selected_size, session.selected_hours);

        let analytics = AnalyticsSink::new(session.session_id.clone(), loaded_at, hook);

        Ok(Self {
            config,
            session,
            pricing,
            resolver,
            analytics,
            date_picker: DatePicker::new(window),
            time_picker: TimePicker::default(),
            scroll: ScrollDepth::default(),
        })
    }

    pub fn config(&self) -> &LandingConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn analytics(&self) -> &AnalyticsSink {
        &self.analytics
    }

    pub fn track(&mut self, name: &str, properties: Value) {
        self.analytics.track(name, properties);
    }

    pub fn track_page_view(&mut self, info: &PageViewInfo) {
        self.analytics.track(
            "page_view",
            json!({
                "referrer": info.referrer,
                "userAgent": info.user_agent,
                "screenWidth": info.screen_width,
                "screenHeight": info.screen_height,
                "language": info.language,
                "visitCount": info.visit.visit_count,
                "isReturning": info.visit.is_returning,
                "inAppBrowser": info.in_app.map(|b| b.name()),
                "variant": self.config.variant,
            }),
        );
    }

    pub fn record_scroll(&mut self, percent: u32) {
        for depth in self.scroll.record(percent) {
            self.analytics.track("scroll_depth", json!({ "depth": depth }));
        }
    }

    pub fn track_session_end(&mut self, now: DateTime<Utc>) {
        self.analytics.track(
            "session_end",
            json!({
                "maxScrollDepth": self.scroll.max_percent(),
                "totalTimeOnPage": self.session.seconds_on_page(now),
                "selectedSize": self.session.selected_size.as_str(),
                "selectedHours": self.session.selected_hours.hours(),
                "reserveAttempts": self.session.funnel.clicks(),
            }),
        );
    }

    // ----- size / duration -----

    pub fn quote(&self) -> PriceQuote {
        self.pricing.quote(
            self.session.selected_size,
            self.session.selected_hours,
            self.session.selected_date,
        )
    }

    /// Returns the duration that stays selected, or `None` when the size has
    /// nothing left to book.
    pub fn select_size(&mut self, size: LockerSize) -> Option<RentalHours> {
        if self.pricing.is_size_unavailable(size) {
            return None;
        }
        let previous = self.session.selected_size;
        self.session.selected_size = size;
        self.session.selected_hours = self.pricing.reconcile_selection(size, self.session.selected_hours);

        self.analytics.track(
            "size_selected",
            json!({
                "size": size.as_str(),
                "previousSize": previous.as_str(),
                "price": self.quote().price(),
                "hours": self.session.selected_hours.hours(),
            }),
        );
        Some(self.session.selected_hours)
    }

    /// Sold-out durations cannot be picked.
    pub fn select_hours(&mut self, hours: RentalHours) -> bool {
        if self.pricing.is_sold_out(self.session.selected_size, hours) {
            return false;
        }
        let previous = self.session.selected_hours;
        self.session.selected_hours = hours;

        self.analytics.track(
            "time_selected",
            json!({
                "hours": hours.hours(),
                "previousHours": previous.hours(),
                "price": self.quote().price(),
            }),
        );
        true
    }

    pub fn size_cards(&self) -> Vec<SizeCard> {
        LockerSize::ALL
            .iter()
            .map(|&size| SizeCard {
                size,
                label: format::size_label(size),
                selected: size == self.session.selected_size,
                unavailable: self.pricing.is_size_unavailable(size),
            })
            .collect()
    }

    pub fn duration_cards(&self) -> Vec<DurationCard> {
        let size = self.session.selected_size;
        RentalHours::ALL
            .iter()
            .map(|&hours| {
                let quote = self.pricing.quote(size, hours, self.session.selected_date);
                let remaining = self.pricing.availability(size, hours);
                DurationCard {
                    hours,
                    price_label: format::won(quote.price()),
                    original_price_label: struck_price(&quote),
                    remaining,
                    sold_out: remaining == 0,
                    selected: hours == self.session.selected_hours,
                }
            })
            .collect()
    }

    pub fn summary(&self) -> Summary {
        let quote = self.quote();
        Summary {
            size_label: format::size_label(self.session.selected_size),
            hours_label: format::hours_label(self.session.selected_hours),
            price_label: format::won(quote.price()),
            original_price_label: struck_price(&quote),
            is_discount_active: quote.is_discount_active,
            remaining: self
                .pricing
                .availability(self.session.selected_size, self.session.selected_hours),
        }
    }

    // ----- date / time -----

    pub fn date_picker(&self) -> &DatePicker {
        &self.date_picker
    }

    pub fn date_picker_mut(&mut self) -> &mut DatePicker {
        &mut self.date_picker
    }

    pub fn time_picker(&self) -> &TimePicker {
        &self.time_picker
    }

    pub fn time_picker_mut(&mut self) -> &mut TimePicker {
        &mut self.time_picker
    }

    pub fn open_date_picker(&mut self) {
        self.date_picker.open(self.session.selected_date);
    }

    pub fn open_time_picker(&mut self) {
        self.time_picker.open(self.session.selected_time);
    }

    /// No-op unless the picker holds a complete date inside the window.
    pub fn confirm_date(&mut self) -> Option<NaiveDate> {
        let date = self.date_picker.confirm()?;
        self.session.selected_date = Some(date);
        let is_today = date == self.date_picker.window().today();
        self.analytics.track(
            "date_selected",
            json!({
                "date": date.format("%Y-%m-%d").to_string(),
                "isToday": is_today,
                "discountActive": self.quote().is_discount_active,
            }),
        );
        Some(date)
    }

    pub fn confirm_time(&mut self) -> Option<ReservationTime> {
        let time = self.time_picker.confirm()?;
        self.session.selected_time = Some(time);
        self.analytics
            .track("time_input_selected", json!({ "time": time.to_string() }));
        Some(time)
    }

    pub fn usage_window(&self, local_now: NaiveDateTime) -> UsageWindow {
        UsageWindow::compute(
            self.session.selected_date,
            self.session.selected_time,
            local_now,
            self.session.selected_hours,
            self.config.arrival_buffer_minutes,
        )
    }

    pub fn date_label(&self) -> Option<String> {
        self.session.selected_date.map(format::short_date)
    }

    pub fn time_label(&self) -> Option<String> {
        self.session.selected_time.map(format::reservation_time)
    }

    // ----- location / route -----

    pub fn location_found(&mut self, fix: PositionFix) -> Coordinate {
        log::info!(
            "[Hands Free] Location received: {:?}, accuracy {} m",
            fix.coordinate,
            fix.accuracy
        );
        self.session.user_location = Some(fix.coordinate);
        self.session.is_fallback_location = false;
        self.analytics.track(
            "geolocation_success",
            json!({
                "lat": fix.coordinate.lat,
                "lng": fix.coordinate.lng,
                "accuracy": fix.accuracy,
            }),
        );
        fix.coordinate
    }

    pub fn location_failed(&mut self, error: GeoError) -> Coordinate {
        log::info!("[Hands Free] Geolocation error: {}", error);
        self.analytics.track(
            "geolocation_error",
            json!({ "reason": error.reason(), "code": error.code() }),
        );
        self.use_fallback_location()
    }

    pub fn use_fallback_location(&mut self) -> Coordinate {
        let fallback = self.config.fallback_location;
        self.session.user_location = Some(fallback);
        self.session.is_fallback_location = true;
        fallback
    }

    /// Starts route resolution for the current location. `None` until a
    /// location is known.
    pub fn plan_route(&mut self) -> Option<RoutePlan> {
        let from = self.session.user_location?;
        let plan = self.resolver.plan(from, self.config.destination.location);
        if let RoutePlan::Immediate(result) = &plan {
            let result = result.clone();
            self.record_route(&result);
        }
        Some(plan)
    }

    pub fn finish_route(&mut self, ticket: &RouteTicket, result: RouteResult) -> bool {
        let kept = self.resolver.complete(ticket, result.clone());
        if kept {
            self.record_route(&result);
        }
        kept
    }

    fn record_route(&mut self, result: &RouteResult) {
        let user = self.session.user_location.unwrap_or(self.config.fallback_location);
        self.analytics.track(
            "route_calculated",
            json!({
                "durationMin": result.duration_minutes,
                "distanceM": result.distance_meters,
                "source": result.source.as_str(),
                "userLat": user.lat,
                "userLng": user.lng,
            }),
        );
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.resolver.current()
    }

    pub fn routing_params(&self) -> crate::config::RoutingConfig {
        *self.resolver.params()
    }

    pub fn walk_label(&self) -> String {
        let override_minutes = if self.session.is_fallback_location {
            self.config.fallback_walk_minutes
        } else {
            None
        };
        match self.resolver.current() {
            Some(route) => format::walk_label(route, override_minutes),
            None => format::NO_LOCATION_WALK_LABEL.to_string(),
        }
    }

    // ----- reserve funnel -----

    pub fn funnel_state(&self) -> FunnelState {
        self.session.funnel.state()
    }

    pub fn reserve_click(&mut self, now: DateTime<Utc>) -> FunnelState {
        let state = self.session.funnel.reserve();
        self.analytics.track(
            "reserve_click",
            json!({
                "attempt": self.session.funnel.clicks(),
                "size": self.session.selected_size.as_str(),
                "hours": self.session.selected_hours.hours(),
                "price": self.quote().price(),
                "timeOnPage": self.session.seconds_on_page(now),
            }),
        );
        self.track_funnel(state);
        state
    }

    pub fn retry_click(&mut self) -> FunnelState {
        self.analytics.track("retry_click", json!({}));
        let state = self.session.funnel.retry();
        self.track_funnel(state);
        state
    }

    pub fn close_error_modal(&mut self, via_backdrop: bool) {
        let name = if via_backdrop { "modal_backdrop_close" } else { "modal_close" };
        self.analytics.track(name, json!({}));
    }

    fn track_funnel(&mut self, state: FunnelState) {
        match state {
            FunnelState::RetryDialog => self.analytics.track("error_modal_shown", json!({})),
            FunnelState::Terminal => self.analytics.track("503_page_shown", json!({})),
            FunnelState::Idle => {}
        }
    }
}

fn struck_price(quote: &PriceQuote) -> Option<String> {
    (quote.is_discount_active && quote.discounted_price < quote.original_price)
        .then(|| format::won(quote.original_price))
}
