use log::{debug, info, warn};
use serde::Deserialize;

use crate::config::RoutingConfig;
use crate::error::RouteError;
use crate::models::coordinate::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSource {
    Routed,
    Fallback,
}

impl RouteSource {
    /// Name reported to analytics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteSource::Routed => "osrm",
            RouteSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub polyline: Vec<Coordinate>,
    pub distance_meters: f64,
    pub duration_minutes: u32,
    pub source: RouteSource,
}

/// What a routing request produced. A timeout aborts the request and is
/// reported as `Cancelled`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Body(String),
    Failed(RouteError),
    Cancelled,
}

#[allow(async_fn_in_trait)]
pub trait RoutingService {
    async fn fetch(&self, from: Coordinate, to: Coordinate, timeout_ms: u32) -> FetchOutcome;
}

#[derive(Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
}

#[derive(Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Pulls the first route out of a foot-profile response. The service's own
/// duration is ignored.
pub fn parse_route(body: &str) -> Result<(Vec<Coordinate>, f64), RouteError> {
    let response: OsrmResponse =
        serde_json::from_str(body).map_err(|e| RouteError::Malformed(e.to_string()))?;

    if response.code != "Ok" {
        return Err(RouteError::Malformed(format!("code {}", response.code)));
    }

    let route = response.routes.into_iter().next().ok_or(RouteError::NoRoutes)?;

    if !route.distance.is_finite() || route.distance < 0.0 {
        return Err(RouteError::Malformed(format!("distance {}", route.distance)));
    }
    if route.geometry.coordinates.len() < 2 {
        return Err(RouteError::Malformed("geometry has fewer than two points".to_string()));
    }

    let polyline = route
        .geometry
        .coordinates
        .into_iter()
        .map(Coordinate::from_lng_lat)
        .collect();

    Ok((polyline, route.distance))
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolverState {
    Unresolved,
    Resolving,
    Resolved(RouteResult),
}

/// Handed out by [`GeoRouteResolver::plan`] when a request is needed. Only the
/// ticket of the latest plan may complete the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTicket {
    generation: u64,
    pub from: Coordinate,
    pub to: Coordinate,
    pub straight_distance_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoutePlan {
    Immediate(RouteResult),
    Fetch(RouteTicket),
}

#[derive(Debug, Clone)]
pub struct GeoRouteResolver {
    params: RoutingConfig,
    state: ResolverState,
    generation: u64,
}

impl GeoRouteResolver {
    pub fn new(params: RoutingConfig) -> Self {
        Self {
            params,
            state: ResolverState::Unresolved,
            generation: 0,
        }
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    pub fn current(&self) -> Option<&RouteResult> {
        match &self.state {
            ResolverState::Resolved(result) => Some(result),
            _ => None,
        }
    }

    /// Detour-inflated straight line at walking speed, drawn as two points.
    pub fn straight_line_estimate(params: &RoutingConfig, from: Coordinate, to: Coordinate) -> RouteResult {
        let walking_distance = from.distance_to(&to) * params.detour_factor;
        let minutes = (walking_distance / params.walking_speed_m_per_min).ceil().max(1.0);
        RouteResult {
            polyline: vec![from, to],
            distance_meters: walking_distance.round(),
            duration_minutes: minutes as u32,
            source: RouteSource::Fallback,
        }
    }

    /// Starts a new resolution and supersedes any earlier one. Far-away
    /// origins resolve immediately without touching the network.
    pub fn plan(&mut self, from: Coordinate, to: Coordinate) -> RoutePlan {
        self.generation += 1;
        let straight = from.distance_to(&to);
        debug!("[Hands Free] Straight distance: {} m", straight.round());

        if straight > self.params.max_routed_distance_m {
            let estimate = Self::straight_line_estimate(&self.params, from, to);
            info!("[Hands Free] Too far, using estimate: {} min", estimate.duration_minutes);
            self.state = ResolverState::Resolved(estimate.clone());
            return RoutePlan::Immediate(estimate);
        }

        self.state = ResolverState::Resolving;
        RoutePlan::Fetch(RouteTicket {
            generation: self.generation,
            from,
            to,
            straight_distance_m: straight,
        })
    }

    /// Runs the request for a ticket. Never fails: anything other than a
    /// well-formed route degrades to the straight-line estimate.
    pub async fn fetch<S: RoutingService>(params: RoutingConfig, service: &S, ticket: &RouteTicket) -> RouteResult {
        let failure = match service.fetch(ticket.from, ticket.to, params.timeout_ms).await {
            FetchOutcome::Body(body) => match parse_route(&body) {
                Ok((polyline, distance)) => {
                    let minutes = (distance / params.walking_speed_m_per_min).ceil() as u32;
                    info!(
                        "[Hands Free] Route calculated: {} m, {} min (walking speed: {} m/min)",
                        distance.round(),
                        minutes,
                        params.walking_speed_m_per_min
                    );
                    return RouteResult {
                        polyline,
                        distance_meters: distance.round(),
                        duration_minutes: minutes,
                        source: RouteSource::Routed,
                    };
                }
                Err(e) => e,
            },
            FetchOutcome::Failed(e) => e,
            FetchOutcome::Cancelled => RouteError::Timeout,
        };

        warn!("[Hands Free] OSRM failed: {} - using fallback", failure);
        Self::straight_line_estimate(&params, ticket.from, ticket.to)
    }

    /// Stores the result if the ticket is still the latest. Returns whether
    /// it was kept.
    pub fn complete(&mut self, ticket: &RouteTicket, result: RouteResult) -> bool {
        if ticket.generation != self.generation {
            debug!("[Hands Free] Dropping stale route result");
            return false;
        }
        self.state = ResolverState::Resolved(result);
        true
    }

    pub async fn resolve<S: RoutingService>(&mut self, service: &S, from: Coordinate, to: Coordinate) -> RouteResult {
        match self.plan(from, to) {
            RoutePlan::Immediate(result) => result,
            RoutePlan::Fetch(ticket) => {
                let result = Self::fetch(self.params, service, &ticket).await;
                self.complete(&ticket, result.clone());
                result
            }
        }
    }

    pub fn params(&self) -> &RoutingConfig {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LandingConfig;
    use futures::executor::block_on;
    use std::cell::Cell;

    struct ScriptedService {
        outcome: FetchOutcome,
        calls: Cell<u32>,
    }

    impl ScriptedService {
        fn new(outcome: FetchOutcome) -> Self {
            Self { outcome, calls: Cell::new(0) }
        }
    }

    impl RoutingService for ScriptedService {
        async fn fetch(&self, _from: Coordinate, _to: Coordinate, _timeout_ms: u32) -> FetchOutcome {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }

    fn params() -> RoutingConfig {
        LandingConfig::default().routing
    }

    fn destination() -> Coordinate {
        Coordinate::new(37.5448, 127.0568)
    }

    fn nearby() -> Coordinate {
        Coordinate::new(37.5462, 127.0553)
    }

    fn expected_fallback(from: Coordinate, to: Coordinate) -> u32 {
        (from.distance_to(&to) * 1.4 / 80.0).ceil() as u32
    }

    const OK_BODY: &str = r#"{
        "code": "Ok",
        "routes": [{
            "geometry": {"coordinates": [[127.0553, 37.5462], [127.0560, 37.5455], [127.0568, 37.5448]]},
            "distance": 410.4,
            "duration": 300.0
        }]
    }"#;

    #[test]
    fn test_far_origin_never_calls_the_service() {
        let service = ScriptedService::new(FetchOutcome::Body(OK_BODY.to_string()));
        let busan = Coordinate::new(35.1796, 129.0756);
        let mut resolver = GeoRouteResolver::new(params());

        let result = block_on(resolver.resolve(&service, busan, destination()));

        assert_eq!(service.calls.get(), 0);
        assert_eq!(result.source, RouteSource::Fallback);
        assert_eq!(result.duration_minutes, expected_fallback(busan, destination()));
        assert_eq!(result.polyline, vec![busan, destination()]);
        assert_eq!(resolver.current(), Some(&result));
    }

    #[test]
    fn test_routed_duration_uses_walking_speed() {
        let service = ScriptedService::new(FetchOutcome::Body(OK_BODY.to_string()));
        let mut resolver = GeoRouteResolver::new(params());

        let result = block_on(resolver.resolve(&service, nearby(), destination()));

        assert_eq!(service.calls.get(), 1);
        assert_eq!(result.source, RouteSource::Routed);
        // ceil(410.4 / 80), not the service's 5 minutes
        assert_eq!(result.duration_minutes, 6);
        assert_eq!(result.polyline.len(), 3);
        assert_eq!(result.polyline[0], Coordinate::new(37.5462, 127.0553));
    }

    #[test]
    fn test_bad_responses_degrade_to_fallback() {
        let bodies = [
            "not json",
            r#"{"code": "Ok", "routes": []}"#,
            r#"{"code": "NoRoute", "routes": []}"#,
            r#"{"code": "Ok"}"#,
            r#"{"code": "Ok", "routes": [{"geometry": {"coordinates": [[127.0, 37.5]]}, "distance": 12.0}]}"#,
            r#"{"code": "Ok", "routes": [{"geometry": {"coordinates": []}, "distance": -3.0}]}"#,
            r#"{"code": "Ok", "routes": [{"distance": 200.0}]}"#,
        ];
        for body in bodies {
            let service = ScriptedService::new(FetchOutcome::Body(body.to_string()));
            let mut resolver = GeoRouteResolver::new(params());
            let result = block_on(resolver.resolve(&service, nearby(), destination()));
            assert_eq!(result.source, RouteSource::Fallback, "body: {}", body);
            assert_eq!(result.duration_minutes, expected_fallback(nearby(), destination()));
            assert_eq!(result.polyline.len(), 2);
        }
    }

    #[test]
    fn test_transport_errors_and_timeouts_degrade() {
        for outcome in [
            FetchOutcome::Failed(RouteError::Http(502)),
            FetchOutcome::Failed(RouteError::Transport("offline".to_string())),
            FetchOutcome::Cancelled,
        ] {
            let service = ScriptedService::new(outcome);
            let mut resolver = GeoRouteResolver::new(params());
            let result = block_on(resolver.resolve(&service, nearby(), destination()));
            assert_eq!(result.source, RouteSource::Fallback);
            assert_eq!(service.calls.get(), 1);
        }
    }

    #[test]
    fn test_parse_route_errors() {
        assert_eq!(parse_route(r#"{"code": "Ok", "routes": []}"#), Err(RouteError::NoRoutes));
        assert!(matches!(parse_route("{}"), Err(RouteError::Malformed(_))));
    }

    #[test]
    fn test_newer_plan_supersedes_older_ticket() {
        let mut resolver = GeoRouteResolver::new(params());
        assert_eq!(resolver.state(), &ResolverState::Unresolved);

        let first = match resolver.plan(nearby(), destination()) {
            RoutePlan::Fetch(ticket) => ticket,
            other => panic!("expected fetch, got {:?}", other),
        };
        let second = match resolver.plan(nearby(), destination()) {
            RoutePlan::Fetch(ticket) => ticket,
            other => panic!("expected fetch, got {:?}", other),
        };
        assert_eq!(resolver.state(), &ResolverState::Resolving);

        let stale = GeoRouteResolver::straight_line_estimate(&params(), first.from, first.to);
        assert!(!resolver.complete(&first, stale));
        assert_eq!(resolver.state(), &ResolverState::Resolving);

        let fresh = GeoRouteResolver::straight_line_estimate(&params(), second.from, second.to);
        assert!(resolver.complete(&second, fresh.clone()));
        assert_eq!(resolver.current(), Some(&fresh));
    }

    #[test]
    fn test_same_point_fallback_is_at_least_a_minute() {
        let estimate = GeoRouteResolver::straight_line_estimate(&params(), destination(), destination());
        assert_eq!(estimate.duration_minutes, 1);
        assert_eq!(estimate.distance_meters, 0.0);
    }
}
