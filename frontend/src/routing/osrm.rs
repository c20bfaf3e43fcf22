use futures::future::{select, Either};
use futures::pin_mut;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use web_sys::AbortController;

use crate::error::RouteError;
use crate::models::coordinate::Coordinate;
use crate::routing::resolver::{FetchOutcome, RoutingService};

/// Foot routing against a public OSRM instance.
pub struct OsrmClient {
    base_url: String,
}

impl OsrmClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}/route/v1/foot/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url.trim_end_matches('/'),
            from.lng,
            from.lat,
            to.lng,
            to.lat
        )
    }
}

impl RoutingService for OsrmClient {
    async fn fetch(&self, from: Coordinate, to: Coordinate, timeout_ms: u32) -> FetchOutcome {
        let url = self.route_url(from, to);
        let controller = match AbortController::new() {
            Ok(controller) => controller,
            Err(_) => return FetchOutcome::Failed(RouteError::Transport("AbortController unavailable".to_string())),
        };
        let signal = controller.signal();

        log::debug!("[Hands Free] Fetching route from OSRM...");
        let request = async {
            let response = Request::get(&url)
                .abort_signal(Some(&signal))
                .send()
                .await
                .map_err(|e| RouteError::Transport(e.to_string()))?;
            if !response.ok() {
                return Err(RouteError::Http(response.status()));
            }
            response.text().await.map_err(|e| RouteError::Malformed(e.to_string()))
        };
        let deadline = TimeoutFuture::new(timeout_ms);
        pin_mut!(request);
        pin_mut!(deadline);

        match select(request, deadline).await {
            Either::Left((Ok(body), _)) => FetchOutcome::Body(body),
            Either::Left((Err(e), _)) => FetchOutcome::Failed(e),
            Either::Right(_) => {
                controller.abort();
                FetchOutcome::Cancelled
            }
        }
    }
}
