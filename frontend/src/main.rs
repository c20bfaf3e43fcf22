use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};

mod analytics;
mod config;
mod controller;
mod debug;
mod error;
mod format;
mod funnel;
mod geolocation;
mod in_app;
mod pricing;
mod schedule;
mod storage;
mod models {
    pub mod coordinate;
    pub mod session;
}
mod routing {
    pub mod osrm;
    pub mod resolver;
}
mod pages {
    pub mod landing;
    pub mod unavailable;
}
mod components {
    pub mod channel_modal;
    pub mod copy_address;
    pub mod date_picker;
    pub mod error_modal;
    pub mod in_app_banner;
    pub mod location_modal;
    pub mod route_map;
    pub mod time_picker;
}

use pages::landing::Landing;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/v/:name")]
    Variant { name: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering default landing page");
            html! { <Landing key="default" variant={"default".to_string()} /> }
        },
        Route::Variant { name } => {
            info!("Rendering landing page variant {}", name);
            html! { <Landing key={name.clone()} variant={name.clone()} /> }
        },
        Route::NotFound => {
            html! { <Redirect<Route> to={Route::Home} /> }
        },
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    info!("[Hands Free] Starting landing page");
    yew::Renderer::<App>::new().render();
}
