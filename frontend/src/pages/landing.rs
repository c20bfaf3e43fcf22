use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Local, NaiveDateTime, Utc};
use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::window;
use yew::prelude::*;
use yew_hooks::use_interval;

use crate::analytics::{GtagHook, TagHook};
use crate::components::copy_address::CopyAddress;
use crate::components::date_picker::DatePickerModal;
use crate::components::error_modal::ErrorModal;
use crate::components::in_app_banner::InAppBanner;
use crate::components::location_modal::LocationModal;
use crate::components::route_map::RouteMap;
use crate::components::time_picker::TimePickerModal;
use crate::config::LandingConfig;
use crate::controller::{PageController, PageViewInfo};
use crate::debug;
use crate::format;
use crate::funnel::FunnelState;
use crate::geolocation;
use crate::in_app::InAppBrowser;
use crate::models::session::{LockerSize, Period, RentalHours};
use crate::pages::unavailable::Unavailable;
use crate::routing::osrm::OsrmClient;
use crate::routing::resolver::{GeoRouteResolver, RoutePlan};
use crate::storage::{
    location_previously_granted, remember_location_granted, BrowserStorage, MemoryStore, VisitRecord,
};

type SharedController = Rc<RefCell<PageController>>;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn gtag() -> Option<Box<dyn TagHook>> {
    Some(Box::new(GtagHook))
}

fn build_controller(variant: &str) -> PageController {
    match PageController::new(LandingConfig::for_variant(variant), Utc::now(), local_now(), gtag()) {
        Ok(controller) => controller,
        Err(e) => {
            log::error!("[Hands Free] Invalid pricing for variant {}: {}", variant, e);
            PageController::new(LandingConfig::default(), Utc::now(), local_now(), gtag())
                .expect("default pricing tables are valid")
        }
    }
}

fn user_agent() -> String {
    window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default()
}

fn page_view_info() -> PageViewInfo {
    let window = window();
    let navigator = window.as_ref().map(|w| w.navigator());
    let dimension = |value: Option<Result<JsValue, JsValue>>| {
        value.and_then(|v| v.ok()).and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    let now = Utc::now().timestamp_millis();
    let visit = match BrowserStorage::local() {
        Some(store) => VisitRecord::load_and_bump(&store, now),
        None => VisitRecord::load_and_bump(&MemoryStore::default(), now),
    };
    let user_agent = user_agent();

    PageViewInfo {
        referrer: window
            .as_ref()
            .and_then(|w| w.document())
            .map(|d| d.referrer())
            .unwrap_or_default(),
        in_app: InAppBrowser::detect(&user_agent),
        user_agent,
        screen_width: dimension(window.as_ref().map(|w| w.inner_width())),
        screen_height: dimension(window.as_ref().map(|w| w.inner_height())),
        language: navigator.and_then(|n| n.language()).unwrap_or_default(),
        visit,
    }
}

/// Plans a route for the current location and, when a request is needed,
/// runs it in the background.
fn start_route(controller: SharedController, redraw: UseForceUpdateHandle) {
    let plan = controller.borrow_mut().plan_route();
    redraw.force_update();

    if let Some(RoutePlan::Fetch(ticket)) = plan {
        let params = controller.borrow().routing_params();
        let client = OsrmClient::new(controller.borrow().config().routing_base_url.clone());
        spawn_local(async move {
            let result = GeoRouteResolver::fetch(params, &client, &ticket).await;
            controller.borrow_mut().finish_route(&ticket, result);
            redraw.force_update();
        });
    }
}

fn locate(controller: SharedController, redraw: UseForceUpdateHandle) {
    let timeout_ms = controller.borrow().config().geolocation_timeout_ms;
    spawn_local(async move {
        match geolocation::request_position(timeout_ms).await {
            Ok(fix) => {
                controller.borrow_mut().location_found(fix);
                if let Some(store) = BrowserStorage::local() {
                    remember_location_granted(&store);
                }
            }
            Err(e) => {
                controller.borrow_mut().location_failed(e);
            }
        }
        start_route(controller, redraw);
    });
}

#[derive(Properties, PartialEq)]
pub struct LandingProps {
    pub variant: String,
}

#[function_component(Landing)]
pub fn landing(props: &LandingProps) -> Html {
    let controller = {
        let variant = props.variant.clone();
        use_mut_ref(move || build_controller(&variant))
    };
    let redraw = use_force_update();
    let now = use_state(local_now);
    let date_open = use_state(|| false);
    let time_open = use_state(|| false);
    let error_open = use_state(|| false);
    let location_prompt = use_state(|| false);
    let in_app = use_state(|| InAppBrowser::detect(&user_agent()));

    // Page view, debug hooks and the location flow, once per mount
    {
        let controller = controller.clone();
        let redraw = redraw.clone();
        let location_prompt = location_prompt.clone();
        use_effect_with_deps(
            move |_| {
                controller.borrow_mut().track_page_view(&page_view_info());

                let recalculate = {
                    let controller = controller.clone();
                    let redraw = redraw.clone();
                    Callback::from(move |_| start_route(controller.clone(), redraw.clone()))
                };
                debug::register(controller.clone(), recalculate);

                let ask_first = controller.borrow().config().features.location_permission_modal;
                let granted = BrowserStorage::local()
                    .map(|store| location_previously_granted(&store))
                    .unwrap_or(false);
                if ask_first && !granted {
                    location_prompt.set(true);
                } else {
                    locate(controller, redraw);
                }

                || debug::unregister()
            },
            (),
        );
    }

    // Scroll depth milestones
    {
        let controller = controller.clone();
        use_effect_with_deps(
            move |_| {
                let window = web_sys::window().unwrap();
                let window_clone = window.clone();

                let scroll_callback = Closure::wrap(Box::new(move || {
                    let Some(root) = window_clone.document().and_then(|d| d.document_element()) else {
                        return;
                    };
                    let viewport = window_clone
                        .inner_height()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(0.0);
                    let scrollable = root.scroll_height() as f64 - viewport;
                    if scrollable <= 0.0 {
                        return;
                    }
                    let y = window_clone.scroll_y().unwrap_or(0.0);
                    let percent = (y / scrollable * 100.0).round().clamp(0.0, 100.0) as u32;
                    controller.borrow_mut().record_scroll(percent);
                }) as Box<dyn FnMut()>);

                let _ = window.add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());

                move || {
                    let _ = window.remove_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());
                }
            },
            (),
        );
    }

    // Final summary when the visitor leaves
    {
        let controller = controller.clone();
        use_effect_with_deps(
            move |_| {
                let window = web_sys::window().unwrap();
                let unload_callback = Closure::wrap(Box::new(move || {
                    controller.borrow_mut().track_session_end(Utc::now());
                }) as Box<dyn FnMut()>);

                let _ = window.add_event_listener_with_callback("beforeunload", unload_callback.as_ref().unchecked_ref());

                move || {
                    let _ = window.remove_event_listener_with_callback("beforeunload", unload_callback.as_ref().unchecked_ref());
                }
            },
            (),
        );
    }

    // Usage window refresh
    {
        let now = now.clone();
        use_interval(move || now.set(local_now()), 60_000);
    }

    // Lock page scroll behind modals
    {
        let any_modal = *date_open || *time_open || *error_open || *location_prompt;
        use_effect_with_deps(
            move |open: &bool| {
                if let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) {
                    let _ = body.set_attribute("style", if *open { "overflow: hidden;" } else { "" });
                }
                || ()
            },
            any_modal,
        );
    }

    // ----- callbacks -----

    let on_size = {
        let controller = controller.clone();
        let redraw = redraw.clone();
        move |size: LockerSize| {
            let controller = controller.clone();
            let redraw = redraw.clone();
            Callback::from(move |_: MouseEvent| {
                if controller.borrow_mut().select_size(size).is_some() {
                    redraw.force_update();
                }
            })
        }
    };

    let on_hours = {
        let controller = controller.clone();
        let redraw = redraw.clone();
        move |hours: RentalHours| {
            let controller = controller.clone();
            let redraw = redraw.clone();
            Callback::from(move |_: MouseEvent| {
                if controller.borrow_mut().select_hours(hours) {
                    redraw.force_update();
                }
            })
        }
    };

    let open_date = {
        let controller = controller.clone();
        let date_open = date_open.clone();
        Callback::from(move |_: MouseEvent| {
            controller.borrow_mut().open_date_picker();
            date_open.set(true);
        })
    };
    let on_month = {
        let controller = controller.clone();
        let redraw = redraw.clone();
        Callback::from(move |offset: u32| {
            if controller.borrow_mut().date_picker_mut().select_month(offset) {
                redraw.force_update();
            }
        })
    };
    let on_day = {
        let controller = controller.clone();
        let redraw = redraw.clone();
        Callback::from(move |day: u32| {
            if controller.borrow_mut().date_picker_mut().select_day(day) {
                redraw.force_update();
            }
        })
    };
    let on_date_confirm = {
        let controller = controller.clone();
        let date_open = date_open.clone();
        Callback::from(move |_| {
            controller.borrow_mut().confirm_date();
            date_open.set(false);
        })
    };
    let on_date_close = {
        let date_open = date_open.clone();
        Callback::from(move |_| date_open.set(false))
    };

    let open_time = {
        let controller = controller.clone();
        let time_open = time_open.clone();
        Callback::from(move |_: MouseEvent| {
            controller.borrow_mut().open_time_picker();
            time_open.set(true);
        })
    };
    let on_period = {
        let controller = controller.clone();
        let redraw = redraw.clone();
        Callback::from(move |period: Period| {
            controller.borrow_mut().time_picker_mut().select_period(period);
            redraw.force_update();
        })
    };
    let on_hour = {
        let controller = controller.clone();
        let redraw = redraw.clone();
        Callback::from(move |hour: u8| {
            if controller.borrow_mut().time_picker_mut().select_hour(hour) {
                redraw.force_update();
            }
        })
    };
    let on_minute = {
        let controller = controller.clone();
        let redraw = redraw.clone();
        Callback::from(move |minute: u8| {
            if controller.borrow_mut().time_picker_mut().select_minute(minute) {
                redraw.force_update();
            }
        })
    };
    let on_time_confirm = {
        let controller = controller.clone();
        let time_open = time_open.clone();
        Callback::from(move |_| {
            controller.borrow_mut().confirm_time();
            time_open.set(false);
        })
    };
    let on_time_close = {
        let time_open = time_open.clone();
        Callback::from(move |_| time_open.set(false))
    };

    let on_reserve = {
        let controller = controller.clone();
        let error_open = error_open.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            let state = controller.borrow_mut().reserve_click(Utc::now());
            error_open.set(state == FunnelState::RetryDialog);
            redraw.force_update();
        })
    };
    let on_retry = {
        let controller = controller.clone();
        let error_open = error_open.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            controller.borrow_mut().retry_click();
            error_open.set(false);
            redraw.force_update();
        })
    };
    let on_error_close = {
        let controller = controller.clone();
        let error_open = error_open.clone();
        Callback::from(move |via_backdrop: bool| {
            controller.borrow_mut().close_error_modal(via_backdrop);
            error_open.set(false);
        })
    };

    let on_allow_location = {
        let controller = controller.clone();
        let redraw = redraw.clone();
        let location_prompt = location_prompt.clone();
        Callback::from(move |_| {
            location_prompt.set(false);
            controller.borrow_mut().track("location_prompt_accepted", json!({}));
            locate(controller.clone(), redraw.clone());
        })
    };
    let on_decline_location = {
        let controller = controller.clone();
        let redraw = redraw.clone();
        let location_prompt = location_prompt.clone();
        Callback::from(move |_| {
            location_prompt.set(false);
            {
                let mut c = controller.borrow_mut();
                c.track("location_prompt_declined", json!({}));
                c.use_fallback_location();
            }
            start_route(controller.clone(), redraw.clone());
        })
    };

    let on_track = {
        let controller = controller.clone();
        Callback::from(move |name: &'static str| {
            controller.borrow_mut().track(name, json!({}));
        })
    };
    let on_copied = {
        let on_track = on_track.clone();
        Callback::from(move |_| on_track.emit("copy_address"))
    };

    // ----- render -----

    let c = controller.borrow();
    let config = c.config();

    if c.funnel_state() == FunnelState::Terminal {
        let channel_url = if config.features.channel_modal {
            config.channel_url.clone()
        } else {
            None
        };
        return html! { <Unavailable {channel_url} on_action={on_track} /> };
    }

    let summary = c.summary();
    let usage = c.usage_window(*now);
    let show_banner = config.features.in_app_banner;

    html! {
        <div id="app-container" class="landing-page">
            {
                match (*in_app, show_banner) {
                    (Some(browser), true) => html! { <InAppBanner {browser} on_action={on_track.clone()} /> },
                    _ => html! {},
                }
            }

            <header class="hero">
                <h1>{"Hands Free"}</h1>
                <p class="hero-subtitle">{"짐은 맡기고, 성수는 가볍게."}</p>
            </header>

            <section class="location">
                <RouteMap
                    style_url={config.map_style_url.clone()}
                    destination={config.destination.location}
                    start={config.fallback_location}
                    user={c.session().user_location}
                    route={c.route().cloned()}
                />
                <div id="walk-time" class="walk-time"><span>{ c.walk_label() }</span></div>
                <div class="address">
                    <span class="address-name">{ config.destination.name.clone() }</span>
                    <CopyAddress address={config.destination.full_address.clone()} {on_copied} />
                </div>
            </section>

            <section class="sizes">
                <h2>{"보관함 크기"}</h2>
                <div class="size-grid">
                    { for c.size_cards().into_iter().map(|card| html! {
                        <div
                            class={classes!("size-card", card.selected.then(|| "selected"), card.unavailable.then(|| "disabled"))}
                            data-size={card.size.as_str()}
                            onclick={on_size(card.size)}
                        >
                            <span class="size-label">{ card.label }</span>
                            { if card.selected { html! { <div class="selected-badge">{"선택됨"}</div> } } else { html! {} } }
                            { if card.unavailable { html! { <div class="sold-out-badge">{"마감"}</div> } } else { html! {} } }
                        </div>
                    }) }
                </div>
            </section>

            <section class="durations">
                <h2>{"이용 시간"}</h2>
                <div class="time-grid">
                    { for c.duration_cards().into_iter().map(|card| html! {
                        <div
                            class={classes!("time-card", card.selected.then(|| "selected"), card.sold_out.then(|| "disabled"))}
                            data-hours={card.hours.hours().to_string()}
                            onclick={on_hours(card.hours)}
                        >
                            <span class="time-hours">{ format::hours_label(card.hours) }</span>
                            {
                                match card.original_price_label {
                                    Some(original) => html! { <span class="time-price-original">{ original }</span> },
                                    None => html! {},
                                }
                            }
                            <span class="time-price">{ card.price_label }</span>
                            <span class="time-remaining">
                                { if card.sold_out { "마감".to_string() } else { format!("잔여 {}개", card.remaining) } }
                            </span>
                        </div>
                    }) }
                </div>
            </section>

            <section class="schedule">
                <h2>{"이용 일시"}</h2>
                <div class="schedule-buttons">
                    <button id="date-picker-btn" class="picker-btn" onclick={open_date}>
                        <span id="date-display">{ c.date_label().unwrap_or_default() }</span>
                    </button>
                    <button id="time-picker-btn" class="picker-btn" onclick={open_time}>
                        <span id="time-display">{ c.time_label().unwrap_or_default() }</span>
                    </button>
                </div>
                <ul class="usage-window">
                    <li>{"이용 시작 "}<span id="current-time">{ format::clock_time(usage.start) }</span></li>
                    <li>{"도착 마감 "}<span id="deadline-time">{ format::clock_time(usage.deadline) }</span></li>
                    <li>{"이용 종료 "}<span id="end-time">{ format::clock_time(usage.end) }</span></li>
                </ul>
            </section>

            <section class="summary">
                <div class="summary-row"><span>{"크기"}</span><span id="selected-size">{ summary.size_label }</span></div>
                <div class="summary-row"><span>{"시간"}</span><span id="selected-time">{ summary.hours_label.clone() }</span></div>
                <div class="summary-row total">
                    <span>{"결제 금액"}</span>
                    <span>
                        {
                            match &summary.original_price_label {
                                Some(original) => html! { <s class="price-original">{ original.clone() }</s> },
                                None => html! {},
                            }
                        }
                        <span id="total-price">{ summary.price_label.clone() }</span>
                    </span>
                </div>
                {
                    if summary.is_discount_active {
                        html! { <p class="discount-note">{ format!("오픈 기념 할인 · 잔여 {}개", summary.remaining) }</p> }
                    } else {
                        html! {}
                    }
                }
                <button id="reserve-btn" class="cta-button" onclick={on_reserve}>{"지금 예약하기"}</button>
            </section>

            <DatePickerModal
                open={*date_open}
                picker={c.date_picker().clone()}
                {on_month}
                {on_day}
                on_confirm={on_date_confirm}
                on_close={on_date_close}
            />
            <TimePickerModal
                open={*time_open}
                picker={c.time_picker().clone()}
                {on_period}
                {on_hour}
                {on_minute}
                on_confirm={on_time_confirm}
                on_close={on_time_close}
            />
            <ErrorModal open={*error_open} {on_retry} on_close={on_error_close} />
            <LocationModal open={*location_prompt} on_allow={on_allow_location} on_decline={on_decline_location} />
        </div>
    }
}
