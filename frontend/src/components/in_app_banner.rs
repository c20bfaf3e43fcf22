use web_sys::window;
use yew::prelude::*;

use crate::in_app::InAppBrowser;
use crate::storage::{BrowserStorage, KeyValueStore, IN_APP_BANNER_DISMISSED_KEY};

fn dismissed() -> bool {
    BrowserStorage::session()
        .and_then(|s| s.get(IN_APP_BANNER_DISMISSED_KEY))
        .is_some()
}

#[derive(Properties, PartialEq)]
pub struct InAppBannerProps {
    pub browser: InAppBrowser,
    /// Receives the analytics event name for each action.
    pub on_action: Callback<&'static str>,
}

#[function_component(InAppBanner)]
pub fn in_app_banner(props: &InAppBannerProps) -> Html {
    let hidden = use_state(dismissed);

    let page_url = window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default();
    let escape_url = props.browser.escape_url(&page_url);

    let dismiss = {
        let hidden = hidden.clone();
        let on_action = props.on_action.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(storage) = BrowserStorage::session() {
                storage.set(IN_APP_BANNER_DISMISSED_KEY, "1");
            }
            on_action.emit("inapp_banner_dismiss");
            hidden.set(true);
        })
    };

    let escape = {
        let on_action = props.on_action.clone();
        Callback::from(move |_: MouseEvent| on_action.emit("inapp_escape_click"))
    };

    if *hidden {
        return html! {};
    }

    html! {
        <div class="inapp-banner">
            <p>{"앱 내 브라우저에서는 위치 안내가 정확하지 않을 수 있어요."}</p>
            {
                match escape_url {
                    Some(url) => html! {
                        <a class="inapp-open" href={url} onclick={escape}>{"기본 브라우저로 열기"}</a>
                    },
                    None => html! {
                        <span class="inapp-hint">{"우측 상단 메뉴에서 '다른 브라우저로 열기'를 눌러주세요."}</span>
                    },
                }
            }
            <button class="inapp-close" onclick={dismiss}>{"✕"}</button>
        </div>
    }
}
