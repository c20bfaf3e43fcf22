use yew::prelude::*;

use crate::components::channel_modal::ChannelModal;

#[derive(Properties, PartialEq)]
pub struct UnavailableProps {
    /// Set when the variant offers the channel modal.
    pub channel_url: Option<String>,
    pub on_action: Callback<&'static str>,
}

/// Replaces the whole page once the reserve funnel has failed for good.
#[function_component(Unavailable)]
pub fn unavailable(props: &UnavailableProps) -> Html {
    let channel_open = use_state(|| false);

    let open_channel = {
        let channel_open = channel_open.clone();
        let on_action = props.on_action.clone();
        Callback::from(move |_: MouseEvent| {
            on_action.emit("channel_modal_shown");
            channel_open.set(true);
        })
    };
    let close_channel = {
        let channel_open = channel_open.clone();
        Callback::from(move |_| channel_open.set(false))
    };
    let join_channel = {
        let on_action = props.on_action.clone();
        Callback::from(move |_| on_action.emit("channel_join_click"))
    };

    html! {
        <div id="error-page" class="error-page">
            <div class="error-code">{"503"}</div>
            <h1>{"Service Unavailable"}</h1>
            <p>{"현재 접속자가 많아 서비스를 이용할 수 없습니다."}</p>
            <p class="error-sub">{"잠시 후 다시 접속해 주세요."}</p>
            {
                if let Some(url) = &props.channel_url {
                    html! {
                        <>
                            <button class="cta-button" onclick={open_channel}>{"오픈 알림 받기"}</button>
                            <ChannelModal
                                open={*channel_open}
                                channel_url={url.clone()}
                                on_join={join_channel}
                                on_close={close_channel}
                            />
                        </>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
