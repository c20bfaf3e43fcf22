use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ChannelModalProps {
    pub open: bool,
    pub channel_url: String,
    pub on_join: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component(ChannelModal)]
pub fn channel_modal(props: &ChannelModalProps) -> Html {
    let join = {
        let on_join = props.on_join.clone();
        Callback::from(move |_: MouseEvent| on_join.emit(()))
    };
    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class={classes!("modal", props.open.then(|| "active"))}>
            <div class="modal-content">
                <h3>{"서비스가 재개되면 알려드릴게요"}</h3>
                <p>{"채널을 추가하면 오픈 소식과 할인 쿠폰을 가장 먼저 받아보실 수 있어요."}</p>
                <div class="modal-actions">
                    <button class="modal-btn secondary" onclick={close}>{"닫기"}</button>
                    <a class="modal-btn primary" href={props.channel_url.clone()} target="_blank" rel="noopener noreferrer" onclick={join}>
                        {"채널 추가하기"}
                    </a>
                </div>
            </div>
        </div>
    }
}
