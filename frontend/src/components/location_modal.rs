use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LocationModalProps {
    pub open: bool,
    pub on_allow: Callback<()>,
    pub on_decline: Callback<()>,
}

/// Asks before triggering the browser permission prompt.
#[function_component(LocationModal)]
pub fn location_modal(props: &LocationModalProps) -> Html {
    let allow = {
        let on_allow = props.on_allow.clone();
        Callback::from(move |_: MouseEvent| on_allow.emit(()))
    };
    let decline = {
        let on_decline = props.on_decline.clone();
        Callback::from(move |_: MouseEvent| on_decline.emit(()))
    };

    html! {
        <div class={classes!("modal", props.open.then(|| "active"))}>
            <div class="modal-content">
                <div class="modal-icon">{"📍"}</div>
                <h3>{"현재 위치에서 길을 안내해 드릴까요?"}</h3>
                <p>{"위치 정보는 도보 경로 계산에만 사용되며 저장되지 않습니다."}</p>
                <div class="modal-actions">
                    <button class="modal-btn secondary" onclick={decline}>{"나중에"}</button>
                    <button class="modal-btn primary" onclick={allow}>{"위치 허용"}</button>
                </div>
            </div>
        </div>
    }
}
