use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorModalProps {
    pub open: bool,
    pub on_retry: Callback<()>,
    /// `true` when closed from the backdrop.
    pub on_close: Callback<bool>,
}

#[function_component(ErrorModal)]
pub fn error_modal(props: &ErrorModalProps) -> Html {
    let retry = {
        let on_retry = props.on_retry.clone();
        Callback::from(move |_: MouseEvent| on_retry.emit(()))
    };
    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(false))
    };
    let backdrop = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            if e.target() == e.current_target() {
                on_close.emit(true);
            }
        })
    };

    html! {
        <div id="error-modal" class={classes!("modal", props.open.then(|| "active"))} onclick={backdrop}>
            <div class="modal-content">
                <div class="modal-icon">{"⚠️"}</div>
                <h3>{"일시적인 오류가 발생했습니다"}</h3>
                <p>{"예약 요청을 처리하지 못했습니다. 잠시 후 다시 시도해 주세요."}</p>
                <div class="modal-actions">
                    <button class="modal-btn secondary" onclick={close}>{"닫기"}</button>
                    <button class="modal-btn primary" onclick={retry}>{"다시 시도"}</button>
                </div>
            </div>
        </div>
    }
}
