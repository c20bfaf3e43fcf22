use yew::prelude::*;

use crate::schedule::DatePicker;

#[derive(Properties, PartialEq)]
pub struct DatePickerModalProps {
    pub open: bool,
    pub picker: DatePicker,
    pub on_month: Callback<u32>,
    pub on_day: Callback<u32>,
    pub on_confirm: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component(DatePickerModal)]
pub fn date_picker_modal(props: &DatePickerModalProps) -> Html {
    let months = props.picker.window().month_options();
    let selected_month = props.picker.selected_month();
    let selected_day = props.picker.selected_day();

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let confirm = {
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_: MouseEvent| on_confirm.emit(()))
    };
    // only clicks on the backdrop itself close the modal
    let backdrop = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            if e.target() == e.current_target() {
                on_close.emit(());
            }
        })
    };

    html! {
        <div class={classes!("picker-modal", props.open.then(|| "active"))} onclick={backdrop}>
            <div class="picker-sheet">
                <div class="picker-header">
                    <button class="picker-close" onclick={close}>{"✕"}</button>
                    <h3>{"날짜 선택"}</h3>
                </div>
                <div class="picker-columns">
                    <div class="time-picker-column" id="month-column">
                        { for months.iter().map(|m| {
                            let offset = m.offset;
                            let on_month = props.on_month.clone();
                            html! {
                                <div
                                    class={classes!("time-option", (selected_month == Some(offset)).then(|| "selected"))}
                                    onclick={Callback::from(move |_: MouseEvent| on_month.emit(offset))}
                                >
                                    { format!("{}월", m.month) }
                                </div>
                            }
                        }) }
                    </div>
                    <div class="time-picker-column" id="day-column">
                        { for props.picker.day_options().into_iter().map(|day| {
                            let on_day = props.on_day.clone();
                            html! {
                                <div
                                    class={classes!("time-option", (selected_day == Some(day)).then(|| "selected"))}
                                    onclick={Callback::from(move |_: MouseEvent| on_day.emit(day))}
                                >
                                    { format!("{}일", day) }
                                </div>
                            }
                        }) }
                    </div>
                </div>
                <button class="picker-confirm" onclick={confirm}>{"확인"}</button>
            </div>
        </div>
    }
}
