use yew::prelude::*;

use crate::models::session::Period;
use crate::schedule::{TimePicker, HOUR_OPTIONS, MINUTE_OPTIONS};

#[derive(Properties, PartialEq)]
pub struct TimePickerModalProps {
    pub open: bool,
    pub picker: TimePicker,
    pub on_period: Callback<Period>,
    pub on_hour: Callback<u8>,
    pub on_minute: Callback<u8>,
    pub on_confirm: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component(TimePickerModal)]
pub fn time_picker_modal(props: &TimePickerModalProps) -> Html {
    let picker = &props.picker;

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let confirm = {
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_: MouseEvent| on_confirm.emit(()))
    };
    let backdrop = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            if e.target() == e.current_target() {
                on_close.emit(());
            }
        })
    };

    let period_option = |period: Period, label: &'static str| {
        let on_period = props.on_period.clone();
        html! {
            <div
                class={classes!("time-option", (picker.period() == Some(period)).then(|| "selected"))}
                onclick={Callback::from(move |_: MouseEvent| on_period.emit(period))}
            >
                { label }
            </div>
        }
    };

    html! {
        <div class={classes!("picker-modal", props.open.then(|| "active"))} onclick={backdrop}>
            <div class="picker-sheet">
                <div class="picker-header">
                    <button class="picker-close" onclick={close}>{"✕"}</button>
                    <h3>{"시간 선택"}</h3>
                </div>
                <div class="picker-columns">
                    <div class="time-picker-column" id="period-column">
                        { period_option(Period::Am, "오전") }
                        { period_option(Period::Pm, "오후") }
                    </div>
                    <div class="time-picker-column" id="hour-column">
                        { for HOUR_OPTIONS.map(|hour| {
                            let on_hour = props.on_hour.clone();
                            html! {
                                <div
                                    class={classes!("time-option", (picker.hour() == Some(hour)).then(|| "selected"))}
                                    onclick={Callback::from(move |_: MouseEvent| on_hour.emit(hour))}
                                >
                                    { hour.to_string() }
                                </div>
                            }
                        }) }
                    </div>
                    <div class="time-picker-column" id="minute-column">
                        { for MINUTE_OPTIONS.map(|minute| {
                            let on_minute = props.on_minute.clone();
                            html! {
                                <div
                                    class={classes!("time-option", (picker.minute() == Some(minute)).then(|| "selected"))}
                                    onclick={Callback::from(move |_: MouseEvent| on_minute.emit(minute))}
                                >
                                    { format!("{:02}", minute) }
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
