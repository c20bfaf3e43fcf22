use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{window, HtmlDocument, HtmlTextAreaElement};
use yew::prelude::*;

/// `navigator.clipboard.writeText`, reached through reflection so it works
/// where the Clipboard API is missing from the bindings.
async fn clipboard_write(text: &str) -> Result<(), JsValue> {
    let navigator = window().ok_or(JsValue::NULL)?.navigator();
    let clipboard = js_sys::Reflect::get(&navigator, &"clipboard".into())?;
    let write = js_sys::Reflect::get(&clipboard, &"writeText".into())?
        .dyn_into::<js_sys::Function>()?;
    let promise = write
        .call1(&clipboard, &JsValue::from_str(text))?
        .dyn_into::<js_sys::Promise>()?;
    JsFuture::from(promise).await.map(|_| ())
}

/// Select-and-copy through a temporary textarea.
fn legacy_copy(text: &str) -> Result<(), JsValue> {
    let document = window().and_then(|w| w.document()).ok_or(JsValue::NULL)?;
    let body = document.body().ok_or(JsValue::NULL)?;
    let textarea = document
        .create_element("textarea")?
        .dyn_into::<HtmlTextAreaElement>()?;
    textarea.set_value(text);
    body.append_child(&textarea)?;
    textarea.select();
    let copied = document.dyn_into::<HtmlDocument>()?.exec_command("copy");
    let _ = body.remove_child(&textarea);
    copied.map(|_| ())
}

#[derive(Properties, PartialEq)]
pub struct CopyAddressProps {
    pub address: String,
    pub on_copied: Callback<()>,
}

#[function_component(CopyAddress)]
pub fn copy_address(props: &CopyAddressProps) -> Html {
    let toast_visible = use_state(|| false);

    let onclick = {
        let address = props.address.clone();
        let on_copied = props.on_copied.clone();
        let toast_visible = toast_visible.clone();
        Callback::from(move |_: MouseEvent| {
            let address = address.clone();
            let on_copied = on_copied.clone();
            let toast_visible = toast_visible.clone();
            spawn_local(async move {
                if let Err(e) = clipboard_write(&address).await {
                    log::debug!("[Hands Free] Clipboard API failed: {:?}", e);
                    if let Err(e) = legacy_copy(&address) {
                        log::debug!("[Hands Free] Legacy copy failed: {:?}", e);
                    }
                }
                // the toast is shown whichever path ran
                toast_visible.set(true);
                on_copied.emit(());
                let toast_visible = toast_visible.clone();
                Timeout::new(2500, move || toast_visible.set(false)).forget();
            });
        })
    };

    html! {
        <>
            <button id="copy-address" class="copy-btn" {onclick}>{"주소 복사"}</button>
            <div id="toast" class={classes!("toast", (*toast_visible).then(|| "show"))}>
                {"주소가 복사되었습니다"}
            </div>
        </>
    }
}
