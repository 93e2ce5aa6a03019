use pull_to_refresh::{PullToRefreshOptions, RefreshState, logging, use_pull_to_refresh};
use tracing::{Level, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::prelude::*;

/// How long the fake refresh takes, in ms.
const REFRESH_DELAY_MS: i32 = 1200;
const OPTIONS_SCRIPT_ID: &str = "pull-to-refresh-options";

/// Options from the page's `<script type="application/json">` block, if any.
fn load_options() -> PullToRefreshOptions {
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(OPTIONS_SCRIPT_ID))
        .and_then(|el| el.text_content());
    match raw {
        Some(raw) => PullToRefreshOptions::from_json(&raw).unwrap_or_else(|err| {
            warn!(%err, "ignoring page options");
            PullToRefreshOptions::default()
        }),
        None => PullToRefreshOptions::default(),
    }
}

fn timestamp() -> String {
    String::from(js_sys::Date::new_0().to_locale_time_string("en-US"))
}

#[function_component(App)]
fn app() -> Html {
    let options = use_memo((), |_| load_options());
    let items = use_state(|| vec![format!("Loaded at {}", timestamp())]);

    let on_refresh = {
        let items = items.clone();
        Callback::from(move |refreshing: RefreshState| {
            let items = items.clone();
            let finish = {
                let refreshing = refreshing.clone();
                Closure::once_into_js(move || {
                    let mut next = (*items).clone();
                    let roll = (js_sys::Math::random() * 100.0) as u32;
                    next.insert(0, format!("Refreshed at {} (#{roll})", timestamp()));
                    items.set(next);
                    refreshing.set(false);
                })
            };
            let scheduled = web_sys::window().map(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(
                    finish.unchecked_ref(),
                    REFRESH_DELAY_MS,
                )
            });
            if !matches!(scheduled, Some(Ok(_))) {
                warn!("could not schedule refresh, finishing now");
                refreshing.set(false);
            }
        })
    };

    let refreshing = use_pull_to_refresh((*options).clone(), on_refresh);

    html! {
        <div id="root">
            <div id="top-bar">
                { if refreshing.get() { "Refreshing…" } else { "Pull down to refresh" } }
            </div>
            <div id={options.pull_to_refresh_id.clone()} class="indicator">{"⟳"}</div>
            <div id={options.scroll_area_id.clone()} class="scroll-area">
                { for items.iter().map(|item| html! { <div class="item">{ item }</div> }) }
                { for (1..=40).map(|i| html! { <div class="item">{ format!("Row {i}") }</div> }) }
            </div>
        </div>
    }
}

fn main() {
    logging::init(Level::DEBUG);
    info!("starting pull-to-refresh demo");
    yew::Renderer::<App>::new().render();
}
