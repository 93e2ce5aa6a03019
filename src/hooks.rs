use std::rc::Rc;

use tracing::error;
use yew::prelude::*;

use crate::dom::PullToRefresh;
use crate::options::PullToRefreshOptions;
use crate::refresh::{RefreshCallback, RefreshState};

/// Wires pull-to-refresh to the elements named in `options` once the component
/// has rendered, and tears it down on unmount.
///
/// Returns the shared refresh state; the component re-renders whenever it
/// changes. `on_refresh` must eventually set the state to `false`.
///
/// # Panics
///
/// If either element cannot be found after the first render.
#[hook]
pub fn use_pull_to_refresh(
    options: PullToRefreshOptions,
    on_refresh: Callback<RefreshState>,
) -> RefreshState {
    let refreshing = use_memo((), |_| RefreshState::new());
    let latest_on_refresh = use_mut_ref(|| on_refresh.clone());
    *latest_on_refresh.borrow_mut() = on_refresh;
    let update = use_force_update();

    {
        let refreshing = (*refreshing).clone();
        use_effect_with(options, move |options| {
            let callback: RefreshCallback = Rc::new(move |state: RefreshState| {
                let on_refresh = latest_on_refresh.borrow().clone();
                on_refresh.emit(state);
            });
            let mounted = match PullToRefresh::mount_with_state(options, refreshing.clone(), callback)
            {
                Ok(mounted) => mounted,
                Err(err) => {
                    error!(%err, "pull-to-refresh setup failed");
                    panic!("pull-to-refresh setup failed: {err}");
                }
            };
            let rerender = refreshing.subscribe(move |_| update.force_update());
            move || {
                drop(rerender);
                drop(mounted);
            }
        });
    }

    (*refreshing).clone()
}
