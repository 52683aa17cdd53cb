/// Background controller: owns the blocker and handles the runtime messages
/// and navigation events that `background.js` forwards to it

use crate::blocker::{should_restore, Blocker, NavigationDetails, Restore};
use crate::bridge;
use crate::error::FocusResult;
use crate::message::FocusMessage;
use crate::storage::ACTIVE_MODE_KEY;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Page that blocked tabs are sent to
pub const PLACEHOLDER_PAGE: &str = "blocked.html";

thread_local! {
    static BLOCKER: Rc<RefCell<Blocker>> =
        Rc::new(RefCell::new(Blocker::new(bridge::extension_url(PLACEHOLDER_PAGE))));
}

fn blocker() -> Rc<RefCell<Blocker>> {
    BLOCKER.with(Rc::clone)
}

/// Bring the runtime state back in line with the persisted active mode.
/// `background.js` holds events back until this resolves.
pub async fn start() {
    resume_active_mode(blocker()).await;
}

/// Handle a `runtime.onMessage` payload. Returns true when the work finishes
/// after the listener returns.
pub fn handle_message(message: JsValue) -> bool {
    match serde_wasm_bindgen::from_value::<FocusMessage>(message) {
        Ok(FocusMessage::Enable { mode }) => {
            spawn_local(enable_focus_mode(blocker(), mode));
            true
        }
        Ok(FocusMessage::Disable) => {
            disable_focus_mode(&blocker());
            false
        }
        Err(e) => {
            log::debug!("[Focusly] Ignoring message: {}", e);
            false
        }
    }
}

/// Handle a `webNavigation.onBeforeNavigate` event
pub fn handle_navigation(details: JsValue) {
    if let Err(e) = redirect_if_blocked(&blocker(), details) {
        log::error!("[Focusly Error] {}", e);
    }
}

async fn enable_focus_mode(blocker: Rc<RefCell<Blocker>>, mode: String) {
    let loaded = bridge::load(&[mode.as_str()])
        .await
        .and_then(|snapshot| snapshot.mode_config(&mode));

    match blocker.borrow_mut().enable(&mode, loaded) {
        Ok(()) => log::info!("[Focusly] Focus mode enabled: {}", mode),
        Err(e) => log::warn!("[Focusly] No valid sites found for mode {}: {}", mode, e),
    }
}

fn disable_focus_mode(blocker: &Rc<RefCell<Blocker>>) {
    let (restores, placeholder) = {
        let mut blocker = blocker.borrow_mut();
        (blocker.disable(), blocker.placeholder().to_string())
    };
    log::info!("[Focusly] Focus mode disabled, restoring {} tab(s)", restores.len());

    for restore in restores {
        spawn_local(restore_tab(restore, placeholder.clone()));
    }
}

async fn restore_tab(restore: Restore, placeholder: String) {
    let tab = match bridge::get_tab(restore.tab_id).await {
        Ok(tab) => tab,
        Err(e) => {
            log::debug!("[Focusly] Skipping restore: {}", e);
            return;
        }
    };

    if !should_restore(tab.url.as_deref(), &placeholder) {
        return;
    }
    if let Err(e) = bridge::navigate_tab(tab.id, &restore.url).await {
        log::debug!("[Focusly] Skipping restore: {}", e);
    }
}

fn redirect_if_blocked(blocker: &Rc<RefCell<Blocker>>, details: JsValue) -> FocusResult<()> {
    let details: NavigationDetails = serde_wasm_bindgen::from_value(details)?;
    let redirect = blocker.borrow_mut().on_navigation_details(&details)?;

    if let Some(target) = redirect {
        log::info!("[Focusly] Blocked {} in tab {}", details.url, details.tab_id);
        let tab_id = details.tab_id;
        spawn_local(async move {
            if let Err(e) = bridge::navigate_tab(tab_id, &target).await {
                log::error!("[Focusly Error] {}", e);
            }
        });
    }

    Ok(())
}

async fn resume_active_mode(blocker: Rc<RefCell<Blocker>>) {
    match bridge::load(&[ACTIVE_MODE_KEY]).await {
        Ok(snapshot) => {
            if let Some(mode) = snapshot.active_mode() {
                log::info!("[Focusly] Resuming focus mode: {}", mode);
                enable_focus_mode(blocker, mode).await;
            }
        }
        Err(e) => log::warn!("[Focusly] Could not read active mode: {}", e),
    }
}
