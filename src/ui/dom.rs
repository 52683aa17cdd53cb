/// Window and document helpers shared by the extension pages
use wasm_bindgen::JsValue;

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Blocking text prompt. `None` when the user cancels.
pub fn prompt(message: &str) -> Option<String> {
    web_sys::window()?.prompt_with_message(message).ok().flatten()
}

pub fn close_window() {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.close() {
            log::warn!("Failed to close window: {:?}", e);
        }
    }
}

pub fn location_href() -> Option<String> {
    web_sys::window()?.location().href().ok()
}

pub fn set_document_title(title: &str) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(title);
    }
}

/// Rewrite the address bar without adding a history entry
pub fn replace_history(url: &str) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(url)) {
        log::warn!("Failed to update address: {:?}", e);
    }
}
