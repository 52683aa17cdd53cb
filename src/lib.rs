/// Focusly - Chrome Extension for Focus Modes
/// Built with Rust + WASM + Yew

pub mod background;
pub mod blocker;
pub mod bridge;
pub mod domain;
pub mod error;
pub mod message;
pub mod mode;
pub mod operations;
pub mod storage;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the background controller (service worker); resolves once the
// persisted active mode is back in effect
#[wasm_bindgen]
pub async fn start_background() {
    background::start().await;
}

// Runtime message forwarded by the service worker's listener
#[wasm_bindgen]
pub fn handle_message(message: JsValue) -> bool {
    background::handle_message(message)
}

// Navigation event forwarded by the service worker's listener
#[wasm_bindgen]
pub fn handle_navigation(details: JsValue) {
    background::handle_navigation(details);
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for a mode's settings page
#[wasm_bindgen]
pub fn start_settings() {
    yew::Renderer::<ui::settings::SettingsPage>::new().render();
}

// Start the Yew app for the blocked-site placeholder
#[wasm_bindgen]
pub fn start_blocked_page() {
    yew::Renderer::<ui::blocked::BlockedPage>::new().render();
}
