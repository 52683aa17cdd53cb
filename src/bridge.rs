/// Bridge to the browser extension APIs (storage, tabs, runtime messaging,
/// navigation events)

use crate::error::{FocusError, FocusResult};
use crate::message::FocusMessage;
use crate::operations::ModeChange;
use crate::storage::{StoragePatch, StorageSnapshot};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeStorage(keys: JsValue) -> Result<(), JsValue>;

    fn sendMessage(message: JsValue);

    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn updateTabUrl(tab_id: i32, url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createTab(url: &str) -> Result<(), JsValue>;

    fn extensionUrl(path: &str) -> String;
}

/// The fields of a browser tab the background cares about
#[derive(Debug, Clone, Deserialize)]
pub struct Tab {
    pub id: i32,
    #[serde(default)]
    pub url: Option<String>,
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> FocusResult<JsValue> {
    // Storage and messaging want plain objects, not ES Maps
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(FocusError::from)
}

/// Read the given keys from chrome.storage.local
pub async fn load(keys: &[&str]) -> FocusResult<StorageSnapshot> {
    let stored = getStorage(to_js(keys)?)
        .await
        .map_err(|e| FocusError::bridge(format!("Failed to get storage: {:?}", e)))?;

    if stored.is_null() || stored.is_undefined() {
        return Ok(StorageSnapshot::new());
    }

    let value: serde_json::Value = serde_wasm_bindgen::from_value(stored)?;
    Ok(StorageSnapshot::from_value(value))
}

/// Write a patch: all sets in one call, then the removals
pub async fn apply(patch: &StoragePatch) -> FocusResult<()> {
    if !patch.set.is_empty() {
        setStorage(to_js(&patch.set)?)
            .await
            .map_err(|e| FocusError::bridge(format!("Failed to save storage: {:?}", e)))?;
    }

    if !patch.remove.is_empty() {
        removeStorage(to_js(&patch.remove)?)
            .await
            .map_err(|e| FocusError::bridge(format!("Failed to remove from storage: {:?}", e)))?;
    }

    Ok(())
}

/// Post a message to the background without waiting for a reply
pub fn send(message: &FocusMessage) -> FocusResult<()> {
    sendMessage(to_js(message)?);
    Ok(())
}

/// Persist a change and then tell the background about it
pub async fn commit(change: &ModeChange) -> FocusResult<()> {
    apply(&change.patch).await?;
    if let Some(message) = &change.notify {
        send(message)?;
    }
    Ok(())
}

pub async fn get_tab(tab_id: i32) -> FocusResult<Tab> {
    let tab = getTab(tab_id)
        .await
        .map_err(|e| FocusError::bridge(format!("No tab {}: {:?}", tab_id, e)))?;

    serde_wasm_bindgen::from_value(tab).map_err(FocusError::from)
}

pub async fn navigate_tab(tab_id: i32, url: &str) -> FocusResult<()> {
    updateTabUrl(tab_id, url)
        .await
        .map_err(|e| FocusError::bridge(format!("Failed to update tab {}: {:?}", tab_id, e)))
}

pub async fn open_tab(url: &str) -> FocusResult<()> {
    createTab(url)
        .await
        .map_err(|e| FocusError::bridge(format!("Failed to open tab: {:?}", e)))
}

/// Absolute URL of a page packaged with the extension
pub fn extension_url(path: &str) -> String {
    extensionUrl(path)
}
