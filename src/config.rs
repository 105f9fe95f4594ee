//! Host Page Configuration
//!
//! Reads `SyncConfig` from `<script id="todo-config" type="application/json">`.

use crate::models::SyncConfig;

const CONFIG_ELEMENT_ID: &str = "todo-config";

/// Config from the host page, or the defaults plus the reason they were used.
/// Runs before logging is up, so problems are returned rather than logged.
pub fn load_config() -> (SyncConfig, Option<String>) {
    let element = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID));
    let Some(json) = element.and_then(|el| el.text_content()) else {
        return (SyncConfig::default(), None);
    };
    if json.trim().is_empty() {
        return (SyncConfig::default(), None);
    }
    match SyncConfig::from_json(&json) {
        Ok(config) => (config, None),
        Err(err) => (SyncConfig::default(), Some(format!("invalid #{}: {}", CONFIG_ELEMENT_ID, err))),
    }
}
