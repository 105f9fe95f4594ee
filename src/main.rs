#![allow(warnings)]
//! Todo Frontend Entry Point

mod models;
mod notify;
mod config;
mod store;
mod context;
mod commands;
mod components;
mod app;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let (config, problem) = config::load_config();
    if let Err(e) = rolling_logger::init_logger("todo-ui", &config.log_level) {
        web_sys::console::warn_1(&format!("[APP] Logger not installed: {}", e).into());
    }
    if let Some(problem) = problem {
        tracing::warn!("{}, using defaults", problem);
    }

    mount_to_body(move || view! { <App config=config /> });
}
