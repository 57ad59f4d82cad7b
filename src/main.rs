#![allow(warnings)]
//! Roadmap Dashboard Frontend Entry Point

mod app;
mod components;
mod context;
mod gateway;
mod store;

use app::App;
use leptos::prelude::*;
use log::{Level, LevelFilter};
use wasm_bindgen::JsValue;

fn main() {
    console_error_panic_hook::set_once();

    // Browser console is the log sink; recent lines stay in the ring buffer
    let _ = rolling_logger::init_with_sink("Roadmaps", LevelFilter::Debug, |level, line| {
        let line = JsValue::from_str(line);
        match level {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    });

    mount_to_body(App);
}
