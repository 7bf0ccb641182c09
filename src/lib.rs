use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::DashboardConfig;
use crate::domain::logging::{LogComponent, get_logger};
use crate::infrastructure::services::{ChronoTimeProvider, ConsoleLogger};

#[macro_use]
mod macros;

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod global_state;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;

/// Entry point: install logging, resolve the API URL, mount the dashboard
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = if cfg!(debug_assertions) {
        ConsoleLogger::new_development()
    } else {
        ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(ChronoTimeProvider::new()));

    let config = resolve_config();
    get_logger().info(
        LogComponent::Presentation("Initialize"),
        &format!("🚀 Bot dashboard starting, API at {}", config.api_base_url),
    );

    leptos::mount_to_body(move || leptos::view! { <App config=config /> });
}

/// Build-time defaults, overridden by an `?api=` query parameter
fn resolve_config() -> DashboardConfig {
    let config = DashboardConfig::from_build_env();
    match api_override() {
        Some(url) => config.with_api_base_url(&url),
        None => config,
    }
}

fn api_override() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search).ok()?.get("api")
}
