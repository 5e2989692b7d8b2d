//! TaskMate browser client: a typed wrapper over the TaskMate REST API and
//! the page controllers that drive it.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod pages;
pub mod route;
pub mod session;

#[cfg(test)]
mod test_support;

use sauron::prelude::*;

use crate::api::Api;
use crate::app::App;
use crate::config::ClientConfig;

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = ClientConfig::from_build_env();
    logging::init(config.log_level);
    log::info!("using API at {}", config.api_base_url);

    let api = Api::browser(config);
    Program::mount_to_body(App::new(api, app::current_route()));
}
