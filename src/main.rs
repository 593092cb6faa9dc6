#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

#[allow(unused_imports)]
use replay_desk::{Cli, HttpGateway, OfflineGateway, SharedGateway, run_app};

use std::sync::Arc;

// --- WASM SPECIFIC CODE ---
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// This keeps the WASM memory allocator from being stripped
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn _keep_alive() {}

// The compiler still wants a main() even though 'start' is the entry point
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Replay desk starting in WASM mode");

    let web_options = eframe::WebOptions::default();

    // The browser build cannot read CLI flags; fall back to demo data when
    // the backend client cannot be built.
    let gateway: SharedGateway = match HttpGateway::new(replay_desk::config::API.base_url) {
        Ok(gateway) => Arc::new(gateway),
        Err(err) => {
            log::warn!("backend client unavailable ({err}), using demo data");
            Arc::new(OfflineGateway)
        }
    };

    let window = web_sys::window().expect("no global `window` exists");
    let document = window.document().expect("should have a document on window");

    let canvas = document
        .get_element_by_id("the_canvas_id")
        .expect("Failed to find canvas with id 'the_canvas_id'")
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| "the_canvas_id was not a valid HtmlCanvasElement")?;

    eframe::WebRunner::new()
        .start(
            canvas,
            web_options,
            Box::new(move |cc| Ok(run_app(cc, gateway))),
        )
        .await
}

// --- NATIVE SPECIFIC CODE ---
#[cfg(not(target_arch = "wasm32"))]
const APP_STATE_PATH: &str = "replay_desk_state.json";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    use clap::Parser;
    use eframe::NativeOptions;
    use std::path::PathBuf;

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    let gateway: SharedGateway = if args.offline {
        Arc::new(OfflineGateway)
    } else {
        let client = HttpGateway::new(&args.api_base).expect("Failed to build backend client");
        Arc::new(client)
    };

    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(APP_STATE_PATH)),
        ..Default::default()
    };

    eframe::run_native(
        "Replay Desk",
        options,
        Box::new(move |cc| Ok(run_app(cc, gateway))),
    )
}
