// ==================== Imports ====================
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

#[macro_use]
mod browser;
pub mod automaton;
pub mod config;
pub mod engine;
pub mod hooks;
pub mod loading;
pub mod status;

pub use automaton::Grid;
pub use config::LoadingConfig;
pub use engine::{FrameScheduler, LoopHandle, Renderer};
pub use hooks::LoaderHooks;
pub use loading::{LoadingScreen, ProgressInfo, ProgressReport};

// ==================== Main Functions ====================
/// Hook object for the module loader, default settings
/// - sets up better panic messages
/// - `{ onStart, onProgress, onComplete, onSuccess, onFailure }`
///
/// From a loader's initializer module :
/// `export default () => wasm.initializer();`
#[wasm_bindgen]
pub fn initializer() -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    build(LoadingConfig::default())
}

/// Same as `initializer` with settings from a JS object, see LoadingConfig
/// for the field names
#[wasm_bindgen(js_name = initializerWithConfig)]
pub fn initializer_with_config(config: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let config =
        LoadingConfig::from_js(config).map_err(|err| JsValue::from_str(&format!("{:#}", err)))?;
    build(config)
}

fn build(config: LoadingConfig) -> Result<JsValue, JsValue> {
    LoaderHooks::loading_screen(config)
        .into_js()
        .map_err(|err| JsValue::from_str(&format!("{:#}", err)))
}
