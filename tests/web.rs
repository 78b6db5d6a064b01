//! Browser tests, run with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use life_loader::{initializer, initializer_with_config, LoadingConfig, LoadingScreen};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r#"
<div id="loading-container">
  <p id="loading-text"></p>
  <canvas id="loading-canvas" width="64" height="64"></canvas>
</div>
"#;

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn set_page(html: &str) {
    document().body().unwrap().set_inner_html(html);
}

async fn wait_ms(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn start_without_elements_is_a_descriptive_error() {
    set_page("");
    let mut screen = LoadingScreen::new(LoadingConfig::default());

    let err = screen.start().unwrap_err();
    assert!(format!("{:#}", err).contains("loading-text"));
    assert!(!screen.is_running());
}

#[wasm_bindgen_test]
fn start_with_wrong_canvas_element_fails() {
    set_page(r#"<p id="loading-text"></p><div id="loading-canvas"></div>"#);
    let mut screen = LoadingScreen::new(LoadingConfig::default());
    assert!(screen.start().is_err());
}

#[wasm_bindgen_test]
async fn start_animates_status_text() {
    set_page(PAGE);
    let mut screen = LoadingScreen::new(LoadingConfig {
        tick_delay_ms: 1,
        ..LoadingConfig::default()
    });

    screen.start().unwrap();
    assert!(screen.is_running());
    wait_ms(50).await;

    let text = document()
        .get_element_by_id("loading-text")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    assert!(text.inner_text().starts_with("Loading"));

    screen.stop();
    assert!(!screen.is_running());
}

#[wasm_bindgen_test]
async fn complete_is_idempotent() {
    set_page(PAGE);
    let mut screen = LoadingScreen::new(LoadingConfig::default());
    screen.start().unwrap();

    assert!(screen.complete().unwrap());
    assert!(!screen.is_running());
    assert!(document().get_element_by_id("loading-container").is_none());

    assert!(!screen.complete().unwrap());
    assert!(!screen.is_running());
}

#[wasm_bindgen_test]
fn initializer_exposes_five_hooks() {
    let hooks = initializer().unwrap();
    for name in ["onStart", "onProgress", "onComplete", "onSuccess", "onFailure"] {
        let hook = js_sys::Reflect::get(&hooks, &JsValue::from_str(name)).unwrap();
        assert!(hook.is_function(), "{} should be a function", name);
    }
}

#[wasm_bindgen_test]
fn hooks_run_from_js() {
    set_page(PAGE);
    let hooks = initializer().unwrap();
    let call = |name: &str, arg: &JsValue| {
        js_sys::Reflect::get(&hooks, &JsValue::from_str(name))
            .unwrap()
            .unchecked_into::<js_sys::Function>()
            .call1(&JsValue::NULL, arg)
            .unwrap();
    };

    call("onStart", &JsValue::UNDEFINED);

    let progress = js_sys::Object::new();
    js_sys::Reflect::set(&progress, &"current".into(), &50.into()).unwrap();
    js_sys::Reflect::set(&progress, &"total".into(), &200.into()).unwrap();
    call("onProgress", &progress);

    call("onComplete", &JsValue::UNDEFINED);
    assert!(document().get_element_by_id("loading-container").is_none());
    call("onComplete", &JsValue::UNDEFINED);

    call("onSuccess", &JsValue::UNDEFINED);
    call("onFailure", &JsValue::from_str("boom"));
}

#[wasm_bindgen_test]
fn config_from_js() {
    let config = js_sys::Object::new();
    js_sys::Reflect::set(&config, &"tickDelayMs".into(), &250.into()).unwrap();
    js_sys::Reflect::set(&config, &"canvasId".into(), &"other".into()).unwrap();

    let parsed = LoadingConfig::from_js(config.into()).unwrap();
    assert_eq!(parsed.tick_delay_ms, 250);
    assert_eq!(parsed.canvas_id, "other");
    assert_eq!(parsed.text_id, "loading-text");

    assert_eq!(
        LoadingConfig::from_js(JsValue::UNDEFINED).unwrap(),
        LoadingConfig::default()
    );
}

#[wasm_bindgen_test]
fn initializer_rejects_bad_config() {
    let config = js_sys::Object::new();
    js_sys::Reflect::set(&config, &"tickDelayMs".into(), &(-5).into()).unwrap();
    assert!(initializer_with_config(config.into()).is_err());
}
