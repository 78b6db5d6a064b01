use anyhow::{anyhow, Result};
use futures::channel::oneshot::channel;
use std::future::Future;
use wasm_bindgen::closure::{Closure, WasmClosure, WasmClosureFnOnce};
use wasm_bindgen::JsCast;

#[rustfmt::skip]
use web_sys::{
    CanvasRenderingContext2d,
    Document,
    Element,
    HtmlCanvasElement,
    HtmlElement,
    Window,
};

// ==================== Logging ====================
// console on wasm, stdout/stderr everywhere else so native tests can still
// run code that logs
macro_rules! log {
    ($($t:tt)*) => {
        $crate::browser::log_str(&format!($($t)*))
    }
}

macro_rules! error {
    ($($t:tt)*) => {
        $crate::browser::error_str(&format!($($t)*))
    }
}

#[cfg(target_arch = "wasm32")]
pub fn log_str(message: &str) {
    web_sys::console::log_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_str(message: &str) {
    println!("{}", message);
}

#[cfg(target_arch = "wasm32")]
pub fn error_str(message: &str) {
    web_sys::console::error_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn error_str(message: &str) {
    eprintln!("{}", message);
}

/// console.time
pub fn time(label: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::time_with_label(label);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = label;
}

/// console.timeEnd
pub fn time_end(label: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::time_end_with_label(label);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = label;
}

// ==================== DOM ====================
pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| anyhow!("Window not found"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow!("No Document Found"))
}

/// Required element lookup, a missing id is an error naming the id
pub fn element(id: &str) -> Result<Element> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("No Element found with ID : '{}'", id))
}

pub fn html_element(id: &str) -> Result<HtmlElement> {
    element(id)?
        .dyn_into::<HtmlElement>()
        .map_err(|element| anyhow!("Error converting {:#?} to HtmlElement", element))
}

pub fn canvas(id: &str) -> Result<HtmlCanvasElement> {
    element(id)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|element| anyhow!("Error converting {:#?} to HtmlCanvasElement", element))
}

pub fn context(canvas: &HtmlCanvasElement, alpha: bool) -> Result<CanvasRenderingContext2d> {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &"alpha".into(), &alpha.into())
        .map_err(|err| anyhow!("Could not set context options : {:#?}", err))?;

    // Because return is Result<Option<Object>,JsValue>
    // - we map error(JsValue) to Error (anyhow)
    // - take the inner Option and map the None case to a value
    canvas
        .get_context_with_context_options(crate::config::html::CONTEXT_2D, &options)
        .map_err(|js_value| anyhow!("Error getting context : {:#?}", js_value))?
        .ok_or_else(|| anyhow!("No 2d context found"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|element| {
            anyhow!(
                "Error converting {:#?} to CanvasRenderingContext2d",
                element
            )
        })
}

/// Remove an element if it is still in the document
/// - `Ok(true)` when something was removed, `Ok(false)` when it was already
/// gone
pub fn remove_element(id: &str) -> Result<bool> {
    match document()?.get_element_by_id(id) {
        Some(element) => {
            element.remove();
            Ok(true)
        }
        None => Ok(false),
    }
}

// ==================== Async ====================
pub fn closure_once<F, M, A, R>(f: F) -> Closure<M>
where
    M: ?Sized + WasmClosure,
    F: 'static + WasmClosureFnOnce<M, A, R>,
{
    Closure::once(f)
}

pub fn spawn_local<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

/// Resolves after `ms` milliseconds (setTimeout)
pub async fn sleep(ms: i32) -> Result<()> {
    let (tx, rx) = channel::<()>();
    let callback = closure_once(move || {
        let _ = tx.send(());
    });

    window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            ms,
        )
        .map_err(|err| anyhow!("Could not set timeout : {:#?}", err))?;

    // `callback` lives in this future until the timer fires, no forget()
    rx.await
        .map_err(|_| anyhow!("Timeout callback dropped before firing"))
}

/// Resolves on the next display refresh with the frame timestamp
/// (requestAnimationFrame)
pub async fn next_animation_frame() -> Result<f64> {
    let (tx, rx) = channel::<f64>();
    let callback = closure_once(move |timestamp: f64| {
        let _ = tx.send(timestamp);
    });

    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Could not request animation frame : {:#?}", err))?;

    rx.await
        .map_err(|_| anyhow!("Animation frame callback dropped before firing"))
}

