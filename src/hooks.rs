use crate::config::LoadingConfig;
use crate::loading::{report_progress, LoadingScreen, ProgressInfo};
use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::{Closure, WasmClosure};
use wasm_bindgen::JsValue;

/// The five callbacks a module loader calls while it brings the app up
/// - plain function fields, swap any of them to change one phase
/// - `into_js` turns the record into `{ onStart, onProgress, ... }`
pub struct LoaderHooks {
    pub on_start: Box<dyn FnMut()>,
    pub on_progress: Box<dyn FnMut(ProgressInfo)>,
    pub on_complete: Box<dyn FnMut()>,
    /// receives the instantiated module
    pub on_success: Box<dyn FnMut(JsValue)>,
    /// receives whatever the loader failed with, never inspected here
    pub on_failure: Box<dyn FnMut(JsValue)>,
}

impl LoaderHooks {
    /// Hooks wired to a loading screen
    /// - start / complete share one LoadingScreen
    /// - progress only logs
    /// - success / failure do nothing until replaced
    pub fn loading_screen(config: LoadingConfig) -> Self {
        let screen = Rc::new(RefCell::new(LoadingScreen::new(config)));
        let start_screen = screen.clone();
        let complete_screen = screen;

        LoaderHooks {
            on_start: Box::new(move || {
                if let Err(err) = start_screen.borrow_mut().start() {
                    error!("[hooks.rs::on_start] loading screen disabled : {:#}", err);
                }
            }),
            on_progress: Box::new(|info: ProgressInfo| {
                report_progress(&info);
            }),
            on_complete: Box::new(move || {
                if let Err(err) = complete_screen.borrow_mut().complete() {
                    error!("[hooks.rs::on_complete] {:#}", err);
                }
            }),
            on_success: Box::new(|_: JsValue| {}),
            on_failure: Box::new(|_: JsValue| {}),
        }
    }

    pub fn with_success(mut self, f: impl FnMut(JsValue) + 'static) -> Self {
        self.on_success = Box::new(f);
        self
    }

    pub fn with_failure(mut self, f: impl FnMut(JsValue) + 'static) -> Self {
        self.on_failure = Box::new(f);
        self
    }

    /// Build the JS object the loader expects
    /// - closures are handed over to the JS garbage collector
    /// - a progress argument that doesn't look like `{ current, total }` is
    /// logged and dropped
    pub fn into_js(self) -> Result<JsValue> {
        let LoaderHooks {
            on_start,
            mut on_progress,
            on_complete,
            on_success,
            on_failure,
        } = self;

        let on_progress: Box<dyn FnMut(JsValue)> = Box::new(move |value: JsValue| {
            match serde_wasm_bindgen::from_value::<ProgressInfo>(value) {
                Ok(info) => on_progress(info),
                Err(err) => error!("[hooks.rs::on_progress] unexpected progress value : {}", err),
            }
        });

        let object = js_sys::Object::new();
        set_callback(&object, "onStart", on_start)?;
        set_callback(&object, "onProgress", on_progress)?;
        set_callback(&object, "onComplete", on_complete)?;
        set_callback(&object, "onSuccess", on_success)?;
        set_callback(&object, "onFailure", on_failure)?;
        Ok(object.into())
    }
}

fn set_callback<T>(object: &js_sys::Object, name: &str, callback: Box<T>) -> Result<()>
where
    T: ?Sized + WasmClosure,
{
    let function = Closure::wrap(callback).into_js_value();
    js_sys::Reflect::set(object, &JsValue::from_str(name), &function)
        .map_err(|err| anyhow!("Could not set '{}' on hook object : {:#?}", name, err))?;
    Ok(())
}
