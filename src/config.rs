use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::automaton::Grid;

// Constants related to HTML elements
pub mod html {
    pub const TEXT_ID: &str = "loading-text";
    pub const CANVAS_ID: &str = "loading-canvas";
    pub const CONTAINER_ID: &str = "loading-container";
    pub const CONTEXT_2D: &str = "2d";
}

/// Settings for the loading screen
/// - every field is optional when coming from JS, missing ones take the
/// `Default` value
/// - JS side uses camelCase : `{ tickDelayMs: 250, seedRle: "..." }`
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadingConfig {
    pub text_id: String,
    pub canvas_id: String,
    pub container_id: String,
    /// wait between the end of one tick and the next animation frame request
    pub tick_delay_ms: i32,
    pub background: String,
    pub foreground: String,
    /// request a transparent 2d context
    pub alpha: bool,
    /// Run Length Encoded pattern replacing the built in seed
    pub seed_rle: Option<String>,
    /// label passed to console.time / console.timeEnd
    pub timer_label: String,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        LoadingConfig {
            text_id: html::TEXT_ID.to_string(),
            canvas_id: html::CANVAS_ID.to_string(),
            container_id: html::CONTAINER_ID.to_string(),
            tick_delay_ms: 125,
            background: "black".to_string(),
            foreground: "white".to_string(),
            alpha: false,
            seed_rle: None,
            timer_label: "trunk-initializer".to_string(),
        }
    }
}

impl LoadingConfig {
    /// `undefined` / `null` give the defaults
    pub fn from_js(value: JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let config: LoadingConfig = serde_wasm_bindgen::from_value(value)
            .map_err(|err| anyhow!("Invalid loading config : {:#?}", err))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_delay_ms < 0 {
            return Err(anyhow!(
                "tickDelayMs must not be negative, got {}",
                self.tick_delay_ms
            ));
        }
        for (name, id) in [
            ("textId", &self.text_id),
            ("canvasId", &self.canvas_id),
            ("containerId", &self.container_id),
        ] {
            if id.trim().is_empty() {
                return Err(anyhow!("{} must not be empty", name));
            }
        }
        if let Some(rle) = &self.seed_rle {
            Grid::from_rle(rle)?;
        }
        Ok(())
    }

    /// the board the animation starts from
    pub fn seed(&self) -> Result<Grid> {
        match &self.seed_rle {
            Some(rle) => Grid::from_rle(rle),
            None => Ok(Grid::seed()),
        }
    }
}
