use crate::automaton::Grid;
use crate::browser;
use crate::config::LoadingConfig;
use crate::engine::{BrowserPacer, FrameScheduler, LoopHandle, Renderer};
use crate::status;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Progress ====================
/// What the loader hands to `onProgress`
/// - `total` is missing when the server sent no content length
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ProgressInfo {
    pub current: f64,
    #[serde(default)]
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressReport {
    /// rounded current / total
    Percent(i64),
    /// raw byte count, no total to compare against
    Bytes(f64),
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressReport::Percent(percent) => write!(f, "Loading... {} %", percent),
            ProgressReport::Bytes(bytes) => write!(f, "Loading... {} bytes", bytes),
        }
    }
}

impl ProgressInfo {
    pub fn report(&self) -> ProgressReport {
        match self.total {
            // a zero (or NaN) total is as good as no total
            Some(total) if total != 0.0 && !total.is_nan() => {
                ProgressReport::Percent((self.current / total * 100.0).round() as i64)
            }
            _ => ProgressReport::Bytes(self.current),
        }
    }
}

/// log progress, nothing on screen changes
pub fn report_progress(info: &ProgressInfo) -> ProgressReport {
    let report = info.report();
    log!("{}", report);
    report
}

// ==================== Animation ====================
/// Everything one running animation owns
/// - lent to every tick by the scheduler, never shared
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub grid: Grid,
    pub frame: u64,
}

/// What a single tick puts on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// new status text, `None` when the label did not change
    pub label: Option<String>,
    pub grid: Grid,
}

impl AnimationState {
    pub fn new(grid: Grid) -> Self {
        AnimationState { grid, frame: 0 }
    }

    /// ::advance one tick
    /// - bumps the frame counter first, the label follows the new count
    /// - returns the board to paint now and the label, if it changed
    /// - the held board is replaced by its successor
    pub fn advance(&mut self) -> Frame {
        self.frame += 1;
        let tick = self.frame;

        let label = status::changes_on(tick).then(|| status::label(tick));
        let shown = self.grid;
        self.grid = shown.step();

        Frame {
            label,
            grid: shown,
        }
    }
}

// ==================== Lifecycle ====================
/// Drives the loading UI across the loader's start / complete phases
pub struct LoadingScreen {
    config: LoadingConfig,
    running: Option<LoopHandle>,
    timing: bool,
}

impl LoadingScreen {
    pub fn new(config: LoadingConfig) -> Self {
        LoadingScreen {
            config,
            running: None,
            timing: false,
        }
    }

    pub fn config(&self) -> &LoadingConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map(|handle| !handle.is_stopped())
            .unwrap_or(false)
    }

    /// ::start the animation
    /// - status text and canvas must already be in the page, a missing one
    /// is an error naming the id and nothing gets animated
    /// - a second start replaces the animation that was running
    pub fn start(&mut self) -> Result<()> {
        self.stop();

        let text = browser::html_element(&self.config.text_id)
            .context("Loading screen needs its status text element")?;
        let canvas = browser::canvas(&self.config.canvas_id)
            .context("Loading screen needs its canvas element")?;
        let context = browser::context(&canvas, self.config.alpha)?;
        let state = AnimationState::new(self.config.seed()?);
        let renderer = Renderer::new(&self.config.background, &self.config.foreground);

        log!("Loading...");
        if !self.timing {
            browser::time(&self.config.timer_label);
            self.timing = true;
        }

        let pacer = BrowserPacer::new(self.config.tick_delay_ms);
        let handle = FrameScheduler::start(state, pacer, move |state: &mut AnimationState| {
            let frame = state.advance();
            if let Some(label) = frame.label {
                text.set_inner_text(&label);
            }
            renderer.draw(&frame.grid, &context);
            Ok(())
        });
        self.running = Some(handle);
        Ok(())
    }

    /// Stop the animation, if any, leaving the UI in place
    pub fn stop(&mut self) {
        if let Some(handle) = self.running.take() {
            handle.stop();
        }
    }

    /// ::complete tears the loading UI down
    /// - stops the animation
    /// - removes the container, `Ok(false)` when it was already gone
    /// - ends the console timer started by start()
    pub fn complete(&mut self) -> Result<bool> {
        self.stop();
        let removed = browser::remove_element(&self.config.container_id)?;
        if self.timing {
            browser::time_end(&self.config.timer_label);
            self.timing = false;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_with_total_is_percent() {
        let info = ProgressInfo {
            current: 50.0,
            total: Some(200.0),
        };
        assert_eq!(report_progress(&info), ProgressReport::Percent(25));
        assert_eq!(info.report().to_string(), "Loading... 25 %");
    }

    #[test]
    fn test_progress_rounds_to_nearest_percent() {
        let info = ProgressInfo {
            current: 1.0,
            total: Some(3.0),
        };
        assert_eq!(info.report(), ProgressReport::Percent(33));
        let info = ProgressInfo {
            current: 2.0,
            total: Some(3.0),
        };
        assert_eq!(info.report(), ProgressReport::Percent(67));
    }

    #[test]
    fn test_progress_percent_is_not_clamped() {
        let over = ProgressInfo {
            current: 300.0,
            total: Some(200.0),
        };
        assert_eq!(over.report(), ProgressReport::Percent(150));
        let negative = ProgressInfo {
            current: -50.0,
            total: Some(100.0),
        };
        assert_eq!(negative.report(), ProgressReport::Percent(-50));
    }

    #[test]
    fn test_progress_without_total_is_bytes() {
        let info = ProgressInfo {
            current: 1024.0,
            total: None,
        };
        assert_eq!(report_progress(&info), ProgressReport::Bytes(1024.0));
        assert_eq!(info.report().to_string(), "Loading... 1024 bytes");

        let zero_total = ProgressInfo {
            current: 1024.0,
            total: Some(0.0),
        };
        assert_eq!(zero_total.report(), ProgressReport::Bytes(1024.0));
    }

    #[test]
    fn test_advance_paints_then_steps() {
        let mut state = AnimationState::new(Grid::seed());

        let first = state.advance();
        assert_eq!(first.grid, Grid::seed());
        // first tick leaves whatever text the page started with
        assert_eq!(first.label, None);
        assert_eq!(state.grid, Grid::seed().step());
        assert_eq!(state.frame, 1);

        let second = state.advance();
        assert_eq!(second.grid, Grid::seed().step());
        assert_eq!(second.label.as_deref(), Some("Loading.  "));
        assert_eq!(state.frame, 2);
    }

    #[test]
    fn test_advance_label_cycle() {
        let mut state = AnimationState::new(Grid::dead());
        let labels: Vec<Option<String>> = (0..8).map(|_| state.advance().label).collect();
        let expected = [
            None,
            Some("Loading.  "),
            None,
            Some("Loading.. "),
            None,
            Some("Loading..."),
            None,
            Some("Loading   "),
        ];
        for (label, expected) in labels.iter().zip(expected.iter()) {
            assert_eq!(label.as_deref(), *expected);
        }
        assert_eq!(state.advance().label, None);
        assert_eq!(state.advance().label.as_deref(), Some("Loading.  "));
    }

    #[test]
    fn test_new_screen_is_idle() {
        let mut screen = LoadingScreen::new(LoadingConfig::default());
        assert!(!screen.is_running());
        screen.stop();
        assert!(!screen.is_running());
        assert_eq!(screen.config().tick_delay_ms, 125);
    }
}
