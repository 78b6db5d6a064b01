use crate::automaton::{Grid, SIZE};
use crate::browser;
use anyhow::Result;
// ELI5: web assembly is a single threaded environment, so Rc Cell > Mutex
use async_trait::async_trait;
use std::cell::Cell;
use std::rc::Rc;
use web_sys::CanvasRenderingContext2d;

// TABLE
// ┌──────────────────────────── Tick Flow ──────────────────────────────────┐
// │                                                                         │
// │    ┌──────────────┐  tick   ┌──────────────┐  step   ┌─────────────┐   │
// │    │  loading.rs  ├────────►│  engine.rs   ├────────►│ automaton.rs│   │
// │    │ LoadingScreen│         │FrameScheduler│         │ Grid::step  │   │
// │    └──────────────┘         └──────┬───────┘         └─────────────┘   │
// │                                    │ draw                               │
// │                             ┌──────┴───────┐         ┌─────────────┐   │
// │                             │   Renderer   │         │  status.rs  │   │
// │                             │   (canvas)   │         │ label(tick) │   │
// │                             └──────────────┘         └─────────────┘   │
// │                                                                         │
// ├───────────────────────────── Pacing ────────────────────────────────────┤
// │  tick ─► setTimeout(delay) ─► requestAnimationFrame ─► tick ─► ...      │
// │  LoopHandle::stop() is checked before every tick                        │
// └─────────────────────────────────────────────────────────────────────────┘

// ==================== Surface ====================
/// Anything the renderer can paint rectangles on
/// - implemented for the real 2d context
/// - tests implement it with a recorder
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn set_fill(&self, color: &str);
    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64);
}

impl Surface for CanvasRenderingContext2d {
    fn width(&self) -> f64 {
        self.canvas().map(|canvas| canvas.width() as f64).unwrap_or(0.0)
    }

    fn height(&self) -> f64 {
        self.canvas()
            .map(|canvas| canvas.height() as f64)
            .unwrap_or(0.0)
    }

    fn set_fill(&self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
    }
}

// ==================== Renderer ====================
pub struct Renderer {
    background: String,
    foreground: String,
}

impl Renderer {
    pub fn new(background: &str, foreground: &str) -> Self {
        Renderer {
            background: background.to_string(),
            foreground: foreground.to_string(),
        }
    }

    /// side of one cell in pixels, the canvas width split across the grid
    pub fn cell_size(surface: &impl Surface) -> f64 {
        surface.width() / SIZE as f64
    }

    /// ::draw paints one board
    /// - clear the whole surface to the background
    /// - one square per alive interior cell, nudged by half a pixel so
    /// neighbouring squares overlap instead of leaving seams
    pub fn draw(&self, grid: &Grid, surface: &impl Surface) {
        let cell = Self::cell_size(surface);

        surface.set_fill(&self.background);
        surface.fill_rect(0.0, 0.0, surface.width(), surface.height());

        surface.set_fill(&self.foreground);
        for (y, x) in grid.alive_cells() {
            surface.fill_rect(
                x as f64 * cell + 0.5,
                y as f64 * cell + 0.5,
                cell + 0.5,
                cell + 0.5,
            );
        }
    }
}

// ==================== Scheduler ====================
/// What happens between two ticks
#[async_trait(?Send)]
pub trait Pacer {
    async fn pause(&self) -> Result<()>;
}

/// Fixed delay first, then wait for the display refresh
/// - the delay caps the rate well below the refresh rate
/// - the refresh wait keeps painting aligned with the browser's frames
pub struct BrowserPacer {
    delay_ms: i32,
}

impl BrowserPacer {
    pub fn new(delay_ms: i32) -> Self {
        BrowserPacer { delay_ms }
    }
}

#[async_trait(?Send)]
impl Pacer for BrowserPacer {
    async fn pause(&self) -> Result<()> {
        browser::sleep(self.delay_ms).await?;
        browser::next_animation_frame().await?;
        Ok(())
    }
}

/// Stop switch for a running loop
/// - clones share the same switch
/// - stop() is idempotent
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    stopped: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

pub struct FrameScheduler;

impl FrameScheduler {
    /// Spawn the loop on the local executor and hand back its stop switch
    /// - the first tick runs as soon as the executor polls the task
    /// - `state` is owned by the task and lent to every tick
    pub fn start<S, P, F>(state: S, pacer: P, tick: F) -> LoopHandle
    where
        S: 'static,
        P: Pacer + 'static,
        F: FnMut(&mut S) -> Result<()> + 'static,
    {
        let handle = LoopHandle::default();
        let task_handle = handle.clone();
        browser::spawn_local(async move {
            let _ = Self::run(state, pacer, tick, task_handle).await;
        });
        handle
    }

    /// tick, pause, tick, pause ... until the handle is stopped
    /// - an error from a tick or from the pacer stops the loop for good
    /// - returns the state as the last tick left it
    pub async fn run<S, P, F>(mut state: S, pacer: P, mut tick: F, handle: LoopHandle) -> S
    where
        P: Pacer,
        F: FnMut(&mut S) -> Result<()>,
    {
        while !handle.is_stopped() {
            if let Err(err) = tick(&mut state) {
                error!("[engine.rs::FrameScheduler] tick failed, stopping : {:#}", err);
                handle.stop();
                break;
            }
            if let Err(err) = pacer.pause().await {
                error!("[engine.rs::FrameScheduler] pacing failed, stopping : {:#}", err);
                handle.stop();
                break;
            }
        }
        state
    }
}
