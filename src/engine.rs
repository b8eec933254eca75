//! The orchestrator: one engine task per instance owning every piece of gesture state.
//!
//! ```text
//! ScrollHandle --commands--> engine loop --records--> EventEncoder --> EventSink
//!                                 ^
//!                 FrameSource ----+ (only while momentum runs)
//! ```
//!
//! Build an engine with [`EngineBuilder`], feed it through cloned [`ScrollHandle`]s
//! and stop it with [`ScrollEngine::shutdown`]. Multiple engines are fully independent.

mod actor;
pub mod handle;
mod messages;

pub use handle::ScrollHandle;

use crate::config::ScrollSettings;
use crate::error::{GestureScrollError, Result};
use crate::event::{EventEncoder, EventSink, FixedLocator, PointerLocator};
use crate::momentum::{FrameSource, IntervalFrameSource};
use actor::{engine_loop, EngineState};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Caller identity used in diagnostics when none is given.
pub const DEFAULT_ENGINE_NAME: &str = "gesture-scroll";

/// Collects an engine's collaborators before spawning it.
pub struct EngineBuilder {
    settings: ScrollSettings,
    sink: Box<dyn EventSink>,
    locator: Arc<dyn PointerLocator>,
    frames: Option<Box<dyn FrameSource>>,
    name: String,
}

impl EngineBuilder {
    pub fn new(settings: ScrollSettings, sink: impl EventSink + 'static) -> Self {
        Self {
            settings,
            sink: Box::new(sink),
            locator: Arc::new(FixedLocator::default()),
            frames: None,
            name: DEFAULT_ENGINE_NAME.to_string(),
        }
    }

    /// Where the pointer is reported to be for every posted record.
    pub fn locator(mut self, locator: impl PointerLocator + 'static) -> Self {
        self.locator = Arc::new(locator);
        self
    }

    /// Replace the default tick source (an interval at `settings.frame_interval`).
    pub fn frame_source(mut self, frames: impl FrameSource + 'static) -> Self {
        self.frames = Some(Box::new(frames));
        self
    }

    /// Caller identity prefixed to the engine's diagnostics.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Validate the settings and start the engine task on the current runtime.
    pub fn spawn(self) -> Result<ScrollEngine> {
        self.settings.validate()?;
        let drag = self.settings.drag()?;

        if tokio::runtime::Handle::try_current().is_err() {
            return Err(GestureScrollError::other(
                "the scroll engine must be spawned from within a tokio runtime",
            ));
        }

        let frames = match self.frames {
            Some(frames) => frames,
            None => Box::new(IntervalFrameSource::new(self.settings.frame_interval)),
        };
        let encoder = EventEncoder::new(self.sink, self.settings.direction_inverted);
        log::debug!(
            "[{}] starting engine with preset '{}' ({:?})",
            self.name,
            self.settings.preset,
            drag
        );
        let state = EngineState::new(self.name, &self.settings, drag, encoder, self.locator);

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(engine_loop(rx, frames, state));

        Ok(ScrollEngine {
            handle: ScrollHandle::new(tx),
            task,
        })
    }
}

/// A running engine. Dropping it without [`shutdown`](Self::shutdown) leaves the task
/// alive until every handle is dropped.
#[derive(Debug)]
pub struct ScrollEngine {
    handle: ScrollHandle,
    task: JoinHandle<()>,
}

impl ScrollEngine {
    /// A new handle onto this engine.
    pub fn handle(&self) -> ScrollHandle {
        self.handle.clone()
    }

    /// Stop any momentum run (posting its End event), cancel pending notifications
    /// and wait for the engine task to finish.
    pub async fn shutdown(self) -> Result<()> {
        // Already gone is fine; the join below reports real failures
        let _ = self.handle.shutdown();
        self.task
            .await
            .map_err(|err| GestureScrollError::other(format!("engine task failed: {err}")))
    }
}
