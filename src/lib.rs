//! # gesture-scroll - Trackpad-Style Scroll Event Synthesis
//!
//! Turns a stream of raw scroll samples (integer deltas tagged with a gesture phase)
//! into the continuous-scroll and gesture records a native trackpad would produce,
//! including the inertial momentum glide after lift-off.
//!
//! ## Features
//!
//! - **Serial engine**: every sample, stop request and momentum frame is handled on one
//!   task, so output ordering is deterministic
//! - **Closed-form momentum**: a power-law drag model gives exact run duration and
//!   distance, sampled once per frame
//! - **Drift-free rounding**: sub-pixel accumulators keep integer line deltas within one
//!   unit of the true sum
//! - **Native record layout**: scroll and gesture records with their platform field
//!   codes, plus a binary wire encoding
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - Tunables and drag presets, optionally loaded from TOML
//! - [`vector`] and [`subpixel`] - Two-axis math and rounding
//! - [`momentum`] - Drag curve, animator, frame sources, outcome notices
//! - [`event`] - Records, the encoder, sinks and the wire format
//! - [`engine`] - The orchestrating task and its handle
//!
//! ## Example
//!
//! ```no_run
//! use gesture_scroll::{EngineBuilder, GesturePhase, RecordingSink, ScrollSettings};
//!
//! # async fn demo() -> gesture_scroll::Result<()> {
//! let sink = RecordingSink::new();
//! let engine = EngineBuilder::new(ScrollSettings::default(), sink.clone()).spawn()?;
//! let scroll = engine.handle();
//!
//! scroll.report_sample(0, 12, GesturePhase::Began)?;
//! scroll.report_sample(0, 18, GesturePhase::Changed)?;
//! let outcome = scroll.end_gesture(true)?.await;
//! println!("momentum: {outcome:?}");
//!
//! scroll.momentum_idle().await?;
//! engine.shutdown().await?;
//! println!("{} records posted", sink.len());
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod subpixel;
pub mod vector;

// Pipeline stages
pub mod event;
pub mod momentum;

// Orchestration
pub mod engine;

// Re-export commonly used types for convenience
pub use error::{GestureScrollError, Result};

// Public API surface for external usage
pub use config::{DragParameters, ScrollSettings};
pub use engine::{EngineBuilder, ScrollEngine, ScrollHandle};
pub use event::{
    EventRecord, EventSink, FixedLocator, GesturePhase, MomentumPhase, PointerLocator,
    RecordingSink, WireSink,
};
pub use momentum::{FrameTrigger, ManualFrameSource, MomentumNotice, MomentumOutcome, SkipReason};
pub use subpixel::RoundingBias;
pub use vector::Vector;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
