//! Cloneable front door to a running engine.

use super::messages::EngineCommand;
use crate::error::{GestureScrollError, Result};
use crate::event::{GesturePhase, MomentumPhase};
use crate::momentum::{MomentumCallback, MomentumNotice};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

/// Sends work to the engine task. Every method returns immediately; the work runs in
/// submission order on the engine's loop.
///
/// Operations fail with [`GestureScrollError::EngineClosed`] once the engine has shut
/// down.
#[derive(Debug, Clone)]
pub struct ScrollHandle {
    tx: UnboundedSender<EngineCommand>,
}

impl ScrollHandle {
    pub(crate) fn new(tx: UnboundedSender<EngineCommand>) -> Self {
        Self { tx }
    }

    fn send(&self, command: EngineCommand) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| GestureScrollError::EngineClosed)
    }

    /// Report one raw sample with automatic momentum on lift-off.
    ///
    /// # Panics
    ///
    /// When `phase` is [`GesturePhase::MayBegin`] or [`GesturePhase::Undefined`]; only
    /// Began, Changed and Ended samples drive the pipeline. The phase is checked here,
    /// before the engine drops zero-delta samples, so an unsupported phase panics even
    /// when `dx` and `dy` are both zero.
    pub fn report_sample(&self, dx: i64, dy: i64, phase: GesturePhase) -> Result<()> {
        self.report_sample_with(dx, dy, phase, true)
    }

    /// Like [`report_sample`](Self::report_sample), choosing whether an Ended sample
    /// may start momentum.
    pub fn report_sample_with(
        &self,
        dx: i64,
        dy: i64,
        phase: GesturePhase,
        auto_momentum: bool,
    ) -> Result<()> {
        assert_sample_phase(phase);
        self.send(EngineCommand::Sample {
            dx,
            dy,
            phase,
            auto_momentum,
            listener: None,
        })
    }

    /// Report the Ended sample of a gesture and get a notice for its momentum outcome.
    pub fn end_gesture(&self, auto_momentum: bool) -> Result<MomentumNotice> {
        let (listener, notice) = MomentumNotice::channel();
        self.send(EngineCommand::Sample {
            dx: 0,
            dy: 0,
            phase: GesturePhase::Ended,
            auto_momentum,
            listener: Some(listener),
        })?;
        Ok(notice)
    }

    /// Post a momentum sample computed elsewhere, bypassing the gesture pipeline.
    pub fn post_momentum_sample_directly(
        &self,
        dx: f64,
        dy: f64,
        phase: MomentumPhase,
    ) -> Result<()> {
        self.send(EngineCommand::DirectMomentum { dx, dy, phase })
    }

    /// Stop the active momentum run, if any. A no-op when idle.
    pub fn stop_momentum(&self) -> Result<()> {
        self.send(EngineCommand::StopMomentum)
    }

    /// Register a callback for the next gesture's momentum outcome, or clear it.
    ///
    /// The callback moves into the run created by the next Ended sample and is called
    /// exactly once. Registering while a run is in flight is allowed and targets the
    /// next gesture. A callback that is replaced or cleared before it was used is
    /// called with [`MomentumOutcome::Cancelled`](crate::momentum::MomentumOutcome).
    pub fn set_momentum_start_callback(&self, callback: Option<MomentumCallback>) -> Result<()> {
        self.send(EngineCommand::SetMomentumCallback(callback))
    }

    /// Wait until every command sent before this call has been handled.
    pub async fn flush(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(EngineCommand::Flush(tx))?;
        rx.await.map_err(|_| GestureScrollError::EngineClosed)
    }

    /// Wait until no momentum run is active.
    pub async fn momentum_idle(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(EngineCommand::WhenIdle(tx))?;
        rx.await.map_err(|_| GestureScrollError::EngineClosed)
    }

    pub(crate) fn shutdown(&self) -> Result<()> {
        self.send(EngineCommand::Shutdown)
    }

    /// True once the engine task has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

fn assert_sample_phase(phase: GesturePhase) {
    match phase {
        GesturePhase::Began | GesturePhase::Changed | GesturePhase::Ended => {}
        GesturePhase::MayBegin | GesturePhase::Undefined => {
            log::error!("unsupported gesture phase {phase:?} passed to report_sample");
            panic!("unsupported gesture phase {phase:?}");
        }
    }
}
