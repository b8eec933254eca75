//! Commands accepted by the engine task.

use crate::event::{GesturePhase, MomentumPhase};
use crate::momentum::{MomentumCallback, MomentumListener};
use tokio::sync::oneshot;

/// Work items queued onto the engine's serial loop, processed strictly in order.
pub(crate) enum EngineCommand {
    Sample {
        dx: i64,
        dy: i64,
        phase: GesturePhase,
        auto_momentum: bool,
        listener: Option<MomentumListener>,
    },
    DirectMomentum {
        dx: f64,
        dy: f64,
        phase: MomentumPhase,
    },
    StopMomentum,
    SetMomentumCallback(Option<MomentumCallback>),
    /// Reply once every earlier command has been handled
    Flush(oneshot::Sender<()>),
    /// Reply once no momentum run is active
    WhenIdle(oneshot::Sender<()>),
    Shutdown,
}
