//! The engine task: one loop that owns all mutable gesture state.
//!
//! Commands from handles and frame ticks are multiplexed onto the same loop, so a
//! sample can never interleave with a momentum frame, and stopping a run before a new
//! gesture happens inline within the gesture's own turn.

use super::messages::EngineCommand;
use crate::config::{DragParameters, ScrollSettings};
use crate::event::{EventEncoder, GesturePhase, MomentumPhase, PointerLocator};
use crate::momentum::notice::resolve_all;
use crate::momentum::{
    FrameSource, MomentumAnimator, MomentumCallback, MomentumFrame, MomentumListener,
    MomentumOutcome, MomentumRequest, SkipReason,
};
use crate::subpixel::SubPixelator;
use crate::vector::Vector;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;
use tokio::time::Instant;

/// Run the engine until shut down or every handle is dropped.
pub(crate) async fn engine_loop(
    mut rx: UnboundedReceiver<EngineCommand>,
    mut frames: Box<dyn FrameSource>,
    mut state: EngineState,
) {
    loop {
        let running = state.animator.is_running();
        let step = tokio::select! {
            biased;
            command = rx.recv() => match command {
                Some(command) => Step::Command(command),
                None => Step::Closed,
            },
            at = frames.next_frame(), if running => Step::Frame(at),
        };

        let generation = state.animator.generation();
        let flow = match step {
            Step::Command(command) => state.handle_command(command),
            Step::Frame(at) => {
                state.handle_frame(at);
                Flow::Continue
            }
            Step::Closed => Flow::Exit,
        };
        if state.animator.generation() != generation {
            frames.restart();
        }
        state.release_idle_waiters();

        if let Flow::Exit = flow {
            break;
        }
    }

    state.shutdown();
}

enum Step {
    Command(EngineCommand),
    Frame(Instant),
    Closed,
}

enum Flow {
    Continue,
    Exit,
}

/// Encoder plus the collaborators every post needs.
struct Output {
    name: String,
    encoder: EventEncoder,
    locator: Arc<dyn PointerLocator>,
}

impl Output {
    fn post(
        &mut self,
        gesture: Vector,
        line: Vector,
        point: Vector,
        gesture_phase: GesturePhase,
        momentum_phase: MomentumPhase,
    ) {
        let location = self.locator.location();
        if let Err(err) = self.encoder.post_event(
            gesture,
            line,
            point,
            gesture_phase,
            momentum_phase,
            location,
        ) {
            log::warn!("[{}] dropping event: {}", self.name, err);
        }
    }

    fn post_momentum(&mut self, frame: MomentumFrame) {
        self.post(
            Vector::ZERO,
            frame.line,
            frame.point,
            GesturePhase::Undefined,
            frame.phase,
        );
    }
}

pub(crate) struct EngineState {
    output: Output,
    line_scale: f64,
    swipe_sensitivity: f64,
    drag: DragParameters,
    pixelator: SubPixelator,
    animator: MomentumAnimator,
    last_input: Option<Instant>,
    last_delta: Vector,
    pending_callback: Option<MomentumCallback>,
    idle_waiters: Vec<oneshot::Sender<()>>,
}

impl EngineState {
    pub(crate) fn new(
        name: String,
        settings: &ScrollSettings,
        drag: DragParameters,
        encoder: EventEncoder,
        locator: Arc<dyn PointerLocator>,
    ) -> Self {
        Self {
            output: Output {
                name,
                encoder,
                locator,
            },
            line_scale: settings.line_scale,
            swipe_sensitivity: settings.swipe_sensitivity,
            drag,
            pixelator: SubPixelator::new(settings.rounding),
            animator: MomentumAnimator::new(
                settings.line_scale,
                settings.max_input_gap,
                settings.rounding,
            ),
            last_input: None,
            last_delta: Vector::ZERO,
            pending_callback: None,
            idle_waiters: Vec::new(),
        }
    }

    fn name(&self) -> &str {
        &self.output.name
    }

    fn handle_command(&mut self, command: EngineCommand) -> Flow {
        match command {
            EngineCommand::Sample {
                dx,
                dy,
                phase,
                auto_momentum,
                listener,
            } => self.handle_sample(dx, dy, phase, auto_momentum, listener),
            EngineCommand::DirectMomentum { dx, dy, phase } => {
                let point = Vector::new(dx, dy);
                let line = point.scaled(1.0 / self.line_scale);
                self.output
                    .post(Vector::ZERO, line, point, GesturePhase::Undefined, phase);
            }
            EngineCommand::StopMomentum => self.stop_momentum(),
            EngineCommand::SetMomentumCallback(callback) => self.set_callback(callback),
            EngineCommand::Flush(reply) => {
                let _ = reply.send(());
            }
            EngineCommand::WhenIdle(reply) => self.idle_waiters.push(reply),
            EngineCommand::Shutdown => return Flow::Exit,
        }
        Flow::Continue
    }

    fn handle_sample(
        &mut self,
        dx: i64,
        dy: i64,
        phase: GesturePhase,
        auto_momentum: bool,
        listener: Option<MomentumListener>,
    ) {
        if phase != GesturePhase::Ended && dx == 0 && dy == 0 {
            log::debug!(
                "[{}] ignoring zero-delta {:?} sample; only Ended samples may be empty",
                self.name(),
                phase
            );
            return;
        }

        let now = Instant::now();
        self.stop_momentum();

        match phase {
            GesturePhase::Began | GesturePhase::Changed => {
                if phase == GesturePhase::Began {
                    self.pixelator.reset();
                }
                let point = Vector::new(dx as f64, dy as f64);
                let line = self.pixelator.emit(point.scaled(1.0 / self.line_scale));
                let gesture = point.scaled(self.swipe_sensitivity);
                self.last_delta = point;
                self.output
                    .post(gesture, line, point, phase, MomentumPhase::None);
            }
            GesturePhase::Ended => {
                self.output.post(
                    Vector::ZERO,
                    Vector::ZERO,
                    Vector::ZERO,
                    GesturePhase::Ended,
                    MomentumPhase::None,
                );

                let mut listeners: Vec<MomentumListener> = self
                    .pending_callback
                    .take()
                    .map(MomentumListener::Callback)
                    .into_iter()
                    .collect();
                listeners.extend(listener);

                if auto_momentum {
                    self.start_momentum(now, listeners);
                } else {
                    resolve_all(listeners, MomentumOutcome::Skipped(SkipReason::Disabled));
                }
            }
            GesturePhase::MayBegin | GesturePhase::Undefined => {
                unreachable!("handles reject {phase:?} samples before they are queued")
            }
        }

        self.last_input = Some(now);
    }

    fn start_momentum(&mut self, now: Instant, listeners: Vec<MomentumListener>) {
        // A zero gap gives no usable velocity; treat it like a missing sample
        let since_last = self
            .last_input
            .map(|at| now.saturating_duration_since(at))
            .filter(|gap| !gap.is_zero());
        let exit_velocity = since_last
            .map(|gap| self.last_delta.scaled(1.0 / gap.as_secs_f64()))
            .unwrap_or(Vector::ZERO);

        let request = MomentumRequest {
            exit_velocity,
            drag: self.drag,
            time_since_last_input: since_last,
        };
        let output = &mut self.output;
        match self
            .animator
            .start(request, now, listeners, |frame| output.post_momentum(frame))
        {
            Ok(()) => log::debug!(
                "[{}] momentum started at {:.1} pt/s over {:.3}s",
                self.output.name,
                exit_velocity.magnitude(),
                self.animator.curve().map_or(0.0, |curve| curve.duration())
            ),
            Err(reason) => log::debug!(
                "[{}] momentum skipped ({:?}) at {:.1} pt/s",
                self.output.name,
                reason,
                exit_velocity.magnitude()
            ),
        }
    }

    fn stop_momentum(&mut self) {
        let output = &mut self.output;
        if self.animator.stop(|frame| output.post_momentum(frame)) {
            log::debug!("[{}] momentum stopped", self.output.name);
        }
    }

    fn set_callback(&mut self, callback: Option<MomentumCallback>) {
        if self.animator.is_running() && callback.is_some() {
            log::debug!(
                "[{}] momentum callback registered during a run; it applies to the next gesture",
                self.name()
            );
        }
        if let Some(previous) = std::mem::replace(&mut self.pending_callback, callback) {
            log::warn!(
                "[{}] replacing a momentum callback that never fired",
                self.name()
            );
            previous(MomentumOutcome::Cancelled);
        }
    }

    fn handle_frame(&mut self, at: Instant) {
        let output = &mut self.output;
        self.animator.tick(at, |frame| output.post_momentum(frame));
    }

    fn release_idle_waiters(&mut self) {
        if !self.animator.is_running() {
            for waiter in self.idle_waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
    }

    fn shutdown(&mut self) {
        self.stop_momentum();
        if let Some(callback) = self.pending_callback.take() {
            callback(MomentumOutcome::Cancelled);
        }
        self.release_idle_waiters();
        log::debug!("[{}] engine stopped", self.name());
    }
}
