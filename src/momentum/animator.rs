//! Frame-paced momentum runs.
//!
//! The animator decides whether a run starts, samples the run's [`DragCurve`] once per
//! frame, and hands each resulting [`MomentumFrame`] to an `emit` closure supplied by
//! the caller. It never sleeps or spawns; the engine feeds it frame timestamps.
//!
//! ```text
//! Idle --start--> Starting --first frame--> Running --last frame / stop--> Idle
//! ```

use super::drag_curve::DragCurve;
use super::notice::{resolve_all, MomentumListener, MomentumOutcome, SkipReason};
use crate::config::DragParameters;
use crate::event::MomentumPhase;
use crate::subpixel::{RoundingBias, SubPixelator};
use crate::vector::Vector;
use std::time::Duration;
use tokio::time::Instant;

/// Where the animator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorPhase {
    Idle,
    /// Run scheduled, no frame emitted yet
    Starting,
    Running,
}

/// Everything needed to decide on and shape one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumRequest {
    /// Velocity at lift-off, points per second
    pub exit_velocity: Vector,
    pub drag: DragParameters,
    /// `None` when there is no earlier sample to measure from
    pub time_since_last_input: Option<Duration>,
}

/// One frame's output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumFrame {
    /// Sub-pixel-precise travel since the previous frame
    pub point: Vector,
    /// Whole lines for this frame
    pub line: Vector,
    pub phase: MomentumPhase,
}

impl MomentumFrame {
    fn terminal() -> Self {
        Self {
            point: Vector::ZERO,
            line: Vector::ZERO,
            phase: MomentumPhase::End,
        }
    }
}

#[derive(Debug)]
struct MomentumRun {
    curve: DragCurve,
    direction: Vector,
    started_at: Instant,
    travelled: f64,
    frames: u32,
    listeners: Vec<MomentumListener>,
}

/// Drives one momentum run at a time.
#[derive(Debug)]
pub struct MomentumAnimator {
    line_scale: f64,
    max_input_gap: Duration,
    pixelator: SubPixelator,
    run: Option<MomentumRun>,
    generation: u64,
}

impl MomentumAnimator {
    pub fn new(line_scale: f64, max_input_gap: Duration, rounding: RoundingBias) -> Self {
        Self {
            line_scale,
            max_input_gap,
            pixelator: SubPixelator::new(rounding),
            run: None,
            generation: 0,
        }
    }

    pub fn phase(&self) -> AnimatorPhase {
        match &self.run {
            None => AnimatorPhase::Idle,
            Some(run) if run.frames == 0 => AnimatorPhase::Starting,
            Some(_) => AnimatorPhase::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Incremented every time a run starts.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Curve of the active run.
    pub fn curve(&self) -> Option<&DragCurve> {
        self.run.as_ref().map(|run| &run.curve)
    }

    /// Start a run, or decide not to.
    ///
    /// Any active run is stopped first (emitting its End frame). When the run is
    /// skipped, `listeners` are resolved before this returns; otherwise they resolve
    /// with [`MomentumOutcome::Started`] right after the first frame is emitted.
    pub fn start(
        &mut self,
        request: MomentumRequest,
        now: Instant,
        listeners: Vec<MomentumListener>,
        mut emit: impl FnMut(MomentumFrame),
    ) -> Result<(), SkipReason> {
        self.stop(&mut emit);

        let fresh = matches!(
            request.time_since_last_input,
            Some(gap) if gap <= self.max_input_gap
        );
        if !fresh {
            resolve_all(listeners, MomentumOutcome::Skipped(SkipReason::Stale));
            return Err(SkipReason::Stale);
        }

        let initial_velocity = response_curve(request.exit_velocity);
        let initial_speed = initial_velocity.magnitude();
        if !(initial_speed.is_finite() && initial_speed > request.drag.stop_speed) {
            resolve_all(listeners, MomentumOutcome::Skipped(SkipReason::TooSlow));
            return Err(SkipReason::TooSlow);
        }

        let curve = DragCurve::new(request.drag, initial_speed);
        self.pixelator.reset();
        self.generation += 1;
        self.run = Some(MomentumRun {
            curve,
            direction: initial_velocity.unit(),
            started_at: now,
            travelled: 0.0,
            frames: 0,
            listeners,
        });
        Ok(())
    }

    /// Emit the frame due at `now`. Ends the run once the curve is exhausted.
    pub fn tick(&mut self, now: Instant, mut emit: impl FnMut(MomentumFrame)) {
        let Some(run) = self.run.as_mut() else {
            return;
        };

        let elapsed = now.saturating_duration_since(run.started_at).as_secs_f64();
        let finished = elapsed >= run.curve.duration();
        let distance = run.curve.distance_at(elapsed);
        let step = distance - run.travelled;
        run.travelled = distance;

        let point = run.direction.scaled(step);
        let line = self.pixelator.emit(point.scaled(1.0 / self.line_scale));
        let phase = if run.frames == 0 {
            MomentumPhase::Begin
        } else {
            MomentumPhase::Continue
        };
        run.frames += 1;
        emit(MomentumFrame { point, line, phase });

        if run.frames == 1 {
            resolve_all(
                std::mem::take(&mut run.listeners),
                MomentumOutcome::Started,
            );
        }

        if finished {
            let residual = run.curve.distance_at(run.curve.duration()) - run.travelled;
            assert!(
                residual == 0.0,
                "momentum run ended with {residual} points left to travel"
            );
            self.run = None;
            emit(MomentumFrame::terminal());
        }
    }

    /// Halt the active run, emitting its End frame. Returns false when idle.
    pub fn stop(&mut self, mut emit: impl FnMut(MomentumFrame)) -> bool {
        let Some(run) = self.run.take() else {
            return false;
        };
        emit(MomentumFrame::terminal());
        resolve_all(run.listeners, MomentumOutcome::Cancelled);
        true
    }
}

/// Maps exit velocity to the run's initial velocity. Linear for now; this is where a
/// non-linear response would go.
fn response_curve(exit_velocity: Vector) -> Vector {
    exit_velocity
}
