//! Builds and posts record pairs.

use super::{EventRecord, EventSink, GesturePhase, GestureRecord, MomentumPhase, ScrollRecord};
use crate::error::Result;
use crate::vector::Vector;
use tokio::time::Instant;

/// Turns one logical scroll step into platform records and hands them to a sink.
pub struct EventEncoder {
    sink: Box<dyn EventSink>,
    epoch: Instant,
    direction_inverted: bool,
}

impl EventEncoder {
    pub fn new(sink: Box<dyn EventSink>, direction_inverted: bool) -> Self {
        Self {
            sink,
            epoch: Instant::now(),
            direction_inverted,
        }
    }

    /// Post a scroll record, then a gesture record if `gesture_phase` is live.
    ///
    /// Line components are written into integer fields truncated toward zero.
    ///
    /// # Panics
    ///
    /// When both `gesture_phase` and `momentum_phase` are active. The two channels are
    /// mutually exclusive on a single event; a violation is a bug in the caller.
    pub fn post_event(
        &mut self,
        gesture: Vector,
        line: Vector,
        point: Vector,
        gesture_phase: GesturePhase,
        momentum_phase: MomentumPhase,
        location: Vector,
    ) -> Result<()> {
        assert!(
            gesture_phase == GesturePhase::Undefined || momentum_phase == MomentumPhase::None,
            "event carries both gesture phase {gesture_phase:?} and momentum phase {momentum_phase:?}"
        );

        let timestamp = self.epoch.elapsed();

        self.sink.post(EventRecord::Scroll(ScrollRecord {
            timestamp,
            location,
            line_x: line.x as i64,
            line_y: line.y as i64,
            point_delta: point,
            gesture_phase,
            momentum_phase,
            continuous: true,
            direction_inverted: self.direction_inverted,
        }))?;

        if gesture_phase != GesturePhase::Undefined {
            self.sink.post(EventRecord::Gesture(GestureRecord {
                timestamp,
                location,
                delta: Vector::new(negative_zero(gesture.x), negative_zero(gesture.y)),
                phase: gesture_phase,
            }))?;
        }
        Ok(())
    }
}

/// Native drivers report an idle gesture axis as -0.0.
fn negative_zero(value: f64) -> f64 {
    if value == 0.0 {
        -0.0
    } else {
        value
    }
}
