//! Event records emitted to the host's input layer.
//!
//! Every post produces a continuous-scroll record, followed by a gesture record when
//! the post carries a live gesture phase. The numeric codes and field layout consumers
//! rely on live in [`wire`]; this module only deals in named fields.

pub mod encoder;
pub mod sink;
pub mod wire;

pub use encoder::EventEncoder;
pub use sink::{EventSink, FixedLocator, PointerLocator, RecordingSink, WireSink};

use crate::vector::Vector;
use std::time::Duration;

/// Lifecycle marker of a live, touch-equivalent contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    MayBegin,
    Began,
    Changed,
    Ended,
    /// No contact phase; used by momentum and direct posts.
    Undefined,
}

impl GesturePhase {
    /// Native phase code shared by the scroll and gesture records.
    pub fn code(self) -> i64 {
        match self {
            GesturePhase::Undefined => 0,
            GesturePhase::Began => 1,
            GesturePhase::Changed => 2,
            GesturePhase::Ended => 4,
            GesturePhase::MayBegin => 128,
        }
    }
}

/// Lifecycle marker of the automatic deceleration after contact ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MomentumPhase {
    None,
    Begin,
    Continue,
    End,
}

impl MomentumPhase {
    pub fn code(self) -> i64 {
        match self {
            MomentumPhase::None => 0,
            MomentumPhase::Begin => 1,
            MomentumPhase::Continue => 2,
            MomentumPhase::End => 3,
        }
    }
}

/// Continuous scroll record: the part every consumer reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRecord {
    /// Time since the engine started
    pub timestamp: Duration,
    /// Screen location the event is delivered at
    pub location: Vector,
    /// Whole-line deltas
    pub line_x: i64,
    pub line_y: i64,
    /// Sub-pixel-precise point deltas
    pub point_delta: Vector,
    pub gesture_phase: GesturePhase,
    pub momentum_phase: MomentumPhase,
    pub continuous: bool,
    pub direction_inverted: bool,
}

/// Gesture record accompanying scroll records that carry a gesture phase.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureRecord {
    pub timestamp: Duration,
    pub location: Vector,
    /// Swipe deltas; exact zeros are stored as `-0.0`
    pub delta: Vector,
    pub phase: GesturePhase,
}

/// One posted platform record.
#[derive(Debug, Clone, PartialEq)]
pub enum EventRecord {
    Scroll(ScrollRecord),
    Gesture(GestureRecord),
}

impl EventRecord {
    pub fn timestamp(&self) -> Duration {
        match self {
            EventRecord::Scroll(record) => record.timestamp,
            EventRecord::Gesture(record) => record.timestamp,
        }
    }

    pub fn as_scroll(&self) -> Option<&ScrollRecord> {
        match self {
            EventRecord::Scroll(record) => Some(record),
            EventRecord::Gesture(_) => None,
        }
    }

    pub fn as_gesture(&self) -> Option<&GestureRecord> {
        match self {
            EventRecord::Gesture(record) => Some(record),
            EventRecord::Scroll(_) => None,
        }
    }
}

impl std::fmt::Display for EventRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventRecord::Scroll(r) => write!(
                f,
                "{:>10.3}ms scroll  lines=({}, {}) points=({:.3}, {:.3}) gesture={:?} momentum={:?}",
                r.timestamp.as_secs_f64() * 1000.0,
                r.line_x,
                r.line_y,
                r.point_delta.x,
                r.point_delta.y,
                r.gesture_phase,
                r.momentum_phase,
            ),
            EventRecord::Gesture(r) => write!(
                f,
                "{:>10.3}ms gesture delta=({:.3}, {:.3}) phase={:?}",
                r.timestamp.as_secs_f64() * 1000.0,
                r.delta.x,
                r.delta.y,
                r.phase,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_codes_match_native_values() {
        assert_eq!(GesturePhase::Undefined.code(), 0);
        assert_eq!(GesturePhase::Began.code(), 1);
        assert_eq!(GesturePhase::Changed.code(), 2);
        assert_eq!(GesturePhase::Ended.code(), 4);
        assert_eq!(GesturePhase::MayBegin.code(), 128);

        assert_eq!(MomentumPhase::None.code(), 0);
        assert_eq!(MomentumPhase::Begin.code(), 1);
        assert_eq!(MomentumPhase::Continue.code(), 2);
        assert_eq!(MomentumPhase::End.code(), 3);
    }

    #[test]
    fn display_is_single_line() {
        let record = EventRecord::Gesture(GestureRecord {
            timestamp: Duration::from_millis(5),
            location: Vector::ZERO,
            delta: Vector::new(-0.0, 1.5),
            phase: GesturePhase::Changed,
        });
        let text = record.to_string();
        assert!(text.contains("gesture"));
        assert!(text.contains("Changed"));
        assert!(!text.contains('\n'));
    }
}
