//! Inertial continuation of a gesture after contact ends.
//!
//! - [`drag_curve`] - closed-form speed, duration and distance of one run
//! - [`animator`] - per-frame sampling of the curve into momentum frames
//! - [`frame_source`] - the periodic ticks that pace a run
//! - [`notice`] - one-shot "did momentum start" notifications

pub mod animator;
pub mod drag_curve;
pub mod frame_source;
pub mod notice;

pub use animator::{AnimatorPhase, MomentumAnimator, MomentumFrame, MomentumRequest};
pub use drag_curve::DragCurve;
pub use frame_source::{FrameSource, FrameTrigger, IntervalFrameSource, ManualFrameSource};
pub use notice::{MomentumCallback, MomentumListener, MomentumNotice, MomentumOutcome, SkipReason};
