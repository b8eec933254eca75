//! Periodic frame ticks that pace momentum runs.
//!
//! A real display refresh signal is one implementation among several; the engine only
//! needs "wake me at the next frame and tell me when it was". Sources are only polled
//! while a run is active and are restarted whenever a new run begins, so the first
//! frame of every run lands one full period after its start.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Source of frame timestamps. `next_frame` must be cancel-safe.
#[async_trait]
pub trait FrameSource: Send {
    /// Wait for the next frame and return its scheduled time.
    async fn next_frame(&mut self) -> Instant;

    /// Align the schedule so the next frame is one period from now.
    fn restart(&mut self);
}

/// Fixed-period ticks on the tokio timer. Late frames are skipped, not bunched.
#[derive(Debug)]
pub struct IntervalFrameSource {
    interval: Interval,
}

impl IntervalFrameSource {
    /// Must be called from within a tokio runtime.
    pub fn new(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

#[async_trait]
impl FrameSource for IntervalFrameSource {
    async fn next_frame(&mut self) -> Instant {
        self.interval.tick().await
    }

    fn restart(&mut self) {
        self.interval.reset();
    }
}

/// Frames delivered by hand through a [`FrameTrigger`].
#[derive(Debug)]
pub struct ManualFrameSource {
    rx: mpsc::UnboundedReceiver<Instant>,
}

/// Sending half of a [`ManualFrameSource`].
#[derive(Debug, Clone)]
pub struct FrameTrigger {
    tx: mpsc::UnboundedSender<Instant>,
}

impl ManualFrameSource {
    pub fn channel() -> (Self, FrameTrigger) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, FrameTrigger { tx })
    }
}

impl FrameTrigger {
    /// Deliver a frame stamped `at`. Frames sent while no run is active are consumed
    /// by the next run.
    pub fn frame_at(&self, at: Instant) -> bool {
        self.tx.send(at).is_ok()
    }

    /// Deliver a frame stamped with the current time.
    pub fn frame_now(&self) -> bool {
        self.frame_at(Instant::now())
    }
}

#[async_trait]
impl FrameSource for ManualFrameSource {
    async fn next_frame(&mut self) -> Instant {
        match self.rx.recv().await {
            Some(at) => at,
            // No trigger left: no more frames, ever
            None => std::future::pending().await,
        }
    }

    fn restart(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn interval_ticks_one_period_after_restart() {
        let period = Duration::from_millis(16);
        let mut source = IntervalFrameSource::new(period);
        time::advance(Duration::from_millis(100)).await;

        let restarted_at = Instant::now();
        source.restart();
        let first = source.next_frame().await;
        let second = source.next_frame().await;

        assert_eq!(first - restarted_at, period);
        assert_eq!(second - first, period);
        assert_eq!(source.period(), period);
    }

    #[tokio::test]
    async fn manual_frames_arrive_in_order() {
        let (mut source, trigger) = ManualFrameSource::channel();
        let base = Instant::now();
        assert!(trigger.frame_at(base + Duration::from_millis(5)));
        assert!(trigger.frame_at(base + Duration::from_millis(9)));

        assert_eq!(source.next_frame().await, base + Duration::from_millis(5));
        assert_eq!(source.next_frame().await, base + Duration::from_millis(9));
    }
}
