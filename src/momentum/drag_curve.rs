//! Closed-form deceleration under a power-law drag force.
//!
//! Speed obeys `dv/dt = -c * v^e` for a drag coefficient `c > 0` and exponent `e > 0`.
//! Integrating once gives the speed over time, and integrating `dx = v dt = -v^(1-e) dv / c`
//! gives the distance, so both the total duration until the stop speed is reached and
//! the distance covered in that time are exact:
//!
//! | exponent | speed `v(t)`                          | distance `x(v)`                          |
//! |----------|---------------------------------------|------------------------------------------|
//! | `e = 1`  | `v0 * exp(-c t)`                      | `(v0 - v) / c`                           |
//! | `e = 2`  | `(v0^(1-e) - (1-e) c t)^(1/(1-e))`    | `ln(v0 / v) / c`                         |
//! | other    | `(v0^(1-e) - (1-e) c t)^(1/(1-e))`    | `(v0^(2-e) - v^(2-e)) / (c (2-e))`       |

use crate::config::DragParameters;

/// Exponents this close to 1 or 2 use the logarithmic forms.
const EXPONENT_EPSILON: f64 = 1e-9;

/// One momentum run's speed profile. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCurve {
    coefficient: f64,
    exponent: f64,
    initial_speed: f64,
    stop_speed: f64,
    duration: f64,
    distance: f64,
}

impl DragCurve {
    /// Build the curve for a motion starting at `initial_speed` (points per second).
    ///
    /// Coefficient, exponent and stop speed must be positive; `ScrollSettings::validate`
    /// guarantees this for configured presets. When `initial_speed <= stop_speed` the
    /// curve is degenerate: zero duration and zero distance.
    pub fn new(params: DragParameters, initial_speed: f64) -> Self {
        let DragParameters {
            drag_coefficient: coefficient,
            drag_exponent: exponent,
            stop_speed,
        } = params;
        debug_assert!(coefficient > 0.0 && exponent > 0.0 && stop_speed > 0.0);

        let mut curve = Self {
            coefficient,
            exponent,
            initial_speed,
            stop_speed,
            duration: 0.0,
            distance: 0.0,
        };

        if initial_speed > stop_speed {
            curve.duration = curve.time_to_reach(stop_speed);
            curve.distance = curve.distance_until(stop_speed);
        }
        curve
    }

    pub fn initial_speed(&self) -> f64 {
        self.initial_speed
    }

    pub fn stop_speed(&self) -> f64 {
        self.stop_speed
    }

    /// True when the motion never gets going.
    pub fn is_degenerate(&self) -> bool {
        self.duration <= 0.0
    }

    /// Seconds from the initial speed down to the stop speed.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Points travelled over [`duration`](Self::duration).
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Speed after `elapsed` seconds, clamped to the curve's interval.
    pub fn speed_at(&self, elapsed: f64) -> f64 {
        if self.is_degenerate() {
            return self.initial_speed;
        }
        let t = elapsed.clamp(0.0, self.duration);
        if t <= 0.0 {
            return self.initial_speed;
        }
        if t >= self.duration {
            return self.stop_speed;
        }

        let c = self.coefficient;
        let e = self.exponent;
        if (e - 1.0).abs() < EXPONENT_EPSILON {
            self.initial_speed * (-c * t).exp()
        } else {
            let k = 1.0 - e;
            (self.initial_speed.powf(k) - k * c * t).powf(1.0 / k)
        }
    }

    /// Distance covered after `elapsed` seconds, clamped to the curve's interval.
    ///
    /// At or beyond the duration this returns exactly [`distance`](Self::distance), so
    /// consecutive samples past the end differ by exactly zero.
    pub fn distance_at(&self, elapsed: f64) -> f64 {
        if self.is_degenerate() || elapsed <= 0.0 {
            return 0.0;
        }
        if elapsed >= self.duration {
            return self.distance;
        }
        self.distance_until(self.speed_at(elapsed)).min(self.distance)
    }

    fn time_to_reach(&self, speed: f64) -> f64 {
        let c = self.coefficient;
        let e = self.exponent;
        if (e - 1.0).abs() < EXPONENT_EPSILON {
            (self.initial_speed / speed).ln() / c
        } else {
            let k = 1.0 - e;
            (self.initial_speed.powf(k) - speed.powf(k)) / (k * c)
        }
    }

    fn distance_until(&self, speed: f64) -> f64 {
        let c = self.coefficient;
        let e = self.exponent;
        if (e - 1.0).abs() < EXPONENT_EPSILON {
            (self.initial_speed - speed) / c
        } else if (e - 2.0).abs() < EXPONENT_EPSILON {
            (self.initial_speed / speed).ln() / c
        } else {
            let m = 2.0 - e;
            (self.initial_speed.powf(m) - speed.powf(m)) / (c * m)
        }
    }
}
