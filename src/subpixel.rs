//! Sub-pixel accumulation.
//!
//! Scroll records carry line deltas in integer fields, while the motion that produces
//! them is real-valued. [`SubPixelator`] carries the fractional remainder of each axis
//! from one call to the next so that the running sum of emitted integers never drifts
//! more than one unit away from the running sum of the inputs.
//!
//! The engine owns two instances: one for live samples (reset when a gesture begins)
//! and one inside the momentum animator (reset when a run starts). Both use the same
//! [`RoundingBias`].

use crate::vector::Vector;

/// How the carried value is turned into an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum RoundingBias {
    /// Round toward the direction of the current delta: a positive delta rounds the
    /// carried value up, a negative one rounds it down, and a zero delta emits nothing.
    /// The first fraction of a line emits immediately and the output never steps
    /// against the input.
    #[default]
    TowardMotion,
    /// Round half away from zero.
    Nearest,
    /// Truncate toward zero; output lags the input until a whole unit accumulates.
    TowardZero,
}

impl RoundingBias {
    fn round(self, carried: f64, delta: f64) -> f64 {
        match self {
            RoundingBias::TowardMotion => {
                if delta < 0.0 {
                    carried.floor()
                } else if delta > 0.0 {
                    carried.ceil()
                } else {
                    // An idle axis keeps its remainder instead of stepping either way
                    carried.trunc()
                }
            }
            RoundingBias::Nearest => carried.round(),
            RoundingBias::TowardZero => carried.trunc(),
        }
    }
}

/// Per-axis fractional remainder tracker.
#[derive(Debug, Clone, Default)]
pub struct SubPixelator {
    bias: RoundingBias,
    remainder: Vector,
}

impl SubPixelator {
    pub fn new(bias: RoundingBias) -> Self {
        Self {
            bias,
            remainder: Vector::ZERO,
        }
    }

    pub fn bias(&self) -> RoundingBias {
        self.bias
    }

    /// Fractional value not yet emitted, per axis. Always strictly inside (-1, 1).
    pub fn remainder(&self) -> Vector {
        self.remainder
    }

    /// Forget the carried remainder.
    pub fn reset(&mut self) {
        self.remainder = Vector::ZERO;
    }

    /// Round `delta` to whole units on both axes, carrying what is left over.
    ///
    /// The returned components are always integral.
    pub fn emit(&mut self, delta: Vector) -> Vector {
        Vector::new(
            Self::emit_axis(self.bias, &mut self.remainder.x, delta.x),
            Self::emit_axis(self.bias, &mut self.remainder.y, delta.y),
        )
    }

    fn emit_axis(bias: RoundingBias, remainder: &mut f64, delta: f64) -> f64 {
        let carried = *remainder + delta;
        let whole = bias.round(carried, delta);
        *remainder = carried - whole;
        // -0.0 from ceil() of a small negative value reads oddly in diagnostics
        whole + 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn toward_motion_emits_first_fraction_immediately() {
        let mut pixelator = SubPixelator::new(RoundingBias::TowardMotion);
        let out: Vec<f64> = (0..4)
            .map(|_| pixelator.emit(Vector::new(0.3, 0.0)).x)
            .collect();
        assert_eq!(out, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn toward_motion_never_steps_backwards() {
        let mut pixelator = SubPixelator::new(RoundingBias::TowardMotion);
        for _ in 0..50 {
            let out = pixelator.emit(Vector::new(0.37, -0.21));
            assert!(out.x >= 0.0);
            assert!(out.y <= 0.0);
        }
    }

    #[test]
    fn toward_motion_leaves_idle_axis_alone() {
        let mut pixelator = SubPixelator::new(RoundingBias::TowardMotion);
        assert_eq!(pixelator.emit(Vector::new(0.0, -0.3)), Vector::new(0.0, -1.0));
        assert_eq!(pixelator.emit(Vector::new(0.5, 0.0)), Vector::new(1.0, 0.0));
        assert!((pixelator.remainder().y - 0.7).abs() < 1e-12);

        // The carried fraction is used up once the axis moves again
        assert_eq!(pixelator.emit(Vector::new(0.0, -0.9)).y, -1.0);
    }

    #[test]
    fn toward_zero_waits_for_whole_units() {
        let mut pixelator = SubPixelator::new(RoundingBias::TowardZero);
        assert_eq!(pixelator.emit(Vector::new(0.6, -0.6)), Vector::ZERO);
        assert_eq!(pixelator.emit(Vector::new(0.6, -0.6)), Vector::new(1.0, -1.0));
        let remainder = pixelator.remainder();
        assert!((remainder.x - 0.2).abs() < 1e-12);
        assert!((remainder.y + 0.2).abs() < 1e-12);
    }

    #[test]
    fn reset_discards_remainder() {
        let mut pixelator = SubPixelator::new(RoundingBias::Nearest);
        pixelator.emit(Vector::new(0.4, 0.4));
        pixelator.reset();
        assert_eq!(pixelator.remainder(), Vector::ZERO);
        assert_eq!(pixelator.emit(Vector::new(0.4, 0.4)), Vector::ZERO);
    }

    #[test]
    fn whole_inputs_pass_through() {
        let mut pixelator = SubPixelator::default();
        assert_eq!(pixelator.emit(Vector::new(3.0, -7.0)), Vector::new(3.0, -7.0));
        assert_eq!(pixelator.remainder(), Vector::ZERO);
    }

    fn any_bias() -> impl Strategy<Value = RoundingBias> {
        prop_oneof![
            Just(RoundingBias::TowardMotion),
            Just(RoundingBias::Nearest),
            Just(RoundingBias::TowardZero),
        ]
    }

    proptest! {
        #[test]
        fn running_sum_stays_within_one_unit(
            bias in any_bias(),
            deltas in prop::collection::vec((-40.0f64..40.0, -40.0f64..40.0), 1..200),
        ) {
            let mut pixelator = SubPixelator::new(bias);
            let mut input_sum = Vector::ZERO;
            let mut output_sum = Vector::ZERO;

            for (dx, dy) in deltas {
                let delta = Vector::new(dx, dy);
                let out = pixelator.emit(delta);
                prop_assert_eq!(out.x.fract(), 0.0);
                prop_assert_eq!(out.y.fract(), 0.0);

                input_sum += delta;
                output_sum += out;
                // Allow for float error in the reference sum itself
                prop_assert!((output_sum.x - input_sum.x).abs() < 1.0 + 1e-9);
                prop_assert!((output_sum.y - input_sum.y).abs() < 1.0 + 1e-9);
            }
        }
    }
}
