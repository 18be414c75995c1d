//! # Glide Processor
//!
//! The glide processor adds lag between the note being played and the pitch being heard, so that new notes slide into
//! each other instead of stepping directly to the new note.
//!
//! The terms glide, lag, and portamento are often used interchangeably.
//!
//! The glide is set by a factor in `(0.0, 1.0]`, the fraction of the remaining distance to the target covered each
//! time the processor runs:
//!
//! `current += (target - current) * factor`
//!
//! A factor of 1.0 jumps straight to the target, smaller factors glide more slowly. This is a single pole lowpass
//! filter, so it is implemented as one.

use biquad::*;

/// The smallest allowed glide factor, anything slower is effectively frozen
pub const MIN_GLIDE_FACTOR: f32 = 0.001;

/// A glide processor for implementing portamento is represented here.
pub struct GlideProcessor {
    // internal lowpass filter to implement the glide
    lpf: DirectForm1<f32>,

    factor: f32,

    // the most recent output
    value: f32,
}

impl GlideProcessor {
    /// `GlideProcessor::new(f)` is a new glide processor with glide factor `f`, resting at zero
    pub fn new(factor: f32) -> Self {
        let factor = clamp_factor(factor);
        Self {
            lpf: DirectForm1::<f32>::new(coeffs(factor)),
            factor,
            value: 0.0_f32,
        }
    }

    /// `gp.set_factor(f)` sets the glide factor to `f`
    ///
    /// # Arguments:
    ///
    /// * `f` - the new glide factor, clamped to `[MIN_GLIDE_FACTOR, 1.0]`
    ///
    /// The current value is kept, so changing the factor mid-glide does not cause a jump.
    pub fn set_factor(&mut self, factor: f32) {
        let factor = clamp_factor(factor);

        // don't update the coefficients if you don't need to
        if factor == self.factor {
            return;
        }

        self.factor = factor;
        self.lpf.update_coefficients(coeffs(factor));
    }

    /// `gp.process(t)` is the value after taking one step toward the target `t`, must be called once per tick
    pub fn process(&mut self, target: f32) -> f32 {
        self.value = self.lpf.run(target);
        self.value
    }

    /// `gp.value()` is the most recent output of the glide processor
    pub fn value(&self) -> f32 {
        self.value
    }

    /// `gp.factor()` is the glide factor in use
    pub fn factor(&self) -> f32 {
        self.factor
    }
}

/// `clamp_factor(f)` is `f` forced into `[MIN_GLIDE_FACTOR, 1.0]`, NaN becomes the minimum
fn clamp_factor(factor: f32) -> f32 {
    factor.max(MIN_GLIDE_FACTOR).min(1.0_f32)
}

/// `coeffs(f)` is the single pole lowpass coefficients for glide factor `f`
///
/// `y[n] = f * x[n] + (1 - f) * y[n-1]`
fn coeffs(factor: f32) -> Coefficients<f32> {
    Coefficients {
        a1: factor - 1.0_f32,
        a2: 0.0_f32,
        b0: factor,
        b1: 0.0_f32,
        b2: 0.0_f32,
    }
}
