//! # Oscillator Engine
//!
//! ## Acronyms used:
//!
//! - `LUT`: Look Up Table
//! - `DDS`: Direct Digital Synthesis
//! - `PWM`: Pulse Width Modulation
//!
//! A DDS sine oscillator which is ticked from a periodic hardware interrupt. Every tick the phase accumulator is
//! advanced, the index bits pick a sample out of the sine table, and that sample becomes the new PWM duty level. The
//! PWM output is then smoothed by an external RC filter into an analog-ish sine wave.
//!
//! There are two execution contexts involved:
//!
//! - the foreground control loop, which decides what frequency should be playing and writes it via
//!   [`PhaseIncrement::set_frequency`]
//!
//! - the sample-tick interrupt, which owns the [`SineOscillator`] (and with it the phase) and reads the increment
//!   every tick
//!
//! The phase increment is the only value shared between the two, and it is a single atomic word so the interrupt can
//! never observe a half written value.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::{
    lookup_tables::{self, SINE_TABLE},
    phase_accumulator::PhaseAccumulator,
    utils::ilog_2,
};

/// The effective sample rate in Hertz
///
/// 125MHz system clock divided by 3, then by the 1024 counts of one PWM cycle.
pub const SAMPLE_RATE_HZ: u32 = 40_690;

/// The PWM counter wraps after this value, giving 1024 distinct duty levels
///
/// Must match the range of the sine table exactly.
pub const PWM_TOP: u16 = lookup_tables::SINE_LUT_MAX;

/// The integer clock divider between the system clock and the PWM counter
pub const PWM_CLOCK_DIVIDER: u8 = 3;

/// Frequencies are multiplied by `2^FREQ_PRECISION_BITS` before being truncated to an integer, for sub-Hz precision
const FREQ_PRECISION_BITS: u32 = 7;

/// The number of index bits, depends on the lookup table used
///
/// Note that the lookup table size MUST be a power of 2
const NUM_LUT_INDEX_BITS: u32 = ilog_2(lookup_tables::SINE_LUT_SIZE);

/// `frequency_to_increment(f)` is the phase increment per sample which produces frequency `f` in Hertz
///
/// Negative and NaN frequencies give an increment of zero, which is silence.
pub fn frequency_to_increment(freq_hz: f32) -> u32 {
    // float to int casts saturate, so negatives and NaN land on zero
    let fixed_point_freq = (freq_hz * (1 << FREQ_PRECISION_BITS) as f32) as u32 as u64;
    ((fixed_point_freq << NUM_LUT_INDEX_BITS) / SAMPLE_RATE_HZ as u64) as u32
}

/// `increment_to_frequency(i)` is the frequency in Hertz actually produced by phase increment `i`
pub fn increment_to_frequency(increment: u32) -> f32 {
    (increment as f32 * SAMPLE_RATE_HZ as f32)
        / (1_u32 << (FREQ_PRECISION_BITS + NUM_LUT_INDEX_BITS)) as f32
}

/// The phase increment shared between the foreground loop and the sample-tick interrupt is represented here.
///
/// Single writer (the foreground loop), single reader (the interrupt). Can be placed in a `static`.
#[derive(Debug, Default)]
pub struct PhaseIncrement {
    increment: AtomicU32,
}

impl PhaseIncrement {
    /// `PhaseIncrement::new()` is a new phase increment which starts out silent
    pub const fn new() -> Self {
        Self {
            increment: AtomicU32::new(0),
        }
    }

    /// `pi.set_frequency(f)` sets the frequency to `f` Hertz, picked up by the interrupt on its next tick
    ///
    /// Never blocks.
    pub fn set_frequency(&self, freq_hz: f32) {
        self.increment
            .store(frequency_to_increment(freq_hz), Ordering::Relaxed);
    }

    /// `pi.increment()` is the current raw phase increment
    pub fn increment(&self) -> u32 {
        self.increment.load(Ordering::Relaxed)
    }

    /// `pi.frequency()` is the frequency in Hertz that the current increment actually produces
    ///
    /// This will be a hair below the last requested frequency due to truncation.
    pub fn frequency(&self) -> f32 {
        increment_to_frequency(self.increment())
    }
}

/// The hardware side of the sample clock is represented here, typically a PWM peripheral with a wrap interrupt.
pub trait SampleOutput {
    /// Clear the interrupt condition that triggered the current tick
    fn acknowledge(&mut self);

    /// Set the duty level of the output channel, in `[0, PWM_TOP]`
    fn set_level(&mut self, level: u16);
}

/// A wavetable sine oscillator is represented here
///
/// Owned by the sample-tick interrupt, nothing else should touch the phase.
#[derive(Debug, Default)]
pub struct SineOscillator {
    phase_accumulator: PhaseAccumulator<FREQ_PRECISION_BITS, NUM_LUT_INDEX_BITS>,
}

impl SineOscillator {
    /// `SineOscillator::new()` is a new sine oscillator starting at phase zero
    pub const fn new() -> Self {
        Self {
            phase_accumulator: PhaseAccumulator::new(),
        }
    }

    /// `osc.on_sample_tick(pi, out)` handles one sample-clock interrupt
    ///
    /// Acknowledges the interrupt, advances the phase by the shared increment `pi` and writes the new sine level to
    /// `out`. Must be called once per sample period. No blocking, no allocation, no logging.
    pub fn on_sample_tick<O: SampleOutput>(&mut self, increment: &PhaseIncrement, output: &mut O) {
        output.acknowledge();
        self.phase_accumulator.tick(increment.increment());
        output.set_level(self.level());
    }

    /// `osc.level()` is the current output level, in `[0, PWM_TOP]`
    pub fn level(&self) -> u16 {
        SINE_TABLE[self.phase_accumulator.index()]
    }

    /// `osc.phase()` is the raw value of the phase accumulator
    pub fn phase(&self) -> u64 {
        self.phase_accumulator.phase()
    }
}
