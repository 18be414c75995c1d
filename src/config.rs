//! Tunable settings for the synth, with defaults matching the keyboard hardware.

use crate::octave_selector::{DEFAULT_DEBOUNCE_MS, DEFAULT_OCTAVE};

/// How long the control loop sleeps between ticks, in milliseconds
pub const DEFAULT_TICK_PERIOD_MS: u32 = 1;

/// The glide factor at startup, no glide
pub const DEFAULT_GLIDE_FACTOR: f32 = 1.0;

/// Which logic level of the note-gate pin means "note on" is represented here
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GatePolarity {
    /// The pin is driven high while a note is playing
    ActiveHigh,

    /// The pin is driven low while a note is playing
    ActiveLow,
}

/// Synth settings are represented here
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SynthConfig {
    /// The octave selected at power on, in `[0, 4]`
    pub default_octave: u8,

    /// Octave button presses this soon after an octave change are ignored
    pub debounce_ms: u32,

    /// Sleep between control loop ticks
    pub tick_period_ms: u32,

    /// Glide factor at power on, in `(0.0, 1.0]`
    pub initial_glide_factor: f32,

    /// Polarity of the note-gate output
    pub gate_polarity: GatePolarity,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            default_octave: DEFAULT_OCTAVE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            initial_glide_factor: DEFAULT_GLIDE_FACTOR,
            gate_polarity: GatePolarity::ActiveHigh,
        }
    }
}
