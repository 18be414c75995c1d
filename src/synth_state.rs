//! # Synth State Machine
//!
//! Turns the buttons being touched into what the synth should be doing, once per control loop tick.
//!
//! There are two modes:
//!
//! - **Play**: the normal mode. The highest key being touched picks a note in the current octave and opens the note
//!   gate. Letting go of every key closes the gate but keeps the last note as the target, so the pitch doesn't swoop
//!   down to zero as the sound dies away. The octave buttons shift the keyboard up and down.
//!
//! - **Glide Adjust**: entered while both octave buttons are held. The keyboard becomes a parameter control, the key
//!   touched sets how slowly notes glide into each other. The lowest key gives no glide at all, higher keys glide
//!   more slowly. The gate is held closed the whole time so the adjustment is silent.
//!
//! Either way the heard frequency takes one glide step toward the target every tick.
//!
//! The status LEDs show the octave in Play mode. In Glide Adjust mode they all light up while waiting for a key, and
//! all go dark once a key is touched.

use crate::{
    button_mask::ButtonMask,
    config::SynthConfig,
    glide_processor::GlideProcessor,
    note_table::{self, NUM_OCTAVES},
    octave_selector::OctaveSelector,
};

/// The number of status LEDs, one per octave
pub const NUM_LEDS: u8 = NUM_OCTAVES as u8;

const ALL_LEDS: u8 = (1 << NUM_LEDS) - 1;

/// A pattern for the status LEDs is represented here, bit `i` lights LED `i`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedPattern(u8);

impl LedPattern {
    /// `LedPattern::single(i)` is a pattern with just LED `i` lit
    pub const fn single(index: u8) -> Self {
        if index < NUM_LEDS {
            Self(1 << index)
        } else {
            Self(0)
        }
    }

    /// `LedPattern::all()` is every LED lit
    pub const fn all() -> Self {
        Self(ALL_LEDS)
    }

    /// `LedPattern::none()` is every LED dark
    pub const fn none() -> Self {
        Self(0)
    }

    /// `lp.bits()` is the raw pattern
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// `lp.is_lit(i)` is true iff LED `i` is lit
    pub fn is_lit(&self, index: u8) -> bool {
        index < NUM_LEDS && self.0 & (1 << index) != 0
    }
}

/// The modes of the synth are represented here
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Play,
    GlideAdjust,
}

/// Everything the outside world needs to hear about after one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    pub mode: Mode,

    /// true iff a note should be sounding
    pub gate: bool,

    pub leds: LedPattern,

    /// the glided frequency to play, in Hertz
    pub frequency: f32,
}

/// The state of the synth is represented here
///
/// Owned by the foreground control loop, nothing in here is touched by the sample-tick interrupt.
pub struct SynthState {
    octave_selector: OctaveSelector,
    glide: GlideProcessor,

    // the note being glided toward, in Hertz
    target_freq: f32,

    mode: Mode,
}

impl SynthState {
    /// `SynthState::new(c)` is a new synth state configured by `c`, silent and in Play mode
    pub fn new(config: &SynthConfig) -> Self {
        Self {
            octave_selector: OctaveSelector::new(config.default_octave, config.debounce_ms),
            glide: GlideProcessor::new(config.initial_glide_factor),
            target_freq: 0.0_f32,
            mode: Mode::Play,
        }
    }

    /// `ss.tick(b, t)` advances the synth by one control tick given the buttons `b` at time `t` milliseconds
    pub fn tick(&mut self, buttons: ButtonMask, now_ms: u32) -> TickOutput {
        let key = buttons.highest_key();

        let (mode, gate, leds) = if buttons.both_octave_buttons() {
            // keep following the octave buttons so letting go of one doesn't look like a press of the other
            self.octave_selector.track(buttons);

            match key {
                Some(k) => {
                    self.set_glide_factor(glide_factor_for_key(k));
                    (Mode::GlideAdjust, false, LedPattern::none())
                }
                None => (Mode::GlideAdjust, false, LedPattern::all()),
            }
        } else {
            if self.octave_selector.poll(buttons, now_ms) {
                #[cfg(feature = "defmt")]
                defmt::debug!("octave {=u8}", self.octave_selector.octave());
            }

            let octave = self.octave_selector.octave();

            let gate = match key {
                Some(k) => {
                    self.target_freq = note_table::note_freq(octave, k);
                    true
                }
                None => false,
            };

            (Mode::Play, gate, LedPattern::single(octave))
        };

        if mode != self.mode {
            #[cfg(feature = "defmt")]
            defmt::debug!("mode {}", mode);
            self.mode = mode;
        }

        let frequency = self.glide.process(self.target_freq);

        TickOutput {
            mode,
            gate,
            leds,
            frequency,
        }
    }

    /// `ss.set_glide_factor(f)` sets the glide factor, logging when it changes
    fn set_glide_factor(&mut self, factor: f32) {
        let old_factor = self.glide.factor();
        self.glide.set_factor(factor);

        if self.glide.factor() != old_factor {
            #[cfg(feature = "defmt")]
            defmt::debug!("glide factor {=f32}", self.glide.factor());
        }
    }

    /// `ss.octave()` is the selected octave in `[0, 4]`
    pub fn octave(&self) -> u8 {
        self.octave_selector.octave()
    }

    /// `ss.glide_factor()` is the current glide factor in `(0.0, 1.0]`
    pub fn glide_factor(&self) -> f32 {
        self.glide.factor()
    }

    /// `ss.target_freq()` is the frequency being glided toward, in Hertz
    pub fn target_freq(&self) -> f32 {
        self.target_freq
    }

    /// `ss.current_freq()` is the frequency reached by the glide so far, in Hertz
    pub fn current_freq(&self) -> f32 {
        self.glide.value()
    }

    /// `ss.mode()` is the mode from the most recent tick
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl Default for SynthState {
    fn default() -> Self {
        Self::new(&SynthConfig::default())
    }
}

/// `glide_factor_for_key(k)` is the glide factor selected by touching key `k` in Glide Adjust mode
///
/// Key zero turns glide off, each key above it is slower than the last.
pub fn glide_factor_for_key(key: u8) -> f32 {
    1.0_f32 / ((key as f32 * 10.0_f32) + 1.0_f32)
}
