//! # Octave Selector
//!
//! The keyboard only has one octave of keys, the octave up and down buttons shift it around the note table.
//!
//! Only rising edges count, holding a button down does not keep shifting. Touch pads tend to chatter as a finger
//! lands, so after any octave change further edges are ignored for a short debounce window.

use crate::{
    button_mask::{ButtonMask, OCTAVE_DOWN, OCTAVE_UP},
    note_table::MAX_OCTAVE,
};

/// Time in milliseconds after an octave change during which further presses are ignored
pub const DEFAULT_DEBOUNCE_MS: u32 = 50;

/// The octave the keyboard starts in
pub const DEFAULT_OCTAVE: u8 = 2;

/// A debounced octave up/down selector is represented here
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctaveSelector {
    // in `[0, MAX_OCTAVE]`
    octave: u8,

    debounce_ms: u32,

    // when the octave last changed, wrapping milliseconds
    last_change_ms: u32,

    // the octave button bits seen last time, for edge detection
    last_buttons: u32,
}

impl OctaveSelector {
    /// `OctaveSelector::new(o, d)` is a new octave selector starting at octave `o` with a debounce time of `d` ms
    ///
    /// The starting octave is clamped to `[0, MAX_OCTAVE]`.
    pub fn new(octave: u8, debounce_ms: u32) -> Self {
        Self {
            octave: octave.min(MAX_OCTAVE),
            debounce_ms,
            // pretend the last change was a full debounce window ago so a press right at startup counts
            last_change_ms: 0_u32.wrapping_sub(debounce_ms),
            last_buttons: 0,
        }
    }

    /// `os.poll(b, t)` updates the octave from the buttons `b` at time `t` milliseconds
    ///
    /// Returns true iff an octave button press was acted on. Presses that arrive during the debounce window are
    /// dropped, not deferred.
    pub fn poll(&mut self, buttons: ButtonMask, now_ms: u32) -> bool {
        let rising_edges = self.track(buttons);

        if now_ms.wrapping_sub(self.last_change_ms) < self.debounce_ms {
            return false;
        }

        let mut acted = false;

        if rising_edges & OCTAVE_UP != 0 {
            self.octave = (self.octave + 1).min(MAX_OCTAVE);
            acted = true;
        }

        if rising_edges & OCTAVE_DOWN != 0 {
            self.octave = self.octave.saturating_sub(1);
            acted = true;
        }

        if acted {
            self.last_change_ms = now_ms;
        }

        acted
    }

    /// `os.track(b)` records the octave buttons in `b` without acting on them, and is the rising edges seen
    ///
    /// Used while the octave buttons are doing something else, so that letting go of one of them later doesn't look
    /// like a fresh press of the other.
    pub fn track(&mut self, buttons: ButtonMask) -> u32 {
        let button_state = buttons.octave_buttons();
        let rising_edges = button_state & !self.last_buttons;
        self.last_buttons = button_state;
        rising_edges
    }

    /// `os.octave()` is the selected octave in `[0, MAX_OCTAVE]`
    pub fn octave(&self) -> u8 {
        self.octave
    }
}

impl Default for OctaveSelector {
    fn default() -> Self {
        Self::new(DEFAULT_OCTAVE, DEFAULT_DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UP: ButtonMask = ButtonMask::new(OCTAVE_UP);
    const DOWN: ButtonMask = ButtonMask::new(OCTAVE_DOWN);
    const NONE: ButtonMask = ButtonMask::new(0);

    /// tap a button at time `t`, releasing it a millisecond later
    fn tap(os: &mut OctaveSelector, button: ButtonMask, t: u32) {
        os.poll(button, t);
        os.poll(NONE, t + 1);
    }

    #[test]
    fn starts_in_default_octave() {
        assert_eq!(OctaveSelector::default().octave(), 2);
    }

    #[test]
    fn press_at_time_zero_counts() {
        let mut os = OctaveSelector::default();
        assert!(os.poll(UP, 0));
        assert_eq!(os.octave(), 3);
    }

    #[test]
    fn holding_a_button_only_counts_once() {
        let mut os = OctaveSelector::default();
        for t in 0..500 {
            os.poll(UP, t);
        }
        assert_eq!(os.octave(), 3);
    }

    #[test]
    fn taps_inside_debounce_window_count_once() {
        let mut os = OctaveSelector::default();
        tap(&mut os, UP, 0);
        tap(&mut os, UP, 30);
        assert_eq!(os.octave(), 3);
    }

    #[test]
    fn taps_a_full_window_apart_count_twice() {
        let mut os = OctaveSelector::default();
        tap(&mut os, UP, 0);
        tap(&mut os, UP, 50);
        assert_eq!(os.octave(), 4);
    }

    #[test]
    fn press_dropped_during_window_is_not_deferred() {
        let mut os = OctaveSelector::default();
        tap(&mut os, UP, 0);

        // pressed during the window and held past it
        for t in 30..200 {
            os.poll(UP, t);
        }
        assert_eq!(os.octave(), 3);
    }

    #[test]
    fn octave_never_goes_above_max() {
        let mut os = OctaveSelector::new(MAX_OCTAVE, DEFAULT_DEBOUNCE_MS);
        for i in 0..10 {
            tap(&mut os, UP, i * 100);
            assert_eq!(os.octave(), MAX_OCTAVE);
        }
    }

    #[test]
    fn octave_never_goes_below_zero() {
        let mut os = OctaveSelector::new(0, DEFAULT_DEBOUNCE_MS);
        for i in 0..10 {
            tap(&mut os, DOWN, i * 100);
            assert_eq!(os.octave(), 0);
        }
    }

    #[test]
    fn down_then_up_returns_home() {
        let mut os = OctaveSelector::default();
        tap(&mut os, DOWN, 0);
        assert_eq!(os.octave(), 1);
        tap(&mut os, UP, 100);
        assert_eq!(os.octave(), 2);
    }

    #[test]
    fn tracked_buttons_do_not_produce_edges_later() {
        let mut os = OctaveSelector::default();

        // both buttons land together and are only tracked
        os.track(ButtonMask::new(OCTAVE_UP | OCTAVE_DOWN));

        // letting go of one leaves the other held, that is not a new press
        assert!(!os.poll(UP, 100));
        assert_eq!(os.octave(), 2);
    }

    #[test]
    fn debounce_survives_clock_wraparound() {
        let mut os = OctaveSelector::new(0, DEFAULT_DEBOUNCE_MS);
        tap(&mut os, UP, 0);
        tap(&mut os, UP, u32::MAX - 10);
        assert_eq!(os.octave(), 2);

        // 20ms later, after the clock wrapped
        tap(&mut os, UP, 9);
        assert_eq!(os.octave(), 2);

        // 60ms later
        tap(&mut os, UP, 49);
        assert_eq!(os.octave(), 3);
    }

    #[test]
    fn starting_octave_is_clamped() {
        assert_eq!(OctaveSelector::new(9, DEFAULT_DEBOUNCE_MS).octave(), MAX_OCTAVE);
    }
}
