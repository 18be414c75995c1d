//! # Button Mask
//!
//! The state of every touch pad at one instant, in musical order.
//!
//! | bits    | meaning                                       |
//! |---------|-----------------------------------------------|
//! | 0..=12  | the 13 keys of one C-to-C octave, bit 0 is C |
//! | 13      | octave down                                   |
//! | 14      | octave up                                     |
//!
//! All higher bits are always zero.

use crate::utils::msb_index;

/// The bits which represent the keyboard keys
pub const KEYS_MASK: u32 = 0x1FFF;

/// The octave down button
pub const OCTAVE_DOWN: u32 = 1 << 13;

/// The octave up button
pub const OCTAVE_UP: u32 = 1 << 14;

/// Both octave buttons
pub const OCTAVE_BUTTONS: u32 = OCTAVE_DOWN | OCTAVE_UP;

/// Every meaningful bit
pub const ALL_BUTTONS: u32 = KEYS_MASK | OCTAVE_BUTTONS;

/// A snapshot of which buttons are being touched is represented here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonMask(u32);

impl ButtonMask {
    /// `ButtonMask::new(bits)` is a new button mask, bits above the octave up button are discarded
    pub const fn new(bits: u32) -> Self {
        Self(bits & ALL_BUTTONS)
    }

    /// `bm.bits()` is the raw mask
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// `bm.keys()` is just the keyboard key bits
    pub fn keys(&self) -> u32 {
        self.0 & KEYS_MASK
    }

    /// `bm.octave_buttons()` is just the octave button bits, left in place
    pub fn octave_buttons(&self) -> u32 {
        self.0 & OCTAVE_BUTTONS
    }

    /// `bm.highest_key()` is the index of the highest pitched key being touched, or `None` if no keys are touched
    ///
    /// When several keys are touched at once the highest one wins.
    pub fn highest_key(&self) -> Option<u8> {
        msb_index(self.keys())
    }

    /// `bm.octave_up()` is true iff the octave up button is touched
    pub fn octave_up(&self) -> bool {
        self.0 & OCTAVE_UP != 0
    }

    /// `bm.octave_down()` is true iff the octave down button is touched
    pub fn octave_down(&self) -> bool {
        self.0 & OCTAVE_DOWN != 0
    }

    /// `bm.both_octave_buttons()` is true iff both octave buttons are touched at the same time
    pub fn both_octave_buttons(&self) -> bool {
        self.octave_buttons() == OCTAVE_BUTTONS
    }
}

impl From<u32> for ButtonMask {
    fn from(bits: u32) -> Self {
        Self::new(bits)
    }
}
