//! # Note Table
//!
//! Equal tempered note frequencies for the five octaves the keyboard can reach, C1 through B5, plus one extra C6 so
//! that the top key of the highest octave has somewhere to land.
//!
//! The keyboard is a single C-to-C octave of 13 keys, so the top key of octave `n` is the same pitch as the bottom key
//! of octave `n + 1`.

/// The number of semitones in one octave
pub const SEMITONES_PER_OCTAVE: usize = 12;

/// The number of keys on the keyboard, a full C-to-C octave
pub const NUM_KEYS: usize = SEMITONES_PER_OCTAVE + 1;

/// The number of octaves the keyboard can be shifted through
pub const NUM_OCTAVES: usize = 5;

/// The highest selectable octave, octaves are zero-based
pub const MAX_OCTAVE: u8 = (NUM_OCTAVES - 1) as u8;

/// The number of entries in the note table
pub const NUM_NOTES: usize = NUM_OCTAVES * SEMITONES_PER_OCTAVE + 1;

/// Note frequencies in Hertz, index zero is C1
#[rustfmt::skip]
pub const NOTE_FREQS: [f32; NUM_NOTES] = [
    // C1 to B1
    32.703, 34.648, 36.708, 38.891, 41.203, 43.654, 46.249, 48.999, 51.913, 55.000, 58.270, 61.735,
    // C2 to B2
    65.406, 69.296, 73.416, 77.782, 82.407, 87.307, 92.499, 97.999, 103.826, 110.000, 116.541, 123.471,
    // C3 to B3
    130.813, 138.591, 146.832, 155.563, 164.814, 174.614, 184.997, 195.998, 207.652, 220.000, 233.082, 246.942,
    // C4 to B4
    261.626, 277.183, 293.665, 311.127, 329.628, 349.228, 369.994, 391.995, 415.305, 440.000, 466.164, 493.883,
    // C5 to B5
    523.251, 554.365, 587.330, 622.254, 659.255, 698.456, 739.989, 783.991, 830.609, 880.000, 932.328, 987.767,
    // C6
    1046.502,
];

/// `note_index(o, s)` is the index into the note table for semitone `s` of octave `o`
///
/// The octave is clamped to `[0, MAX_OCTAVE]` and the semitone to `[0, NUM_KEYS)` so the index is always valid.
pub fn note_index(octave: u8, semitone: u8) -> usize {
    let octave = octave.min(MAX_OCTAVE) as usize;
    let semitone = (semitone as usize).min(NUM_KEYS - 1);
    octave * SEMITONES_PER_OCTAVE + semitone
}

/// `note_freq(o, s)` is the frequency in Hertz of semitone `s` of octave `o`
///
/// # Examples
///
/// ```
/// use touch_synth::note_table::note_freq;
///
/// // the lowest key of the default octave is C3
/// assert_eq!(note_freq(2, 0), 130.813);
///
/// // the top key of the top octave is C6
/// assert_eq!(note_freq(4, 12), 1046.502);
/// ```
pub fn note_freq(octave: u8, semitone: u8) -> f32 {
    NOTE_FREQS[note_index(octave, semitone)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_spans_c1_to_c6() {
        assert_eq!(NOTE_FREQS.len(), 61);
        assert_eq!(NOTE_FREQS[0], 32.703);
        assert_eq!(NOTE_FREQS[NUM_NOTES - 1], 1046.502);
    }

    #[test]
    fn a4_is_440() {
        assert_eq!(note_freq(3, 9), 440.0);
    }

    #[test]
    fn table_is_strictly_increasing() {
        for pair in NOTE_FREQS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn top_key_of_an_octave_is_bottom_key_of_the_next() {
        for octave in 0..MAX_OCTAVE {
            assert_eq!(note_freq(octave, 12), note_freq(octave + 1, 0));
        }
    }

    #[test]
    fn out_of_range_arguments_are_clamped() {
        assert_eq!(note_index(9, 0), note_index(MAX_OCTAVE, 0));
        assert_eq!(note_index(0, 200), 12);
        assert_eq!(note_index(255, 255), NUM_NOTES - 1);
    }
}
