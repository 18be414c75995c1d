//! # Capacitive Touch Scanner
//!
//! Each touch pad is a copper area wired straight to a GPIO line, with a large (1M) resistor from the line to ground.
//! To take a reading every line is driven high for a moment, charging up the pad, and then released to a high
//! impedance input. The charge then bleeds away through the resistor. A finger on the pad adds capacitance, so a
//! touched pad stays above the logic threshold for longer than an untouched one.
//!
//! Every pad has a different trace length and shape, so there is no single instant at which all of the pads can be
//! judged. Instead the lines are split into groups and each group is checked at its own checkpoint after release. A
//! line that has already fallen low at its checkpoint has discharged, a line still reading high is being touched.
//!
//! The scan is:
//!
//! 1. drive every sense line high and wait for the settle time
//! 2. release every line to input
//! 3. at each checkpoint, sample all line levels and record which lines of that checkpoint's group have discharged
//! 4. invert the discharged lines once to get the touched lines
//! 5. remap from raw GPIO order to musical order, see [`remap`]
//!
//! The scanner does no debouncing and no retries, each scan is the truth for that instant.
//!
//! ---
//!
//! ## Note about timing
//!
//! A full scan busy-waits for the settle time plus the last checkpoint time, around 80 microseconds with the default
//! schedule. Scanning is synchronous and takes `&mut self`, so only one scan can ever be in flight.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::{button_mask::ButtonMask, error::ScheduleError};

/// The set of GPIO lines used for touch sensing is represented here
///
/// Lines are addressed as a bitmask where bit `n` is GPIO line `n`, so a whole group can be switched at once.
pub trait SenseLines {
    /// Drive the given lines high as outputs
    fn drive_high(&mut self, lines: u32);

    /// Release the given lines to high impedance inputs
    fn release(&mut self, lines: u32);

    /// Sample the logic level of every line at once
    ///
    /// A line that cannot be read should read low, which is judged as "not touched".
    fn read_levels(&mut self) -> u32;
}

/// The most checkpoints a scan schedule can hold
pub const MAX_CHECKPOINTS: usize = 8;

/// Time in microseconds to hold the lines high before releasing them
pub const DEFAULT_SETTLE_US: u32 = 10;

/// A point in time after release at which one group of lines is judged is represented here
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Checkpoint {
    /// Microseconds after the lines are released
    pub at_us: u32,

    /// The lines judged at this checkpoint
    pub lines: u32,
}

/// The checkpoints measured for the keyboard PCB
///
/// Found by experiment, shorter traces discharge sooner and get checked earlier.
pub const BOARD_CHECKPOINTS: [Checkpoint; 5] = [
    Checkpoint {
        at_us: 30,
        lines: (1 << 10) | (1 << 12) | (1 << 14) | (1 << 15) | (1 << 16) | (1 << 18),
    },
    Checkpoint {
        at_us: 40,
        lines: 1 << 20,
    },
    Checkpoint {
        at_us: 50,
        lines: (1 << 11) | (1 << 17) | (1 << 19),
    },
    Checkpoint {
        at_us: 60,
        lines: (1 << 8) | (1 << 9) | (1 << 13) | (1 << 21),
    },
    Checkpoint {
        at_us: 70,
        lines: 1 << 22,
    },
];

/// The order and timing of line checks during a scan is represented here
///
/// Every line belongs to exactly one checkpoint, and checkpoints are strictly increasing in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSchedule {
    settle_us: u32,
    checkpoints: Vec<Checkpoint, MAX_CHECKPOINTS>,
    lines: u32,
}

impl ScanSchedule {
    /// `ScanSchedule::new(s)` is a new empty schedule with a settle time of `s` microseconds
    pub fn new(settle_us: u32) -> Self {
        Self {
            settle_us,
            checkpoints: Vec::new(),
            lines: 0,
        }
    }

    /// `ss.push_checkpoint(t, l)` adds a checkpoint judging lines `l` at `t` microseconds after release
    ///
    /// # Errors
    ///
    /// * [`ScheduleError::EmptyCheckpoint`] if `lines` is zero
    /// * [`ScheduleError::OutOfOrder`] if `at_us` is not later than the last checkpoint
    /// * [`ScheduleError::OverlappingLines`] if any of `lines` already belong to a checkpoint
    /// * [`ScheduleError::TooManyCheckpoints`] if the schedule is full
    pub fn push_checkpoint(&mut self, at_us: u32, lines: u32) -> Result<(), ScheduleError> {
        if lines == 0 {
            return Err(ScheduleError::EmptyCheckpoint);
        }

        let last_at_us = self.checkpoints.last().map_or(0, |c| c.at_us);
        if at_us <= last_at_us {
            return Err(ScheduleError::OutOfOrder);
        }

        let overlap = self.lines & lines;
        if overlap != 0 {
            return Err(ScheduleError::OverlappingLines { lines: overlap });
        }

        self.checkpoints
            .push(Checkpoint { at_us, lines })
            .map_err(|_| ScheduleError::TooManyCheckpoints)?;
        self.lines |= lines;

        Ok(())
    }

    /// `ss.lines()` is every line touched by the schedule
    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// `ss.settle_us()` is the time the lines are held high before release
    pub fn settle_us(&self) -> u32 {
        self.settle_us
    }

    /// `ss.checkpoints()` is the checkpoints in time order
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// `ss.duration_us()` is the total time spent waiting during one scan
    pub fn duration_us(&self) -> u32 {
        self.settle_us + self.checkpoints.last().map_or(0, |c| c.at_us)
    }
}

impl Default for ScanSchedule {
    /// The schedule for the keyboard PCB
    fn default() -> Self {
        let mut schedule = Self::new(DEFAULT_SETTLE_US);
        for checkpoint in BOARD_CHECKPOINTS {
            // the board checkpoints are known to be valid
            schedule
                .push_checkpoint(checkpoint.at_us, checkpoint.lines)
                .ok();
        }
        schedule
    }
}

/// A capacitive touch scanner is represented here
pub struct TouchScanner<L> {
    lines: L,
    schedule: ScanSchedule,
}

impl<L: SenseLines> TouchScanner<L> {
    /// `TouchScanner::new(l, s)` is a new touch scanner reading lines `l` according to schedule `s`
    ///
    /// The lines are put into their idle released state.
    pub fn new(mut lines: L, schedule: ScanSchedule) -> Self {
        lines.release(schedule.lines());
        Self { lines, schedule }
    }

    /// `ts.scan(d)` is the buttons being touched right now, using `d` for the microsecond waits
    ///
    /// Blocks for [`ScanSchedule::duration_us`] microseconds. The lines are left released.
    pub fn scan<D: DelayNs>(&mut self, delay: &mut D) -> ButtonMask {
        let all_lines = self.schedule.lines();

        // charge every pad
        self.lines.drive_high(all_lines);
        delay.delay_us(self.schedule.settle_us());
        self.lines.release(all_lines);

        // collect the lines that have already discharged at their own checkpoint
        let mut discharged = 0;
        let mut elapsed_us = 0;
        for checkpoint in self.schedule.checkpoints() {
            delay.delay_us(checkpoint.at_us - elapsed_us);
            elapsed_us = checkpoint.at_us;
            discharged |= !self.lines.read_levels() & checkpoint.lines;
        }

        // anything that didn't discharge in time is being touched
        remap(!discharged & all_lines)
    }

    /// `ts.schedule()` is the scan schedule in use
    pub fn schedule(&self) -> &ScanSchedule {
        &self.schedule
    }
}

/// Keys C through F are wired to these lines in reverse order
const REVERSED_KEYS_FIRST_LINE: u32 = 8;
const NUM_REVERSED_KEYS: u32 = 6;

/// Keys F# through the top C are wired to these lines in order
const DIRECT_KEYS_FIRST_LINE: u32 = 16;
const NUM_DIRECT_KEYS: u32 = 7;

/// The octave down and up buttons are wired to these two lines
const OCTAVE_BUTTONS_FIRST_LINE: u32 = 14;

/// `remap(raw)` is the touched lines `raw` in GPIO order rearranged into a [`ButtonMask`]
///
/// | GPIO lines | mask bits | notes    |
/// |------------|-----------|----------|
/// | 8..=13     | 5..=0     | reversed |
/// | 16..=22    | 6..=12    |          |
/// | 14, 15     | 13, 14    |          |
///
/// # Examples
///
/// ```
/// use touch_synth::touch_scanner::remap;
///
/// let mask = remap((1 << 8) | (1 << 16) | (1 << 14));
/// assert_eq!(mask.bits(), (1 << 5) | (1 << 6) | (1 << 13));
/// ```
pub fn remap(raw: u32) -> ButtonMask {
    let reversed_field = ((raw >> REVERSED_KEYS_FIRST_LINE) & ((1 << NUM_REVERSED_KEYS) - 1)) as u8;
    let reversed_keys = (reversed_field.reverse_bits() >> (u8::BITS - NUM_REVERSED_KEYS)) as u32;

    let direct_keys = (raw >> DIRECT_KEYS_FIRST_LINE) & ((1 << NUM_DIRECT_KEYS) - 1);

    let octave_buttons = (raw >> OCTAVE_BUTTONS_FIRST_LINE) & 0b11;

    ButtonMask::new(
        reversed_keys
            | (direct_keys << NUM_REVERSED_KEYS)
            | (octave_buttons << (NUM_REVERSED_KEYS + NUM_DIRECT_KEYS)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Untouched pads fall below the threshold well before the first checkpoint
    const UNTOUCHED_DISCHARGE_US: u32 = 20;

    /// Touched pads stay high past the last checkpoint
    const TOUCHED_DISCHARGE_US: u32 = 100;

    /// A microsecond delay that advances a shared clock and adds up the time spent waiting
    struct FakeDelay<'a> {
        now_us: &'a Cell<u32>,
    }

    impl DelayNs for FakeDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.now_us.set(self.now_us.get() + ns / 1_000);
        }
    }

    /// Simulated RC pads, each line discharges a set time after it is released
    struct FakeLines<'a> {
        now_us: &'a Cell<u32>,
        discharge_us: [u32; 32],
        outputs: u32,
        driven_high: u32,
        released_at_us: u32,
    }

    impl<'a> FakeLines<'a> {
        fn new(now_us: &'a Cell<u32>) -> Self {
            Self {
                now_us,
                discharge_us: [UNTOUCHED_DISCHARGE_US; 32],
                outputs: 0,
                driven_high: 0,
                released_at_us: 0,
            }
        }

        fn touch(&mut self, line: usize) {
            self.discharge_us[line] = TOUCHED_DISCHARGE_US;
        }
    }

    impl SenseLines for FakeLines<'_> {
        fn drive_high(&mut self, lines: u32) {
            self.outputs |= lines;
            self.driven_high |= lines;
        }

        fn release(&mut self, lines: u32) {
            self.outputs &= !lines;
            self.released_at_us = self.now_us.get();
        }

        fn read_levels(&mut self) -> u32 {
            let since_release = self.now_us.get() - self.released_at_us;
            let mut levels = self.outputs & self.driven_high;
            for line in 0..32 {
                let is_input = self.outputs & (1 << line) == 0;
                let charged = self.driven_high & (1 << line) != 0;
                if is_input && charged && since_release < self.discharge_us[line] {
                    levels |= 1 << line;
                }
            }
            levels
        }
    }

    fn scan_with(set_up: impl FnOnce(&mut FakeLines)) -> (ButtonMask, u32, u32) {
        let clock = Cell::new(0);
        let mut lines = FakeLines::new(&clock);
        set_up(&mut lines);

        let mut scanner = TouchScanner::new(lines, ScanSchedule::default());
        let mut delay = FakeDelay { now_us: &clock };
        let mask = scanner.scan(&mut delay);

        (mask, clock.get(), scanner.lines.outputs)
    }

    #[test]
    fn nothing_touched_reads_empty() {
        let (mask, _, _) = scan_with(|_| ());
        assert_eq!(mask.bits(), 0);
    }

    #[test]
    fn touched_lines_are_remapped() {
        let (mask, _, _) = scan_with(|l| {
            l.touch(8);
            l.touch(16);
            l.touch(14);
        });
        assert_eq!(mask.bits(), (1 << 5) | (1 << 6) | (1 << 13));
    }

    #[test]
    fn every_sense_line_can_be_detected() {
        for line in 8..=22 {
            let (mask, _, _) = scan_with(|l| l.touch(line));
            assert_eq!(mask.bits().count_ones(), 1, "line {}", line);
        }
    }

    #[test]
    fn each_line_is_judged_at_its_own_checkpoint() {
        // line 22 is checked last, a pad still high at 65us has discharged by its 70us checkpoint
        let (mask, _, _) = scan_with(|l| l.discharge_us[22] = 65);
        assert_eq!(mask.bits(), 0);

        // but one that stays high until 75us is touched
        let (mask, _, _) = scan_with(|l| l.discharge_us[22] = 75);
        assert_eq!(mask.bits(), 1 << 12);

        // line 10 is checked first, still high at 35us is enough to count as touched
        let (mask, _, _) = scan_with(|l| l.discharge_us[10] = 35);
        assert_eq!(mask.bits(), 1 << 3);
    }

    #[test]
    fn lines_outside_the_schedule_are_ignored() {
        let (mask, _, _) = scan_with(|l| {
            l.touch(0);
            l.touch(23);
            l.touch(31);
        });
        assert_eq!(mask.bits(), 0);
    }

    #[test]
    fn scan_waits_settle_plus_last_checkpoint() {
        let (_, elapsed_us, _) = scan_with(|_| ());
        assert_eq!(elapsed_us, 80);
        assert_eq!(ScanSchedule::default().duration_us(), 80);
    }

    #[test]
    fn lines_are_left_released() {
        let (_, _, outputs) = scan_with(|l| l.touch(12));
        assert_eq!(outputs, 0);
    }

    #[test]
    fn remap_reverses_the_low_group() {
        assert_eq!(remap(1 << 8).bits(), 1 << 5);
        assert_eq!(remap(1 << 13).bits(), 1 << 0);
        assert_eq!(remap(1 << 10).bits(), 1 << 3);
    }

    #[test]
    fn remap_copies_the_high_group() {
        assert_eq!(remap(1 << 16).bits(), 1 << 6);
        assert_eq!(remap(1 << 22).bits(), 1 << 12);
    }

    #[test]
    fn remap_places_octave_buttons() {
        assert_eq!(remap(1 << 14).bits(), 1 << 13);
        assert_eq!(remap(1 << 15).bits(), 1 << 14);
    }

    #[test]
    fn remap_of_every_line_fills_fifteen_bits() {
        assert_eq!(remap(u32::MAX).bits(), 0x7FFF);
        assert_eq!(remap(!0x007F_FF00).bits(), 0);
    }

    #[test]
    fn default_schedule_partitions_the_sense_lines() {
        let schedule = ScanSchedule::default();
        assert_eq!(schedule.lines(), 0x007F_FF00);
        assert_eq!(schedule.checkpoints().len(), 5);

        let total: u32 = schedule
            .checkpoints()
            .iter()
            .map(|c| c.lines.count_ones())
            .sum();
        assert_eq!(total, 15);
    }

    #[test]
    fn schedule_rejects_overlapping_lines() {
        let mut schedule = ScanSchedule::new(DEFAULT_SETTLE_US);
        schedule.push_checkpoint(30, 0b0110).unwrap();
        assert_eq!(
            schedule.push_checkpoint(40, 0b1100),
            Err(ScheduleError::OverlappingLines { lines: 0b0100 })
        );
    }

    #[test]
    fn schedule_rejects_out_of_order_and_empty_checkpoints() {
        let mut schedule = ScanSchedule::new(DEFAULT_SETTLE_US);
        assert_eq!(schedule.push_checkpoint(30, 0), Err(ScheduleError::EmptyCheckpoint));
        schedule.push_checkpoint(30, 1).unwrap();
        assert_eq!(schedule.push_checkpoint(30, 2), Err(ScheduleError::OutOfOrder));
        assert_eq!(schedule.push_checkpoint(20, 2), Err(ScheduleError::OutOfOrder));
    }

    #[test]
    fn schedule_rejects_too_many_checkpoints() {
        let mut schedule = ScanSchedule::new(DEFAULT_SETTLE_US);
        for i in 0..MAX_CHECKPOINTS as u32 {
            schedule.push_checkpoint(10 * (i + 1), 1 << i).unwrap();
        }
        assert_eq!(
            schedule.push_checkpoint(1_000, 1 << 31),
            Err(ScheduleError::TooManyCheckpoints)
        );
        // nothing was recorded for the rejected checkpoint
        assert_eq!(schedule.lines() & (1 << 31), 0);
    }
}
