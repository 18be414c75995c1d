/// A fixed point phase accumulator is represented here
///
/// The accumulator is a 64 bit unsigned integer which is allowed to overflow and wrap. Only the index bits directly
/// above the fraction bits are used to look up table values, so wrapping the full width is harmless.
///
/// # Generic arguments:
///
/// * `NUM_FRACTION_BITS` - the number of bits below the index bits, these give sub-sample precision
///
/// * `NUM_INDEX_BITS` - the number of bits to use as index bits, the table must have `2^NUM_INDEX_BITS` entries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseAccumulator<const NUM_FRACTION_BITS: u32, const NUM_INDEX_BITS: u32> {
    accumulator: u64,
}

impl<const NUM_FRACTION_BITS: u32, const NUM_INDEX_BITS: u32>
    PhaseAccumulator<NUM_FRACTION_BITS, NUM_INDEX_BITS>
{
    const INDEX_MASK: u64 = (1 << NUM_INDEX_BITS) - 1;

    /// `PhaseAccumulator::new()` is a new phase accumulator starting at phase zero
    pub const fn new() -> Self {
        Self { accumulator: 0 }
    }

    /// `pa.tick(inc)` advances the phase accumulator by `inc`, expected to be called at the sample rate
    pub fn tick(&mut self, increment: u32) {
        self.accumulator = self.accumulator.wrapping_add(increment as u64);
    }

    /// `pa.phase()` is the raw value of the accumulator
    pub fn phase(&self) -> u64 {
        self.accumulator
    }

    /// `pa.index()` is the current value of the index bits of the phase accumulator
    pub fn index(&self) -> usize {
        ((self.accumulator >> NUM_FRACTION_BITS) & Self::INDEX_MASK) as usize
    }
}

impl<const NUM_FRACTION_BITS: u32, const NUM_INDEX_BITS: u32> Default
    for PhaseAccumulator<NUM_FRACTION_BITS, NUM_INDEX_BITS>
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_phase_by_increment() {
        let mut pa = PhaseAccumulator::<7, 9>::new();

        assert_eq!(pa.phase(), 0);
        pa.tick(1234);
        assert_eq!(pa.phase(), 1234);
        pa.tick(1234);
        assert_eq!(pa.phase(), 2468);
    }

    #[test]
    fn index_is_taken_above_the_fraction_bits() {
        let mut pa = PhaseAccumulator::<7, 9>::new();

        // just under one full table step
        pa.tick(127);
        assert_eq!(pa.index(), 0);

        pa.tick(1);
        assert_eq!(pa.index(), 1);
    }

    #[test]
    fn index_wraps_around_the_table() {
        let mut pa = PhaseAccumulator::<7, 9>::new();

        // one step short of the end of the table
        pa.tick(511 << 7);
        assert_eq!(pa.index(), 511);

        pa.tick(1 << 7);
        assert_eq!(pa.index(), 0);
    }
}
