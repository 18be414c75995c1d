//! Error types for configuring the touch scanner.

use core::fmt;

/// Errors that can occur when building a scan schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleError {
    /// The schedule already holds the maximum number of checkpoints.
    TooManyCheckpoints,

    /// A checkpoint was given no lines to sample.
    EmptyCheckpoint,

    /// A checkpoint claims lines already assigned to an earlier checkpoint.
    OverlappingLines {
        /// The lines claimed twice
        lines: u32,
    },

    /// A checkpoint is not later than the checkpoint before it.
    OutOfOrder,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScheduleError::TooManyCheckpoints => write!(f, "Too many checkpoints in scan schedule"),
            ScheduleError::EmptyCheckpoint => write!(f, "Checkpoint has no lines"),
            ScheduleError::OverlappingLines { lines } => {
                write!(f, "Lines {:#010x} assigned to more than one checkpoint", lines)
            }
            ScheduleError::OutOfOrder => write!(f, "Checkpoint must come after the previous one"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ScheduleError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ScheduleError::TooManyCheckpoints => defmt::write!(f, "Too many checkpoints"),
            ScheduleError::EmptyCheckpoint => defmt::write!(f, "Empty checkpoint"),
            ScheduleError::OverlappingLines { lines } => {
                defmt::write!(f, "Overlapping lines {=u32:#x}", lines)
            }
            ScheduleError::OutOfOrder => defmt::write!(f, "Checkpoint out of order"),
        }
    }
}
