#![no_std]
#![doc = include_str!("../README.md")]

pub mod button_mask;
pub mod config;
pub mod control_loop;
pub mod error;
pub mod glide_processor;
mod lookup_tables;
pub mod note_table;
pub mod octave_selector;
pub mod oscillator;
mod phase_accumulator;
pub mod synth_state;
pub mod touch_scanner;
mod utils;
