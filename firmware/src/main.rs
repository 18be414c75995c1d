//! Touch synth firmware for the Raspberry Pi Pico
//!
//! To flash:
//! $ cargo run --release

#![no_std]
#![no_main]

mod board;

use core::cell::RefCell;

use critical_section::Mutex;
use defmt::info;
use defmt_rtt as _;
use panic_probe as _;

use rp_pico::entry;
use rp_pico::hal::pac::{self, interrupt};

use touch_synth::{
    config::{GatePolarity, SynthConfig},
    control_loop::ControlLoop,
    oscillator::{PhaseIncrement, SineOscillator},
    touch_scanner::{ScanSchedule, TouchScanner},
};

use board::{Board, PwmAudio};

/// The only thing the control loop and the sample interrupt share
static PHASE_INCREMENT: PhaseIncrement = PhaseIncrement::new();

/// Handed over to the sample interrupt once at startup, never touched by `main` again
static AUDIO: Mutex<RefCell<Option<AudioIrq>>> = Mutex::new(RefCell::new(None));

struct AudioIrq {
    oscillator: SineOscillator,
    output: PwmAudio,
}

#[entry]
fn main() -> ! {
    info!("touch synth starting");

    let board = Board::init();

    ////////////////////////////////////////////////////////////////////////
    //
    // start the audio running in the background
    //
    ////////////////////////////////////////////////////////////////////////

    critical_section::with(|cs| {
        AUDIO.borrow(cs).replace(Some(AudioIrq {
            oscillator: SineOscillator::new(),
            output: board.audio,
        }));
    });

    // the oscillator starts out silent, the control loop sets the first frequency
    unsafe {
        pac::NVIC::unmask(pac::Interrupt::PWM_IRQ_WRAP);
    }

    ////////////////////////////////////////////////////////////////////////
    //
    // and the control loop in the foreground
    //
    ////////////////////////////////////////////////////////////////////////

    let scanner = TouchScanner::new(board.sense_lines, ScanSchedule::default());

    let config = SynthConfig {
        gate_polarity: GatePolarity::ActiveLow,
        ..Default::default()
    };

    let mut control_loop = ControlLoop::new(
        scanner,
        &PHASE_INCREMENT,
        board.timer,
        board.gate_pin,
        board.leds,
        config,
    );

    control_loop.run()
}

/// One sample per PWM cycle, the wrap of the counter is the sample clock
#[interrupt]
fn PWM_IRQ_WRAP() {
    static mut AUDIO_IRQ: Option<AudioIrq> = None;

    if AUDIO_IRQ.is_none() {
        critical_section::with(|cs| {
            *AUDIO_IRQ = AUDIO.borrow(cs).take();
        });
    }

    if let Some(audio) = AUDIO_IRQ {
        audio
            .oscillator
            .on_sample_tick(&PHASE_INCREMENT, &mut audio.output);
    }
}
