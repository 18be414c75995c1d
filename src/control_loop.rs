//! # Control Loop
//!
//! The foreground driver of the synth. Each tick it:
//!
//! 1. scans the touch pads
//! 2. runs the synth state machine
//! 3. hands the new frequency to the oscillator
//! 4. sets the note gate and status LEDs
//! 5. sleeps for the tick period
//!
//! and then does it all again, forever. The sample-tick interrupt keeps playing the most recent frequency in the
//! background the whole time.

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{
    config::{GatePolarity, SynthConfig},
    oscillator::PhaseIncrement,
    synth_state::{LedPattern, SynthState, TickOutput},
    touch_scanner::{SenseLines, TouchScanner},
};

/// The bank of status LEDs is represented here
///
/// Implementors handle any inversion needed by the hardware, a set bit always means a lit LED.
pub trait StatusLeds {
    /// Light exactly the LEDs set in `pattern`
    fn set(&mut self, pattern: LedPattern);
}

/// The synth control loop is represented here
///
/// # Generic arguments:
///
/// * `L` - the touch sense lines
///
/// * `D` - a delay provider, used both for the microsecond waits while scanning and for the tick period
///
/// * `G` - the note-gate output pin
///
/// * `S` - the status LEDs
pub struct ControlLoop<'a, L, D, G, S> {
    scanner: TouchScanner<L>,
    state: SynthState,
    phase_increment: &'a PhaseIncrement,
    delay: D,
    gate_pin: G,
    leds: S,
    config: SynthConfig,

    // milliseconds since startup, wrapping
    now_ms: u32,
}

impl<'a, L, D, G, S> ControlLoop<'a, L, D, G, S>
where
    L: SenseLines,
    D: DelayNs,
    G: OutputPin,
    S: StatusLeds,
{
    /// `ControlLoop::new(sc, pi, d, g, s, c)` is a new control loop
    ///
    /// # Arguments:
    ///
    /// * `scanner` - the touch scanner to read the keyboard with
    ///
    /// * `phase_increment` - the increment shared with the sample-tick interrupt
    ///
    /// * `delay` - the delay provider
    ///
    /// * `gate_pin` - the note-gate output
    ///
    /// * `leds` - the status LEDs
    ///
    /// * `config` - synth settings
    pub fn new(
        scanner: TouchScanner<L>,
        phase_increment: &'a PhaseIncrement,
        delay: D,
        gate_pin: G,
        leds: S,
        config: SynthConfig,
    ) -> Self {
        Self {
            scanner,
            state: SynthState::new(&config),
            phase_increment,
            delay,
            gate_pin,
            leds,
            config,
            now_ms: 0,
        }
    }

    /// `cl.tick()` runs one pass of the control loop, including the sleep at the end
    pub fn tick(&mut self) -> TickOutput {
        let buttons = self.scanner.scan(&mut self.delay);

        let out = self.state.tick(buttons, self.now_ms);

        self.phase_increment.set_frequency(out.frequency);
        self.set_gate(out.gate);
        self.leds.set(out.leds);

        self.delay.delay_ms(self.config.tick_period_ms);
        self.now_ms = self.now_ms.wrapping_add(self.config.tick_period_ms);

        out
    }

    /// `cl.run()` runs the control loop forever
    pub fn run(&mut self) -> ! {
        #[cfg(feature = "defmt")]
        defmt::info!("control loop running, {}", self.config);

        loop {
            self.tick();
        }
    }

    /// `cl.state()` is the synth state
    pub fn state(&self) -> &SynthState {
        &self.state
    }

    /// `cl.now_ms()` is the number of milliseconds of ticks run so far
    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    /// `cl.set_gate(on)` drives the gate pin to the level meaning `on` for the configured polarity
    fn set_gate(&mut self, on: bool) {
        let level_high = match self.config.gate_polarity {
            GatePolarity::ActiveHigh => on,
            GatePolarity::ActiveLow => !on,
        };

        // nothing useful to do on failure, the pin is written again next tick
        if level_high {
            self.gate_pin.set_high().ok();
        } else {
            self.gate_pin.set_low().ok();
        }
    }
}
