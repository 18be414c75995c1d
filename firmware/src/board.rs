use embedded_hal::{digital::OutputPin, pwm::SetDutyCycle};
use rp_pico::hal::{
    clocks::init_clocks_and_plls,
    gpio::{
        bank0::Gpio27, DynPinId, FunctionSioInput, FunctionSioOutput, Pin, PinState, PullDown,
        PullNone,
    },
    pac,
    pwm::{FreeRunning, Pwm6, Slice, Slices},
    Sio, Timer, Watchdog,
};
use touch_synth::{
    control_loop::StatusLeds,
    oscillator::{SampleOutput, PWM_CLOCK_DIVIDER, PWM_TOP},
    synth_state::{LedPattern, NUM_LEDS},
    touch_scanner::SenseLines,
};

type SensePin = Pin<DynPinId, FunctionSioInput, PullNone>;
type LedPin = Pin<DynPinId, FunctionSioOutput, PullDown>;

/// The note-gate output, low while a note is playing
pub type GatePin = Pin<Gpio27, FunctionSioOutput, PullDown>;

const NUM_SENSE_LINES: usize = 15;

/// The physical board hardware structure is represented here.
pub struct Board {
    /// The capacitive touch pads, GPIO 8 through 22
    pub sense_lines: BoardSenseLines,

    /// The octave LEDs, GPIO 3 through 7
    pub leds: BoardLeds,

    /// The note-gate output, GPIO 27
    pub gate_pin: GatePin,

    /// Microsecond timer used for all the delays
    pub timer: Timer,

    /// The PWM audio output, GPIO 28
    pub audio: PwmAudio,
}

impl Board {
    /// `Board::init()` is the board with all peripherals initialized.
    ///
    /// The PWM wrap interrupt is enabled in the peripheral, but left masked in the NVIC.
    pub fn init() -> Self {
        let mut pac = pac::Peripherals::take().unwrap();
        let mut watchdog = Watchdog::new(pac.WATCHDOG);

        // 125MHz system clock from the external crystal
        let clocks = init_clocks_and_plls(
            rp_pico::XOSC_CRYSTAL_FREQ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let sio = Sio::new(pac.SIO);
        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

        // LEDs are active low, start with them all off
        let leds = BoardLeds {
            pins: [
                pins.gpio3.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
                pins.gpio4.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
                pins.gpio5.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
                pins.gpio6.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
                pins.gpio7.into_push_pull_output_in_state(PinState::High).into_dyn_pin(),
            ],
        };

        // the gate is active low too, start with the note off
        let gate_pin = pins.gpio27.into_push_pull_output_in_state(PinState::High);

        // pulls must be off, the 1M resistor to ground is what discharges the pads
        let sense_lines = BoardSenseLines {
            _pins: [
                pins.gpio8.into_floating_input().into_dyn_pin(),
                pins.gpio9.into_floating_input().into_dyn_pin(),
                pins.gpio10.into_floating_input().into_dyn_pin(),
                pins.gpio11.into_floating_input().into_dyn_pin(),
                pins.gpio12.into_floating_input().into_dyn_pin(),
                pins.gpio13.into_floating_input().into_dyn_pin(),
                pins.gpio14.into_floating_input().into_dyn_pin(),
                pins.gpio15.into_floating_input().into_dyn_pin(),
                pins.gpio16.into_floating_input().into_dyn_pin(),
                pins.gpio17.into_floating_input().into_dyn_pin(),
                pins.gpio18.into_floating_input().into_dyn_pin(),
                pins.gpio19.into_floating_input().into_dyn_pin(),
                pins.gpio20.into_floating_input().into_dyn_pin(),
                pins.gpio21.into_floating_input().into_dyn_pin(),
                pins.gpio22.into_floating_input().into_dyn_pin(),
            ],
        };

        // 125MHz / 3 = 41.67MHz counter clock, / 1024 counts per cycle = 40.69kHz sample rate
        let pwm_slices = Slices::new(pac.PWM, &mut pac.RESETS);
        let mut pwm = pwm_slices.pwm6;
        pwm.set_div_int(PWM_CLOCK_DIVIDER);
        pwm.set_top(PWM_TOP);
        pwm.channel_a.output_to(pins.gpio28);
        pwm.clear_interrupt();
        pwm.enable_interrupt();
        pwm.enable();

        Self {
            sense_lines,
            leds,
            gate_pin,
            timer,
            audio: PwmAudio { pwm },
        }
    }
}

/// The touch pad lines, switched all at once through the SIO registers
pub struct BoardSenseLines {
    // held so nothing else can claim the pins
    _pins: [SensePin; NUM_SENSE_LINES],
}

impl SenseLines for BoardSenseLines {
    fn drive_high(&mut self, lines: u32) {
        let sio = sio_registers();
        sio.gpio_out_set().write(|w| unsafe { w.bits(lines) });
        sio.gpio_oe_set().write(|w| unsafe { w.bits(lines) });
    }

    fn release(&mut self, lines: u32) {
        sio_registers()
            .gpio_oe_clr()
            .write(|w| unsafe { w.bits(lines) });
    }

    fn read_levels(&mut self) -> u32 {
        sio_registers().gpio_in().read().bits()
    }
}

/// `sio_registers()` is the raw SIO register block
///
/// The HAL only switches pins one at a time, the scan needs whole groups to change on the same clock cycle. Only the
/// set/clear aliases are written, so other pins in the bank are never disturbed.
fn sio_registers() -> &'static pac::sio::RegisterBlock {
    unsafe { &*pac::SIO::ptr() }
}

/// The five octave LEDs
pub struct BoardLeds {
    pins: [LedPin; NUM_LEDS as usize],
}

impl StatusLeds for BoardLeds {
    fn set(&mut self, pattern: LedPattern) {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            // active low
            pin.set_state(PinState::from(!pattern.is_lit(i as u8))).ok();
        }
    }
}

/// The PWM slice which both clocks the samples and plays them
pub struct PwmAudio {
    pwm: Slice<Pwm6, FreeRunning>,
}

impl SampleOutput for PwmAudio {
    fn acknowledge(&mut self) {
        self.pwm.clear_interrupt();
    }

    fn set_level(&mut self, level: u16) {
        self.pwm.channel_a.set_duty_cycle(level).ok();
    }
}
