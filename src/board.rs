use core::convert::Infallible;

use cortex_m::peripheral::DWT;
use stm32l4xx_hal::{
    adc::{SampleTime, ADC},
    device::{SPI1, TIM2},
    gpio::{Alternate, Analog, Floating, Input, Output, Pin, PullUp, PushPull, H8, L8},
    hal::spi::{Mode, Phase, Polarity},
    prelude::*,
    spi::Spi,
    timer::Timer,
};

use cv_utils::gate_routing::{gate_state_from_last_and_curr, GateState};
use cv_utils::io::{Button, Buttons, Channel, CvIn, CvOut, Leds, Pots, Pulse, NUM_LEDS, NUM_POTS};

/// The physical board structure is represented here
pub struct Board {
    // SPI for the DAC and LED driver
    spi: SpiBus,

    adc1: ADC,
    pot_pins: (
        Pin<Analog, L8, 'A', 0>,
        Pin<Analog, L8, 'A', 1>,
        Pin<Analog, L8, 'A', 2>,
    ),
    cv_in_pins: (Pin<Analog, L8, 'A', 3>, Pin<Analog, L8, 'A', 4>),

    // front panel buttons pull the pins low when pressed
    button_a_pin: Pin<Input<PullUp>, L8, 'A', 5>,
    button_b_pin: Pin<Input<PullUp>, L8, 'A', 6>,

    // the pulse input is inverted by the input protection transistor
    not_pulse_in: Pin<Input<Floating>, H8, 'A', 8>,
    pulse_out: Pin<Output<PushPull>, H8, 'A', 11>,

    // periodic timer setting the control loop rate
    tim2: Timer<TIM2>,

    // latest scanned values of the front panel
    pots: [u8; NUM_POTS],
    cv_in: [f32; 2],
    buttons: [bool; 2],
    // counter to decide which pot to read for a given round
    round_robin_pot: usize,

    last_pulse_in: bool,
    pulse_rise: bool,

    // the DWT cycle counter is folded into a microsecond clock
    last_cycles: u32,
    cycle_remainder: u32,
    now_us: u32,

    // binary representation of the LEDs driven by 74HC595 shift register
    led_state: u8,

    // debug pin for misc debug purposes
    debug_pin: Pin<Output<PushPull>, L8, 'B', 0>,
}

impl Board {
    /// `Board::init()` is the board structure with all peripherals initialized.
    pub fn init(poll_rate_hz: u32) -> Self {
        ////////////////////////////////////////////////////////////////////////
        //
        // general peripheral housekeeping, core peripherals and clocks
        //
        ////////////////////////////////////////////////////////////////////////
        let mut cp = cortex_m::Peripherals::take().unwrap();
        let dp = stm32l4xx_hal::pac::Peripherals::take().unwrap();
        let mut flash = dp.FLASH.constrain();
        let mut rcc = dp.RCC.constrain();
        let mut pwr = dp.PWR.constrain(&mut rcc.apb1r1);

        let clocks = rcc
            .cfgr
            .sysclk(SYST_CLK_FREQ_MHZ.MHz())
            .pclk1(SYST_CLK_FREQ_MHZ.MHz())
            .pclk2(SYST_CLK_FREQ_MHZ.MHz())
            .freeze(&mut flash.acr, &mut pwr);

        let mut delay = stm32l4xx_hal::delay::Delay::new(cp.SYST, clocks);

        cp.DCB.enable_trace();
        cp.DWT.enable_cycle_counter();

        let mut gpioa = dp.GPIOA.split(&mut rcc.ahb2);
        let mut gpiob = dp.GPIOB.split(&mut rcc.ahb2);

        ////////////////////////////////////////////////////////////////////////
        //
        // ADC
        //
        ////////////////////////////////////////////////////////////////////////

        let mut adc1 = ADC::new(
            dp.ADC1,
            dp.ADC_COMMON,
            &mut rcc.ahb2,
            &mut rcc.ccipr,
            &mut delay,
        );

        adc1.set_sample_time(SampleTime::Cycles47_5);

        let pot_pins = (
            gpioa.pa0.into_analog(&mut gpioa.moder, &mut gpioa.pupdr),
            gpioa.pa1.into_analog(&mut gpioa.moder, &mut gpioa.pupdr),
            gpioa.pa2.into_analog(&mut gpioa.moder, &mut gpioa.pupdr),
        );
        let cv_in_pins = (
            gpioa.pa3.into_analog(&mut gpioa.moder, &mut gpioa.pupdr),
            gpioa.pa4.into_analog(&mut gpioa.moder, &mut gpioa.pupdr),
        );

        ////////////////////////////////////////////////////////////////////////
        //
        // SPI
        //
        ////////////////////////////////////////////////////////////////////////

        let sck = gpiob
            .pb3
            .into_alternate(&mut gpiob.moder, &mut gpiob.otyper, &mut gpiob.afrl);
        let sdi = gpiob
            .pb4
            .into_alternate(&mut gpiob.moder, &mut gpiob.otyper, &mut gpiob.afrl);
        let sdo = gpiob
            .pb5
            .into_alternate(&mut gpiob.moder, &mut gpiob.otyper, &mut gpiob.afrl);

        let spi = SpiBus {
            bus: Spi::spi1(
                dp.SPI1,
                (sck, sdi, sdo),
                Mode {
                    phase: Phase::CaptureOnFirstTransition,
                    polarity: Polarity::IdleHigh,
                },
                SPI_CLK_FREQ_MHZ.MHz(),
                clocks,
                &mut rcc.apb2,
            ),
            chip_sel: (
                gpioa.pa15.into_push_pull_output_in_state(
                    &mut gpioa.moder,
                    &mut gpioa.otyper,
                    PinState::High,
                ),
                gpiob.pb6.into_push_pull_output_in_state(
                    &mut gpiob.moder,
                    &mut gpiob.otyper,
                    PinState::High,
                ),
            ),
        };

        ////////////////////////////////////////////////////////////////////////
        //
        // Timer
        //
        ////////////////////////////////////////////////////////////////////////

        let tim2 = Timer::tim2(dp.TIM2, poll_rate_hz.Hz(), clocks, &mut rcc.apb1r1);

        let mut board = Self {
            spi,
            adc1,
            pot_pins,
            cv_in_pins,
            button_a_pin: gpioa
                .pa5
                .into_pull_up_input(&mut gpioa.moder, &mut gpioa.pupdr),
            button_b_pin: gpioa
                .pa6
                .into_pull_up_input(&mut gpioa.moder, &mut gpioa.pupdr),
            not_pulse_in: gpioa
                .pa8
                .into_floating_input(&mut gpioa.moder, &mut gpioa.pupdr),
            pulse_out: gpioa.pa11.into_push_pull_output_in_state(
                &mut gpioa.moder,
                &mut gpioa.otyper,
                PinState::Low,
            ),
            tim2,
            pots: [0; NUM_POTS],
            cv_in: [0.0_f32; 2],
            buttons: [false; 2],
            round_robin_pot: 0,
            last_pulse_in: false,
            pulse_rise: false,
            last_cycles: DWT::cycle_count(),
            cycle_remainder: 0,
            now_us: 0,
            led_state: 0,
            debug_pin: gpiob.pb0.into_push_pull_output_in_state(
                &mut gpiob.moder,
                &mut gpiob.otyper,
                PinState::Low,
            ),
        };

        // fill in every pot so the first poll doesn't see zeros
        for _ in 0..NUM_POTS {
            board.scan();
        }

        board
    }

    /// `board.tim2_timeout()` is true once per control loop period, it must be polled faster than that
    pub fn tim2_timeout(&mut self) -> bool {
        self.tim2.wait().is_ok()
    }

    /// `board.scan()` reads the front panel into the board, must be called once per poll before the panel is used
    ///
    /// The CV inputs and buttons are read every call, the pots are read one per call in turn.
    pub fn scan(&mut self) {
        self.cv_in[0] = adc_normalized_to_volts(self.read_analog(AnalogInput::CvInA));
        self.cv_in[1] = adc_normalized_to_volts(self.read_analog(AnalogInput::CvInB));

        let pot = match self.round_robin_pot {
            0 => AnalogInput::Pot1,
            1 => AnalogInput::Pot2,
            _ => AnalogInput::Pot3,
        };
        let value = normalized_to_u8(self.read_analog(pot));
        self.pots[self.round_robin_pot] = value;
        self.round_robin_pot = (self.round_robin_pot + 1) % NUM_POTS;

        self.buttons[0] = self.button_a_pin.is_low();
        self.buttons[1] = self.button_b_pin.is_low();
    }

    /// `board.now_us()` is the free-running microsecond clock, it wraps around after about 71 minutes
    ///
    /// Must be called at least once per cycle counter period (about 53 seconds at 80MHz) to stay accurate.
    pub fn now_us(&mut self) -> u32 {
        let cycles = DWT::cycle_count();
        let elapsed = cycles.wrapping_sub(self.last_cycles) as u64 + self.cycle_remainder as u64;
        self.last_cycles = cycles;

        let cycles_per_us = SYST_CLK_FREQ_MHZ as u64;
        self.now_us = self.now_us.wrapping_add((elapsed / cycles_per_us) as u32);
        self.cycle_remainder = (elapsed % cycles_per_us) as u32;
        self.now_us
    }

    /// `board.dac8162_set_vout(v, c)` writes the voltage `v` to channel `c` of the onboard DAC.
    ///
    /// # Arguments
    ///
    /// * `v_out` - The analog voltage to write, clamped to `[0.0, DAC8162_MAX_VOUT]`
    ///
    /// * `channel` - The enumerated DAC channel to write to
    pub fn dac8162_set_vout(&mut self, v_out: f32, channel: Dac8162Channel) {
        let v_out = v_out.max(0.0_f32).min(DAC8162_MAX_VOUT);

        let val_u14 = (v_out * DAC8162_COUNTS_PER_VOLT) as u16;
        // move the value out of DB0 and DB1
        let val_u14 = val_u14 << 2;
        // split it into bytes
        let low_byte = (val_u14 & 0xFF) as u8;
        let mid_byte = (val_u14 >> 8) as u8;
        let high_byte = channel as u8 | 0b0001_1000; // write to channel and update output

        self.spi
            .write(ChipSelect::Dac, &[high_byte, mid_byte, low_byte]);
    }

    /// `board.set_debug_pin(s)` writes the value `s` to the debug pin, setting it high or low
    pub fn set_debug_pin(&mut self, state: bool) {
        if state {
            self.debug_pin.set_high()
        } else {
            self.debug_pin.set_low()
        }
    }

    fn read_analog(&mut self, input: AnalogInput) -> f32 {
        let raw = match input {
            AnalogInput::Pot1 => nb::block!(self.adc1.read(&mut self.pot_pins.0)),
            AnalogInput::Pot2 => nb::block!(self.adc1.read(&mut self.pot_pins.1)),
            AnalogInput::Pot3 => nb::block!(self.adc1.read(&mut self.pot_pins.2)),
            AnalogInput::CvInA => nb::block!(self.adc1.read(&mut self.cv_in_pins.0)),
            AnalogInput::CvInB => nb::block!(self.adc1.read(&mut self.cv_in_pins.1)),
        };
        adc_fs_to_normalized_fl(infallible(raw))
    }
}

impl Pots for Board {
    fn get(&self, index: usize) -> u8 {
        self.pots[index.min(NUM_POTS - 1)]
    }
}

impl CvIn for Board {
    fn voltage(&self, channel: Channel) -> f32 {
        match channel {
            Channel::A => self.cv_in[0],
            Channel::B => self.cv_in[1],
        }
    }
}

impl CvOut for Board {
    fn set_voltage(&mut self, channel: Channel, volts: f32) {
        let dac_channel = match channel {
            Channel::A => Dac8162Channel::A,
            Channel::B => Dac8162Channel::B,
        };
        self.dac8162_set_vout(volts, dac_channel);
    }
}

impl Pulse for Board {
    fn poll(&mut self) {
        let high = self.not_pulse_in.is_low();
        if gate_state_from_last_and_curr(self.last_pulse_in, high) == GateState::Rising {
            self.pulse_rise = true;
        }
        self.last_pulse_in = high;
    }

    fn take_rise(&mut self) -> bool {
        let rise = self.pulse_rise;
        self.pulse_rise = false;
        rise
    }

    fn set(&mut self, high: bool) {
        if high {
            self.pulse_out.set_high()
        } else {
            self.pulse_out.set_low()
        }
    }
}

impl Leds for Board {
    fn set_led(&mut self, index: usize, on: bool) {
        if NUM_LEDS <= index {
            return;
        }
        let led_state = if on {
            self.led_state | LED_BITS[index]
        } else {
            self.led_state & !LED_BITS[index]
        };
        // only touch the bus when something changed
        if led_state != self.led_state {
            self.led_state = led_state;
            self.spi.write(ChipSelect::Leds, &[self.led_state])
        }
    }
}

impl Buttons for Board {
    fn pressed(&self, button: Button) -> bool {
        match button {
            Button::A => self.buttons[0],
            Button::B => self.buttons[1],
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Public constants
//
////////////////////////////////////////////////////////////////////////////////

/// The frequency of the main system clock
pub const SYST_CLK_FREQ_MHZ: u32 = 80;

/// The maximum value that can be produced by the Analog to Digital Converters.
pub const ADC_MAX: u16 = 0x0FFF;

/// The maximum value that can be written to the onboard Digital to Analog Converter.
pub const DAC8162_MAX_COUNT: u16 = (1 << 14) - 1;

/// The maximum analog voltage that the DAC can produce after onboard amplification
pub const DAC8162_MAX_VOUT: f32 = 10.0_f32;

////////////////////////////////////////////////////////////////////////////////
//
// Private constants
//
////////////////////////////////////////////////////////////////////////////////

/// The SPI clock frequency to use
const SPI_CLK_FREQ_MHZ: u32 = 10;

/// The number of DAC counts for 1 volt output
const DAC8162_COUNTS_PER_VOLT: f32 = DAC8162_MAX_COUNT as f32 / DAC8162_MAX_VOUT;

/// The CV inputs are scaled from `[-5.0, 5.0]` volts at the jack into the ADC range
const CV_IN_SPAN_V: f32 = 10.0_f32;
const CV_IN_MIN_V: f32 = -5.0_f32;

/// Shift register bits for each LED, based on the physical PCB layout
const LED_BITS: [u8; NUM_LEDS] = [1 << 0, 1 << 1, 1 << 2, 1 << 3, 1 << 4, 1 << 5];

////////////////////////////////////////////////////////////////////////////////
//
// Private helper functions
//
////////////////////////////////////////////////////////////////////////////////

/// `adc_fs_to_normalized_fl(v)` is the integer adc value normalized to [0.0, +1.0]
///
/// If the input value would overflow the output range it is clamped.
fn adc_fs_to_normalized_fl(val: u16) -> f32 {
    let val = val.min(ADC_MAX);
    (val as f32) / (ADC_MAX as f32)
}

/// `adc_normalized_to_volts(v)` is the normalized CV input reading `v` as volts at the jack
fn adc_normalized_to_volts(val: f32) -> f32 {
    val * CV_IN_SPAN_V + CV_IN_MIN_V
}

/// `normalized_to_u8(v)` is the normalized value `v` rounded to 8 bits
fn normalized_to_u8(val: f32) -> u8 {
    (val * 255.0_f32 + 0.5_f32) as u8
}

/// `infallible(r)` is the value held by a result that can't fail
fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(v) => v,
        Err(never) => match never {},
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Public Enums
//
////////////////////////////////////////////////////////////////////////////////

/// Channels of the onboard DAC8162 are represented here
#[derive(Clone, Copy)]
pub enum Dac8162Channel {
    A = 0b000,
    B = 0b001,
}

////////////////////////////////////////////////////////////////////////////////
//
// Private Structs and enums
//
////////////////////////////////////////////////////////////////////////////////

/// Enumerated analog inputs read through ADC1
#[derive(Clone, Copy)]
enum AnalogInput {
    Pot1,
    Pot2,
    Pot3,
    CvInA,
    CvInB,
}

#[allow(clippy::type_complexity)]
struct SpiBus {
    bus: Spi<
        SPI1,
        (
            Pin<Alternate<PushPull, 5>, L8, 'B', 3>, // SCK
            Pin<Alternate<PushPull, 5>, L8, 'B', 4>, // SDI (unused)
            Pin<Alternate<PushPull, 5>, L8, 'B', 5>, // SDO
        ),
    >,
    // manual chip select pins
    chip_sel: (
        Pin<Output<PushPull>, H8, 'A', 15>,
        Pin<Output<PushPull>, L8, 'B', 6>,
    ),
}

enum ChipSelect {
    Dac,
    Leds,
}

impl SpiBus {
    fn write(&mut self, cs: ChipSelect, words: &[u8]) {
        match cs {
            ChipSelect::Dac => self.chip_sel.0.set_low(),
            ChipSelect::Leds => self.chip_sel.1.set_low(),
        }
        self.bus.write(words).unwrap();
        match cs {
            ChipSelect::Dac => self.chip_sel.0.set_high(),
            ChipSelect::Leds => self.chip_sel.1.set_high(),
        }
    }
}
