use crate::io::{Leds, NUM_LEDS};
use crate::ui::Mode;

/// The DAC voltage that represents 0V at the output jack
pub const CENTER_V: f32 = 5.0_f32;

/// How far either side of `CENTER_V` a full VU bar reaches
const VU_FULL_SCALE_V: f32 = 5.0_f32;

const LEDS_PER_CHANNEL: usize = NUM_LEDS / 2;

/// How many polls each LED stays lit for during the startup sweep
pub const STARTUP_STEP_POLLS: u32 = 100;

/// `render_output_vu(leds, a, b)` shows the two DAC output voltages as bar graphs
///
/// LEDs `0..3` show channel A and `3..6` show channel B. The bar length follows the distance from `CENTER_V` so
/// negative and positive outputs light the same way.
pub fn render_output_vu<L: Leds>(leds: &mut L, voltage_a: f32, voltage_b: f32) {
    render_bar(leds, 0, voltage_a);
    render_bar(leds, LEDS_PER_CHANNEL, voltage_b);
}

/// `render_mode(leds, m)` lights only the LED matching mode `m`
pub fn render_mode<L: Leds>(leds: &mut L, mode: Mode) {
    for i in 0..NUM_LEDS {
        leds.set_led(i, i == mode as usize);
    }
}

/// A single LED sweep shown at power-up is represented here
pub struct StartupAnimation {
    polls: u32,
}

impl StartupAnimation {
    /// `StartupAnimation::new()` is a sweep that hasn't started yet
    pub fn new() -> Self {
        Self { polls: 0 }
    }

    /// `anim.render(leds)` draws the next poll of the sweep, and is false once the sweep is over
    ///
    /// The last call that returns true leaves every LED dark so the running mode starts from a clean panel.
    pub fn render<L: Leds>(&mut self, leds: &mut L) -> bool {
        if self.is_done() {
            return false;
        }
        let lit = (self.polls / STARTUP_STEP_POLLS) as usize;
        for i in 0..NUM_LEDS {
            leds.set_led(i, i == lit);
        }
        self.polls += 1;
        true
    }

    /// `anim.is_done()` is true once every LED has had its turn
    pub fn is_done(&self) -> bool {
        self.polls > STARTUP_STEP_POLLS * NUM_LEDS as u32
    }
}

impl Default for StartupAnimation {
    fn default() -> Self {
        Self::new()
    }
}

fn render_bar<L: Leds>(leds: &mut L, first_led: usize, dac_voltage: f32) {
    let signal_v = dac_voltage - CENTER_V;
    let magnitude = (signal_v.max(-signal_v) / VU_FULL_SCALE_V).min(1.0_f32);
    for i in 0..LEDS_PER_CHANNEL {
        // each LED needs to clear the next step, the top one is lit by anything near full scale
        let threshold = (i + 1) as f32 / (LEDS_PER_CHANNEL + 1) as f32;
        leds.set_led(first_led + i, magnitude >= threshold);
    }
}
