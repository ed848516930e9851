/// The number of LEDs on the front panel
pub const NUM_LEDS: usize = 6;

/// The number of potentiometers on the front panel
pub const NUM_POTS: usize = 3;

/// The two analog channels, used for both the CV inputs and the CV outputs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    A,
    B,
}

/// Enumerated front panel push-buttons are represented here
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    A,
    B,
}

/// Front panel potentiometers, already scanned and debounced
pub trait Pots {
    /// `pots.get(i)` is the current 8 bit value of potentiometer `i`, in `[0, NUM_POTS)`
    fn get(&self, index: usize) -> u8;
}

/// The CV inputs, already converted to volts
pub trait CvIn {
    /// `cv.voltage(c)` is the voltage present at input `c`, nominally in `[-5.0, 5.0]`
    fn voltage(&self, channel: Channel) -> f32;
}

/// The DC coupled CV outputs
pub trait CvOut {
    /// `cv.set_voltage(c, v)` drives output `c` to `v` volts in the DAC domain `[0.0, 10.0]`, `5.0` is 0V at the jack
    fn set_voltage(&mut self, channel: Channel, volts: f32);
}

/// The pulse input and pulse output jacks
pub trait Pulse {
    /// `p.poll()` samples the pulse input and latches a rising edge if one occurred
    fn poll(&mut self);

    /// `p.take_rise()` is true iff a rising edge was latched since the last call, reading clears the latch
    fn take_rise(&mut self) -> bool;

    /// `p.set(s)` drives the pulse output to `s`, this holds only until the next poll re-asserts it
    fn set(&mut self, high: bool);
}

/// The front panel LEDs
pub trait Leds {
    /// `leds.set_led(i, s)` turns LED `i` in `[0, NUM_LEDS)` on or off
    fn set_led(&mut self, index: usize, on: bool);
}

/// The front panel push-buttons, already debounced
pub trait Buttons {
    /// `b.pressed(btn)` is true while `btn` is held down
    fn pressed(&self, button: Button) -> bool;
}

/// Everything a processing mode needs to run a poll
///
/// The board implements the hardware traits on real peripherals, tests implement them on plain structs. Nothing in
/// the processing code reaches for a peripheral directly, everything it touches is passed in on each poll.
pub trait Panel: Pots + CvIn + CvOut + Pulse + Leds {}

impl<T: Pots + CvIn + CvOut + Pulse + Leds> Panel for T {}
