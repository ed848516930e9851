#![allow(dead_code)]

use cv_utils::io::{Button, Buttons, Channel, CvIn, CvOut, Leds, Pots, Pulse, NUM_LEDS, NUM_POTS};

/// A front panel that lives in memory, every write is recorded for inspection
#[derive(Default)]
pub struct MockPanel {
    pub pots: [u8; NUM_POTS],
    pub cv_in: [f32; 2],
    pub cv_out: [f32; 2],
    pub leds: [bool; NUM_LEDS],
    pub buttons: [bool; 2],

    pub pulse_in: bool,
    last_pulse_in: bool,
    pulse_rise: bool,
    pub pulse_out: bool,
    pub polls: u32,
}

impl MockPanel {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self::default()
    }

    pub fn set_gate(&mut self, channel: Channel, high: bool) {
        self.cv_in[index(channel)] = if high { 5.0 } else { 0.0 };
    }

    pub fn out(&self, channel: Channel) -> f32 {
        self.cv_out[index(channel)]
    }
}

fn index(channel: Channel) -> usize {
    match channel {
        Channel::A => 0,
        Channel::B => 1,
    }
}

impl Pots for MockPanel {
    fn get(&self, index: usize) -> u8 {
        self.pots[index]
    }
}

impl CvIn for MockPanel {
    fn voltage(&self, channel: Channel) -> f32 {
        self.cv_in[index(channel)]
    }
}

impl CvOut for MockPanel {
    fn set_voltage(&mut self, channel: Channel, volts: f32) {
        self.cv_out[index(channel)] = volts;
    }
}

impl Pulse for MockPanel {
    fn poll(&mut self) {
        if self.pulse_in && !self.last_pulse_in {
            self.pulse_rise = true;
        }
        self.last_pulse_in = self.pulse_in;
        self.polls += 1;
    }

    fn take_rise(&mut self) -> bool {
        let rise = self.pulse_rise;
        self.pulse_rise = false;
        rise
    }

    fn set(&mut self, high: bool) {
        self.pulse_out = high;
    }
}

impl Leds for MockPanel {
    fn set_led(&mut self, index: usize, on: bool) {
        self.leds[index] = on;
    }
}

impl Buttons for MockPanel {
    fn pressed(&self, button: Button) -> bool {
        match button {
            Button::A => self.buttons[0],
            Button::B => self.buttons[1],
        }
    }
}
