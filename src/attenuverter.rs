use crate::ad_envelope::MAX_DAC_V;
use crate::io::{Channel, Panel};
use crate::led_feedback::{render_output_vu, CENTER_V};

/// Potentiometer controlling the channel A gain
pub const POT_GAIN_A: usize = 0;
/// Potentiometer controlling the channel B gain
pub const POT_GAIN_B: usize = 1;
/// Potentiometer controlling the offset shared by both channels
pub const POT_OFFSET: usize = 2;

/// The largest offset the offset knob can add, in either direction
pub const MAX_OFFSET_V: f32 = 5.0_f32;

/// The dual attenuverter is represented here, it has no state of its own
///
/// Each input is scaled by a gain in `[-1.0, 1.0]` and a shared offset is added before it goes back out.
pub struct Attenuverter;

impl Attenuverter {
    /// `Attenuverter::new()` is a new attenuverter
    pub fn new() -> Self {
        Self
    }

    /// `a.update(p)` runs one poll of the attenuverter against panel `p`
    pub fn update<P: Panel>(&mut self, panel: &mut P) {
        let offset_v = pot_to_bipolar(panel.get(POT_OFFSET)) * MAX_OFFSET_V;
        let gain_a = pot_to_bipolar(panel.get(POT_GAIN_A));
        let gain_b = pot_to_bipolar(panel.get(POT_GAIN_B));

        let out_a = attenuvert(panel.voltage(Channel::A), gain_a, offset_v);
        let out_b = attenuvert(panel.voltage(Channel::B), gain_b, offset_v);

        panel.set(false);
        panel.set_voltage(Channel::A, out_a);
        panel.set_voltage(Channel::B, out_b);
        render_output_vu(panel, out_a, out_b);
    }
}

impl Default for Attenuverter {
    fn default() -> Self {
        Self::new()
    }
}

/// `attenuvert(v, g, o)` is the DAC voltage for input `v` scaled by `g` and shifted by `o`, clamped to the DAC range
pub fn attenuvert(input_v: f32, gain: f32, offset_v: f32) -> f32 {
    (input_v * gain + offset_v + CENTER_V)
        .max(0.0_f32)
        .min(MAX_DAC_V)
}

/// `pot_to_bipolar(p)` maps the 8 bit knob `p` onto `[-1.0, 1.0]`
fn pot_to_bipolar(pot_value: u8) -> f32 {
    (pot_value as f32 - 127.5_f32) / 127.5_f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_extremes_are_full_gain() {
        assert_eq!(pot_to_bipolar(0), -1.0);
        assert_eq!(pot_to_bipolar(255), 1.0);
        assert!(pot_to_bipolar(128).abs() < 0.01);
    }

    #[test]
    fn unity_gain_passes_the_input() {
        assert_eq!(attenuvert(2.0, 1.0, 0.0), CENTER_V + 2.0);
    }

    #[test]
    fn negative_gain_inverts() {
        assert_eq!(attenuvert(2.0, -1.0, 0.0), CENTER_V - 2.0);
    }

    #[test]
    fn offset_shifts_and_output_is_clamped() {
        assert_eq!(attenuvert(0.0, 0.0, 1.5), CENTER_V + 1.5);
        assert_eq!(attenuvert(5.0, 1.0, 5.0), MAX_DAC_V);
        assert_eq!(attenuvert(-5.0, 1.0, -5.0), 0.0);
    }
}
