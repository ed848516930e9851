use crate::ad_envelope::MAX_DAC_V;
use crate::io::{Channel, Panel};
use crate::led_feedback::{render_output_vu, CENTER_V};
use crate::time_curve::pot_to_time_secs;
use synth_utils::glide_processor::GlideProcessor;

/// Potentiometer controlling the channel A slew time
pub const POT_TIME_A: usize = 0;
/// Potentiometer controlling the channel B slew time
pub const POT_TIME_B: usize = 1;

/// The dual slew limiter is represented here
///
/// Each CV input is smoothed by a glide processor and sent to the matching output. The knobs use the same curve as
/// the envelope times so the two modes feel alike.
pub struct Slew {
    slew_a: SlewChannel,
    slew_b: SlewChannel,
}

impl Slew {
    /// `Slew::new(sr)` is a new slew limiter updated at sample rate `sr`
    pub fn new(sample_rate_hz: f32) -> Self {
        Self {
            slew_a: SlewChannel::new(sample_rate_hz),
            slew_b: SlewChannel::new(sample_rate_hz),
        }
    }

    /// `s.update(p)` runs one poll of the slew limiter against panel `p`, must be called at the sample rate
    pub fn update<P: Panel>(&mut self, panel: &mut P) {
        self.slew_a.set_time_pot(panel.get(POT_TIME_A));
        self.slew_b.set_time_pot(panel.get(POT_TIME_B));

        let out_a = to_dac_voltage(self.slew_a.tick(panel.voltage(Channel::A)));
        let out_b = to_dac_voltage(self.slew_b.tick(panel.voltage(Channel::B)));

        panel.set(false);
        panel.set_voltage(Channel::A, out_a);
        panel.set_voltage(Channel::B, out_b);
        render_output_vu(panel, out_a, out_b);
    }
}

struct SlewChannel {
    glide: GlideProcessor,
    value: f32,
    // last knob position, so the costly time update only runs when the knob moves
    time_pot: Option<u8>,
}

impl SlewChannel {
    fn new(sample_rate_hz: f32) -> Self {
        Self {
            glide: GlideProcessor::new(sample_rate_hz),
            value: 0.0_f32,
            time_pot: None,
        }
    }

    fn set_time_pot(&mut self, pot: u8) {
        if self.time_pot != Some(pot) {
            self.glide.set_time(pot_to_time_secs(pot));
            self.time_pot = Some(pot);
        }
    }

    fn tick(&mut self, input_v: f32) -> f32 {
        self.value = self.glide.process(input_v);
        self.value
    }
}

fn to_dac_voltage(signal_v: f32) -> f32 {
    (signal_v + CENTER_V).max(0.0_f32).min(MAX_DAC_V)
}
