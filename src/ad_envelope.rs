use crate::envelope_channel::EnvelopeChannel;
use crate::fixed_point::{u8_to_q15, Q15_ONE};
use crate::gate_routing::{gate_is_high, GateRouting};
use crate::io::{Channel, Panel};
use crate::led_feedback::{render_output_vu, CENTER_V};
use crate::time_curve::pot_to_time_us;

/// Potentiometer controlling the attack time
pub const POT_ATTACK: usize = 0;
/// Potentiometer controlling the decay time
pub const POT_DECAY: usize = 1;
/// Potentiometer controlling the linear/exponential curve blend
pub const POT_SHAPE: usize = 2;

/// The envelope signal spans `[0.0, ENVELOPE_PEAK_V]` volts at the jack
pub const ENVELOPE_PEAK_V: f32 = 5.0_f32;

/// The highest voltage the DAC can produce
pub const MAX_DAC_V: f32 = 10.0_f32;

/// The dual Attack-Decay envelope generator is represented here
///
/// Both channels share the time and shape knobs but run independently. Each channel is restarted by its own gate
/// input, and both are restarted by the manual button or the pulse input. The pulse output fires for one poll
/// whenever either channel finishes its decay.
pub struct AdEnvelope {
    env_a: EnvelopeChannel,
    env_b: EnvelopeChannel,
    gate_routing: GateRouting,
}

impl AdEnvelope {
    /// `AdEnvelope::new()` is a new envelope generator with both channels idle
    pub fn new() -> Self {
        Self {
            env_a: EnvelopeChannel::new(),
            env_b: EnvelopeChannel::new(),
            gate_routing: GateRouting::new(),
        }
    }

    /// `env.channel(c)` is the envelope channel driving output `c`
    pub fn channel(&self, channel: Channel) -> &EnvelopeChannel {
        match channel {
            Channel::A => &self.env_a,
            Channel::B => &self.env_b,
        }
    }

    /// `env.update(p, t, b)` runs one poll of the envelope generator against panel `p` at clock time `t`
    ///
    /// # Arguments
    ///
    /// * `panel` - the hardware to read controls from and write outputs to
    ///
    /// * `now_us` - the free-running microsecond clock, allowed to wrap
    ///
    /// * `button_pressed` - the current state of the manual trigger button
    ///
    /// Must be called once per control loop iteration.
    pub fn update<P: Panel>(&mut self, panel: &mut P, now_us: u32, button_pressed: bool) {
        panel.poll();
        let pulse_rise = panel.take_rise();

        let attack_us = pot_to_time_us(panel.get(POT_ATTACK));
        let decay_us = pot_to_time_us(panel.get(POT_DECAY));
        let shape = u8_to_q15(panel.get(POT_SHAPE));

        let gate_a = self.env_a.latch_gate(gate_is_high(panel.voltage(Channel::A)));
        let gate_b = self.env_b.latch_gate(gate_is_high(panel.voltage(Channel::B)));
        let triggers = self
            .gate_routing
            .update(gate_a, gate_b, button_pressed, pulse_rise);

        if triggers.a {
            self.env_a.trigger(now_us, attack_us);
        }
        if triggers.b {
            self.env_b.trigger(now_us, attack_us);
        }

        let eoc_a = self.env_a.tick(now_us, decay_us, shape);
        let eoc_b = self.env_b.tick(now_us, decay_us, shape);
        panel.set(eoc_a || eoc_b);

        self.env_a.clamp_level();
        self.env_b.clamp_level();
        let out_a = level_to_dac_voltage(self.env_a.level());
        let out_b = level_to_dac_voltage(self.env_b.level());

        panel.set_voltage(Channel::A, out_a);
        panel.set_voltage(Channel::B, out_b);
        render_output_vu(panel, out_a, out_b);
    }
}

impl Default for AdEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

/// `level_to_dac_voltage(l)` is the envelope level `l` in `[0, Q15_ONE]` as a voltage for the bipolar DAC
///
/// The unipolar envelope signal is lifted by `CENTER_V` and clamped to what the DAC can produce.
pub fn level_to_dac_voltage(level: i32) -> f32 {
    let signal_v = level as f32 * ENVELOPE_PEAK_V / Q15_ONE as f32;
    (signal_v + CENTER_V).max(0.0_f32).min(MAX_DAC_V)
}
