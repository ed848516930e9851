use crate::fixed_point::{clamp_q15, Q15_ONE};
use crate::gate_routing::{gate_state_from_last_and_curr, GateState};
use crate::shape::apply_shape;
use crate::time_curve::MIN_TIME_US;

/// One channel of the Attack-Decay envelope generator is represented here
///
/// The channel is driven by wall-clock time rather than by counting ticks, so timing stays accurate no matter how
/// irregular the polling is. Times are microseconds from a free-running `u32` clock, elapsed time is computed with
/// wrapping subtraction so a single timer overflow during a stage is harmless.
#[derive(Debug, Clone)]
pub struct EnvelopeChannel {
    stage: Stage,
    level: i32,
    stage_start_us: u32,
    stage_duration_us: u32,
    gate_was_high: bool,
}

impl EnvelopeChannel {
    /// `EnvelopeChannel::new()` is a new idle channel with its output at zero
    pub fn new() -> Self {
        Self {
            stage: Stage::Idle,
            level: 0,
            stage_start_us: 0,
            stage_duration_us: MIN_TIME_US,
            gate_was_high: false,
        }
    }

    /// `ch.stage()` is the current stage of the channel
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// `ch.level()` is the current output level in `[0, Q15_ONE]`
    pub fn level(&self) -> i32 {
        self.level
    }

    /// `ch.stage_start_us()` is the clock time at which the current stage began
    pub fn stage_start_us(&self) -> u32 {
        self.stage_start_us
    }

    /// `ch.stage_duration_us()` is how long the current stage lasts, fixed when the stage was entered
    pub fn stage_duration_us(&self) -> u32 {
        self.stage_duration_us
    }

    /// `ch.latch_gate(h)` is the edge state of this channel's gate given that it is now `h`
    ///
    /// The new state is latched whether or not an edge occurred.
    pub fn latch_gate(&mut self, high: bool) -> GateState {
        let state = gate_state_from_last_and_curr(self.gate_was_high, high);
        self.gate_was_high = high;
        state
    }

    /// `ch.trigger(t, a)` restarts the envelope from the top of the attack at time `t`, with attack time `a`
    ///
    /// This is a hard restart from any stage, the attack always begins again from its start.
    pub fn trigger(&mut self, now_us: u32, attack_us: u32) {
        log::debug!("trigger at {}us, attack {}us", now_us, attack_us);
        self.stage = Stage::Attack;
        self.stage_start_us = now_us;
        self.stage_duration_us = attack_us;
    }

    /// `ch.tick(t, d, s)` advances the channel to time `t` and is true iff the decay finished on this call
    ///
    /// # Arguments
    ///
    /// * `now_us` - the current clock time in microseconds
    ///
    /// * `decay_us` - the decay time to use if the attack completes on this call, it is not read otherwise
    ///
    /// * `shape` - the linear/exponential curve blend in `[0, Q15_ONE]`
    pub fn tick(&mut self, now_us: u32, decay_us: u32, shape: u16) -> bool {
        match self.stage {
            Stage::Idle => {
                self.level = 0;
                false
            }
            Stage::Attack => {
                let elapsed_us = now_us.wrapping_sub(self.stage_start_us);
                if elapsed_us >= self.stage_duration_us {
                    // land exactly on full scale so the decay starts from the top
                    self.level = Q15_ONE;
                    self.stage = Stage::Decay;
                    self.stage_start_us = now_us;
                    self.stage_duration_us = decay_us;
                    log::debug!("attack done at {}us, decay {}us", now_us, decay_us);
                } else {
                    let pos = position_q15(elapsed_us, self.stage_duration_us);
                    self.level = apply_shape(pos, shape, true);
                }
                false
            }
            Stage::Decay => {
                let elapsed_us = now_us.wrapping_sub(self.stage_start_us);
                if elapsed_us >= self.stage_duration_us {
                    self.level = 0;
                    self.stage = Stage::Idle;
                    log::debug!("decay done at {}us", now_us);
                    return true;
                }
                let pos = Q15_ONE - position_q15(elapsed_us, self.stage_duration_us);
                self.level = apply_shape(pos, shape, false);
                false
            }
        }
    }

    /// `ch.clamp_level()` forces the level back into `[0, Q15_ONE]`
    pub fn clamp_level(&mut self) {
        self.level = clamp_q15(self.level);
    }
}

impl Default for EnvelopeChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// The stages of an AD envelope are represented here. A channel is in exactly one stage at a time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Attack,
    Decay,
}

/// `position_q15(e, d)` is the elapsed time `e` as a fraction of the duration `d` in Q15
///
/// Only called with `e < d`, durations are never zero but the divisor is floored at 1 all the same.
fn position_q15(elapsed_us: u32, duration_us: u32) -> i32 {
    ((elapsed_us as u64 * Q15_ONE as u64) / duration_us.max(1) as u64) as i32
}
