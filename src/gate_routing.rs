/// Gate inputs above this many volts are considered high
pub const GATE_THRESHOLD_V: f32 = 1.0_f32;

/// A structure for routing trigger sources to the two envelope channels is represented here.
///
/// There are four sources which can restart the envelopes: a gate input per channel, the manual button, and the
/// pulse input. Each gate only triggers its own channel, while the button and the pulse input trigger both. Sources
/// are combined with a logical OR, so any number of them landing on the same poll still restarts a channel just once.
pub struct GateRouting {
    // last button state allows us to detect presses
    last_button: bool,
}

impl GateRouting {
    /// `GateRouting::new()` is a new structure representing the trigger routing
    pub fn new() -> Self {
        Self { last_button: false }
    }

    /// `gr.update(a, b, btn, p)` is the pair of trigger decisions for this poll
    ///
    /// # Arguments
    ///
    /// * `gate_a` - the edge state of the channel A gate input
    ///
    /// * `gate_b` - the edge state of the channel B gate input
    ///
    /// * `button_pressed` - the current, already debounced, state of the manual trigger button
    ///
    /// * `pulse_rise` - true if a rising edge arrived on the pulse input since the last poll
    ///
    /// This function must be called once per poll so the button state stays fresh
    pub fn update(
        &mut self,
        gate_a: GateState,
        gate_b: GateState,
        button_pressed: bool,
        pulse_rise: bool,
    ) -> Triggers {
        let button_rise =
            gate_state_from_last_and_curr(self.last_button, button_pressed) == GateState::Rising;
        self.last_button = button_pressed;

        let both = button_rise | pulse_rise;

        let triggers = Triggers {
            a: gate_a == GateState::Rising || both,
            b: gate_b == GateState::Rising || both,
        };

        if triggers.a || triggers.b {
            log::trace!(
                "triggers a={} b={} (button={} pulse={})",
                triggers.a,
                triggers.b,
                button_rise,
                pulse_rise
            );
        }

        triggers
    }
}

impl Default for GateRouting {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-channel trigger decisions for a single poll
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Triggers {
    pub a: bool,
    pub b: bool,
}

/// Enumerated gate states are represented here. A gate signal will be in exactly one of these states at any given time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Low,
    Rising,
    High,
    Falling,
}

/// `gate_is_high(v)` is true iff voltage `v` is classified as a high gate
pub fn gate_is_high(volts: f32) -> bool {
    volts > GATE_THRESHOLD_V
}

/// `gate_state_from_last_and_curr(l, c)` is the gate state that results from the last and current inputs
pub fn gate_state_from_last_and_curr(last: bool, curr: bool) -> GateState {
    match (last, curr) {
        (false, false) => GateState::Low,
        (false, true) => GateState::Rising,
        (true, true) => GateState::High,
        (true, false) => GateState::Falling,
    }
}
