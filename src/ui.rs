use crate::gate_routing::{gate_state_from_last_and_curr, GateState};
use crate::io::{Button, Buttons};

/// The user interface is represented here (i.e. the front panel buttons and the mode they select)
///
/// Holding button A enters mode select, each press of button B while A is held steps to the next mode, and releasing
/// button A commits the selection. Outside of mode select button B belongs to the running mode.
pub struct Ui {
    mode: Mode,
    // the mode that will be committed when button A is released, `None` when not selecting
    pending_mode: Option<Mode>,

    last_button_a: bool,
    last_button_b: bool,
    button_b: bool,
    // set when mode select ends with B still held, B stays hidden from the mode until it is let go
    suppress_b: bool,
}

impl Ui {
    /// `Ui::new()` is a new UI state with the default mode active
    pub fn new() -> Self {
        Self {
            mode: Mode::Attenuverter,
            pending_mode: None,
            last_button_a: false,
            last_button_b: false,
            button_b: false,
            suppress_b: false,
        }
    }

    /// `ui.update(b)` reads the buttons from `b` and advances the mode select logic
    ///
    /// This function must be called once per poll, before the running mode is updated
    pub fn update<B: Buttons>(&mut self, buttons: &B) {
        let a = buttons.pressed(Button::A);
        let b = buttons.pressed(Button::B);
        let a_state = gate_state_from_last_and_curr(self.last_button_a, a);
        let b_state = gate_state_from_last_and_curr(self.last_button_b, b);
        self.last_button_a = a;
        self.last_button_b = b;
        self.button_b = b;

        match a_state {
            GateState::Rising => self.enter_mode_select(),
            GateState::Falling => self.exit_mode_select(),
            _ => (),
        }
        if !b {
            self.suppress_b = false;
        }

        if let Some(pending) = self.pending_mode {
            if b_state == GateState::Rising {
                self.pending_mode = Some(pending.next());
            }
        }
    }

    /// `ui.mode()` is the mode that is currently running
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// `ui.pending_mode()` is the mode that would be selected by releasing button A, if mode select is active
    pub fn pending_mode(&self) -> Option<Mode> {
        self.pending_mode
    }

    /// `ui.mode_button()` is the state of button B as seen by the running mode
    ///
    /// Reads as released during mode select so that stepping through modes doesn't also trigger anything. A press that
    /// is still held when mode select ends stays hidden until button B is released.
    pub fn mode_button(&self) -> bool {
        self.pending_mode.is_none() && self.button_b && !self.suppress_b
    }

    fn enter_mode_select(&mut self) {
        self.pending_mode = Some(self.mode);
    }

    fn exit_mode_select(&mut self) {
        if let Some(pending) = self.pending_mode.take() {
            self.suppress_b = true;
            if pending != self.mode {
                log::info!("mode: {:?}", pending);
            }
            self.mode = pending;
        }
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

/// Enumerated processing modes are represented here, the discriminant is the LED that shows the mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Attenuverter = 0,
    Slew = 1,
    AdEnvelope = 2,
}

impl Mode {
    /// `m.next()` is the mode after `m`, wrapping back around to the first
    pub fn next(self) -> Self {
        match self {
            Mode::Attenuverter => Mode::Slew,
            Mode::Slew => Mode::AdEnvelope,
            Mode::AdEnvelope => Mode::Attenuverter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Panel {
        a: bool,
        b: bool,
    }

    impl Buttons for Panel {
        fn pressed(&self, button: Button) -> bool {
            match button {
                Button::A => self.a,
                Button::B => self.b,
            }
        }
    }

    #[test]
    fn modes_wrap_around() {
        assert_eq!(Mode::Attenuverter.next(), Mode::Slew);
        assert_eq!(Mode::Slew.next(), Mode::AdEnvelope);
        assert_eq!(Mode::AdEnvelope.next(), Mode::Attenuverter);
    }

    #[test]
    fn hold_a_and_tap_b_selects_the_next_mode() {
        let mut ui = Ui::new();
        let mut p = Panel::default();

        p.a = true;
        ui.update(&p);
        assert_eq!(ui.pending_mode(), Some(Mode::Attenuverter));

        p.b = true;
        ui.update(&p);
        assert_eq!(ui.pending_mode(), Some(Mode::Slew));
        assert!(!ui.mode_button());

        // holding B is not another step
        ui.update(&p);
        assert_eq!(ui.pending_mode(), Some(Mode::Slew));
        p.b = false;
        ui.update(&p);
        p.b = true;
        ui.update(&p);
        assert_eq!(ui.pending_mode(), Some(Mode::AdEnvelope));
        assert_eq!(ui.mode(), Mode::Attenuverter);

        p.a = false;
        p.b = false;
        ui.update(&p);
        assert_eq!(ui.mode(), Mode::AdEnvelope);
        assert_eq!(ui.pending_mode(), None);
    }

    #[test]
    fn releasing_a_without_b_keeps_the_mode() {
        let mut ui = Ui::new();
        let mut p = Panel::default();
        p.a = true;
        ui.update(&p);
        p.a = false;
        ui.update(&p);
        assert_eq!(ui.mode(), Mode::Attenuverter);
    }

    #[test]
    fn b_held_through_the_end_of_select_is_hidden_until_released() {
        let mut ui = Ui::new();
        let mut p = Panel::default();

        p.a = true;
        ui.update(&p);
        p.b = true;
        ui.update(&p);
        p.a = false;
        ui.update(&p);
        assert_eq!(ui.mode(), Mode::Slew);
        assert!(!ui.mode_button());

        ui.update(&p);
        assert!(!ui.mode_button());

        p.b = false;
        ui.update(&p);
        p.b = true;
        ui.update(&p);
        assert!(ui.mode_button());
    }

    #[test]
    fn button_b_goes_to_the_mode_outside_of_select() {
        let mut ui = Ui::new();
        let mut p = Panel::default();
        p.b = true;
        ui.update(&p);
        assert!(ui.mode_button());
        assert_eq!(ui.mode(), Mode::Attenuverter);
    }
}
