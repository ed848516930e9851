use crate::ad_envelope::AdEnvelope;
use crate::attenuverter::Attenuverter;
use crate::io::{Buttons, Panel};
use crate::led_feedback::{render_mode, StartupAnimation};
use crate::slew::Slew;
use crate::ui::{Mode, Ui};

/// The rate at which the control loop polls the panel
pub const POLL_RATE_HZ: u32 = 2_000;

/// The whole module is represented here: the UI plus every processing mode, exactly one of which runs each poll
pub struct CvUtils {
    ui: Ui,
    attenuverter: Attenuverter,
    slew: Slew,
    ad_envelope: AdEnvelope,
    startup: StartupAnimation,
}

impl CvUtils {
    /// `CvUtils::new(sr)` is a new module polled at sample rate `sr`, starting in the default mode
    pub fn new(sample_rate_hz: f32) -> Self {
        Self {
            ui: Ui::new(),
            attenuverter: Attenuverter::new(),
            slew: Slew::new(sample_rate_hz),
            ad_envelope: AdEnvelope::new(),
            startup: StartupAnimation::new(),
        }
    }

    /// `cv.update(p, t)` runs one control loop iteration against panel `p` at clock time `t`
    ///
    /// Modes that aren't selected are not updated, so they resume from where they left off.
    pub fn update<P: Panel + Buttons>(&mut self, panel: &mut P, now_us: u32) {
        self.ui.update(&*panel);

        match self.ui.mode() {
            Mode::Attenuverter => self.attenuverter.update(panel),
            Mode::Slew => self.slew.update(panel),
            Mode::AdEnvelope => self
                .ad_envelope
                .update(panel, now_us, self.ui.mode_button()),
        }

        // the startup sweep and then mode select take over the LEDs
        if !self.startup.render(panel) {
            if let Some(pending) = self.ui.pending_mode() {
                render_mode(panel, pending);
            }
        }
    }

    /// `cv.mode()` is the mode currently running
    pub fn mode(&self) -> Mode {
        self.ui.mode()
    }

    /// `cv.is_starting_up()` is true while the power-up LED sweep is still showing
    pub fn is_starting_up(&self) -> bool {
        !self.startup.is_done()
    }

    /// `cv.ad_envelope()` is the envelope generator, whether or not it is the running mode
    pub fn ad_envelope(&self) -> &AdEnvelope {
        &self.ad_envelope
    }
}
