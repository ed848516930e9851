#![cfg_attr(not(test), no_std)]

pub mod ad_envelope;
pub mod attenuverter;
pub mod cv_utils;
pub mod envelope_channel;
pub mod fixed_point;
pub mod gate_routing;
pub mod io;
pub mod led_feedback;
pub mod shape;
pub mod slew;
pub mod time_curve;
pub mod ui;

pub use ad_envelope::AdEnvelope;
pub use cv_utils::{CvUtils, POLL_RATE_HZ};
pub use envelope_channel::{EnvelopeChannel, Stage};
pub use ui::Mode;
