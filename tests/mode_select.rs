mod common;

use common::MockPanel;
use cv_utils::attenuverter::{POT_GAIN_A, POT_GAIN_B, POT_OFFSET};
use cv_utils::io::Channel;
use cv_utils::led_feedback::CENTER_V;
use cv_utils::{CvUtils, Mode, Stage, POLL_RATE_HZ};

/// holds button A and taps button B `steps` times, then lets go of A
fn step_mode(cv: &mut CvUtils, panel: &mut MockPanel, t: &mut u32, steps: usize) {
    let mut poll = |cv: &mut CvUtils, panel: &mut MockPanel| {
        cv.update(panel, *t);
        *t += 500;
    };

    panel.buttons[0] = true;
    poll(cv, panel);
    for _ in 0..steps {
        panel.buttons[1] = true;
        poll(cv, panel);
        panel.buttons[1] = false;
        poll(cv, panel);
    }
    panel.buttons[0] = false;
    poll(cv, panel);
}

/// runs polls with nothing pressed until the power-up LED sweep is over
fn finish_startup(cv: &mut CvUtils, panel: &mut MockPanel, t: &mut u32) {
    while cv.is_starting_up() {
        cv.update(panel, *t);
        *t += 500;
    }
}

#[test]
fn starts_as_an_attenuverter() {
    let mut panel = MockPanel::new();
    let mut cv = CvUtils::new(POLL_RATE_HZ as f32);
    assert_eq!(cv.mode(), Mode::Attenuverter);

    panel.pots[POT_GAIN_A] = 255;
    panel.pots[POT_GAIN_B] = 0;
    panel.pots[POT_OFFSET] = 255;
    panel.cv_in = [2.0, 2.0];
    cv.update(&mut panel, 0);

    // +5V of offset, then A adds its input and B subtracts it
    assert_eq!(panel.out(Channel::A), 10.0);
    assert_eq!(panel.out(Channel::B), 8.0);
    assert!(!panel.pulse_out);
}

#[test]
fn mode_select_shows_the_pending_mode_and_commits_on_release() {
    let mut panel = MockPanel::new();
    let mut cv = CvUtils::new(POLL_RATE_HZ as f32);
    let mut t = 0;
    finish_startup(&mut cv, &mut panel, &mut t);

    panel.buttons[0] = true;
    cv.update(&mut panel, t);
    assert_eq!(panel.leds, [true, false, false, false, false, false]);

    panel.buttons[1] = true;
    cv.update(&mut panel, t + 500);
    assert_eq!(panel.leds, [false, true, false, false, false, false]);
    assert_eq!(cv.mode(), Mode::Attenuverter);

    panel.buttons = [false, false];
    cv.update(&mut panel, t + 1_000);
    assert_eq!(cv.mode(), Mode::Slew);
}

#[test]
fn power_up_sweeps_the_leds_before_showing_the_mode() {
    let mut panel = MockPanel::new();
    let mut cv = CvUtils::new(POLL_RATE_HZ as f32);
    assert!(cv.is_starting_up());

    cv.update(&mut panel, 0);
    assert_eq!(panel.leds, [true, false, false, false, false, false]);

    // holding A during the sweep doesn't cut it short
    panel.buttons[0] = true;
    cv.update(&mut panel, 500);
    assert_eq!(panel.leds, [true, false, false, false, false, false]);

    let mut t = 1_000;
    finish_startup(&mut cv, &mut panel, &mut t);
    cv.update(&mut panel, t);
    assert_eq!(panel.leds, [true, false, false, false, false, false]);
    assert_eq!(cv.mode(), Mode::Attenuverter);
}

#[test]
fn releasing_a_with_b_still_held_does_not_trigger_the_envelope() {
    let mut panel = MockPanel::new();
    let mut cv = CvUtils::new(POLL_RATE_HZ as f32);
    let mut t = 0;
    let mut poll = |cv: &mut CvUtils, panel: &mut MockPanel| {
        cv.update(panel, t);
        t += 500;
    };

    // hold A, tap B once, then press B again and keep it down while A is let go
    panel.buttons[0] = true;
    poll(&mut cv, &mut panel);
    panel.buttons[1] = true;
    poll(&mut cv, &mut panel);
    panel.buttons[1] = false;
    poll(&mut cv, &mut panel);
    panel.buttons[1] = true;
    poll(&mut cv, &mut panel);
    panel.buttons[0] = false;
    poll(&mut cv, &mut panel);
    assert_eq!(cv.mode(), Mode::AdEnvelope);
    assert_eq!(cv.ad_envelope().channel(Channel::A).stage(), Stage::Idle);

    poll(&mut cv, &mut panel);
    assert_eq!(cv.ad_envelope().channel(Channel::A).stage(), Stage::Idle);
    assert_eq!(cv.ad_envelope().channel(Channel::B).stage(), Stage::Idle);

    // a fresh press after letting go is a trigger again
    panel.buttons[1] = false;
    poll(&mut cv, &mut panel);
    panel.buttons[1] = true;
    poll(&mut cv, &mut panel);
    assert_eq!(cv.ad_envelope().channel(Channel::A).stage(), Stage::Attack);
}

#[test]
fn button_b_triggers_the_envelope_once_selected() {
    let mut panel = MockPanel::new();
    let mut cv = CvUtils::new(POLL_RATE_HZ as f32);
    let mut t = 0;

    step_mode(&mut cv, &mut panel, &mut t, 2);
    assert_eq!(cv.mode(), Mode::AdEnvelope);

    // tapping B to pick the mode must not have started the envelope
    assert_eq!(cv.ad_envelope().channel(Channel::A).stage(), Stage::Idle);

    panel.buttons[1] = true;
    cv.update(&mut panel, t);
    assert_eq!(cv.ad_envelope().channel(Channel::A).stage(), Stage::Attack);
    assert_eq!(cv.ad_envelope().channel(Channel::B).stage(), Stage::Attack);
}

#[test]
fn slew_mode_smooths_towards_the_input() {
    let mut panel = MockPanel::new();
    let mut cv = CvUtils::new(POLL_RATE_HZ as f32);
    let mut t = 0;

    step_mode(&mut cv, &mut panel, &mut t, 1);
    assert_eq!(cv.mode(), Mode::Slew);

    panel.pots = [0, 0, 0];
    panel.cv_in = [3.0, -3.0];
    for _ in 0..10_000 {
        cv.update(&mut panel, t);
        t += 500;
    }
    assert!((panel.out(Channel::A) - (CENTER_V + 3.0)).abs() < 0.05);
    assert!((panel.out(Channel::B) - (CENTER_V - 3.0)).abs() < 0.05);
}
