#![no_std]
#![no_main]

mod board;

use crate::board::Board;

use cv_utils::{CvUtils, POLL_RATE_HZ};

use panic_halt as _;

use cortex_m_rt::entry;

#[entry]
fn main() -> ! {
    let mut board = Board::init(POLL_RATE_HZ);
    let mut cv_utils = CvUtils::new(POLL_RATE_HZ as f32);

    loop {
        if board.tim2_timeout() {
            board.set_debug_pin(true);

            board.scan();
            let now_us = board.now_us();

            cv_utils.update(&mut board, now_us);

            board.set_debug_pin(false);
        }
    }
}
