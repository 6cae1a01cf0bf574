//! Frame pacing for the desktop window.

use std::time::Duration;

/// Sleeps for `duration`, spinning near the deadline only while the window has focus.
pub fn sleep(duration: Duration, focused: bool) {
    if focused {
        spin_sleep::sleep(duration);
    } else {
        std::thread::sleep(duration);
    }
}
