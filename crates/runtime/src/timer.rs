//! Repeat timer driving auto-rotation.

use crate::frame::Frame;
use crate::stamp::{Stamp, StampSource};

/// Upper bound on catch-up fires for a single long frame.
const MAX_FIRES_PER_TICK: u32 = 1000;

/// Fires every `delay_ms` of frame time while running.
///
/// Starting takes a fresh stamp, so a restart discards the previous run's
/// schedule. The first fire happens on the first tick after `start`.
#[derive(Debug)]
pub struct RepeatTimer {
    stamps: StampSource,
    running: Option<Stamp>,
    delay_ms: u64,
    until_next_ms: f64,
}

impl RepeatTimer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            stamps: StampSource::new(),
            running: None,
            delay_ms: delay_ms.max(1),
            until_next_ms: 0.0,
        }
    }

    pub fn start(&mut self) -> Stamp {
        let stamp = self.stamps.issue();
        self.running = Some(stamp);
        self.until_next_ms = 0.0;
        stamp
    }

    pub fn stop(&mut self) {
        self.stamps.issue();
        self.running = None;
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some_and(|s| self.stamps.is_current(s))
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Sets the repeat delay, clamped to at least 1 ms.
    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms.max(1);
    }

    pub fn faster(&mut self) {
        self.set_delay_ms(self.delay_ms / 2);
    }

    pub fn slower(&mut self) {
        self.set_delay_ms(self.delay_ms.saturating_mul(2));
    }

    /// Fires due at the start of `frame`, then advances by its duration.
    pub fn tick(&mut self, frame: Frame) -> u32 {
        if !self.is_running() {
            return 0;
        }
        let mut fires = 0;
        while self.until_next_ms <= 1e-9 && fires < MAX_FIRES_PER_TICK {
            fires += 1;
            self.until_next_ms += self.delay_ms as f64;
        }
        self.until_next_ms = self.until_next_ms.max(0.0) - frame.dt_ms();
        fires
    }
}

#[cfg(test)]
mod tests {
    use super::RepeatTimer;
    use crate::frame::Frame;

    #[test]
    fn fires_immediately_then_every_delay() {
        let mut timer = RepeatTimer::new(50);
        assert_eq!(timer.tick(Frame::new(0, 0.025)), 0);

        timer.start();
        let fires: Vec<u32> = (0..5).map(|i| timer.tick(Frame::new(i, 0.025))).collect();
        assert_eq!(fires, vec![1, 0, 1, 0, 1]);
    }

    #[test]
    fn delay_halves_and_doubles_with_floor() {
        let mut timer = RepeatTimer::new(50);
        timer.faster();
        assert_eq!(timer.delay_ms(), 25);
        timer.slower();
        timer.slower();
        assert_eq!(timer.delay_ms(), 100);

        timer.set_delay_ms(1);
        timer.faster();
        assert_eq!(timer.delay_ms(), 1);
        timer.set_delay_ms(0);
        assert_eq!(timer.delay_ms(), 1);
    }

    #[test]
    fn short_delay_catches_up_within_a_frame() {
        let mut timer = RepeatTimer::new(10);
        timer.start();
        assert_eq!(timer.tick(Frame::new(0, 0.05)), 1);
        assert_eq!(timer.tick(Frame::new(1, 0.05)), 5);
    }

    #[test]
    fn stop_and_restart() {
        let mut timer = RepeatTimer::new(50);
        let a = timer.start();
        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.tick(Frame::new(0, 0.05)), 0);
        let b = timer.start();
        assert!(b > a);
        assert!(timer.is_running());
        assert_eq!(timer.tick(Frame::new(1, 0.05)), 1);
    }
}
