/// Deterministic frame metadata.
///
/// This is the timebase for camera animation and auto-rotation. It is
/// intentionally small and pure so a session can be recorded and replayed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Time at the start of the frame (seconds).
    pub time_s: f64,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time_s: index as f64 * dt_s,
        }
    }

    /// Frame paced at a whole number of milliseconds.
    pub fn from_interval_ms(index: u64, interval_ms: u64) -> Self {
        Self::new(index, interval_ms as f64 / 1000.0)
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }

    pub fn dt_ms(&self) -> f64 {
        self.dt_s * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::new(10, 1.0 / 60.0);
        let b = Frame::new(10, 1.0 / 60.0);
        assert_eq!(a, b);
        assert_eq!(a.time_s, 10.0 / 60.0);
    }

    #[test]
    fn next_advances_index_and_time() {
        let f0 = Frame::new(0, 0.05);
        let f1 = f0.next();
        assert_eq!(f1.index, 1);
        assert_eq!(f1.time_s, 0.05);
        assert_eq!(f1.dt_ms(), 50.0);
    }

    #[test]
    fn interval_in_milliseconds() {
        let f = Frame::from_interval_ms(4, 50);
        assert_eq!(f.dt_s, 0.05);
        assert_eq!(f.time_s, 0.2);
    }
}
