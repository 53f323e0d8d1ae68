//! Monotonic request stamps.
//!
//! Every camera request takes a fresh stamp. Work carrying an older stamp is
//! stale and must stop before producing another frame. The counter is shared
//! through an `Arc` so a background driver can check staleness too.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stamp(pub u64);

#[derive(Debug, Clone, Default)]
pub struct StampSource {
    latest: Arc<AtomicU64>,
}

impl StampSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a stamp newer than every previously issued one.
    pub fn issue(&self) -> Stamp {
        Stamp(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> Stamp {
        Stamp(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, stamp: Stamp) -> bool {
        self.latest() == stamp
    }
}

#[cfg(test)]
mod tests {
    use super::{Stamp, StampSource};

    #[test]
    fn stamps_increase_and_supersede() {
        let src = StampSource::new();
        assert_eq!(src.latest(), Stamp(0));
        let a = src.issue();
        assert!(src.is_current(a));
        let b = src.issue();
        assert!(b > a);
        assert!(!src.is_current(a));
        assert!(src.is_current(b));
    }

    #[test]
    fn clones_share_one_counter() {
        let src = StampSource::new();
        let shared = src.clone();
        let a = src.issue();
        assert!(shared.is_current(a));
        let b = shared.issue();
        assert!(!src.is_current(a));
        assert_eq!(src.latest(), b);
    }

    #[test]
    fn issue_is_safe_across_threads() {
        let src = StampSource::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let s = src.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        s.issue();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread");
        }
        assert_eq!(src.latest(), Stamp(400));
    }
}
