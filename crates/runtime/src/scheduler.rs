use std::collections::VecDeque;

use foundation::math::Mat4;
use tracing::debug;

use crate::animation::MatrixAnimation;
use crate::frame::Frame;
use crate::stamp::{Stamp, StampSource};

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationStep {
    pub stamp: Stamp,
    pub matrix: Mat4,
    pub finished: bool,
}

#[derive(Debug)]
struct AnimationTask {
    stamp: Stamp,
    animation: MatrixAnimation,
}

/// Queue of camera animations paced by frame time.
///
/// Each submitted animation takes a fresh stamp from the shared
/// [`StampSource`]; any task whose stamp is no longer current is dropped
/// before it can produce another frame. The first step of a new animation is
/// produced on the next tick, then one step per `step_interval`.
#[derive(Debug)]
pub struct AnimationScheduler {
    stamps: StampSource,
    queue: VecDeque<AnimationTask>,
    step_interval_s: f64,
    due_s: f64,
    superseded: u64,
}

impl AnimationScheduler {
    pub fn new(stamps: StampSource, step_interval_ms: u64) -> Self {
        Self {
            stamps,
            queue: VecDeque::new(),
            step_interval_s: step_interval_ms as f64 / 1000.0,
            due_s: 0.0,
            superseded: 0,
        }
    }

    pub fn stamps(&self) -> &StampSource {
        &self.stamps
    }

    pub fn submit(&mut self, animation: MatrixAnimation) -> Stamp {
        let stamp = self.stamps.issue();
        self.queue.push_back(AnimationTask { stamp, animation });
        self.due_s = 0.0;
        stamp
    }

    /// Invalidates every queued animation without queueing a new one.
    pub fn supersede(&mut self) -> Stamp {
        self.stamps.issue()
    }

    pub fn is_animating(&self) -> bool {
        self.queue.iter().any(|t| self.stamps.is_current(t.stamp))
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of tasks dropped because a newer request replaced them.
    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }

    pub fn tick(&mut self, frame: Frame) -> Option<AnimationStep> {
        self.drop_stale(frame);
        if self.queue.is_empty() {
            return None;
        }

        self.due_s -= frame.dt_s;
        if self.due_s > 1e-12 {
            return None;
        }
        self.due_s = self.step_interval_s;

        let task = self.queue.front_mut()?;
        let stamp = task.stamp;
        let matrix = task.animation.next_matrix()?;
        let finished = task.animation.is_finished();
        if finished {
            self.queue.pop_front();
        }
        Some(AnimationStep {
            stamp,
            matrix,
            finished,
        })
    }

    fn drop_stale(&mut self, frame: Frame) {
        while let Some(task) = self.queue.front() {
            if self.stamps.is_current(task.stamp) && !task.animation.is_finished() {
                break;
            }
            debug!(
                frame = frame.index,
                stamp = task.stamp.0,
                remaining = task.animation.remaining(),
                "dropping superseded camera animation"
            );
            self.superseded += 1;
            self.queue.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AnimationScheduler;
    use crate::animation::MatrixAnimation;
    use crate::frame::Frame;
    use crate::stamp::StampSource;
    use foundation::math::{Mat4, Vec3};

    fn target(x: f64) -> Mat4 {
        Mat4::translation(Vec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn one_step_per_interval() {
        let mut sched = AnimationScheduler::new(StampSource::new(), 50);
        sched.submit(MatrixAnimation::new(Mat4::IDENTITY, target(1.0), 4));

        let mut frame = Frame::new(0, 0.025);
        let mut produced = Vec::new();
        for _ in 0..8 {
            if let Some(step) = sched.tick(frame) {
                produced.push((frame.index, step.matrix.m[0][3], step.finished));
            }
            frame = frame.next();
        }
        assert_eq!(
            produced,
            vec![
                (0, 0.25, false),
                (2, 0.5, false),
                (4, 0.75, false),
                (6, 1.0, true),
            ]
        );
        assert!(!sched.is_animating());
    }

    #[test]
    fn newer_request_aborts_older_animation() {
        let mut sched = AnimationScheduler::new(StampSource::new(), 50);
        let first = sched.submit(MatrixAnimation::new(Mat4::IDENTITY, target(1.0), 20));
        let mut frame = Frame::new(0, 0.05);
        let step = sched.tick(frame).expect("first step");
        assert_eq!(step.stamp, first);

        let second = sched.submit(MatrixAnimation::new(step.matrix, target(-1.0), 2));
        frame = frame.next();
        let step = sched.tick(frame).expect("second animation step");
        assert_eq!(step.stamp, second);
        assert_eq!(sched.superseded_count(), 1);

        frame = frame.next();
        let last = sched.tick(frame).expect("final step");
        assert!(last.finished);
        assert_eq!(last.matrix, target(-1.0));
        assert_eq!(sched.tick(frame.next()), None);
    }

    #[test]
    fn external_stamp_cancels_queue() {
        let stamps = StampSource::new();
        let mut sched = AnimationScheduler::new(stamps.clone(), 50);
        sched.submit(MatrixAnimation::new(Mat4::IDENTITY, target(1.0), 20));
        assert!(sched.is_animating());

        stamps.issue();
        assert!(!sched.is_animating());
        assert_eq!(sched.tick(Frame::new(0, 0.05)), None);
        assert_eq!(sched.pending(), 0);
    }
}
