// Copyright 2025 the Tapestry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explainability helpers for press transitions.
//!
//! The press machine intentionally does not store a history of what happened
//! during a press cycle. For many embedders it is useful to answer questions
//! like: "Why did this press not trigger?".
//!
//! This module provides a minimal, additive hook: [`PressTrace`], a sink the
//! machine notifies at each transition, plus a small recorder,
//! [`TransitionRecorder`], which stores the observed [`Transition`] sequence
//! for inspection in tests or debugging overlays.
//!
//! Tracing is purely observational: no machine behavior depends on it.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::machine::CancelReason;

/// One observed press-machine transition.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Transition {
    /// A recognized start event began a press cycle.
    Started,
    /// The threshold deadline was armed.
    Armed {
        /// Absolute millisecond deadline that was armed.
        deadline: u64,
    },
    /// The deadline elapsed and the primary callback fired.
    Fired,
    /// The press ended after the long press had triggered.
    Finished,
    /// The press ended before the long press triggered.
    Cancelled {
        /// Why the press was cancelled.
        reason: CancelReason,
    },
    /// The detector was torn down.
    Unmounted,
}

/// A callback sink for press-transition tracing.
///
/// All methods default to doing nothing, so implementations observe only
/// what they care about.
pub trait PressTrace {
    /// Called when a press cycle starts.
    fn started(&mut self) {}

    /// Called when the threshold deadline is armed at `deadline`.
    fn armed(&mut self, deadline: u64) {
        let _ = deadline;
    }

    /// Called when the deadline elapses and the primary callback fires.
    fn fired(&mut self) {}

    /// Called when a triggered press ends.
    fn finished(&mut self) {}

    /// Called when a press ends before triggering, with the `reason`.
    fn cancelled(&mut self, reason: CancelReason) {
        let _ = reason;
    }

    /// Called when the detector is torn down.
    fn unmounted(&mut self) {}
}

/// Records every observed transition, in order.
///
/// The recorder is a cheap shared handle: clones observe the same log, so a
/// test can keep one clone and hand the other to
/// [`LongPressOptions::trace`](crate::options::LongPressOptions::trace).
///
/// # Example
///
/// ```
/// use tapestry_long_press::trace::{PressTrace, Transition, TransitionRecorder};
///
/// let recorder = TransitionRecorder::new();
/// let mut sink = recorder.clone();
/// sink.started();
/// sink.armed(400);
///
/// assert_eq!(
///     recorder.transitions(),
///     vec![Transition::Started, Transition::Armed { deadline: 400 }]
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransitionRecorder {
    log: Rc<RefCell<Vec<Transition>>>,
}

impl TransitionRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the transitions observed so far.
    #[must_use]
    pub fn transitions(&self) -> Vec<Transition> {
        self.log.borrow().clone()
    }

    /// Clears the recorded log.
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    fn push(&self, transition: Transition) {
        self.log.borrow_mut().push(transition);
    }
}

impl PressTrace for TransitionRecorder {
    fn started(&mut self) {
        self.push(Transition::Started);
    }

    fn armed(&mut self, deadline: u64) {
        self.push(Transition::Armed { deadline });
    }

    fn fired(&mut self) {
        self.push(Transition::Fired);
    }

    fn finished(&mut self) {
        self.push(Transition::Finished);
    }

    fn cancelled(&mut self, reason: CancelReason) {
        self.push(Transition::Cancelled { reason });
    }

    fn unmounted(&mut self) {
        self.push(Transition::Unmounted);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn clones_share_one_log() {
        let recorder = TransitionRecorder::new();
        let mut a = recorder.clone();
        let mut b = recorder.clone();

        a.started();
        b.cancelled(CancelReason::CancelledByRelease);

        assert_eq!(
            recorder.transitions(),
            vec![
                Transition::Started,
                Transition::Cancelled {
                    reason: CancelReason::CancelledByRelease
                },
            ]
        );
    }

    #[test]
    fn clear_empties_the_log() {
        let recorder = TransitionRecorder::new();
        recorder.clone().fired();
        recorder.clear();
        assert!(recorder.transitions().is_empty());
    }
}
