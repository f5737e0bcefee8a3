// Copyright 2025 the Tapestry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapestry Double Tap: a double-tap detector for component UIs.
//!
//! The sibling of `tapestry_long_press`, sharing the same host-driven time
//! model: a first tap opens a window of `threshold` milliseconds; a second
//! tap inside the window is a double tap and fires the primary callback
//! with the second event; the window elapsing instead fires the optional
//! single-tap callback with the *first* event. The window is settled
//! against event timestamps, or via [`DoubleTap::poll`] between events.
//!
//! Unlike the long-press detector, taps arrive through a single `click`
//! handler and carry no per-bind context; the machine accepts any event
//! descriptor, because what counts as a click is the host's decision.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tapestry_event::InputEvent;
//! use tapestry_double_tap::{DoubleTap, DoubleTapOptions};
//!
//! let doubles = Rc::new(Cell::new(0));
//! let seen = doubles.clone();
//! let detector = DoubleTap::new(
//!     Some(Box::new(move |_event| seen.set(seen.get() + 1))),
//!     DoubleTapOptions::new(),
//! );
//!
//! let mut handlers = detector.bind();
//! let mut first = InputEvent::new("click", 0);
//! let mut second = InputEvent::new("click", 150);
//! handlers.invoke_click(&mut first);
//! handlers.invoke_click(&mut second);
//! assert_eq!(doubles.get(), 1);
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use tapestry_event::InputEvent;
use tapestry_timing::OneShot;

/// Default interval, in milliseconds, inside which two taps count as a
/// double tap.
pub const DEFAULT_TAP_THRESHOLD_MS: u64 = 300;

/// A tap callback: receives the event that completed (or stood alone in)
/// the tap window.
pub type TapCallback = Box<dyn FnMut(&mut InputEvent)>;

/// Configuration for a double-tap detector.
pub struct DoubleTapOptions {
    threshold: u64,
    on_single_tap: Option<TapCallback>,
}

impl DoubleTapOptions {
    /// Creates options with the conventional defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_TAP_THRESHOLD_MS,
            on_single_tap: None,
        }
    }

    /// Sets the interval between taps for them to count as a double tap.
    /// Default 300 ms.
    #[must_use]
    pub fn threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the callback fired when the window elapses with only one tap.
    /// It receives the first (and only) tap's event.
    #[must_use]
    pub fn on_single_tap(mut self, on_single_tap: impl FnMut(&mut InputEvent) + 'static) -> Self {
        self.on_single_tap = Some(Box::new(on_single_tap));
        self
    }
}

impl Default for DoubleTapOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DoubleTapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleTapOptions")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

/// The double-tap state machine.
///
/// At most one tap window is open at a time; the first tap's event is
/// recorded so the single-tap callback can receive it when the window
/// elapses.
pub struct TapMachine {
    timer: OneShot,
    first: Option<InputEvent>,
    callback: Option<TapCallback>,
    options: DoubleTapOptions,
}

impl TapMachine {
    /// Creates a machine with the given primary callback and options.
    #[must_use]
    pub fn new(callback: Option<TapCallback>, options: DoubleTapOptions) -> Self {
        Self {
            timer: OneShot::new(),
            first: None,
            callback,
            options,
        }
    }

    /// Replaces the primary callback.
    pub fn set_callback(&mut self, callback: Option<TapCallback>) {
        self.callback = callback;
    }

    /// Returns `true` while a primary callback is registered.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Returns `true` while a tap window is open.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.timer.is_armed()
    }

    /// Processes a tap.
    ///
    /// A tap with no window open opens one at `time + threshold`. A tap
    /// inside an open window closes it and fires the primary callback with
    /// this (second) event. A tap at or after the window's deadline settles
    /// the single-tap first, then opens a fresh window.
    pub fn tap(&mut self, event: &mut InputEvent) {
        self.settle(event.time_ms());
        if self.timer.is_armed() {
            self.timer.cancel();
            self.first = None;
            if let Some(callback) = self.callback.as_mut() {
                callback(event);
            }
        } else {
            self.timer
                .arm(event.time_ms().saturating_add(self.options.threshold));
            self.first = Some(event.clone());
        }
    }

    /// Advances time, firing the single-tap if the window has elapsed.
    pub fn poll(&mut self, now: u64) {
        self.settle(now);
    }

    /// Tears the machine down, closing any open window without firing.
    pub fn unmount(&mut self) {
        self.timer.cancel();
        self.first = None;
    }

    fn settle(&mut self, now: u64) {
        if self.timer.fire(now) {
            let first = self.first.take();
            if let Some(on_single_tap) = self.options.on_single_tap.as_mut() {
                if let Some(mut event) = first {
                    on_single_tap(&mut event);
                }
            }
        }
    }
}

impl fmt::Debug for TapMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapMachine")
            .field("timer", &self.timer)
            .field("has_callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}

/// The handler bundle a double-tap detector binds.
///
/// Carries at most one handler — the click adapter — and is empty when the
/// detector is disabled.
#[derive(Default)]
pub struct TapHandlers {
    on_click: Option<Box<dyn FnMut(&mut InputEvent)>>,
}

impl TapHandlers {
    /// Returns `true` when no handler is bound (detector disabled).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.on_click.is_none()
    }

    /// Invokes the click handler, if bound. Returns `true` when it ran.
    pub fn invoke_click(&mut self, event: &mut InputEvent) -> bool {
        match self.on_click.as_mut() {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the click handler, for hosts that attach by
    /// ownership.
    pub fn take_click(&mut self) -> Option<Box<dyn FnMut(&mut InputEvent)>> {
        self.on_click.take()
    }
}

impl fmt::Debug for TapHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapHandlers")
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// A double-tap detector: one machine, any number of bound click handlers.
pub struct DoubleTap {
    machine: Rc<RefCell<TapMachine>>,
}

impl DoubleTap {
    /// Creates a detector. A `None` callback disables binding entirely.
    #[must_use]
    pub fn new(callback: Option<TapCallback>, options: DoubleTapOptions) -> Self {
        Self {
            machine: Rc::new(RefCell::new(TapMachine::new(callback, options))),
        }
    }

    /// Replaces the primary callback.
    pub fn set_callback(&self, callback: Option<TapCallback>) {
        self.machine.borrow_mut().set_callback(callback);
    }

    /// Binds the click handler bundle.
    ///
    /// Checked per call: when no primary callback is registered the bundle
    /// is empty and nothing gets attached.
    #[must_use]
    pub fn bind(&self) -> TapHandlers {
        if !self.machine.borrow().has_callback() {
            return TapHandlers::default();
        }
        let machine = Rc::clone(&self.machine);
        TapHandlers {
            on_click: Some(Box::new(move |event| machine.borrow_mut().tap(event))),
        }
    }

    /// Advances time, firing the single-tap if the window has elapsed.
    pub fn poll(&self, now: u64) {
        self.machine.borrow_mut().poll(now);
    }

    /// Returns `true` while a tap window is open.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.machine.borrow().is_waiting()
    }

    /// Tears the detector down, closing any open window without firing.
    pub fn unmount(&self) {
        self.machine.borrow_mut().unmount();
    }
}

impl fmt::Debug for DoubleTap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleTap")
            .field("machine", &self.machine.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    /// Records ("double" | "single", event time) pairs.
    #[derive(Clone, Default)]
    struct TapLog(Rc<RefCell<Vec<(&'static str, u64)>>>);

    fn logging_detector(threshold: u64) -> (DoubleTap, TapLog) {
        let log = TapLog::default();
        let doubles = log.clone();
        let singles = log.clone();
        let detector = DoubleTap::new(
            Some(Box::new(move |event| {
                doubles.0.borrow_mut().push(("double", event.time_ms()));
            })),
            DoubleTapOptions::new()
                .threshold(threshold)
                .on_single_tap(move |event| {
                    singles.0.borrow_mut().push(("single", event.time_ms()));
                }),
        );
        (detector, log)
    }

    #[test]
    fn two_taps_inside_the_window_are_a_double_tap() {
        let (detector, log) = logging_detector(300);
        let mut handlers = detector.bind();

        handlers.invoke_click(&mut InputEvent::new("click", 0));
        handlers.invoke_click(&mut InputEvent::new("click", 299));

        // The double tap reports the second event; no single tap fires.
        assert_eq!(*log.0.borrow(), vec![("double", 299)]);
        assert!(!detector.is_waiting());
    }

    #[test]
    fn a_lone_tap_becomes_a_single_tap_when_the_window_elapses() {
        let (detector, log) = logging_detector(300);
        let mut handlers = detector.bind();

        handlers.invoke_click(&mut InputEvent::new("click", 10));
        assert!(detector.is_waiting());

        detector.poll(309);
        assert!(log.0.borrow().is_empty());

        detector.poll(310);
        // The single tap reports the first (only) event.
        assert_eq!(*log.0.borrow(), vec![("single", 10)]);
        assert!(!detector.is_waiting());
    }

    #[test]
    fn a_tap_at_the_deadline_settles_then_opens_a_fresh_window() {
        let (detector, log) = logging_detector(300);
        let mut handlers = detector.bind();

        handlers.invoke_click(&mut InputEvent::new("click", 0));
        handlers.invoke_click(&mut InputEvent::new("click", 300));

        assert_eq!(*log.0.borrow(), vec![("single", 0)]);
        assert!(detector.is_waiting(), "the second tap opens its own window");

        detector.poll(600);
        assert_eq!(*log.0.borrow(), vec![("single", 0), ("single", 300)]);
    }

    #[test]
    fn alternating_pairs_keep_pairing_up() {
        let (detector, log) = logging_detector(300);
        let mut handlers = detector.bind();

        for t in [0, 100, 1000, 1100] {
            handlers.invoke_click(&mut InputEvent::new("click", t));
        }

        assert_eq!(*log.0.borrow(), vec![("double", 100), ("double", 1100)]);
    }

    #[test]
    fn null_callback_binds_an_empty_bundle() {
        let detector = DoubleTap::new(None, DoubleTapOptions::new());
        let mut handlers = detector.bind();
        assert!(handlers.is_empty());
        assert!(!handlers.invoke_click(&mut InputEvent::new("click", 0)));

        // A callback supplied later takes effect on the next bind call.
        detector.set_callback(Some(Box::new(|_event| {})));
        assert!(!detector.bind().is_empty());
    }

    #[test]
    fn unmount_closes_the_window_without_firing() {
        let (detector, log) = logging_detector(300);
        let mut handlers = detector.bind();

        handlers.invoke_click(&mut InputEvent::new("click", 0));
        detector.unmount();
        detector.poll(10_000);

        assert!(log.0.borrow().is_empty());
        assert!(!detector.is_waiting());
    }

    #[test]
    fn single_tap_fires_without_an_on_single_tap_callback_configured() {
        // The window still consumes itself cleanly when no single-tap
        // callback exists.
        let doubles = Rc::new(RefCell::new(0_u32));
        let seen = doubles.clone();
        let detector = DoubleTap::new(
            Some(Box::new(move |_event| *seen.borrow_mut() += 1)),
            DoubleTapOptions::new().threshold(300),
        );
        let mut handlers = detector.bind();

        handlers.invoke_click(&mut InputEvent::new("click", 0));
        detector.poll(400);
        assert!(!detector.is_waiting());

        // The next pair still counts as a double tap.
        handlers.invoke_click(&mut InputEvent::new("click", 500));
        handlers.invoke_click(&mut InputEvent::new("click", 600));
        assert_eq!(*doubles.borrow(), 1);
    }
}
