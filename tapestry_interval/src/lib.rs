// Copyright 2025 the Tapestry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapestry Interval: a host-driven repeating interval runner.
//!
//! Where the gesture detectors wait for one deadline, [`IntervalRunner`]
//! fires a callback every `period` milliseconds for as long as it is
//! active. As everywhere in Tapestry, the host supplies time: call
//! [`IntervalRunner::poll`] as time advances, and ticks fire from there.
//!
//! Two pacing modes:
//!
//! - **Self-correcting** (the default): ticks are anchored to the start
//!   instant, so late polling never drifts the schedule — the callback is
//!   handed the number of periods that elapsed since it last fired and the
//!   next tick stays on the original grid.
//! - **Re-anchoring**: each fire schedules the next tick `period` after the
//!   poll that fired it, like a naive timeout chain; late polls push the
//!   whole schedule back.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tapestry_interval::{IntervalOptions, IntervalRunner};
//!
//! let ticks = Rc::new(Cell::new(0_u32));
//! let seen = ticks.clone();
//! let mut runner = IntervalRunner::new(
//!     100,
//!     move |n| seen.set(seen.get() + n),
//!     IntervalOptions::new(),
//! );
//!
//! runner.start(0);
//! runner.poll(350); // three periods elapsed at once
//! assert_eq!(ticks.get(), 3);
//! runner.stop(false);
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use core::fmt;

/// Configuration for an [`IntervalRunner`].
pub struct IntervalOptions {
    auto_start: bool,
    immediate: bool,
    self_correcting: bool,
    on_finish: Option<Box<dyn FnMut()>>,
}

impl IntervalOptions {
    /// Creates options with the conventional defaults: auto-start on mount,
    /// no immediate tick, self-correcting pacing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            auto_start: true,
            immediate: false,
            self_correcting: true,
            on_finish: None,
        }
    }

    /// Sets whether [`IntervalRunner::mount`] starts the runner. Default
    /// `true`.
    #[must_use]
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Sets whether starting fires one tick immediately. Default `false`.
    #[must_use]
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Sets whether pacing stays anchored to the start instant. Default
    /// `true`.
    #[must_use]
    pub fn self_correcting(mut self, self_correcting: bool) -> Self {
        self.self_correcting = self_correcting;
        self
    }

    /// Sets the callback fired when the runner is stopped with
    /// `trigger_finish`.
    #[must_use]
    pub fn on_finish(mut self, on_finish: impl FnMut() + 'static) -> Self {
        self.on_finish = Some(Box::new(on_finish));
        self
    }
}

impl Default for IntervalOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IntervalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalOptions")
            .field("auto_start", &self.auto_start)
            .field("immediate", &self.immediate)
            .field("self_correcting", &self.self_correcting)
            .finish_non_exhaustive()
    }
}

/// Pacing state while the runner is active.
struct Running {
    /// Start instant the self-correcting grid is anchored to.
    anchor: u64,
    /// Number of grid ticks already fired (self-correcting mode).
    fired: u64,
    /// Next deadline (re-anchoring mode).
    next: u64,
}

/// A repeating interval runner.
///
/// One tick callback, an optional finish callback, and explicit
/// start/stop/poll driven by host time. The tick callback receives the
/// number of periods it is being fired for — greater than one only in
/// self-correcting mode when polling lagged behind the grid.
pub struct IntervalRunner {
    period: u64,
    on_tick: Box<dyn FnMut(u32)>,
    options: IntervalOptions,
    running: Option<Running>,
}

impl IntervalRunner {
    /// Creates an inactive runner firing every `period` milliseconds.
    ///
    /// A zero period is treated as one millisecond.
    #[must_use]
    pub fn new(period: u64, on_tick: impl FnMut(u32) + 'static, options: IntervalOptions) -> Self {
        Self {
            period: period.max(1),
            on_tick: Box::new(on_tick),
            options,
            running: None,
        }
    }

    /// Returns `true` while the runner is ticking.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }

    /// The component-mount hook: starts the runner at `now` when
    /// auto-start is configured.
    pub fn mount(&mut self, now: u64) {
        if self.options.auto_start {
            self.start(now);
        }
    }

    /// Starts the runner at `now`. No-op while already active.
    ///
    /// With the `immediate` option set, one tick fires right away; the
    /// periodic grid still begins at `now`.
    pub fn start(&mut self, now: u64) {
        if self.running.is_some() {
            return;
        }
        self.running = Some(Running {
            anchor: now,
            fired: 0,
            next: now.saturating_add(self.period),
        });
        if self.options.immediate {
            (self.on_tick)(1);
        }
    }

    /// Advances time, firing any ticks due at `now`.
    pub fn poll(&mut self, now: u64) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        if self.options.self_correcting {
            let due = now.saturating_sub(running.anchor) / self.period;
            if due > running.fired {
                let ticks = due - running.fired;
                running.fired = due;
                (self.on_tick)(u32::try_from(ticks).unwrap_or(u32::MAX));
            }
        } else if now >= running.next {
            running.next = now.saturating_add(self.period);
            (self.on_tick)(1);
        }
    }

    /// Stops the runner, optionally firing the finish callback.
    ///
    /// No-op (including the finish callback) while inactive.
    pub fn stop(&mut self, trigger_finish: bool) {
        if self.running.take().is_none() {
            return;
        }
        if trigger_finish {
            if let Some(on_finish) = self.options.on_finish.as_mut() {
                on_finish();
            }
        }
    }

    /// The component-unmount hook: stops without firing the finish
    /// callback.
    pub fn unmount(&mut self) {
        self.stop(false);
    }
}

impl fmt::Debug for IntervalRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalRunner")
            .field("period", &self.period)
            .field("active", &self.running.is_some())
            .finish_non_exhaustive()
    }
}
