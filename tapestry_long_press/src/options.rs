// Copyright 2025 the Tapestry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detector configuration.
//!
//! [`LongPressOptions`] is a small builder: construct it, chain the settings
//! you care about, and hand it to
//! [`PressMachine::new`](crate::machine::PressMachine::new) or
//! [`LongPress::new`](crate::binder::LongPress::new). Only the selected
//! options change behavior; everything defaults to the conventional values
//! (400 ms threshold, pointer detection, no movement cancellation, cancel
//! when leaving the element).

use alloc::boxed::Box;

use tapestry_event::InputEvent;

use crate::machine::CallbackMeta;
use crate::trace::PressTrace;

/// Default press threshold in milliseconds.
pub const DEFAULT_THRESHOLD_MS: u64 = 400;

/// Default per-axis movement tolerance, used when movement cancellation is
/// enabled without an explicit tolerance.
pub const DEFAULT_MOVE_TOLERANCE: f64 = 25.0;

/// A lifecycle callback: receives the event and the per-invocation metadata.
///
/// The event is mutable for the same reason the responder-chain idiom
/// threads a mutable payload through handlers: `on_start` and `on_move` are
/// allowed to adjust the event's position before the machine reads it for
/// movement math.
pub type LongPressCallback<C> = Box<dyn FnMut(&mut InputEvent, &CallbackMeta<C>)>;

/// A predicate deciding whether an incoming event may start a press.
///
/// Returning `false` aborts the start transition silently; no callbacks
/// fire. Useful for e.g. ignoring right mouse buttons.
pub type EventFilter = Box<dyn FnMut(&InputEvent) -> bool>;

/// Which input modality or modalities the detector listens for.
///
/// This shapes the handler set the binder returns; it does not change the
/// machine's transition rules.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Detect {
    /// Mouse events only.
    Mouse,
    /// Touch events only.
    Touch,
    /// Pointer events only.
    #[default]
    Pointer,
    /// Mouse and touch handlers wired to the same machine, first start wins.
    Both,
}

/// Whether (and how far) movement cancels a press in flight.
///
/// Tolerance is per-axis and boundary inclusive: a displacement exactly at
/// the tolerance does not cancel; strictly exceeding it on either axis does.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum CancelOnMovement {
    /// Movement never cancels a press.
    #[default]
    Off,
    /// Cancel on movement beyond [`DEFAULT_MOVE_TOLERANCE`].
    Enabled,
    /// Cancel on movement beyond the given per-axis tolerance.
    Within(f64),
}

impl CancelOnMovement {
    /// Returns the effective tolerance, or `None` when movement
    /// cancellation is off.
    #[must_use]
    pub fn tolerance(self) -> Option<f64> {
        match self {
            Self::Off => None,
            Self::Enabled => Some(DEFAULT_MOVE_TOLERANCE),
            Self::Within(tolerance) => Some(tolerance),
        }
    }
}

/// Configuration for a long-press detector.
///
/// # Example
///
/// ```
/// use tapestry_long_press::options::{CancelOnMovement, Detect, LongPressOptions};
///
/// let options: LongPressOptions<u32> = LongPressOptions::new()
///     .threshold(1000)
///     .detect(Detect::Mouse)
///     .cancel_on_movement(CancelOnMovement::Within(10.0))
///     .on_cancel(|_event, meta| {
///         let _ = meta.reason;
///     });
/// ```
pub struct LongPressOptions<C> {
    pub(crate) threshold: u64,
    pub(crate) capture_event: bool,
    pub(crate) detect: Detect,
    pub(crate) cancel_on_movement: CancelOnMovement,
    pub(crate) cancel_outside_element: bool,
    pub(crate) filter_events: Option<EventFilter>,
    pub(crate) on_start: Option<LongPressCallback<C>>,
    pub(crate) on_move: Option<LongPressCallback<C>>,
    pub(crate) on_finish: Option<LongPressCallback<C>>,
    pub(crate) on_cancel: Option<LongPressCallback<C>>,
    pub(crate) trace: Option<Box<dyn PressTrace>>,
}

impl<C> LongPressOptions<C> {
    /// Creates options with the conventional defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD_MS,
            capture_event: false,
            detect: Detect::default(),
            cancel_on_movement: CancelOnMovement::default(),
            cancel_outside_element: true,
            filter_events: None,
            on_start: None,
            on_move: None,
            on_finish: None,
            on_cancel: None,
            trace: None,
        }
    }

    /// Sets how long a press must be sustained, in milliseconds, before it
    /// counts as a long press. Default 400.
    #[must_use]
    pub fn threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets whether events are persisted (see
    /// [`InputEvent::persist`](tapestry_event::InputEvent::persist)) before
    /// any deferred use. Default `false`.
    #[must_use]
    pub fn capture_event(mut self, capture_event: bool) -> Self {
        self.capture_event = capture_event;
        self
    }

    /// Sets which input modality the binder produces handlers for. Default
    /// [`Detect::Pointer`].
    #[must_use]
    pub fn detect(mut self, detect: Detect) -> Self {
        self.detect = detect;
        self
    }

    /// Sets the movement-cancellation policy. Default
    /// [`CancelOnMovement::Off`].
    #[must_use]
    pub fn cancel_on_movement(mut self, cancel_on_movement: CancelOnMovement) -> Self {
        self.cancel_on_movement = cancel_on_movement;
        self
    }

    /// Sets whether leaving the bound element cancels the press (mouse and
    /// pointer modes only; touch has no leave concept). Default `true`.
    #[must_use]
    pub fn cancel_outside_element(mut self, cancel_outside_element: bool) -> Self {
        self.cancel_outside_element = cancel_outside_element;
        self
    }

    /// Sets a predicate filtering which events may start a press.
    #[must_use]
    pub fn filter_events(mut self, filter: impl FnMut(&InputEvent) -> bool + 'static) -> Self {
        self.filter_events = Some(Box::new(filter));
        self
    }

    /// Sets the callback invoked when a press starts.
    #[must_use]
    pub fn on_start(
        mut self,
        on_start: impl FnMut(&mut InputEvent, &CallbackMeta<C>) + 'static,
    ) -> Self {
        self.on_start = Some(Box::new(on_start));
        self
    }

    /// Sets the callback invoked on every move event.
    #[must_use]
    pub fn on_move(
        mut self,
        on_move: impl FnMut(&mut InputEvent, &CallbackMeta<C>) + 'static,
    ) -> Self {
        self.on_move = Some(Box::new(on_move));
        self
    }

    /// Sets the callback invoked when a triggered press is released.
    #[must_use]
    pub fn on_finish(
        mut self,
        on_finish: impl FnMut(&mut InputEvent, &CallbackMeta<C>) + 'static,
    ) -> Self {
        self.on_finish = Some(Box::new(on_finish));
        self
    }

    /// Sets the callback invoked when a press ends before triggering; its
    /// metadata carries the [`CancelReason`](crate::machine::CancelReason).
    #[must_use]
    pub fn on_cancel(
        mut self,
        on_cancel: impl FnMut(&mut InputEvent, &CallbackMeta<C>) + 'static,
    ) -> Self {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }

    /// Attaches a transition trace sink (see [`crate::trace`]).
    #[must_use]
    pub fn trace(mut self, trace: impl PressTrace + 'static) -> Self {
        self.trace = Some(Box::new(trace));
        self
    }
}

impl<C> Default for LongPressOptions<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> core::fmt::Debug for LongPressOptions<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LongPressOptions")
            .field("threshold", &self.threshold)
            .field("capture_event", &self.capture_event)
            .field("detect", &self.detect)
            .field("cancel_on_movement", &self.cancel_on_movement)
            .field("cancel_outside_element", &self.cancel_outside_element)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let options: LongPressOptions<()> = LongPressOptions::new();
        assert_eq!(options.threshold, DEFAULT_THRESHOLD_MS);
        assert!(!options.capture_event);
        assert_eq!(options.detect, Detect::Pointer);
        assert_eq!(options.cancel_on_movement, CancelOnMovement::Off);
        assert!(options.cancel_outside_element);
        assert!(options.filter_events.is_none());
    }

    #[test]
    fn movement_tolerance_resolution() {
        assert_eq!(CancelOnMovement::Off.tolerance(), None);
        assert_eq!(
            CancelOnMovement::Enabled.tolerance(),
            Some(DEFAULT_MOVE_TOLERANCE)
        );
        assert_eq!(CancelOnMovement::Within(10.0).tolerance(), Some(10.0));
    }
}
