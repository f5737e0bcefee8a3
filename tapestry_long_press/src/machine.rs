// Copyright 2025 the Tapestry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The long-press state machine.
//!
//! [`PressMachine`] tracks one press cycle at a time through the phases
//! `Idle → Pressed → LongPressTriggered`, owns the single threshold
//! deadline, computes movement displacement against the recorded start
//! position, and invokes the four lifecycle callbacks plus the primary
//! long-press callback.
//!
//! The machine is host-driven: every transition consumes an event carrying a
//! millisecond timestamp, and the pending deadline is settled against that
//! timestamp before the transition proceeds. Hosts that want the long press
//! to fire at the exact threshold, without waiting for the next input event,
//! call [`PressMachine::poll`] as time advances.
//!
//! Events that fail classification are ignored at every transition — treated
//! as if they never occurred, never as an error.
//!
//! ## Minimal example
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::Point;
//! use tapestry_event::InputEvent;
//! use tapestry_long_press::machine::PressMachine;
//! use tapestry_long_press::options::LongPressOptions;
//!
//! let fired = Rc::new(Cell::new(false));
//! let seen = fired.clone();
//! let mut machine: PressMachine<()> = PressMachine::new(
//!     Some(Box::new(move |_event, _meta| seen.set(true))),
//!     LongPressOptions::new().threshold(400),
//! );
//!
//! let mut down = InputEvent::pointer("pointerdown", 1, Point::new(0.0, 0.0), 0);
//! machine.start(&mut down, None);
//! machine.poll(400);
//! assert!(fired.get());
//! ```

use kurbo::Point;

use tapestry_event::InputEvent;
use tapestry_timing::OneShot;

use crate::options::{LongPressCallback, LongPressOptions};

/// Where the machine is within a press cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PressPhase {
    /// No press in flight.
    #[default]
    Idle,
    /// A recognized start event arrived; the threshold deadline is pending.
    Pressed,
    /// The deadline elapsed and the primary callback fired.
    LongPressTriggered,
}

/// Why a press ended without counting as a long press.
///
/// This is a semantic classification of a non-exceptional outcome, not an
/// error taxonomy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// Movement exceeded the configured tolerance before the threshold.
    CancelledByMovement,
    /// The press was released before the threshold elapsed.
    CancelledByRelease,
    /// The pointer left the bound element before the threshold.
    CancelledOutsideElement,
}

/// Per-invocation metadata passed to every lifecycle callback.
///
/// `reason` is populated only on the cancel path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackMeta<C> {
    /// The caller-defined value supplied when the handlers were bound.
    pub context: Option<C>,
    /// Why the press was cancelled, on the cancel path.
    pub reason: Option<CancelReason>,
}

impl<C> CallbackMeta<C> {
    /// Metadata carrying only a context.
    #[must_use]
    pub fn with_context(context: Option<C>) -> Self {
        Self {
            context,
            reason: None,
        }
    }

    /// Metadata for the cancel path.
    #[must_use]
    pub fn cancelled(context: Option<C>, reason: CancelReason) -> Self {
        Self {
            context,
            reason: Some(reason),
        }
    }
}

/// The start event and context recorded for the deferred long-press fire.
struct PendingPress<C> {
    event: InputEvent,
    context: Option<C>,
}

/// The long-press detection state machine.
///
/// One instance per bound UI element; it is reset (not destroyed) at the end
/// of every press cycle. The primary callback lives in a mutable slot read
/// at fire time, so replacing it mid-press via
/// [`PressMachine::set_callback`] takes effect without re-arming the
/// deadline.
pub struct PressMachine<C> {
    phase: PressPhase,
    start_position: Option<Point>,
    pending: Option<PendingPress<C>>,
    timer: OneShot,
    callback: Option<LongPressCallback<C>>,
    options: LongPressOptions<C>,
}

impl<C: Clone> PressMachine<C> {
    /// Creates a machine with the given primary callback and options.
    ///
    /// A `None` callback is a supported configuration: the machine still
    /// tracks presses, but nothing fires at the threshold and the press
    /// always ends on the cancel path.
    #[must_use]
    pub fn new(callback: Option<LongPressCallback<C>>, options: LongPressOptions<C>) -> Self {
        Self {
            phase: PressPhase::Idle,
            start_position: None,
            pending: None,
            timer: OneShot::new(),
            callback,
            options,
        }
    }

    /// Replaces the primary callback.
    ///
    /// The freshest callback is the one a pending deadline will invoke; an
    /// in-flight press and its armed deadline are left undisturbed.
    pub fn set_callback(&mut self, callback: Option<LongPressCallback<C>>) {
        self.callback = callback;
    }

    /// Returns `true` while a primary callback is registered.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> PressPhase {
        self.phase
    }

    /// Returns `true` between a recognized start event and its terminating
    /// event.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.phase != PressPhase::Idle
    }

    /// Returns `true` once the threshold fired during the current press.
    #[must_use]
    pub fn is_long_press_active(&self) -> bool {
        self.phase == PressPhase::LongPressTriggered
    }

    pub(crate) fn options(&self) -> &LongPressOptions<C> {
        &self.options
    }

    /// Begins a press cycle.
    ///
    /// No-op when a press is already in flight (rapid duplicate starts must
    /// not restart the deadline or re-invoke `on_start`), when the event is
    /// unrecognized, or when the configured filter rejects the event.
    pub fn start(&mut self, event: &mut InputEvent, context: Option<C>) {
        if self.is_pressed() {
            return;
        }
        if !event.is_recognized() {
            return;
        }
        if let Some(filter) = self.options.filter_events.as_mut() {
            if !filter(event) {
                return;
            }
        }
        if self.options.capture_event {
            event.persist();
        }

        let meta = CallbackMeta::with_context(context.clone());
        if let Some(on_start) = self.options.on_start.as_mut() {
            on_start(event, &meta);
        }

        // Position is read after `on_start`, which may have adjusted it.
        self.start_position = event.position();
        self.phase = PressPhase::Pressed;
        let deadline = event.time_ms().saturating_add(self.options.threshold);
        self.pending = Some(PendingPress {
            event: event.clone(),
            context,
        });
        self.timer.arm(deadline);

        if let Some(trace) = self.options.trace.as_mut() {
            trace.started();
            trace.armed(deadline);
        }
    }

    /// Processes a move event.
    ///
    /// `on_move` is invoked before any cancellation math, so it may adjust
    /// the event's position. When movement cancellation is configured and a
    /// start position exists, per-axis displacement strictly exceeding the
    /// tolerance on either axis routes into the cancel path with
    /// [`CancelReason::CancelledByMovement`].
    pub fn movement(&mut self, event: &mut InputEvent, context: Option<C>) {
        if !event.is_recognized() {
            return;
        }
        self.settle(event.time_ms());

        let meta = CallbackMeta::with_context(context.clone());
        if let Some(on_move) = self.options.on_move.as_mut() {
            on_move(event, &meta);
        }

        let Some(tolerance) = self.options.cancel_on_movement.tolerance() else {
            return;
        };
        let Some(start) = self.start_position else {
            return;
        };
        let Some(current) = event.position() else {
            return;
        };

        let moved = current - start;
        if moved.x.abs() > tolerance || moved.y.abs() > tolerance {
            self.release(event, context, Some(CancelReason::CancelledByMovement));
        }
    }

    /// Ends the press cycle.
    ///
    /// Exactly one of `on_finish` (threshold had fired) or `on_cancel`
    /// (with `reason`, defaulting to [`CancelReason::CancelledByRelease`])
    /// is invoked per completed cycle. Terminating when idle is a no-op,
    /// which makes duplicate release events harmless.
    pub fn release(&mut self, event: &mut InputEvent, context: Option<C>, reason: Option<CancelReason>) {
        if !event.is_recognized() {
            return;
        }
        self.settle(event.time_ms());
        if !self.is_pressed() {
            return;
        }

        self.start_position = None;
        if self.options.capture_event {
            event.persist();
        }

        if self.phase == PressPhase::LongPressTriggered {
            let meta = CallbackMeta::with_context(context);
            if let Some(on_finish) = self.options.on_finish.as_mut() {
                on_finish(event, &meta);
            }
            if let Some(trace) = self.options.trace.as_mut() {
                trace.finished();
            }
        } else {
            let reason = reason.unwrap_or(CancelReason::CancelledByRelease);
            let meta = CallbackMeta::cancelled(context, reason);
            if let Some(on_cancel) = self.options.on_cancel.as_mut() {
                on_cancel(event, &meta);
            }
            if let Some(trace) = self.options.trace.as_mut() {
                trace.cancelled(reason);
            }
        }

        self.phase = PressPhase::Idle;
        self.pending = None;
        self.timer.cancel();
    }

    /// Advances the machine's notion of time, firing the threshold if due.
    ///
    /// Transitions that consume events settle the deadline themselves from
    /// the event timestamp; `poll` exists for hosts that want the primary
    /// callback to fire at the exact threshold between input events.
    pub fn poll(&mut self, now: u64) {
        self.settle(now);
    }

    /// Tears the machine down.
    ///
    /// Cancels the deadline unconditionally and resets to idle: a press in
    /// flight at unmount never produces the primary callback, even if time
    /// later advances past the threshold.
    pub fn unmount(&mut self) {
        self.timer.cancel();
        self.phase = PressPhase::Idle;
        self.start_position = None;
        self.pending = None;
        if let Some(trace) = self.options.trace.as_mut() {
            trace.unmounted();
        }
    }

    /// Fires the deadline if it is due at `now`.
    ///
    /// The primary callback receives the recorded start event and context,
    /// but is read from the mutable slot at fire time — not captured when
    /// the deadline was armed. The triggered phase is entered only when a
    /// callback was actually present to fire.
    fn settle(&mut self, now: u64) {
        if !self.timer.fire(now) {
            return;
        }
        if self.phase != PressPhase::Pressed {
            return;
        }
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if let Some(callback) = self.callback.as_mut() {
            let meta = CallbackMeta::with_context(pending.context.clone());
            callback(&mut pending.event, &meta);
            self.phase = PressPhase::LongPressTriggered;
            if let Some(trace) = self.options.trace.as_mut() {
                trace.fired();
            }
        }
    }
}

impl<C> core::fmt::Debug for PressMachine<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PressMachine")
            .field("phase", &self.phase)
            .field("start_position", &self.start_position)
            .field("timer", &self.timer)
            .field("has_callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use kurbo::Point;
    use tapestry_event::{InputEvent, TouchPoint};

    use super::*;
    use crate::options::{CancelOnMovement, LongPressOptions};
    use crate::trace::{Transition, TransitionRecorder};

    fn counting_machine(
        options: LongPressOptions<u32>,
    ) -> (PressMachine<u32>, Rc<Cell<u32>>) {
        let fires = Rc::new(Cell::new(0));
        let seen = fires.clone();
        let machine = PressMachine::new(
            Some(Box::new(move |_event, _meta| seen.set(seen.get() + 1))),
            options,
        );
        (machine, fires)
    }

    fn down(t: u64) -> InputEvent {
        InputEvent::pointer("pointerdown", 1, Point::new(0.0, 0.0), t)
    }

    fn up(t: u64) -> InputEvent {
        InputEvent::pointer("pointerup", 1, Point::new(0.0, 0.0), t)
    }

    fn pointer_move(x: f64, y: f64, t: u64) -> InputEvent {
        InputEvent::pointer("pointermove", 1, Point::new(x, y), t)
    }

    #[test]
    fn early_release_cancels_without_primary() {
        let cancels = Rc::new(RefCell::new(Vec::new()));
        let log = cancels.clone();
        let (mut machine, fires) = counting_machine(
            LongPressOptions::new().on_cancel(move |_event, meta| {
                log.borrow_mut().push(meta.reason);
            }),
        );

        machine.start(&mut down(0), None);
        assert!(machine.is_pressed());
        machine.release(&mut up(100), None, None);

        assert_eq!(fires.get(), 0);
        assert_eq!(
            *cancels.borrow(),
            [Some(CancelReason::CancelledByRelease)]
        );
        assert_eq!(machine.phase(), PressPhase::Idle);
    }

    #[test]
    fn sustained_press_fires_then_finishes() {
        let finishes = Rc::new(Cell::new(0));
        let seen = finishes.clone();
        let (mut machine, fires) = counting_machine(
            LongPressOptions::new()
                .threshold(1000)
                .on_finish(move |_event, _meta| seen.set(seen.get() + 1)),
        );

        machine.start(&mut down(0), None);
        machine.poll(999);
        assert_eq!(fires.get(), 0);
        machine.poll(1000);
        assert_eq!(fires.get(), 1);
        assert!(machine.is_long_press_active());

        machine.release(&mut up(1200), None, None);
        assert_eq!(finishes.get(), 1);
        assert_eq!(fires.get(), 1);
    }

    #[test]
    fn late_release_settles_the_deadline_first() {
        // threshold=1000, start at t=0, stop at t=5000: the deadline fires
        // once at its own time, then the release finishes.
        let order = Rc::new(RefCell::new(Vec::new()));
        let fire_log = order.clone();
        let finish_log = order.clone();
        let mut machine: PressMachine<u32> = PressMachine::new(
            Some(Box::new(move |_event, _meta| {
                fire_log.borrow_mut().push("fired");
            })),
            LongPressOptions::new()
                .threshold(1000)
                .on_finish(move |_event, _meta| finish_log.borrow_mut().push("finished")),
        );

        machine.start(&mut down(0), None);
        machine.release(&mut up(5000), None, None);

        assert_eq!(*order.borrow(), ["fired", "finished"]);
    }

    #[test]
    fn duplicate_starts_do_not_restart() {
        let starts = Rc::new(Cell::new(0));
        let seen = starts.clone();
        let (mut machine, fires) = counting_machine(
            LongPressOptions::new()
                .threshold(400)
                .on_start(move |_event, _meta| seen.set(seen.get() + 1)),
        );

        machine.start(&mut down(0), None);
        machine.start(&mut down(300), None);
        machine.start(&mut down(390), None);
        assert_eq!(starts.get(), 1);

        // Had the later starts re-armed the deadline, t=400 would be early.
        machine.poll(400);
        assert_eq!(fires.get(), 1);
    }

    #[test]
    fn duplicate_releases_are_no_ops() {
        let cancels = Rc::new(Cell::new(0));
        let seen = cancels.clone();
        let (mut machine, _fires) = counting_machine(
            LongPressOptions::new().on_cancel(move |_event, _meta| seen.set(seen.get() + 1)),
        );

        machine.start(&mut down(0), None);
        machine.release(&mut up(50), None, None);
        machine.release(&mut up(51), None, None);
        machine.release(&mut up(52), None, None);
        assert_eq!(cancels.get(), 1);
    }

    #[test]
    fn unrecognized_events_are_ignored_everywhere() {
        let moves = Rc::new(Cell::new(0));
        let seen = moves.clone();
        let (mut machine, fires) = counting_machine(
            LongPressOptions::new().on_move(move |_event, _meta| seen.set(seen.get() + 1)),
        );

        let mut foreign = InputEvent::new("click", 0);
        machine.start(&mut foreign, None);
        assert!(!machine.is_pressed());

        machine.start(&mut down(0), None);
        let mut foreign_move = InputEvent::new("click", 100);
        machine.movement(&mut foreign_move, None);
        assert_eq!(moves.get(), 0, "on_move must not fire for foreign events");

        let mut foreign_up = InputEvent::unlabeled(200);
        machine.release(&mut foreign_up, None, None);
        assert!(machine.is_pressed(), "foreign release must not end the press");

        machine.poll(400);
        assert_eq!(fires.get(), 1);
    }

    #[test]
    fn filtered_events_abort_silently() {
        let starts = Rc::new(Cell::new(0));
        let seen = starts.clone();
        let (mut machine, fires) = counting_machine(
            LongPressOptions::new()
                .filter_events(|event| event.kind() != Some("mousedown"))
                .on_start(move |_event, _meta| seen.set(seen.get() + 1)),
        );

        let mut rejected = InputEvent::mouse("mousedown", Point::new(0.0, 0.0), 0);
        machine.start(&mut rejected, None);
        assert!(!machine.is_pressed());
        assert_eq!(starts.get(), 0);
        machine.poll(10_000);
        assert_eq!(fires.get(), 0);
    }

    #[test]
    fn movement_tolerance_boundary_is_inclusive() {
        let cancels = Rc::new(RefCell::new(Vec::new()));
        let log = cancels.clone();
        let (mut machine, _fires) = counting_machine(
            LongPressOptions::new()
                .cancel_on_movement(CancelOnMovement::Within(10.0))
                .on_cancel(move |_event, meta| log.borrow_mut().push(meta.reason)),
        );

        machine.start(&mut down(0), None);
        machine.movement(&mut pointer_move(10.0, 10.0, 100), None);
        assert!(machine.is_pressed(), "displacement at the tolerance stays");

        machine.movement(&mut pointer_move(11.0, 10.0, 150), None);
        assert!(!machine.is_pressed());
        assert_eq!(
            *cancels.borrow(),
            [Some(CancelReason::CancelledByMovement)]
        );
    }

    #[test]
    fn default_tolerance_applies_when_enabled() {
        let (mut machine, _fires) = counting_machine(
            LongPressOptions::new().cancel_on_movement(CancelOnMovement::Enabled),
        );

        machine.start(&mut down(0), None);
        machine.movement(&mut pointer_move(25.0, 0.0, 100), None);
        assert!(machine.is_pressed());
        machine.movement(&mut pointer_move(0.0, 26.0, 150), None);
        assert!(!machine.is_pressed());
    }

    #[test]
    fn on_move_may_adjust_position_before_the_math() {
        // The callback pins the event back to the origin, so movement never
        // exceeds tolerance.
        let (mut machine, fires) = counting_machine(
            LongPressOptions::new()
                .cancel_on_movement(CancelOnMovement::Within(5.0))
                .on_move(|event, _meta| {
                    *event = InputEvent::pointer(
                        "pointermove",
                        1,
                        Point::new(0.0, 0.0),
                        event.time_ms(),
                    );
                }),
        );

        machine.start(&mut down(0), None);
        machine.movement(&mut pointer_move(500.0, 500.0, 100), None);
        assert!(machine.is_pressed());
        machine.poll(400);
        assert_eq!(fires.get(), 1);
    }

    #[test]
    fn freshest_callback_wins_at_fire_time() {
        let (mut machine, stale_fires) = counting_machine(LongPressOptions::new());
        let fresh_fires = Rc::new(Cell::new(0));
        let seen = fresh_fires.clone();

        machine.start(&mut down(0), None);
        machine.set_callback(Some(Box::new(move |_event, _meta| {
            seen.set(seen.get() + 1);
        })));
        machine.poll(400);

        assert_eq!(stale_fires.get(), 0);
        assert_eq!(fresh_fires.get(), 1);
    }

    #[test]
    fn callback_removed_before_fire_means_cancel_on_release() {
        let cancels = Rc::new(Cell::new(0));
        let seen = cancels.clone();
        let (mut machine, fires) = counting_machine(
            LongPressOptions::new().on_cancel(move |_event, _meta| seen.set(seen.get() + 1)),
        );

        machine.start(&mut down(0), None);
        machine.set_callback(None);
        machine.poll(1000);
        assert_eq!(fires.get(), 0);
        assert!(!machine.is_long_press_active());

        machine.release(&mut up(1100), None, None);
        assert_eq!(cancels.get(), 1);
    }

    #[test]
    fn capture_event_persists_start_and_release() {
        let (mut machine, _fires) =
            counting_machine(LongPressOptions::new().capture_event(true));

        let mut start = down(0);
        machine.start(&mut start, None);
        assert!(start.is_persisted());

        let mut release = up(50);
        machine.release(&mut release, None, None);
        assert!(release.is_persisted());
    }

    #[test]
    fn unmount_mid_press_suppresses_the_primary_callback() {
        let (mut machine, fires) = counting_machine(LongPressOptions::new().threshold(400));

        machine.start(&mut down(0), None);
        machine.unmount();
        machine.poll(10_000);
        assert_eq!(fires.get(), 0);
        assert_eq!(machine.phase(), PressPhase::Idle);
    }

    #[test]
    fn touch_events_drive_the_same_cycle() {
        let (mut machine, fires) = counting_machine(LongPressOptions::new());

        let mut start = InputEvent::touch(
            "touchstart",
            vec![TouchPoint::new(Point::new(5.0, 5.0))],
            0,
        );
        machine.start(&mut start, None);
        machine.poll(400);
        assert_eq!(fires.get(), 1);

        let mut end = InputEvent::touch("touchend", vec![], 450);
        machine.release(&mut end, None, None);
        assert_eq!(machine.phase(), PressPhase::Idle);
    }

    #[test]
    fn trace_records_the_cycle() {
        let recorder = TransitionRecorder::new();
        let (mut machine, _fires) = counting_machine(
            LongPressOptions::new()
                .threshold(400)
                .trace(recorder.clone()),
        );

        machine.start(&mut down(0), None);
        machine.poll(400);
        machine.release(&mut up(500), None, None);
        machine.unmount();

        assert_eq!(
            recorder.transitions(),
            vec![
                Transition::Started,
                Transition::Armed { deadline: 400 },
                Transition::Fired,
                Transition::Finished,
                Transition::Unmounted,
            ]
        );
    }
}
