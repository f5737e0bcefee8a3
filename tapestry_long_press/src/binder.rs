// Copyright 2025 the Tapestry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler binding: from a detector to the event-handler bundle a UI layer
//! attaches.
//!
//! [`LongPress`] wraps one [`PressMachine`](crate::machine::PressMachine)
//! behind a shared handle and produces [`HandlerSet`]s shaped by the
//! configured [`Detect`](crate::options::Detect) mode. Each handler is a
//! thin adapter into the machine's corresponding transition, threading
//! through the context captured at bind time.
//!
//! Binder calls are independent and may be repeated with different
//! contexts, but all bundles share the single underlying machine — there is
//! exactly one press cycle in flight per detector, not one per bind call.
//! Whichever bundle the host actually attaches (conventionally the most
//! recently bound one) supplies the context reported for that cycle. This
//! last-bound-wins behavior is a documented contract.
//!
//! Callbacks run while the detector's interior state is borrowed; invoking
//! the same detector's handlers from inside one of its callbacks is not
//! supported (the model is single-threaded and cooperative, see the crate
//! docs).
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use tapestry_event::InputEvent;
//! use tapestry_long_press::binder::{HandlerSlot, LongPress};
//! use tapestry_long_press::options::{Detect, LongPressOptions};
//!
//! let detector: LongPress<&'static str> = LongPress::new(
//!     Some(Box::new(|_event, meta| {
//!         assert_eq!(meta.context, Some("row-3"));
//!     })),
//!     LongPressOptions::new().detect(Detect::Pointer),
//! );
//!
//! let mut handlers = detector.bind_with("row-3");
//! let mut down = InputEvent::pointer("pointerdown", 1, Point::new(0.0, 0.0), 0);
//! handlers.invoke(HandlerSlot::PointerDown, &mut down);
//! detector.poll(400); // threshold elapses: the callback sees "row-3"
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use smallvec::SmallVec;

use tapestry_event::InputEvent;

use crate::machine::{CancelReason, PressMachine, PressPhase};
use crate::options::{Detect, LongPressCallback, LongPressOptions};
use crate::window::{ReleaseHub, SubscriptionId};

/// A bound event handler, ready for the UI layer to attach.
pub type Handler = Box<dyn FnMut(&mut InputEvent)>;

/// Names the element property a handler belongs on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HandlerSlot {
    /// `mousedown` on the bound element.
    MouseDown,
    /// `mousemove` on the bound element.
    MouseMove,
    /// `mouseup` on the bound element.
    MouseUp,
    /// `mouseleave` on the bound element.
    MouseLeave,
    /// `touchstart` on the bound element.
    TouchStart,
    /// `touchmove` on the bound element.
    TouchMove,
    /// `touchend` on the bound element.
    TouchEnd,
    /// `pointerdown` on the bound element.
    PointerDown,
    /// `pointermove` on the bound element.
    PointerMove,
    /// `pointerup` on the bound element.
    PointerUp,
    /// `pointerleave` on the bound element.
    PointerLeave,
}

/// A mapping from handler slots to bound handlers.
///
/// Shaped by the detect mode: start/move/stop handlers for every mode, plus
/// a leave handler for mouse and pointer modes when cancel-outside-element
/// is enabled. An empty set means the detector is disabled (no primary
/// callback was registered at bind time).
#[derive(Default)]
pub struct HandlerSet {
    handlers: SmallVec<[(HandlerSlot, Handler); 8]>,
}

impl HandlerSet {
    /// Creates an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` when the set carries no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Returns the number of handlers in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns the slots present in this set, in insertion order.
    pub fn slots(&self) -> impl Iterator<Item = HandlerSlot> + '_ {
        self.handlers.iter().map(|(slot, _)| *slot)
    }

    /// Returns `true` when a handler is bound for `slot`.
    #[must_use]
    pub fn contains(&self, slot: HandlerSlot) -> bool {
        self.handlers.iter().any(|(s, _)| *s == slot)
    }

    /// Invokes the handler bound for `slot`, if any.
    ///
    /// Returns `true` when a handler was present and ran.
    pub fn invoke(&mut self, slot: HandlerSlot, event: &mut InputEvent) -> bool {
        for (s, handler) in &mut self.handlers {
            if *s == slot {
                handler(event);
                return true;
            }
        }
        false
    }

    /// Removes and returns the handler bound for `slot`, for hosts that
    /// attach handlers by ownership.
    pub fn take(&mut self, slot: HandlerSlot) -> Option<Handler> {
        let index = self.handlers.iter().position(|(s, _)| *s == slot)?;
        Some(self.handlers.remove(index).1)
    }

    fn push(&mut self, slot: HandlerSlot, handler: Handler) {
        self.handlers.push((slot, handler));
    }
}

impl fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSet")
            .field("slots", &self.slots().collect::<SmallVec<[_; 8]>>())
            .finish_non_exhaustive()
    }
}

/// A long-press detector: one machine, any number of bound handler bundles.
///
/// Construct with the primary callback and options, then call
/// [`LongPress::bind`] (or [`LongPress::bind_with`]) to obtain the handler
/// bundle for the UI layer, and [`LongPress::mount`] /
/// [`LongPress::unmount`] around the hosting component's lifetime.
pub struct LongPress<C> {
    machine: Rc<RefCell<PressMachine<C>>>,
    subscription: Option<SubscriptionId>,
}

impl<C: Clone + 'static> LongPress<C> {
    /// Creates a detector.
    ///
    /// A `None` callback fully disables detection: every bind call returns
    /// an empty handler set until a callback is supplied via
    /// [`LongPress::set_callback`].
    #[must_use]
    pub fn new(callback: Option<LongPressCallback<C>>, options: LongPressOptions<C>) -> Self {
        Self {
            machine: Rc::new(RefCell::new(PressMachine::new(callback, options))),
            subscription: None,
        }
    }

    /// Replaces the primary callback without disturbing an in-flight press;
    /// a pending deadline will invoke the replacement.
    pub fn set_callback(&self, callback: Option<LongPressCallback<C>>) {
        self.machine.borrow_mut().set_callback(callback);
    }

    /// Binds a handler bundle with no context.
    #[must_use]
    pub fn bind(&self) -> HandlerSet {
        self.bind_inner(None)
    }

    /// Binds a handler bundle carrying `context`.
    ///
    /// All bundles share one machine, so the bundle the host actually
    /// attaches and invokes determines the context reported for a press
    /// cycle — the last bound-and-attached bundle wins.
    #[must_use]
    pub fn bind_with(&self, context: C) -> HandlerSet {
        self.bind_inner(Some(context))
    }

    /// Advances time, firing the threshold if due (see
    /// [`PressMachine::poll`](crate::machine::PressMachine::poll)).
    pub fn poll(&self, now: u64) {
        self.machine.borrow_mut().poll(now);
    }

    /// Returns the machine's current phase.
    #[must_use]
    pub fn phase(&self) -> PressPhase {
        self.machine.borrow().phase()
    }

    /// Returns `true` while a press cycle is in flight.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.machine.borrow().is_pressed()
    }

    /// Returns `true` once the threshold fired during the current press.
    #[must_use]
    pub fn is_long_press_active(&self) -> bool {
        self.machine.borrow().is_long_press_active()
    }

    /// Registers this detector on the window-level release channel.
    ///
    /// Idempotent: mounting while mounted does not double-register. A
    /// change of callback identity never re-registers either — the
    /// subscriber reads the freshest state through the shared machine.
    pub fn mount(&mut self, hub: &mut ReleaseHub) {
        if self.subscription.is_some() {
            return;
        }
        let machine = Rc::clone(&self.machine);
        let id = hub.subscribe(move |event| {
            // Window-synthesized releases carry no binder context.
            machine.borrow_mut().release(event, None, None);
        });
        self.subscription = Some(id);
    }

    /// Tears the detector down.
    ///
    /// Removes the window-level subscriber exactly once and unconditionally
    /// cancels the pending deadline, so a press in flight at unmount never
    /// produces the primary callback.
    pub fn unmount(&mut self, hub: &mut ReleaseHub) {
        if let Some(id) = self.subscription.take() {
            hub.unsubscribe(id);
        }
        self.machine.borrow_mut().unmount();
    }

    fn bind_inner(&self, context: Option<C>) -> HandlerSet {
        let (detect, leave_enabled) = {
            let machine = self.machine.borrow();
            // Checked per bind call: the callback may have changed since the
            // previous one without the detector being rebuilt.
            if !machine.has_callback() {
                return HandlerSet::empty();
            }
            let options = machine.options();
            (options.detect, options.cancel_outside_element)
        };

        let mut set = HandlerSet::empty();
        match detect {
            Detect::Mouse => self.push_mouse(&mut set, &context, leave_enabled),
            Detect::Touch => self.push_touch(&mut set, &context),
            Detect::Pointer => self.push_pointer(&mut set, &context, leave_enabled),
            Detect::Both => {
                // Union of the mouse and touch bundles over one machine;
                // whichever modality starts first wins the press cycle.
                self.push_mouse(&mut set, &context, leave_enabled);
                self.push_touch(&mut set, &context);
            }
        }
        set
    }

    fn push_mouse(&self, set: &mut HandlerSet, context: &Option<C>, leave_enabled: bool) {
        set.push(HandlerSlot::MouseDown, self.start_handler(context));
        set.push(HandlerSlot::MouseMove, self.move_handler(context));
        set.push(HandlerSlot::MouseUp, self.release_handler(context));
        if leave_enabled {
            set.push(HandlerSlot::MouseLeave, self.leave_handler(context));
        }
    }

    fn push_touch(&self, set: &mut HandlerSet, context: &Option<C>) {
        // Touch has no leave concept; no leave handler in this bundle.
        set.push(HandlerSlot::TouchStart, self.start_handler(context));
        set.push(HandlerSlot::TouchMove, self.move_handler(context));
        set.push(HandlerSlot::TouchEnd, self.release_handler(context));
    }

    fn push_pointer(&self, set: &mut HandlerSet, context: &Option<C>, leave_enabled: bool) {
        set.push(HandlerSlot::PointerDown, self.start_handler(context));
        set.push(HandlerSlot::PointerMove, self.move_handler(context));
        set.push(HandlerSlot::PointerUp, self.release_handler(context));
        if leave_enabled {
            set.push(HandlerSlot::PointerLeave, self.leave_handler(context));
        }
    }

    fn start_handler(&self, context: &Option<C>) -> Handler {
        let machine = Rc::clone(&self.machine);
        let context = context.clone();
        Box::new(move |event| machine.borrow_mut().start(event, context.clone()))
    }

    fn move_handler(&self, context: &Option<C>) -> Handler {
        let machine = Rc::clone(&self.machine);
        let context = context.clone();
        Box::new(move |event| machine.borrow_mut().movement(event, context.clone()))
    }

    fn release_handler(&self, context: &Option<C>) -> Handler {
        let machine = Rc::clone(&self.machine);
        let context = context.clone();
        Box::new(move |event| machine.borrow_mut().release(event, context.clone(), None))
    }

    fn leave_handler(&self, context: &Option<C>) -> Handler {
        let machine = Rc::clone(&self.machine);
        let context = context.clone();
        Box::new(move |event| {
            machine.borrow_mut().release(
                event,
                context.clone(),
                Some(CancelReason::CancelledOutsideElement),
            );
        })
    }
}

impl<C> fmt::Debug for LongPress<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongPress")
            .field("machine", &self.machine.borrow())
            .field("mounted", &self.subscription.is_some())
            .finish()
    }
}
