// Copyright 2025 the Tapestry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window-level release channel.
//!
//! A press can end away from the element it started on — the pointer slides
//! off and releases elsewhere, or a device quirk swallows the element-level
//! release. Relying on the bound element's handlers alone would leak an
//! armed deadline. [`ReleaseHub`] models the "released anywhere" channel as
//! an explicit observer registry the host owns: the host feeds every
//! window-level `mouseup`/`touchend`/`pointerup` into
//! [`ReleaseHub::release`], and each subscriber routes it into its own
//! detector's release transition.
//!
//! This is a second, independent input channel feeding the same state
//! machine, not a special case: a release that already happened at the
//! element level leaves the machine idle, and the window-level copy is then
//! an idempotent no-op.
//!
//! Subscription and removal are symmetric; see
//! [`LongPress::mount`](crate::binder::LongPress::mount) and
//! [`LongPress::unmount`](crate::binder::LongPress::unmount).

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use tapestry_event::InputEvent;

/// Identifies one subscriber within a [`ReleaseHub`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A subscriber callback receiving window-level release events.
pub type ReleaseHandler = Box<dyn FnMut(&mut InputEvent)>;

/// An observer registry for window-level release events.
///
/// The host owns one hub per window-like event target and is responsible
/// for feeding release events into it. Subscribers are invoked in
/// registration order. Window-synthesized releases carry no binder context;
/// detectors report `context: None` for them.
#[derive(Default)]
pub struct ReleaseHub {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, ReleaseHandler)>,
}

impl ReleaseHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber and returns its id.
    pub fn subscribe(&mut self, handler: impl FnMut(&mut InputEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Removes a subscriber.
    ///
    /// Returns `true` if the id was registered. Removing twice returns
    /// `false` the second time, which keeps teardown symmetric.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Dispatches a window-level release event to every subscriber, in
    /// registration order.
    pub fn release(&mut self, event: &mut InputEvent) {
        for (_, handler) in &mut self.subscribers {
            handler(event);
        }
    }

    /// Returns the number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` when no subscribers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for ReleaseHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseHub")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    #[test]
    fn dispatches_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut hub = ReleaseHub::new();

        for label in ["first", "second", "third"] {
            let log = order.clone();
            hub.subscribe(move |_event| log.borrow_mut().push(label));
        }

        let mut event = InputEvent::new("pointerup", 0);
        hub.release(&mut event);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_is_exact_and_idempotent() {
        let hits = Rc::new(RefCell::new(0_u32));
        let mut hub = ReleaseHub::new();

        let log = hits.clone();
        let id = hub.subscribe(move |_event| *log.borrow_mut() += 1);
        assert_eq!(hub.subscriber_count(), 1);

        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        assert!(hub.is_empty());

        let mut event = InputEvent::new("mouseup", 0);
        hub.release(&mut event);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut hub = ReleaseHub::new();
        let a = hub.subscribe(|_event| {});
        assert!(hub.unsubscribe(a));
        let b = hub.subscribe(|_event| {});
        assert_ne!(a, b);
    }
}
