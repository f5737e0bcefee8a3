// Copyright 2025 the Tapestry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tapestry Event: input event model and classification for gesture detection.
//!
//! Gesture detectors consume heterogeneous input — mouse, touch, and pointer
//! events arriving through one shared binding surface, sometimes produced by
//! a real input device and sometimes synthesized by a test harness or a
//! cross-environment shim. This crate provides the owned event descriptor
//! those detectors share, plus the two leaf operations everything else is
//! built on:
//!
//! - [`InputEvent::classify`]: sort an event into the closed sum
//!   [`EventClass`] (`Mouse | Touch | Pointer | Unrecognized`) by inspecting
//!   its declared kind string first and its structure second — never by
//!   nominal type, because synthesized events have none.
//! - [`InputEvent::position`]: extract the 2D page coordinate relevant to
//!   movement math, handling the touch case's indirection through the touch
//!   list.
//!
//! Unrecognized events are a supported input, not an error: detectors treat
//! them as if they never occurred.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use tapestry_event::{EventClass, InputEvent, TouchPoint};
//!
//! let down = InputEvent::mouse("mousedown", Point::new(10.0, 20.0), 0);
//! assert_eq!(down.classify(), EventClass::Mouse);
//! assert_eq!(down.position(), Some(Point::new(10.0, 20.0)));
//!
//! // A foreign event with a non-standard kind still classifies structurally.
//! let touch = InputEvent::unlabeled(5)
//!     .with_touches(vec![TouchPoint::new(Point::new(1.0, 2.0))]);
//! assert_eq!(touch.classify(), EventClass::Touch);
//!
//! // And one with neither a known kind nor a telling structure is ignored.
//! assert_eq!(InputEvent::unlabeled(9).classify(), EventClass::Unrecognized);
//! ```
//!
//! ## Time
//!
//! Every event carries a host-supplied millisecond timestamp
//! ([`InputEvent::time_ms`]). Detectors never read a clock; deadlines are
//! computed from event time and settled against it.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use kurbo::Point;

/// Kind strings that classify as [`EventClass::Mouse`].
const MOUSE_KINDS: [&str; 4] = ["mousedown", "mousemove", "mouseup", "mouseleave"];
/// Kind strings that classify as [`EventClass::Touch`].
const TOUCH_KINDS: [&str; 4] = ["touchstart", "touchmove", "touchend", "touchcancel"];
/// Kind strings that classify as [`EventClass::Pointer`].
const POINTER_KINDS: [&str; 4] = ["pointerdown", "pointermove", "pointerup", "pointerleave"];

/// The input modality an event belongs to.
///
/// Produced by [`InputEvent::classify`]. `Unrecognized` is a deliberate
/// robustness guarantee against malformed or foreign event objects, not an
/// error condition; detectors silently ignore such events at every
/// transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventClass {
    /// A mouse event.
    Mouse,
    /// A touch event; positions live in the touch list.
    Touch,
    /// A pointer event.
    Pointer,
    /// Neither a known kind string nor a telling structure.
    Unrecognized,
}

/// One contact point in a touch event's touch list.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchPoint {
    /// Page position of the contact.
    pub position: Point,
}

impl TouchPoint {
    /// Creates a touch point at the given page position.
    #[must_use]
    pub const fn new(position: Point) -> Self {
        Self { position }
    }
}

/// An owned, opaque-ish input event descriptor.
///
/// This is the shape detectors accept from the hosting UI layer. It mirrors
/// the parts of a DOM-like event that matter for gesture detection: an
/// optional declared `kind` string (`"mousedown"`, `"touchstart"`, …), an
/// optional own page position, an optional touch list (whose *presence* is
/// distinct from its emptiness), an optional pointer id, and a host-supplied
/// millisecond timestamp.
///
/// Events may be synthesized freely — classification never relies on where
/// an event came from. The [`InputEvent::persist`] flag is the retention
/// hook for hosts that pool and recycle event objects; in hosts without
/// pooling it is a harmless no-op.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
    kind: Option<String>,
    position: Option<Point>,
    touches: Option<Vec<TouchPoint>>,
    pointer_id: Option<i32>,
    time_ms: u64,
    persisted: Cell<bool>,
}

impl InputEvent {
    /// Creates an event with a declared kind string and nothing else.
    pub fn new(kind: impl Into<String>, time_ms: u64) -> Self {
        Self {
            kind: Some(kind.into()),
            position: None,
            touches: None,
            pointer_id: None,
            time_ms,
            persisted: Cell::new(false),
        }
    }

    /// Creates an event with no declared kind, as a foreign or synthesized
    /// event might arrive.
    #[must_use]
    pub const fn unlabeled(time_ms: u64) -> Self {
        Self {
            kind: None,
            position: None,
            touches: None,
            pointer_id: None,
            time_ms,
            persisted: Cell::new(false),
        }
    }

    /// Convenience constructor for a mouse event at a page position.
    pub fn mouse(kind: impl Into<String>, position: Point, time_ms: u64) -> Self {
        Self::new(kind, time_ms).with_position(position)
    }

    /// Convenience constructor for a touch event with a touch list.
    pub fn touch(kind: impl Into<String>, touches: Vec<TouchPoint>, time_ms: u64) -> Self {
        Self::new(kind, time_ms).with_touches(touches)
    }

    /// Convenience constructor for a pointer event at a page position.
    pub fn pointer(kind: impl Into<String>, pointer_id: i32, position: Point, time_ms: u64) -> Self {
        Self::new(kind, time_ms)
            .with_position(position)
            .with_pointer_id(pointer_id)
    }

    /// Sets the event's own page position.
    #[must_use]
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    /// Attaches a touch list. Presence of a list (even an empty one) marks
    /// the event structurally as touch.
    #[must_use]
    pub fn with_touches(mut self, touches: Vec<TouchPoint>) -> Self {
        self.touches = Some(touches);
        self
    }

    /// Sets the pointer id, marking the event structurally as pointer.
    #[must_use]
    pub fn with_pointer_id(mut self, pointer_id: i32) -> Self {
        self.pointer_id = Some(pointer_id);
        self
    }

    /// Returns the declared kind string, if any.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Returns the host-supplied millisecond timestamp.
    #[must_use]
    pub const fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// Classifies this event into an input modality.
    ///
    /// The declared kind string is consulted first, against the standard
    /// mouse/touch/pointer kind tables. Events whose kind is absent or
    /// non-standard fall back to structural checks: a touch list present
    /// means [`EventClass::Touch`], a pointer id present means
    /// [`EventClass::Pointer`]. Anything else is
    /// [`EventClass::Unrecognized`].
    #[must_use]
    pub fn classify(&self) -> EventClass {
        if let Some(kind) = self.kind.as_deref() {
            if MOUSE_KINDS.contains(&kind) {
                return EventClass::Mouse;
            }
            if TOUCH_KINDS.contains(&kind) {
                return EventClass::Touch;
            }
            if POINTER_KINDS.contains(&kind) {
                return EventClass::Pointer;
            }
        }
        if self.touches.is_some() {
            return EventClass::Touch;
        }
        if self.pointer_id.is_some() {
            return EventClass::Pointer;
        }
        EventClass::Unrecognized
    }

    /// Returns `true` when [`InputEvent::classify`] is anything but
    /// [`EventClass::Unrecognized`].
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        self.classify() != EventClass::Unrecognized
    }

    /// Extracts the page position relevant to movement math.
    ///
    /// Touch events read the first entry of their touch list (`None` when
    /// the list is empty or absent). Mouse and pointer events return their
    /// own position. Unrecognized events have no position.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match self.classify() {
            EventClass::Touch => self.touches.as_ref()?.first().map(|t| t.position),
            EventClass::Mouse | EventClass::Pointer => self.position,
            EventClass::Unrecognized => None,
        }
    }

    /// Marks the event as retained.
    ///
    /// Hosts that pool and recycle event objects call this before any
    /// deferred use of the event; elsewhere it is a no-op flag.
    pub fn persist(&self) {
        self.persisted.set(true);
    }

    /// Returns `true` once [`InputEvent::persist`] has been called.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.persisted.get()
    }
}
