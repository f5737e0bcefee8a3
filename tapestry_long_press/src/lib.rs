// Copyright 2025 the Tapestry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tapestry_long_press --heading-base-level=0

//! Tapestry Long Press: a long-press gesture detector for component UIs.
//!
//! This crate classifies a stream of pointer/mouse/touch input events into
//! "press started", "press sustained to threshold", and "press cancelled"
//! (by early release, by movement, or by leaving the interactive area),
//! across heterogeneous input modalities arriving through one shared
//! binding surface.
//!
//! ## Design Philosophy
//!
//! Like the rest of Tapestry, the detector is:
//!
//! - **Host-driven**: no clocks, no spawned timers. Events carry millisecond
//!   timestamps, deadlines are settled against them, and hosts may
//!   [`poll`](binder::LongPress::poll) to fire the threshold between events.
//! - **Structurally tolerant**: events are classified by their declared kind
//!   string and structure, never by nominal type, so synthesized and
//!   cross-environment events work. Unrecognized events are silently
//!   ignored at every transition.
//! - **Framework-shaped at the edge only**: the core is a plain state
//!   machine ([`machine::PressMachine`]); the binder layer
//!   ([`binder::LongPress`]) adapts it into attachable handler bundles and
//!   owns the mount/unmount contract.
//!
//! ## Usage
//!
//! Construct a detector with the primary callback and options, bind a
//! handler bundle, attach it, and feed window-level releases through a
//! [`window::ReleaseHub`]:
//!
//! ```
//! use kurbo::Point;
//! use tapestry_event::InputEvent;
//! use tapestry_long_press::binder::{HandlerSlot, LongPress};
//! use tapestry_long_press::options::{Detect, LongPressOptions};
//! use tapestry_long_press::window::ReleaseHub;
//!
//! let mut hub = ReleaseHub::new();
//! let mut detector: LongPress<u32> = LongPress::new(
//!     Some(Box::new(|_event, meta| {
//!         assert_eq!(meta.context, Some(7));
//!     })),
//!     LongPressOptions::new().threshold(400).detect(Detect::Pointer),
//! );
//! detector.mount(&mut hub);
//!
//! let mut handlers = detector.bind_with(7);
//! let mut down = InputEvent::pointer("pointerdown", 1, Point::new(0.0, 0.0), 0);
//! handlers.invoke(HandlerSlot::PointerDown, &mut down);
//!
//! // The threshold elapses; the primary callback fires with context 7.
//! detector.poll(400);
//! assert!(detector.is_long_press_active());
//!
//! // The press is released outside the element: the window channel still
//! // terminates the cycle cleanly.
//! let mut up = InputEvent::pointer("pointerup", 1, Point::new(500.0, 500.0), 600);
//! hub.release(&mut up);
//! assert!(!detector.is_pressed());
//!
//! detector.unmount(&mut hub);
//! assert!(hub.is_empty());
//! ```
//!
//! ## Cancellation
//!
//! Exactly one of `on_finish` / `on_cancel` ends every completed press
//! cycle. The cancel path carries a
//! [`CancelReason`](machine::CancelReason): released before the threshold,
//! moved beyond the per-axis tolerance, or left the bound element. Movement
//! tolerance is axis-independent and boundary inclusive; see
//! [`options::CancelOnMovement`].
//!
//! ## Observability
//!
//! The [`trace`] module provides a minimal additive hook
//! ([`trace::PressTrace`]) notified at each transition, plus a recorder for
//! tests and debugging overlays. No behavior depends on it.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod binder;
pub mod machine;
pub mod options;
pub mod trace;
pub mod window;

pub use binder::{Handler, HandlerSet, HandlerSlot, LongPress};
pub use machine::{CallbackMeta, CancelReason, PressMachine, PressPhase};
pub use options::{
    CancelOnMovement, DEFAULT_MOVE_TOLERANCE, DEFAULT_THRESHOLD_MS, Detect, EventFilter,
    LongPressCallback, LongPressOptions,
};
pub use trace::{PressTrace, Transition, TransitionRecorder};
pub use window::{ReleaseHandler, ReleaseHub, SubscriptionId};
