//! Guarded event handlers.
//!
//! A [`Handle`] pairs a callback with an optional event kind and an ordered
//! list of guard predicates. Objects that own handles implement [`Target`]
//! and dispatch events to every handle in registration order:
//!
//! 1. A handle bound to a kind skips events of any other kind.
//! 2. Guards run in order; the first `false` skips the handle.
//! 3. Otherwise the callback runs.
//!
//! A skipped handle never stops later handles from running.
//!
//! # Example
//!
//! ```
//! use lattice_inventory::prelude::*;
//!
//! let left_clicks = Handle::<IconEvent>::of(|event: &mut ClickEvent| {
//!     event.allow();
//! })
//! .when(|event: &ClickEvent| event.click_type().is_left_click());
//!
//! assert_eq!(left_clicks.kind(), Some(IconEventKind::Click));
//! ```

use std::fmt;

/// An event type that can be routed to [`Handle`]s.
pub trait RoutedEvent: 'static {
    /// Discriminator of the event's variants.
    type Kind: Copy + Eq + fmt::Debug + Send + Sync + 'static;

    /// The variant this event holds.
    fn kind(&self) -> Self::Kind;
}

/// One variant of a routed event, usable as a typed handler argument.
pub trait EventVariant<E: RoutedEvent>: Sized + 'static {
    /// The kind this variant corresponds to.
    const KIND: E::Kind;

    fn from_event(event: &E) -> Option<&Self>;

    fn from_event_mut(event: &mut E) -> Option<&mut Self>;

    fn into_variant(event: E) -> Option<Self>;
}

type Callback<E> = Box<dyn Fn(&mut E) + Send + Sync>;
type Guard<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

/// A callback guarded by an event kind and predicates.
pub struct Handle<E: RoutedEvent> {
    kind: Option<E::Kind>,
    guards: Vec<Guard<E>>,
    callback: Callback<E>,
}

impl<E: RoutedEvent> Handle<E> {
    /// A handle that receives every event.
    pub fn any<F>(callback: F) -> Self
    where
        F: Fn(&mut E) + Send + Sync + 'static,
    {
        Self {
            kind: None,
            guards: Vec::new(),
            callback: Box::new(callback),
        }
    }

    /// A handle that receives only events of variant `V`.
    pub fn of<V, F>(callback: F) -> Self
    where
        V: EventVariant<E>,
        F: Fn(&mut V) + Send + Sync + 'static,
    {
        Self {
            kind: Some(V::KIND),
            guards: Vec::new(),
            callback: Box::new(move |event: &mut E| {
                if let Some(variant) = V::from_event_mut(event) {
                    callback(variant);
                }
            }),
        }
    }

    /// Append a guard over the whole event.
    pub fn guard<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.guards.push(Box::new(predicate));
        self
    }

    /// Append a guard over variant `V`. Events of other variants fail it.
    pub fn when<V, P>(self, predicate: P) -> Self
    where
        V: EventVariant<E>,
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.guard(move |event: &E| V::from_event(event).is_some_and(&predicate))
    }

    /// The kind this handle is bound to. `None` means every kind.
    pub fn kind(&self) -> Option<E::Kind> {
        self.kind
    }

    pub fn guard_count(&self) -> usize {
        self.guards.len()
    }

    /// Whether the handle would run for `event`.
    pub fn accepts(&self, event: &E) -> bool {
        self.kind.is_none_or(|kind| kind == event.kind()) && self.guards.iter().all(|guard| guard(event))
    }

    /// Run the callback if the handle accepts `event`.
    ///
    /// Returns `true` if the callback ran.
    pub fn accept(&self, event: &mut E) -> bool {
        if !self.accepts(event) {
            return false;
        }
        (self.callback)(event);
        true
    }
}

impl<E: RoutedEvent> fmt::Debug for Handle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("kind", &self.kind)
            .field("guards", &self.guards.len())
            .finish_non_exhaustive()
    }
}

/// An object owning handles for events of type `E`.
pub trait Target<E: RoutedEvent> {
    /// Registered handles, in registration order.
    fn handles(&self) -> &[std::sync::Arc<Handle<E>>];

    /// Offer `event` to every handle in order.
    ///
    /// Returns the number of handles whose callback ran.
    fn dispatch(&self, event: &mut E) -> usize {
        self.handles()
            .iter()
            .filter(|handle| handle.accept(event))
            .count()
    }
}
