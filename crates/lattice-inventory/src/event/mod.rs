//! Event routing.
//!
//! Screens receive [`PageEvent`]s and icons receive [`IconEvent`]s. Both are
//! closed sum types whose variants wrap the payloads in this module; a
//! [`Handle`] registered for a payload type such as [`ClickEvent`] receives
//! that payload directly.

macro_rules! routed_event {
    (
        $(#[$meta:meta])*
        pub enum $event:ident : $kind:ident {
            $( $(#[$vmeta:meta])* $variant:ident($payload:ty) ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub enum $event {
            $( $(#[$vmeta])* $variant($payload), )*
        }

        #[doc = concat!("Discriminator of [`", stringify!($event), "`].")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $kind {
            $( $variant, )*
        }

        impl $crate::event::RoutedEvent for $event {
            type Kind = $kind;

            fn kind(&self) -> $kind {
                match self {
                    $( Self::$variant(_) => $kind::$variant, )*
                }
            }
        }

        impl $event {
            /// The context every variant carries.
            pub fn context(&self) -> &$crate::event::EventContext {
                match self {
                    $( Self::$variant(payload) => payload.context(), )*
                }
            }
        }

        $(
            impl $crate::event::EventVariant<$event> for $payload {
                const KIND: $kind = $kind::$variant;

                fn from_event(event: &$event) -> Option<&Self> {
                    match event {
                        $event::$variant(payload) => Some(payload),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn from_event_mut(event: &mut $event) -> Option<&mut Self> {
                    match event {
                        $event::$variant(payload) => Some(payload),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn into_variant(event: $event) -> Option<Self> {
                    match event {
                        $event::$variant(payload) => Some(payload),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )*
    };
}

mod context;
mod handle;
mod icon;
mod page;
mod types;

pub use context::EventContext;
pub use handle::{EventVariant, Handle, RoutedEvent, Target};
pub use icon::{IconEvent, IconEventKind};
pub use page::{PageEvent, PageEventKind};
pub use types::{
    BottomClickEvent, ClickEvent, CloseEvent, DragEvent, InitEvent, OpenEvent, OutsideClickEvent,
    TickEvent, UpdateEvent,
};
