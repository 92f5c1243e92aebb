// src/handle/build.rs

//! Constructors for dynamic failures.
//!
//! Every function here allocates exactly one node (plus a boxed payload or a
//! heap message when those are present).

use crate::handle::Error;
use crate::node::DynamicNode;
use crate::payload::{Opaque, Wire, WirePayload};

impl Error {
    /// A new root failure with no inner layer.
    pub fn new(msg: &str) -> Error {
        Error::from_node(DynamicNode::new(msg, Error::nil(), None))
    }

    /// Add a context layer on top of `self`.
    ///
    /// Wrapping a nil handle produces a standalone (non-nil) failure; use
    /// [`crate::Context`] to add context only when there is a failure.
    pub fn wrap(self, msg: &str) -> Error {
        Error::from_node(DynamicNode::new(msg, self, None))
    }

    /// A new root failure carrying `payload`.
    ///
    /// The payload is retrievable with [`Error::payload`] but is never
    /// serialized; see [`Error::with_wire_payload`] for that.
    pub fn with_payload<T>(msg: &str, payload: T) -> Error
    where
        T: Clone + Send + Sync + 'static,
    {
        Error::nil().wrap_with_payload(msg, payload)
    }

    /// Add a context layer carrying `payload` on top of `self`.
    pub fn wrap_with_payload<T>(self, msg: &str, payload: T) -> Error
    where
        T: Clone + Send + Sync + 'static,
    {
        Error::from_node(DynamicNode::new(msg, self, Some(Box::new(Opaque(payload)))))
    }

    /// A new root failure carrying a wire-serializable payload.
    pub fn with_wire_payload<T>(msg: &str, payload: T) -> Error
    where
        T: WirePayload + Clone + Send + Sync + 'static,
    {
        Error::nil().wrap_with_wire_payload(msg, payload)
    }

    /// Add a context layer carrying a wire-serializable payload.
    pub fn wrap_with_wire_payload<T>(self, msg: &str, payload: T) -> Error
    where
        T: WirePayload + Clone + Send + Sync + 'static,
    {
        Error::from_node(DynamicNode::new(msg, self, Some(Box::new(Wire(payload)))))
    }
}

/// Build a new failure from a format string.
///
/// ```
/// let err = errchain::errorf!("error code: {}", 404);
/// assert_eq!(err.message(), "error code: 404");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::Error::new(&::std::format!($($arg)*))
    };
}

/// Wrap a failure with a formatted context message.
///
/// ```
/// let base = errchain::Error::new("refused");
/// let err = errchain::wrapf!(base, "dialing {}:{}", "db", 5432);
/// assert_eq!(err.message(), "dialing db:5432: refused");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($inner:expr, $($arg:tt)*) => {
        $crate::Error::wrap($inner, &::std::format!($($arg)*))
    };
}
