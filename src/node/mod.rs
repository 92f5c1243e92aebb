// src/node/mod.rs

//! Failure nodes: the layers an [`Error`] handle points at.
//!
//! - [`sentinel`] holds process-lifetime constant nodes, matched by identity.
//! - [`dynamic`] holds heap nodes with their own text, an optional inner
//!   handle and an optional typed payload.
//! - [`text`] is the inline/heap message storage used by dynamic nodes.

pub mod dynamic;
pub mod sentinel;
pub mod text;

use std::any::Any;

use crate::handle::Error;
use crate::payload::TypeToken;

pub use sentinel::Sentinel;
pub(crate) use dynamic::DynamicNode;

/// Capability set shared by every node kind.
///
/// Defaults describe a leaf with no payload that is not serializable, which
/// is exactly a sentinel.
pub(crate) trait Node: Send + Sync {
    /// Text of this layer only.
    fn message(&self) -> &str;

    /// The next layer, if this node wraps one.
    fn inner(&self) -> Option<&Error> {
        None
    }

    /// Payload stored on this layer, if its type token is `token`.
    fn payload(&self, _token: TypeToken) -> Option<&dyn Any> {
        None
    }

    /// Hook for node kinds with their own notion of equality in `Error::is`.
    fn matches(&self, _target: &Error) -> bool {
        false
    }

    fn is_serializable(&self) -> bool {
        false
    }

    /// Wire type name of the payload; empty without a wire payload.
    fn payload_type_name(&self) -> String {
        String::new()
    }

    /// Wire bytes of the payload; empty without a wire payload.
    fn payload_bytes(&self) -> Vec<u8> {
        Vec::new()
    }

    /// Human-readable payload rendering; empty when there is none.
    fn payload_debug(&self) -> String {
        String::new()
    }
}
