// src/payload.rs

//! Typed side-data ("payloads") attached to dynamic layers.
//!
//! Payload lookup is keyed by a [`TypeToken`], a per-type marker derived from
//! [`TypeId`]. No registry is involved: the token of `T` is whatever the
//! compiler assigns to `T` in this build.
//!
//! # Known boundary
//!
//! Tokens are only comparable inside a single compiled build. A payload
//! attached by a separately compiled, dynamically loaded component (a plugin
//! built with a different toolchain, for instance) is not guaranteed to be
//! found by `payload::<T>()` on this side, even when both sides name the
//! "same" type. Lookup then returns `None`; it never misidentifies a type.

use std::any::{Any, TypeId};

/// Stable identity of a payload type within one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeToken(TypeId);

impl TypeToken {
    pub fn of<T: 'static>() -> Self {
        TypeToken(TypeId::of::<T>())
    }
}

/// Capability of a payload that can travel over the wire.
///
/// Any type providing a byte encoding and a stable type name qualifies; it
/// does not have to be a particular base type. Protobuf-style messages map
/// onto this directly (`SerializeAsString` / `GetTypeName`).
///
/// `debug_string` is optional: types that return `None` are rendered as a
/// byte count by [`crate::Error::debug_string`].
pub trait WirePayload {
    /// Byte encoding of the value.
    fn to_bytes(&self) -> Vec<u8>;

    /// Stable name used by the receiving side to pick a decoder.
    fn type_name(&self) -> String;

    /// Human-readable rendering.
    fn debug_string(&self) -> Option<String> {
        None
    }
}

/// A payload as it comes back from [`crate::codec::deserialize`].
///
/// The original Rust type is not reconstructed; the receiver inspects
/// `type_name` and parses `data` with the matching decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedPayload {
    pub type_name: String,
    pub data: Vec<u8>,
}

impl WirePayload for SerializedPayload {
    fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn debug_string(&self) -> Option<String> {
        Some(format!("({} bytes)", self.data.len()))
    }
}

/// Object-safe view of a stored payload, used by dynamic nodes.
pub(crate) trait ErasedPayload: Send + Sync {
    fn token(&self) -> TypeToken;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_box(&self) -> Box<dyn ErasedPayload>;

    fn is_wire(&self) -> bool {
        false
    }

    fn wire_type_name(&self) -> String {
        String::new()
    }

    fn wire_bytes(&self) -> Vec<u8> {
        Vec::new()
    }

    fn debug_string(&self) -> String {
        String::new()
    }
}

impl Clone for Box<dyn ErasedPayload> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A payload with no wire capability. Never serializable.
pub(crate) struct Opaque<T>(pub(crate) T);

impl<T> ErasedPayload for Opaque<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn token(&self) -> TypeToken {
        TypeToken::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut self.0
    }

    fn clone_box(&self) -> Box<dyn ErasedPayload> {
        Box::new(Opaque(self.0.clone()))
    }
}

/// A payload implementing [`WirePayload`].
pub(crate) struct Wire<T>(pub(crate) T);

impl<T> ErasedPayload for Wire<T>
where
    T: WirePayload + Clone + Send + Sync + 'static,
{
    fn token(&self) -> TypeToken {
        TypeToken::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut self.0
    }

    fn clone_box(&self) -> Box<dyn ErasedPayload> {
        Box::new(Wire(self.0.clone()))
    }

    fn is_wire(&self) -> bool {
        true
    }

    fn wire_type_name(&self) -> String {
        self.0.type_name()
    }

    fn wire_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    fn debug_string(&self) -> String {
        self.0
            .debug_string()
            .unwrap_or_else(|| format!("({} bytes)", self.0.to_bytes().len()))
    }
}
