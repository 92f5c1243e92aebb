// src/node/dynamic.rs

//! Heap-resident, reference-counted failure layers.

use std::any::Any;

use crate::handle::Error;
use crate::node::text::LayerText;
use crate::node::Node;
use crate::payload::{ErasedPayload, TypeToken};

/// A dynamic layer: its own text, the handle it wraps, and at most one
/// payload. With `payload == None` this is a plain message node.
///
/// `Clone` copies exactly one layer: the inner handle is cloned as a handle,
/// which only bumps the inner node's count.
#[derive(Clone)]
pub(crate) struct DynamicNode {
    text: LayerText,
    pub(crate) inner: Error,
    payload: Option<Box<dyn ErasedPayload>>,
}

// The handle reserves the low address bit for the sentinel tag.
const _: () = assert!(std::mem::align_of::<DynamicNode>() >= 2);

impl DynamicNode {
    pub(crate) fn new(msg: &str, inner: Error, payload: Option<Box<dyn ErasedPayload>>) -> Self {
        Self {
            text: LayerText::new(msg),
            inner,
            payload,
        }
    }

    pub(crate) fn payload_mut(&mut self, token: TypeToken) -> Option<&mut dyn Any> {
        match self.payload.as_mut() {
            Some(p) if p.token() == token => Some(p.as_any_mut()),
            _ => None,
        }
    }
}

impl Node for DynamicNode {
    fn message(&self) -> &str {
        self.text.as_str()
    }

    fn inner(&self) -> Option<&Error> {
        if self.inner.is_nil() {
            None
        } else {
            Some(&self.inner)
        }
    }

    fn payload(&self, token: TypeToken) -> Option<&dyn Any> {
        match self.payload.as_ref() {
            Some(p) if p.token() == token => Some(p.as_any()),
            _ => None,
        }
    }

    fn is_serializable(&self) -> bool {
        self.payload.as_ref().is_none_or(|p| p.is_wire())
    }

    fn payload_type_name(&self) -> String {
        self.payload
            .as_ref()
            .map(|p| p.wire_type_name())
            .unwrap_or_default()
    }

    fn payload_bytes(&self) -> Vec<u8> {
        self.payload
            .as_ref()
            .map(|p| p.wire_bytes())
            .unwrap_or_default()
    }

    fn payload_debug(&self) -> String {
        self.payload
            .as_ref()
            .map(|p| p.debug_string())
            .unwrap_or_default()
    }
}
