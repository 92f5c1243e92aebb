// src/chain.rs

//! Read-only and copy-on-write walks over a failure chain.
//!
//! A chain is the sequence of layers reached by following
//! [`Error::inner`] from a handle, outermost first. It ends at a layer with
//! no inner handle: either the innermost dynamic node or a sentinel.

use std::iter::FusedIterator;

use crate::handle::Error;
use crate::payload::TypeToken;

/// Separator placed between layers by [`Error::message`].
pub const LAYER_SEPARATOR: &str = ": ";

/// Full message of a nil handle.
pub const NIL_MESSAGE: &str = "(nil)";

/// Iterator over the layers of a chain, outermost first.
///
/// Every yielded handle is non-nil.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<&'a Error> {
        let current = self.next?;
        self.next = current.inner();
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

impl Error {
    /// Text of the outermost layer only. Empty for nil.
    pub fn layer_message(&self) -> &str {
        self.node().map_or("", |node| node.message())
    }

    /// The next layer down, or `None` at the end of the chain.
    pub fn inner(&self) -> Option<&Error> {
        self.node().and_then(|node| node.inner())
    }

    /// Mutable access to the next layer.
    ///
    /// Copy-on-write applies to the outer layer first (so the change cannot
    /// leak into other handles sharing it); the inner layer itself is only
    /// cloned once it is mutated in turn.
    pub fn inner_mut(&mut self) -> Option<&mut Error> {
        let node = self.node_mut()?;
        if node.inner.is_nil() {
            None
        } else {
            Some(&mut node.inner)
        }
    }

    pub fn chain(&self) -> Chain<'_> {
        Chain {
            next: if self.is_nil() { None } else { Some(self) },
        }
    }

    /// Number of layers; 0 for nil.
    pub fn depth(&self) -> usize {
        self.chain().count()
    }

    /// The innermost layer.
    pub fn root_cause(&self) -> Option<&Error> {
        self.chain().last()
    }

    /// All layer texts joined with `": "`, outermost first.
    pub fn message(&self) -> String {
        if self.is_nil() {
            return NIL_MESSAGE.to_string();
        }

        // Size the buffer up front so deep chains fill it without regrowth.
        let (text_len, layers) = self
            .chain()
            .fold((0usize, 0usize), |(len, n), layer| (len + layer.layer_message().len(), n + 1));
        let mut out = String::with_capacity(text_len + (layers - 1) * LAYER_SEPARATOR.len());

        for (i, layer) in self.chain().enumerate() {
            if i > 0 {
                out.push_str(LAYER_SEPARATOR);
            }
            out.push_str(layer.layer_message());
        }
        out
    }

    /// Whether `target` appears anywhere in this chain.
    ///
    /// Matching is by identity: the same sentinel, or a handle sharing the
    /// very same node. Two failures built separately never match, even with
    /// identical text.
    pub fn is(&self, target: &Error) -> bool {
        if self.is_nil() {
            return target.is_nil();
        }
        self.chain().any(|layer| {
            layer == target || layer.node().is_some_and(|node| node.matches(target))
        })
    }

    /// Payload stored on this layer alone, if it has type `T`.
    pub fn layer_payload<T: 'static>(&self) -> Option<&T> {
        self.node()?
            .payload(TypeToken::of::<T>())?
            .downcast_ref::<T>()
    }

    /// First payload of type `T` in the chain, outermost first.
    pub fn payload<T: 'static>(&self) -> Option<&T> {
        self.chain().find_map(|layer| layer.layer_payload::<T>())
    }

    /// Mutable access to the first payload of type `T` in the chain.
    ///
    /// The read-only search runs first, so a miss never clones anything. On
    /// a hit, every shared layer from the outermost down to the one holding
    /// the payload is cloned (one layer each) before the reference is handed
    /// out; handles sharing the old layers keep observing the old value.
    pub fn payload_mut<T: 'static>(&mut self) -> Option<&mut T> {
        let depth = self
            .chain()
            .position(|layer| layer.layer_payload::<T>().is_some())?;

        let mut current = self;
        for _ in 0..depth {
            current = current.inner_mut()?;
        }
        current
            .node_mut()?
            .payload_mut(TypeToken::of::<T>())?
            .downcast_mut::<T>()
    }

    /// Like [`Error::message`], with payload details inline.
    ///
    /// Layers carrying a wire payload get a `" [type: rendering]"` suffix;
    /// opaque payloads add nothing.
    pub fn debug_string(&self) -> String {
        if self.is_nil() {
            return NIL_MESSAGE.to_string();
        }

        // Rough guess: separator plus a short payload rendering per layer.
        let estimate: usize = self
            .chain()
            .map(|layer| layer.layer_message().len() + LAYER_SEPARATOR.len() + 64)
            .sum();
        let mut out = String::with_capacity(estimate);

        for (i, layer) in self.chain().enumerate() {
            let Some(node) = layer.node() else { break };
            if i > 0 {
                out.push_str(LAYER_SEPARATOR);
            }
            out.push_str(node.message());

            let debug = node.payload_debug();
            if !debug.is_empty() {
                out.push_str(" [");
                let type_name = node.payload_type_name();
                if !type_name.is_empty() {
                    out.push_str(&type_name);
                    out.push_str(": ");
                }
                out.push_str(&debug);
                out.push(']');
            }
        }
        out
    }
}
