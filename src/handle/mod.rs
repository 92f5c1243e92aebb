// src/handle/mod.rs

//! The [`Error`] handle.
//!
//! An `Error` is one machine word:
//!
//! | word                  | state    | ownership                          |
//! |-----------------------|----------|------------------------------------|
//! | null                  | nil      | nothing                            |
//! | low bit set           | sentinel | borrows a `'static` [`Sentinel`]   |
//! | low bit clear, !null  | dynamic  | owns one count of an `Arc` node    |
//!
//! Every node type is at least 2-byte aligned (asserted next to each type),
//! so the three states never collide. Construction lives in [`build`].

pub mod build;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::{self, ManuallyDrop};
use std::ptr;
use std::sync::Arc;

use tracing::trace;

use crate::node::{DynamicNode, Node, Sentinel};

const SENTINEL_TAG: usize = 1;

/// A nil, sentinel or dynamic failure.
///
/// Nil is success. Copies (`clone`) are O(1) whatever the chain depth:
/// a sentinel copy is a bit copy and a dynamic copy bumps one atomic count.
pub struct Error {
    ptr: *const (),
}

// SAFETY: the pointee is either a `Sentinel` (immutable, `Sync`) or an
// `Arc<DynamicNode>` allocation whose contents are `Send + Sync`; mutation
// only happens through `&mut Error` after `Arc::make_mut` proved uniqueness.
unsafe impl Send for Error {}
unsafe impl Sync for Error {}

const _: () = assert!(mem::size_of::<Error>() == mem::size_of::<usize>());

/// Decoded view of the tagged word.
pub(crate) enum Repr<'a> {
    Nil,
    Sentinel(&'static Sentinel),
    Dynamic(&'a DynamicNode),
}

impl Error {
    /// The nil handle (no failure).
    pub const fn nil() -> Self {
        Error { ptr: ptr::null() }
    }

    /// Borrow a sentinel node. No count changes, no allocation.
    pub const fn from_sentinel(node: &'static Sentinel) -> Self {
        Error {
            ptr: ptr::from_ref(node).cast::<()>().wrapping_byte_add(SENTINEL_TAG),
        }
    }

    /// Take ownership of a freshly built node.
    pub(crate) fn from_node(node: DynamicNode) -> Self {
        Error {
            ptr: Arc::into_raw(Arc::new(node)).cast(),
        }
    }

    pub fn is_nil(&self) -> bool {
        self.ptr.is_null()
    }

    /// True for every non-nil handle.
    pub fn is_err(&self) -> bool {
        !self.is_nil()
    }

    pub fn is_sentinel(&self) -> bool {
        self.ptr.addr() & SENTINEL_TAG != 0
    }

    pub fn is_dynamic(&self) -> bool {
        !self.is_nil() && !self.is_sentinel()
    }

    pub(crate) fn repr(&self) -> Repr<'_> {
        if self.is_nil() {
            Repr::Nil
        } else if self.is_sentinel() {
            let node = self.ptr.wrapping_byte_sub(SENTINEL_TAG).cast::<Sentinel>();
            // SAFETY: tagged words are only produced by `from_sentinel`,
            // which takes a `&'static Sentinel`.
            Repr::Sentinel(unsafe { &*node })
        } else {
            // SAFETY: untagged non-null words come from `Arc::into_raw` and
            // this handle holds one strong count, keeping the node alive for
            // at least the borrow of `self`.
            Repr::Dynamic(unsafe { &*self.ptr.cast::<DynamicNode>() })
        }
    }

    pub(crate) fn node(&self) -> Option<&dyn Node> {
        match self.repr() {
            Repr::Nil => None,
            Repr::Sentinel(s) => Some(s),
            Repr::Dynamic(d) => Some(d),
        }
    }

    /// Mutable access to the outermost node, cloning it first when shared.
    ///
    /// Only that one layer is cloned; the clone's inner handle shares the
    /// rest of the chain. Returns `None` for nil and sentinel handles.
    pub(crate) fn node_mut(&mut self) -> Option<&mut DynamicNode> {
        let mut arc = self.take_arc()?;
        if Arc::strong_count(&arc) > 1 {
            trace!(
                owners = Arc::strong_count(&arc),
                "copy-on-write: cloning shared layer"
            );
        }
        Arc::make_mut(&mut arc);
        self.ptr = Arc::into_raw(arc).cast();
        // SAFETY: `make_mut` left this handle as the only owner of the node,
        // and the returned borrow is tied to `&mut self`, so no copy of the
        // handle can be taken while it is alive.
        Some(unsafe { &mut *self.ptr.cast::<DynamicNode>().cast_mut() })
    }

    /// Move the owned count out as an `Arc`, leaving this handle nil.
    fn take_arc(&mut self) -> Option<Arc<DynamicNode>> {
        if !self.is_dynamic() {
            return None;
        }
        let raw = mem::replace(&mut self.ptr, ptr::null());
        // SAFETY: `raw` came from `Arc::into_raw` and carried this handle's
        // count, which is now transferred to the returned `Arc`.
        Some(unsafe { Arc::from_raw(raw.cast::<DynamicNode>()) })
    }

    /// Number of handles sharing the outermost node.
    ///
    /// Always 0 for nil and sentinel handles, which own nothing.
    pub fn ref_count(&self) -> usize {
        if !self.is_dynamic() {
            return 0;
        }
        // SAFETY: as in `take_arc`, but the count is never released because
        // the `Arc` is wrapped in `ManuallyDrop`.
        let arc = ManuallyDrop::new(unsafe { Arc::from_raw(self.ptr.cast::<DynamicNode>()) });
        Arc::strong_count(&arc)
    }

    /// Move the handle out, leaving nil in its place.
    pub fn take(&mut self) -> Error {
        mem::take(self)
    }
}

impl Default for Error {
    fn default() -> Self {
        Error::nil()
    }
}

impl Clone for Error {
    fn clone(&self) -> Self {
        if self.is_dynamic() {
            // SAFETY: the pointer came from `Arc::into_raw` and is kept alive
            // by this handle's own count.
            unsafe { Arc::increment_strong_count(self.ptr.cast::<DynamicNode>()) };
        }
        Error { ptr: self.ptr }
    }
}

impl Drop for Error {
    fn drop(&mut self) {
        // Walk down while each layer's last owner is us, so releasing a very
        // deep chain does not recurse once per layer.
        let mut next = self.take_arc();
        while let Some(arc) = next {
            next = match Arc::into_inner(arc) {
                Some(mut node) => node.inner.take_arc(),
                None => None,
            };
        }
    }
}

/// Exact word comparison: same sentinel, or literally the same shared node.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl Eq for Error {}

impl Hash for Error {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr.addr().hash(state);
    }
}

impl From<&'static Sentinel> for Error {
    fn from(node: &'static Sentinel) -> Self {
        Error::from_sentinel(node)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.repr() {
            Repr::Nil => return f.write_str("Error(nil)"),
            Repr::Sentinel(_) => "sentinel",
            Repr::Dynamic(_) => "dynamic",
        };
        f.debug_struct("Error")
            .field("kind", &kind)
            .field("depth", &self.depth())
            .field("message", &self.debug_string())
            .finish()
    }
}

impl std::error::Error for Error {}
