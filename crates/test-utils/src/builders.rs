// crates/test-utils/src/builders.rs

#![allow(dead_code)]

use errchain::Error;

/// Builder for failure chains, innermost layer first.
///
/// ```ignore
/// let err = ChainBuilder::root("disk full")
///     .wrap("writing segment")
///     .wrap("flushing memtable")
///     .build();
/// ```
pub struct ChainBuilder {
    err: Error,
}

impl ChainBuilder {
    /// Start from a fresh dynamic root cause.
    pub fn root(msg: &str) -> Self {
        Self {
            err: Error::new(msg),
        }
    }

    /// Start from an existing handle (typically a sentinel).
    pub fn on(err: &Error) -> Self {
        Self { err: err.clone() }
    }

    pub fn wrap(mut self, msg: &str) -> Self {
        self.err = self.err.wrap(msg);
        self
    }

    /// Add `layers` context layers named `"{prefix} {i}"`, innermost first.
    pub fn wrap_n(mut self, layers: usize, prefix: &str) -> Self {
        for i in 0..layers {
            self.err = self.err.wrap(&format!("{prefix} {i}"));
        }
        self
    }

    pub fn wrap_with_payload<T>(mut self, msg: &str, payload: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.err = self.err.wrap_with_payload(msg, payload);
        self
    }

    pub fn wrap_with_wire_payload<T>(mut self, msg: &str, payload: T) -> Self
    where
        T: errchain::WirePayload + Clone + Send + Sync + 'static,
    {
        self.err = self.err.wrap_with_wire_payload(msg, payload);
        self
    }

    pub fn build(self) -> Error {
        self.err
    }
}
