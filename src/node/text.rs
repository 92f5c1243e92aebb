// src/node/text.rs

//! Message storage for dynamic nodes.
//!
//! Short messages live in an inline buffer inside the node allocation, so a
//! typical `Error::new("not found")` costs exactly one allocation (the node
//! itself). Longer messages spill to a boxed `str`.

/// Longest message (in bytes) stored without a second allocation.
pub const INLINE_CAPACITY: usize = 23;

#[derive(Clone)]
pub(crate) enum LayerText {
    Inline {
        len: u8,
        buf: [u8; INLINE_CAPACITY],
    },
    Heap(Box<str>),
}

impl LayerText {
    pub(crate) fn new(msg: &str) -> Self {
        if msg.len() <= INLINE_CAPACITY {
            let mut buf = [0u8; INLINE_CAPACITY];
            buf[..msg.len()].copy_from_slice(msg.as_bytes());
            LayerText::Inline {
                len: msg.len() as u8,
                buf,
            }
        } else {
            LayerText::Heap(Box::from(msg))
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            LayerText::Inline { len, buf } => {
                let bytes = &buf[..usize::from(*len)];
                // SAFETY: `bytes` is a prefix copied verbatim from a `&str` in
                // `new`, cut at its own length, so it is valid UTF-8.
                unsafe { std::str::from_utf8_unchecked(bytes) }
            }
            LayerText::Heap(s) => s,
        }
    }
}
