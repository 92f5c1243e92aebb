// src/codec/wire.rs

//! Little-endian length-prefixed primitives of the chain format.

use tracing::warn;

use crate::errors::WireError;

/// Size of every length prefix (and of the layer count).
pub const PREFIX_LEN: usize = 4;

#[derive(Debug, Default)]
pub(crate) struct WireWriter {
    out: Vec<u8>,
}

impl WireWriter {
    pub(crate) fn new() -> Self {
        Self { out: Vec::new() }
    }

    pub(crate) fn put_u32(&mut self, value: u32) {
        self.out.extend_from_slice(&value.to_le_bytes());
    }

    /// Write `bytes` behind a u32 length prefix.
    ///
    /// A field longer than `u32::MAX` cannot be represented; it is cut at
    /// that length.
    pub(crate) fn put_field(&mut self, bytes: &[u8]) {
        let len = match u32::try_from(bytes.len()) {
            Ok(len) => len,
            Err(_) => {
                warn!(len = bytes.len(), "field exceeds u32::MAX bytes; truncating");
                u32::MAX
            }
        };
        self.put_u32(len);
        self.out.extend_from_slice(&bytes[..len as usize]);
    }

    /// Overwrite the u32 at `offset` (used to back-patch the layer count).
    pub(crate) fn patch_u32(&mut self, offset: usize, value: u32) {
        self.out[offset..offset + PREFIX_LEN].copy_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}

/// Cursor over untrusted input. Never reads past the end, never allocates.
#[derive(Debug)]
pub(crate) struct WireReader<'a> {
    rest: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { rest: data }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.rest.len()
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, WireError> {
        let Some((head, tail)) = self.rest.split_first_chunk::<PREFIX_LEN>() else {
            return Err(WireError::TruncatedPrefix {
                available: self.rest.len(),
            });
        };
        self.rest = tail;
        Ok(u32::from_le_bytes(*head))
    }

    /// Read one length-prefixed field, borrowing it from the input.
    pub(crate) fn read_field(&mut self) -> Result<&'a [u8], WireError> {
        let len = self.read_u32()?;
        let available = self.rest.len();
        if len as usize > available {
            return Err(WireError::LengthOutOfRange { len, available });
        }
        let (field, tail) = self.rest.split_at(len as usize);
        self.rest = tail;
        Ok(field)
    }
}
