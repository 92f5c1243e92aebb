// src/codec/mod.rs

//! Binary encoding of failure chains.
//!
//! Layout (all integers little-endian u32):
//!
//! ```text
//! layer_count
//! repeated layer_count times, outermost first:
//!   message_len   message bytes
//!   type_name_len type name bytes   (0 without a wire payload)
//!   payload_len   payload bytes     (0 without a wire payload)
//! ```
//!
//! Decoding treats every length as untrusted. The number of layers it will
//! even attempt is capped at `remaining_bytes / 12` (the size of a layer
//! made of three empty fields), so a forged count cannot drive allocation.
//! The cap bounds a single bogus count only; a large input made of many
//! small valid layers is still decoded in full unless
//! [`DecodeOptions::max_layers`] says otherwise.

pub mod wire;

use tracing::debug;

use crate::errors::WireError;
use crate::handle::Error;
use crate::payload::SerializedPayload;
use wire::{WireReader, WireWriter, PREFIX_LEN};

/// Smallest possible encoded layer: three zero length prefixes.
pub const MIN_LAYER_LEN: usize = 3 * PREFIX_LEN;

/// Whether every layer of `err` survives serialization intact.
///
/// Nil is trivially serializable. A chain containing a sentinel is not
/// (sentinel identity is process-local), nor is one carrying an opaque
/// payload.
pub fn is_serializable(err: &Error) -> bool {
    err.chain()
        .all(|layer| layer.node().is_some_and(|node| node.is_serializable()))
}

/// Encode `err` into the chain format. Nil encodes to no bytes at all.
///
/// Layers that are not serializable are still written with their text;
/// their payload fields are left empty.
pub fn serialize(err: &Error) -> Vec<u8> {
    if err.is_nil() {
        return Vec::new();
    }

    let mut writer = WireWriter::new();
    writer.put_u32(0);
    let mut count: u32 = 0;

    for layer in err.chain() {
        let Some(node) = layer.node() else { break };
        writer.put_field(node.message().as_bytes());
        writer.put_field(node.payload_type_name().as_bytes());
        writer.put_field(&node.payload_bytes());
        count += 1;
    }

    writer.patch_u32(0, count);
    writer.into_bytes()
}

/// Decode a chain with the default options. Malformed input yields nil or
/// the layers parsed before the damage.
pub fn deserialize(data: &[u8]) -> Error {
    Decoder::default().decode(data)
}

/// Tunables for [`Decoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Hard cap on decoded layers, on top of the byte-count heuristic.
    pub max_layers: Option<usize>,
}

/// Outcome of [`Decoder::decode_report`].
#[derive(Debug, Clone)]
pub struct Decoded {
    /// The rebuilt chain (nil when nothing could be parsed).
    pub error: Error,
    /// Layer count as declared by the input.
    pub declared_layers: u32,
    /// Layers actually rebuilt into `error`.
    pub parsed_layers: usize,
    /// What stopped parsing early, if anything did.
    pub stopped: Option<WireError>,
}

impl Decoded {
    fn nil(stopped: Option<WireError>) -> Self {
        Self {
            error: Error::nil(),
            declared_layers: 0,
            parsed_layers: 0,
            stopped,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stopped.is_none()
    }
}

struct RawLayer<'a> {
    message: &'a [u8],
    type_name: &'a [u8],
    payload: &'a [u8],
}

fn read_layer<'a>(reader: &mut WireReader<'a>) -> Result<RawLayer<'a>, WireError> {
    Ok(RawLayer {
        message: reader.read_field()?,
        type_name: reader.read_field()?,
        payload: reader.read_field()?,
    })
}

#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    pub fn decode(&self, data: &[u8]) -> Error {
        self.decode_report(data).error
    }

    /// Decode `data` and report how far parsing got.
    pub fn decode_report(&self, data: &[u8]) -> Decoded {
        if data.is_empty() {
            return Decoded::nil(None);
        }
        if data.len() < PREFIX_LEN {
            return Decoded::nil(Some(WireError::TooShort { len: data.len() }));
        }

        let mut reader = WireReader::new(data);
        let declared = match reader.read_u32() {
            Ok(count) => count,
            Err(e) => return Decoded::nil(Some(e)),
        };
        if declared == 0 {
            return Decoded::nil(None);
        }

        let declared_len = declared as usize;
        let fit = reader.remaining() / MIN_LAYER_LEN;
        let mut budget = declared_len.min(fit);
        if budget < declared_len {
            debug!(
                declared,
                cap = fit,
                "declared layer count exceeds what the input can hold; capping"
            );
        }
        let mut limit_hit = None;
        if let Some(max) = self.options.max_layers {
            if budget > max {
                budget = max;
                limit_hit = Some(max);
            }
        }

        let mut layers = Vec::with_capacity(budget);
        let mut stopped = None;
        for index in 0..budget {
            match read_layer(&mut reader) {
                Ok(layer) => layers.push(layer),
                Err(e) => {
                    debug!(index, error = %e, "stopping decode at malformed layer");
                    stopped = Some(e);
                    break;
                }
            }
        }

        if stopped.is_none() && layers.len() < declared_len {
            stopped = Some(match limit_hit {
                Some(limit) => WireError::LayerLimit { limit },
                None => WireError::CountExceedsInput {
                    declared,
                    parsed: layers.len(),
                },
            });
        }
        if stopped.is_none() && reader.remaining() > 0 {
            debug!(trailing = reader.remaining(), "ignoring trailing bytes after last layer");
        }

        let parsed_layers = layers.len();
        Decoded {
            error: rebuild(layers),
            declared_layers: declared,
            parsed_layers,
            stopped,
        }
    }
}

/// Rebuild the chain innermost first, so each layer wraps the one below.
fn rebuild(layers: Vec<RawLayer<'_>>) -> Error {
    let mut err = Error::nil();
    for layer in layers.into_iter().rev() {
        let message = String::from_utf8_lossy(layer.message);
        err = if layer.type_name.is_empty() {
            err.wrap(&message)
        } else {
            let payload = SerializedPayload {
                type_name: String::from_utf8_lossy(layer.type_name).into_owned(),
                data: layer.payload.to_vec(),
            };
            err.wrap_with_wire_payload(&message, payload)
        };
    }
    err
}
