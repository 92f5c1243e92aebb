// src/inspect.rs

//! Logic behind the `errchain` subcommands, kept out of `main.rs` so it can
//! be tested without spawning processes.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::codec::{self, Decoded, DecodeOptions, Decoder};
use crate::errors::{InspectError, InspectResult};
use crate::handle::Error;
use crate::payload::SerializedPayload;

/// Read serialized bytes from `path`, or from stdin when `path` is `None`.
pub fn read_input(path: Option<&Path>) -> InspectResult<Vec<u8>> {
    let bytes = match path {
        Some(p) => fs::read(p)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            buf
        }
    };
    debug!(len = bytes.len(), "read serialized chain");
    Ok(bytes)
}

/// Build a chain whose outermost layer is `messages[0]`.
pub fn build_chain(messages: &[String]) -> InspectResult<Error> {
    if messages.is_empty() {
        return Err(InspectError::NoMessages);
    }
    let err = messages
        .iter()
        .rev()
        .fold(Error::nil(), |inner, msg| inner.wrap(msg));
    Ok(err)
}

/// Serialize the chain built from `messages` into `out`.
pub fn encode_messages(messages: &[String], out: &mut impl Write) -> InspectResult<usize> {
    let err = build_chain(messages)?;
    let bytes = codec::serialize(&err);
    out.write_all(&bytes)?;
    out.flush()?;
    info!(layers = err.depth(), bytes = bytes.len(), "encoded chain");
    Ok(bytes.len())
}

/// One layer of a decoded chain, as printed by `decode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerReport {
    pub index: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub payload_bytes: usize,
}

/// Everything `decode` knows about an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainReport {
    pub declared_layers: u32,
    pub parsed_layers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped: Option<String>,
    pub message: String,
    pub debug: String,
    pub layers: Vec<LayerReport>,
}

impl ChainReport {
    pub fn from_decoded(decoded: &Decoded) -> Self {
        let layers = decoded
            .error
            .chain()
            .enumerate()
            .map(|(index, layer)| {
                let payload = layer.layer_payload::<SerializedPayload>();
                LayerReport {
                    index,
                    message: layer.layer_message().to_string(),
                    type_name: payload.map(|p| p.type_name.clone()),
                    payload_bytes: payload.map_or(0, |p| p.data.len()),
                }
            })
            .collect();

        Self {
            declared_layers: decoded.declared_layers,
            parsed_layers: decoded.parsed_layers,
            stopped: decoded.stopped.as_ref().map(ToString::to_string),
            message: decoded.error.message(),
            debug: decoded.error.debug_string(),
            layers,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "message: {}", self.message);
        let _ = writeln!(out, "debug:   {}", self.debug);
        let _ = writeln!(
            out,
            "layers:  {} parsed / {} declared",
            self.parsed_layers, self.declared_layers
        );
        if let Some(ref reason) = self.stopped {
            let _ = writeln!(out, "stopped: {reason}");
        }
        for layer in &self.layers {
            let _ = write!(out, "  #{} {:?}", layer.index, layer.message);
            if let Some(ref type_name) = layer.type_name {
                let _ = write!(out, " [{type_name}, {} bytes]", layer.payload_bytes);
            }
            out.push('\n');
        }
        out
    }

    pub fn render_toml(&self) -> InspectResult<String> {
        Ok(toml::to_string(self)?)
    }
}

/// Decode `bytes` with `options` and describe the result.
pub fn decode_bytes(bytes: &[u8], options: DecodeOptions) -> ChainReport {
    let decoded = Decoder::new(options).decode_report(bytes);
    if let Some(ref reason) = decoded.stopped {
        info!(%reason, parsed = decoded.parsed_layers, "input was not fully decoded");
    }
    ChainReport::from_decoded(&decoded)
}
