// src/lib.rs

//! `errchain`: a one-word, value-semantic error handle.
//!
//! An [`Error`] is nil (success), a reference to a process-lifetime
//! [`Sentinel`], or a reference-counted dynamic layer that may wrap another
//! `Error` and carry a typed payload. Copies are O(1); mutation goes through
//! copy-on-write one layer at a time.
//!
//! ```
//! use errchain::{Error, sentinel};
//!
//! sentinel! {
//!     pub ERR_CONNECTION_REFUSED = "connection refused";
//! }
//!
//! let err = ERR_CONNECTION_REFUSED
//!     .clone()
//!     .wrap("query user 42")
//!     .wrap("loading profile");
//!
//! assert_eq!(err.message(), "loading profile: query user 42: connection refused");
//! assert!(err.is(&ERR_CONNECTION_REFUSED));
//! ```
//!
//! Modules:
//! - [`handle`]: the tagged handle, its ownership rules and constructors.
//! - [`node`]: sentinel and dynamic layers.
//! - [`chain`]: message, identity and payload walks.
//! - [`payload`]: type tokens and the wire capability.
//! - [`codec`]: binary encoding of chains.
//! - [`result`]: `Result` on top of the handle.
//! - [`cli`], [`inspect`], [`logging`], [`errors`]: the `errchain` binary.

pub mod chain;
pub mod cli;
pub mod codec;
pub mod errors;
pub mod handle;
pub mod inspect;
pub mod logging;
pub mod node;
pub mod payload;
pub mod result;

use std::fs::File;
use std::io::{self, BufWriter};

use tracing::debug;

pub use chain::Chain;
pub use codec::{deserialize, is_serializable, serialize, DecodeOptions, Decoded, Decoder};
pub use handle::Error;
pub use node::Sentinel;
pub use payload::{SerializedPayload, TypeToken, WirePayload};
pub use result::{fail, Context, Result};

use crate::cli::{CliArgs, Command, OutputFormat};

/// High-level entry point used by `main.rs`.
pub fn run(args: CliArgs) -> anyhow::Result<()> {
    match args.command {
        Command::Decode {
            path,
            format,
            max_layers,
        } => {
            let bytes = inspect::read_input(path.as_deref())?;
            let report = inspect::decode_bytes(&bytes, DecodeOptions { max_layers });
            let rendered = match format {
                OutputFormat::Text => report.render_text(),
                OutputFormat::Toml => report.render_toml()?,
            };
            print!("{rendered}");
        }
        Command::Encode { messages, output } => {
            let written = match output {
                Some(path) => {
                    let mut file = BufWriter::new(File::create(&path)?);
                    inspect::encode_messages(&messages, &mut file)?
                }
                None => inspect::encode_messages(&messages, &mut io::stdout().lock())?,
            };
            debug!(written, "encode complete");
        }
    }
    Ok(())
}
