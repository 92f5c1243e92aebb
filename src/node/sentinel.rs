// src/node/sentinel.rs

use crate::node::Node;

/// An immutable, process-lifetime failure node.
///
/// Sentinels are normally declared with [`crate::sentinel!`], which places
/// the node in a `static` and exposes a ready-made `Error` handle for it.
/// Two handles are the same sentinel iff they point at the same node, so
/// two sentinels with identical text are still distinct failures.
#[derive(Debug)]
pub struct Sentinel {
    message: &'static str,
}

// The handle tags sentinel addresses with the low bit.
const _: () = assert!(std::mem::align_of::<Sentinel>() >= 2);

impl Sentinel {
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }

    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl Node for Sentinel {
    fn message(&self) -> &str {
        self.message
    }
}

/// Declare one or more sentinel errors as `static` handles.
///
/// ```
/// errchain::sentinel! {
///     /// The peer refused the connection.
///     pub ERR_CONNECTION_REFUSED = "connection refused";
///     pub ERR_TIMEOUT = "timed out";
/// }
///
/// let err = ERR_TIMEOUT.clone().wrap("fetching manifest");
/// assert!(err.is(&ERR_TIMEOUT));
/// assert!(!err.is(&ERR_CONNECTION_REFUSED));
/// ```
#[macro_export]
macro_rules! sentinel {
    ($($(#[$attr:meta])* $vis:vis $name:ident = $msg:expr;)+) => {
        $(
            $(#[$attr])*
            $vis static $name: $crate::Error = {
                static NODE: $crate::Sentinel = $crate::Sentinel::new($msg);
                $crate::Error::from_sentinel(&NODE)
            };
        )+
    };
}
