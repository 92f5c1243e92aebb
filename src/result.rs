// src/result.rs

//! Success/failure composition on top of [`Error`].
//!
//! `Result<T>` is the standard `Result` with [`Error`] as the failure type,
//! so `?` is the propagation mechanism. Its one extra rule is that a failure
//! always carries a non-nil handle; [`fail`] and the conversions below
//! assert it.
//!
//! `Result<()>` carries no more information than a bare handle: nil is
//! success, anything else is failure. [`Error::into_result`] and
//! `Error::from(Result<()>)` convert between the two.

use crate::handle::Error;

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

/// Build a failed `Result`.
///
/// Failing with a nil handle is a contract violation (debug builds panic).
pub fn fail<T>(err: Error) -> Result<T> {
    debug_assert!(err.is_err(), "a failed Result must hold a non-nil Error");
    Err(err)
}

impl Error {
    /// Nil becomes `Ok(())`, any failure becomes `Err(self)`.
    pub fn into_result(self) -> Result<()> {
        if self.is_nil() { Ok(()) } else { Err(self) }
    }
}

impl From<Result<()>> for Error {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Error::nil(),
            Err(err) => {
                debug_assert!(err.is_err(), "a failed Result must hold a non-nil Error");
                err
            }
        }
    }
}

/// Add a context layer to a failure, leaving success untouched.
///
/// This is the `?`-friendly form of wrapping: unlike calling
/// [`Error::wrap`] unconditionally, it never turns a nil handle into a
/// failure.
///
/// ```
/// use errchain::{Context, Error, Result};
///
/// fn query() -> Result<u32> {
///     Err(Error::new("connection refused"))
/// }
///
/// fn load() -> Result<u32> {
///     let id = query().context("query user 42")?;
///     Ok(id)
/// }
///
/// assert_eq!(load().unwrap_err().message(), "query user 42: connection refused");
/// ```
pub trait Context<T> {
    fn context(self, msg: &str) -> Result<T>;

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> Context<T> for Result<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|err| err.wrap(msg))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| err.wrap(&f()))
    }
}

impl Context<()> for Error {
    fn context(self, msg: &str) -> Result<()> {
        self.into_result().context(msg)
    }

    fn with_context<F>(self, f: F) -> Result<()>
    where
        F: FnOnce() -> String,
    {
        self.into_result().with_context(f)
    }
}
