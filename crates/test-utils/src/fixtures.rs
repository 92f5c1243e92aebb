// crates/test-utils/src/fixtures.rs

//! Sentinels and payload types shared by the integration tests.

use anyhow::{bail, Context, Result};
use errchain::{sentinel, WirePayload};

sentinel! {
    pub ERR_PERMISSION = "permission denied";
    pub ERR_NOT_FOUND = "resource not found";
    pub ERR_INTERNAL = "internal server error";
    pub ERR_CONNECTION_REFUSED = "connection refused";
}

/// A protobuf-like message: wire-serializable with a debug rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginRequest {
    pub user: String,
    pub ip_address: String,
    pub port: u16,
}

impl LoginRequest {
    pub fn new(user: &str, ip_address: &str, port: u16) -> Self {
        Self {
            user: user.to_string(),
            ip_address: ip_address.to_string(),
            port,
        }
    }

    /// Inverse of `to_bytes`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data).context("login request is not UTF-8")?;
        let parts: Vec<&str> = text.split('|').collect();
        let [user, ip_address, port] = parts.as_slice() else {
            bail!("expected 3 fields, got {}", parts.len());
        };
        Ok(Self {
            user: user.to_string(),
            ip_address: ip_address.to_string(),
            port: port.parse().context("parsing port")?,
        })
    }
}

impl WirePayload for LoginRequest {
    fn to_bytes(&self) -> Vec<u8> {
        format!("{}|{}|{}", self.user, self.ip_address, self.port).into_bytes()
    }

    fn type_name(&self) -> String {
        "test.LoginRequest".to_string()
    }

    fn debug_string(&self) -> Option<String> {
        Some(format!(
            "user: {:?} ip_address: {:?} port: {}",
            self.user, self.ip_address, self.port
        ))
    }
}

/// Wire-serializable without a debug rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlob(pub Vec<u8>);

impl WirePayload for RawBlob {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.clone()
    }

    fn type_name(&self) -> String {
        "test.RawBlob".to_string()
    }
}

/// An opaque payload (no wire capability).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDetails {
    pub status_code: u16,
    pub remote_ip: String,
}

impl NetworkDetails {
    pub fn new(status_code: u16, remote_ip: &str) -> Self {
        Self {
            status_code,
            remote_ip: remote_ip.to_string(),
        }
    }
}

/// Status and path of a failed HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub status: u16,
    pub path: String,
}

impl HttpFailure {
    pub fn new(status: u16, path: &str) -> Self {
        Self {
            status,
            path: path.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);
