//! Transport abstraction
//!
//! The SDK never talks to the network directly; every service goes through a
//! [`Transport`], which returns the raw status and body of one HTTP exchange.
//! Transport failures (DNS, connect, timeout) come back as `Err`, HTTP failures
//! come back as an `Ok` response whose status the caller classifies.

use crate::error::Result;
use crate::query::{ObjectFilter, ObjectMask};
use async_trait::async_trait;

/// HTTP verb used for a SoftLayer call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request against the SoftLayer REST endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Service-relative path, e.g. `SoftLayer_Location_Datacenter/getDatacenters.json`
    pub path: String,

    pub method: Method,

    pub mask: Option<ObjectMask>,

    pub filter: Option<ObjectFilter>,

    /// JSON request body (POST / PUT only)
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            mask: None,
            filter: None,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_mask(mut self, mask: ObjectMask) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_filter(mut self, filter: ObjectFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Service name portion of the path, used to label errors
    pub fn resource(&self) -> &str {
        self.path.split('/').next().unwrap_or(&self.path)
    }
}

/// Raw outcome of an HTTP exchange that reached the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    /// Body as text, lossily decoded, for diagnostics
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP transport to the SoftLayer API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one HTTP exchange.
    ///
    /// Returns `Err` only for transport-level failures. Any HTTP status,
    /// including 4xx and 5xx, is returned as `Ok`.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        (**self).send(request).await
    }
}

/// Whether an HTTP status code is a client or server error (4xx or 5xx)
pub fn is_http_error_code(code: u16) -> bool {
    (400..=599).contains(&code)
}
