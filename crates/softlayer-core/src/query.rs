//! Object filters, object masks and the remote query executor

use crate::error::{Result, SoftLayerError};
use crate::transport::{ApiRequest, RawResponse, Transport, is_http_error_code};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Projection of the fields returned by the API (`objectMask`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectMask {
    fields: Vec<String>,
}

impl ObjectMask {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut mask = Self::default();
        for field in fields {
            mask = mask.with(field);
        }
        mask
    }

    /// Add a field, ignoring duplicates
    pub fn with(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Query-string form, `mask[id;name]`
    pub fn to_query_value(&self) -> String {
        format!("mask[{}]", self.fields.join(";"))
    }
}

/// Remote-side predicate restricting a list query (`objectFilter`)
///
/// Filters are JSON objects keyed by field name with an `operation` sub-key
/// holding the comparison value, e.g. `{"id":{"operation":265592}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectFilter(Value);

impl ObjectFilter {
    /// `{"<field>":{"operation":<value>}}`
    pub fn equals(field: &str, value: impl Into<Value>) -> Self {
        Self::nested(&[field], value)
    }

    /// Filter on a relational property path, e.g.
    /// `["adcLoadBalancers", "dedicatedBillingItem", "orderItem", "order", "id"]`
    pub fn nested(path: &[&str], value: impl Into<Value>) -> Self {
        let mut inner = Value::Object(Map::from_iter([(
            "operation".to_string(),
            value.into(),
        )]));
        for segment in path.iter().rev() {
            inner = Value::Object(Map::from_iter([(segment.to_string(), inner)]));
        }
        Self(inner)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Query-string form (compact JSON)
    pub fn to_query_value(&self) -> String {
        self.0.to_string()
    }
}

/// Send a request and classify the HTTP status.
///
/// 4xx/5xx become [`SoftLayerError::RemoteRequestFailed`]; the body is not
/// inspected, so a 2xx with an undecodable body passes through untouched.
pub async fn fetch<T: Transport + ?Sized>(transport: &T, request: ApiRequest) -> Result<Vec<u8>> {
    let resource = request.resource().to_string();
    tracing::debug!("{} {}", request.method, request.path);

    let RawResponse { status, body } = transport.send(request).await?;

    if is_http_error_code(status) {
        tracing::debug!("{} answered HTTP {}", resource, status);
        return Err(SoftLayerError::RemoteRequestFailed { status, resource });
    }

    Ok(body)
}

/// Remote query executor: one filtered, masked GET against a collection.
///
/// The mask always carries `id`; callers add the natural-key field.
pub async fn execute_query<T: Transport + ?Sized>(
    transport: &T,
    collection_path: &str,
    mask: ObjectMask,
    filter: ObjectFilter,
) -> Result<Vec<u8>> {
    let request = ApiRequest::get(collection_path)
        .with_mask(mask.with("id"))
        .with_filter(filter);
    fetch(transport, request).await
}

/// Decode a 2xx body, mapping failures to [`SoftLayerError::MalformedResponse`]
pub fn decode<T: DeserializeOwned>(body: &[u8], resource: &str) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| SoftLayerError::MalformedResponse {
        resource: resource.to_string(),
        reason: e.to_string(),
    })
}

/// Surface an `{"error": "...", "code": "..."}` body as an API error.
///
/// SoftLayer reports some failures with a 2xx status and an error object.
pub fn check_api_error(body: &[u8]) -> Result<()> {
    let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(body) else {
        return Ok(());
    };

    match object.get("error") {
        Some(Value::String(message)) => Err(SoftLayerError::Api {
            code: object
                .get("code")
                .and_then(Value::as_str)
                .map(str::to_string),
            message: message.clone(),
        }),
        _ => Ok(()),
    }
}

/// Delete and edit endpoints answer with the literal body `true` on success;
/// any other body is a failure, whatever the status code.
pub fn expect_true(body: &[u8], operation: &str) -> Result<()> {
    let text = String::from_utf8_lossy(body);
    if text.trim() == "true" {
        return Ok(());
    }
    Err(SoftLayerError::UnexpectedResponse {
        operation: operation.to_string(),
        body: text.into_owned(),
    })
}
