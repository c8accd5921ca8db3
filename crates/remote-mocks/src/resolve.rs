//! Derivation of deterministic response values from request-supplied
//! identifiers, for both single and batch operation modes.
//!
//! Resolution is a single parametrized function over an explicit id-field
//! selector and prefix; the simulated entity kinds (`uid`, `tid`, `sid`, …)
//! differ only in those two parameters plus the output shape their route
//! declares.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::verify::error_document;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Unable to decode request body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Unexpected value for {0} variable")]
    MissingVariable(&'static str),
    #[error("Unexpected value for input variable")]
    MissingBatchInput,
    #[error("Unexpected entity without {0} identifier")]
    MissingIdentifier(&'static str),
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "unable to resolve the requested field");
        error_document(&self.to_string()).into_response()
    }
}

/// The decoded part of a GraphQL-over-HTTP body. `query` is never parsed,
/// only scanned for the introspection marker; `variables` stays a generic
/// JSON map because its shape is route-specific.
#[derive(Debug, serde::Deserialize)]
pub struct GraphqlRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub variables: serde_json::Map<String, Value>,
}

impl GraphqlRequest {
    pub fn from_body(body: &[u8]) -> Result<Self, ResolveError> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn variable(&self, name: &'static str) -> Result<&Value, ResolveError> {
        self.variables.get(name).ok_or(ResolveError::MissingVariable(name))
    }

    /// The ordered entity list of a batched call, from `variables.input`.
    pub fn batch_input(&self) -> Result<&[Value], ResolveError> {
        self.variables
            .get("input")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or(ResolveError::MissingBatchInput)
    }
}

/// Whether a request body is an introspection query, decided by the literal
/// `__schema` substring alone.
pub fn is_introspection(body: &[u8]) -> bool {
    String::from_utf8_lossy(body).contains("__schema")
}

/// Per-entity output shape, matching what the route declares in its remote
/// schema: a scalar field, a to-one relation or a to-many relation.
#[derive(Clone, Copy, Debug)]
pub enum FieldShape {
    Scalar,
    Object,
    ObjectList,
}

fn id_repr(id: &Value) -> String {
    match id {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}

/// `prefix + id`, the derived name every resolver answers with.
pub fn prefixed(id: &Value, prefix: &str) -> String {
    format!("{prefix}{}", id_repr(id))
}

pub(crate) fn shaped(name: String, shape: FieldShape) -> Value {
    match shape {
        FieldShape::Scalar => Value::String(name),
        FieldShape::Object => json!({ "name": name }),
        FieldShape::ObjectList => json!([{ "name": name }]),
    }
}

pub fn resolve_single(
    entity: &Value,
    id_field: &'static str,
    prefix: &str,
    shape: FieldShape,
) -> Result<Value, ResolveError> {
    let id = entity.get(id_field).ok_or(ResolveError::MissingIdentifier(id_field))?;
    Ok(shaped(prefixed(id, prefix), shape))
}

/// Resolves a batch, with `out[i]` derived solely from `entities[i]`: length
/// and order always track the input.
pub fn resolve_batch(
    entities: &[Value],
    id_field: &'static str,
    prefix: &str,
    shape: FieldShape,
) -> Result<Value, ResolveError> {
    entities
        .iter()
        .map(|entity| resolve_single(entity, id_field, prefix, shape))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Wraps a resolved value under its field name in a `data` envelope.
pub(crate) fn data_field(field: &str, value: Value) -> Value {
    let mut data = serde_json::Map::new();
    data.insert(field.to_string(), value);
    json!({ "data": data })
}

/// 200 + JSON, the only success shape the simulator ever produces.
pub(crate) type JsonResult = Result<Json<Value>, ResolveError>;
