//! Error types for the ChainCall marshalling pipeline.

use thiserror::Error;

/// Errors raised while loading or interpreting an interface schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid ABI JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("unknown type '{tag}' for parameter '{param}'")]
    UnknownType { param: String, tag: String },

    #[error("tuple parameter '{param}' has no components")]
    EmptyTuple { param: String },

    #[error("parameter '{param}' of type '{tag}' must not declare components")]
    UnexpectedComponents { param: String, tag: String },

    #[error("function '{name}' not found in ABI")]
    FunctionNotFound { name: String },

    #[error("form state belongs to {found}, not {expected}")]
    ForeignFormState { expected: String, found: String },
}

/// Errors raised while coercing user text into typed call arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("malformed integer for '{param}' ({value:?}): {reason}")]
    MalformedInteger {
        param: String,
        value: String,
        reason: String,
    },

    #[error("malformed array literal for '{param}': {reason}")]
    MalformedArrayLiteral { param: String, reason: String },

    #[error("value for '{param}' does not match its declared shape: {reason}")]
    ShapeMismatch { param: String, reason: String },

    #[error("argument count mismatch: schema has {expected}, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Errors from the binary codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("cannot encode '{param}': {reason}")]
    Encode { param: String, reason: String },

    #[error("ABI decode failed: {reason}")]
    Decode { reason: String },

    #[error("no known event matches topic {topic}")]
    NoMatchingEvent { topic: String },
}

/// Errors reported by a transport. Surfaced to the user verbatim.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, TLS, status code, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The operation did not finish in time.
    #[error("timed out after {ms}ms")]
    Timeout { ms: u64 },

    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Everything that can abort a single invocation.
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Coerce(#[from] CoerceError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invalid call option: {reason}")]
    InvalidOption { reason: String },

    #[error("no contract address provided")]
    MissingAddress,

    #[error("transaction {tx} reverted")]
    Reverted { tx: String },
}

impl CallError {
    /// Short, stable label used as a metric attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            CallError::Schema(_) => "schema",
            CallError::Coerce(CoerceError::MalformedInteger { .. }) => "malformed_integer",
            CallError::Coerce(CoerceError::MalformedArrayLiteral { .. }) => {
                "malformed_array_literal"
            }
            CallError::Coerce(_) => "coerce",
            CallError::Codec(_) => "codec",
            CallError::Transport(_) => "transport",
            CallError::InvalidOption { .. } => "invalid_option",
            CallError::MissingAddress => "missing_address",
            CallError::Reverted { .. } => "reverted",
        }
    }
}
