//! The `ContractTransport` trait: the network boundary of an invocation.
//!
//! Dispatch, confirmation wait and log fetch are the only suspension points
//! of an invocation, and all of them live behind this trait.

use crate::call::CallOptions;
use crate::codec::LogRecord;
use crate::error::TransportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction identifier (hash), `0x`-prefixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(pub String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mined transaction with the logs it emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx: TxId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// `Some(false)` when execution reverted. `None` for pre-Byzantium nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    #[serde(default)]
    pub logs: Vec<LogRecord>,
}

impl Receipt {
    pub fn reverted(&self) -> bool {
        self.status == Some(false)
    }
}

/// Network access for one contract invocation.
///
/// Errors are surfaced to the user verbatim and are never retried.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; the trait is object-safe and can be
/// stored as `Arc<dyn ContractTransport>`.
#[async_trait]
pub trait ContractTransport: Send + Sync {
    /// Execute `calldata` against `to` without creating a transaction and
    /// return the raw return data.
    async fn simulate_call(
        &self,
        to: &str,
        calldata: &[u8],
        options: &CallOptions,
    ) -> Result<Vec<u8>, TransportError>;

    /// Submit a state-changing transaction; resolves once it is accepted.
    async fn submit_transaction(
        &self,
        to: &str,
        calldata: &[u8],
        options: &CallOptions,
    ) -> Result<TxId, TransportError>;

    /// Wait until `tx` is mined and return its receipt.
    async fn await_confirmation(&self, tx: &TxId) -> Result<Receipt, TransportError>;

    /// Identifier of the endpoint (URL or name), for logs.
    fn endpoint(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_status() {
        let mut r = Receipt {
            tx: TxId::new("0x1"),
            block_number: Some(7),
            status: Some(true),
            logs: vec![],
        };
        assert!(!r.reverted());
        r.status = None;
        assert!(!r.reverted());
        r.status = Some(false);
        assert!(r.reverted());
    }

    #[test]
    fn tx_id_is_a_plain_string_in_json() {
        assert_eq!(serde_json::to_string(&TxId::new("0xab")).unwrap(), "\"0xab\"");
    }
}
