//! JSON-RPC 2.0 wire types and the Ethereum receipt shape.

use chaincall_core::codec::LogRecord;
use chaincall_core::error::TransportError;
use chaincall_core::transport::{Receipt, TxId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: u64,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Unwrap the result value or return the node's error.
    pub fn into_result(self) -> Result<Value, TransportError> {
        if let Some(err) = self.error {
            Err(TransportError::Rpc {
                code: err.code,
                message: err.message,
            })
        } else {
            Ok(self.result.unwrap_or(Value::Null))
        }
    }
}

/// `eth_getTransactionReceipt` result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    /// `0x1` success, `0x0` reverted; absent before Byzantium
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logs: Vec<RpcLog>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    #[serde(default)]
    pub log_index: Option<String>,
    #[serde(default)]
    pub removed: Option<bool>,
}

impl RpcReceipt {
    /// Convert to the transport-neutral receipt. Removed (re-orged) logs are
    /// dropped.
    pub fn into_receipt(self) -> Result<Receipt, TransportError> {
        let logs = self
            .logs
            .into_iter()
            .filter(|l| l.removed != Some(true))
            .map(|l| {
                Ok(LogRecord {
                    address: l.address,
                    topics: l.topics,
                    data: decode_hex(&l.data)?,
                    log_index: l.log_index.as_deref().map(parse_quantity).transpose()?,
                })
            })
            .collect::<Result<Vec<_>, TransportError>>()?;

        Ok(Receipt {
            tx: TxId(self.transaction_hash),
            block_number: self.block_number.as_deref().map(parse_quantity).transpose()?,
            status: self
                .status
                .as_deref()
                .map(parse_quantity)
                .transpose()?
                .map(|s| s == 1),
            logs,
        })
    }
}

/// Parse a hex quantity such as `0x1b4`.
pub fn parse_quantity(s: &str) -> Result<u64, TransportError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| TransportError::Other(format!("invalid hex quantity {s:?}: {e}")))
}

/// Decode `0x`-prefixed hex data.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, TransportError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
        .map_err(|e| TransportError::Other(format!("invalid hex data: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialization() {
        let req = JsonRpcRequest::new(1, "eth_blockNumber", vec![]);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"method\":\"eth_blockNumber\""));
    }

    #[test]
    fn response_error_becomes_rpc_error() {
        let resp: JsonRpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"execution reverted"}}"#,
        )
        .unwrap();
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.to_string(), "RPC error -32000: execution reverted");
    }

    #[test]
    fn receipt_conversion() {
        let raw = serde_json::json!({
            "transactionHash": "0xabc",
            "blockNumber": "0x10",
            "status": "0x0",
            "logs": [
                {"address": "0x01", "topics": ["0xdd"], "data": "0x00ff", "logIndex": "0x2"},
                {"address": "0x02", "topics": [], "data": "0x", "removed": true}
            ]
        });
        let receipt: RpcReceipt = serde_json::from_value(raw).unwrap();
        let receipt = receipt.into_receipt().unwrap();
        assert_eq!(receipt.block_number, Some(16));
        assert!(receipt.reverted());
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.logs[0].data, vec![0x00, 0xff]);
        assert_eq!(receipt.logs[0].log_index, Some(2));
    }

    #[test]
    fn quantities() {
        assert_eq!(parse_quantity("0x1b4").unwrap(), 436);
        assert_eq!(parse_quantity("0x").unwrap(), 0);
        assert!(parse_quantity("0xzz").is_err());
    }
}
