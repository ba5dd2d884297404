//! `JsonRpcTransport`: `ContractTransport` over HTTP JSON-RPC.
//!
//! Read-only calls use `eth_call` against the latest block. Transactions are
//! sent with `eth_sendTransaction` from a node-managed account (a local dev
//! node or a signing proxy), then `eth_getTransactionReceipt` is polled until
//! the transaction is mined or the confirmation timeout elapses.

use crate::config::RpcConfig;
use crate::rpc::{decode_hex, JsonRpcRequest, JsonRpcResponse, RpcReceipt};
use async_trait::async_trait;
use chaincall_core::call::CallOptions;
use chaincall_core::error::TransportError;
use chaincall_core::transport::{ContractTransport, Receipt, TxId};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::Instant;
use tracing::debug;

pub struct JsonRpcTransport {
    client: reqwest::Client,
    config: RpcConfig,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    pub fn new(config: RpcConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(Self {
            client,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Call `method` and deserialize its result.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(id, method, params);
        debug!(method, id, url = %self.config.rpc_url, "rpc request");

        let resp = self
            .client
            .post(&self.config.rpc_url)
            .json(&req)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        ms: self.config.request_timeout_ms,
                    }
                } else {
                    TransportError::Http(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Http(format!("HTTP {status} from {}", self.config.rpc_url)));
        }

        let body: JsonRpcResponse = resp
            .json()
            .await
            .map_err(|e| TransportError::Http(format!("invalid JSON-RPC response: {e}")))?;
        let result = body.into_result()?;
        Ok(serde_json::from_value(result)?)
    }

    /// The transaction object shared by `eth_call` and `eth_sendTransaction`.
    fn tx_object(&self, to: &str, calldata: &[u8], options: &CallOptions) -> Value {
        let mut tx = Map::new();
        if let Some(from) = &self.config.from {
            tx.insert("from".into(), json!(from));
        }
        tx.insert("to".into(), json!(to));
        tx.insert("data".into(), json!(format!("0x{}", hex::encode(calldata))));
        if let Some(value) = options.value {
            tx.insert("value".into(), json!(format!("0x{value:x}")));
        }
        if let Some(gas) = options.gas_limit {
            tx.insert("gas".into(), json!(format!("0x{gas:x}")));
        }
        Value::Object(tx)
    }
}

#[async_trait]
impl ContractTransport for JsonRpcTransport {
    async fn simulate_call(
        &self,
        to: &str,
        calldata: &[u8],
        options: &CallOptions,
    ) -> Result<Vec<u8>, TransportError> {
        let tx = self.tx_object(to, calldata, options);
        let data: String = self.request("eth_call", vec![tx, json!("latest")]).await?;
        decode_hex(&data)
    }

    async fn submit_transaction(
        &self,
        to: &str,
        calldata: &[u8],
        options: &CallOptions,
    ) -> Result<TxId, TransportError> {
        if self.config.from.is_none() {
            return Err(TransportError::Other(
                "no sender account configured. Set CHAINCALL_FROM or pass --from <address>".into(),
            ));
        }
        let tx = self.tx_object(to, calldata, options);
        let hash: String = self.request("eth_sendTransaction", vec![tx]).await?;
        Ok(TxId(hash))
    }

    async fn await_confirmation(&self, tx: &TxId) -> Result<Receipt, TransportError> {
        let deadline = Instant::now() + self.config.confirmation_timeout();
        loop {
            let receipt: Option<RpcReceipt> = self
                .request("eth_getTransactionReceipt", vec![json!(tx.as_str())])
                .await?;
            if let Some(receipt) = receipt {
                return receipt.into_receipt();
            }
            if Instant::now() >= deadline {
                return Err(TransportError::Timeout {
                    ms: self.config.confirmation_timeout_ms,
                });
            }
            debug!(tx = %tx, "receipt not available yet");
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    fn endpoint(&self) -> &str {
        &self.config.rpc_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[test]
    fn tx_object_includes_options() {
        let transport =
            JsonRpcTransport::new(RpcConfig::new("http://localhost:8545").with_from("0xfrom"))
                .unwrap();
        let options = CallOptions {
            value: Some(U256::from(255u64)),
            gas_limit: Some(21_000),
        };
        let tx = transport.tx_object("0xto", &[0xa9, 0x05], &options);
        assert_eq!(
            tx,
            json!({"from": "0xfrom", "to": "0xto", "data": "0xa905", "value": "0xff", "gas": "0x5208"})
        );
    }

    #[test]
    fn tx_object_omits_absent_fields() {
        let transport = JsonRpcTransport::new(RpcConfig::new("http://localhost:8545")).unwrap();
        let tx = transport.tx_object("0xto", &[], &CallOptions::default());
        assert_eq!(tx, json!({"to": "0xto", "data": "0x"}));
    }

    #[tokio::test]
    async fn submit_without_sender_is_rejected_before_any_request() {
        let transport = JsonRpcTransport::new(RpcConfig::new("http://127.0.0.1:1")).unwrap();
        let err = transport
            .submit_transaction("0xto", &[], &CallOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no sender account"));
    }

    #[tokio::test]
    async fn unreachable_node_is_an_http_error() {
        let mut config = RpcConfig::new("http://127.0.0.1:1");
        config.request_timeout_ms = 2_000;
        let transport = JsonRpcTransport::new(config).unwrap();
        let err = transport
            .simulate_call("0xto", &[], &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Http(_) | TransportError::Timeout { .. }));
    }
}
