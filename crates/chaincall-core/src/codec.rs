//! The `CallCodec` trait: the binary encoding boundary.
//!
//! The core never encodes bytes itself. A codec turns coerced arguments into
//! call data and turns return data or receipt logs back into `AbiValue`s.
//! `chaincall-evm` provides the EVM implementation.

use crate::error::CodecError;
use crate::schema::{EventSpec, FunctionSpec};
use crate::types::{AbiValue, CoercedArgument};
use serde::{Deserialize, Serialize};

/// A raw log record as returned in a transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Emitting contract, `0x`-prefixed hex
    pub address: String,
    /// `0x`-prefixed 32-byte topics; `topics[0]` is the event selector
    /// for non-anonymous events
    pub topics: Vec<String>,
    /// ABI-encoded non-indexed parameters
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<u64>,
}

impl LogRecord {
    pub fn topic0(&self) -> Option<&str> {
        self.topics.first().map(String::as_str)
    }
}

/// A log record successfully matched against one of the contract's events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLog {
    pub event: String,
    /// Arguments in declaration order (indexed and non-indexed interleaved)
    pub args: Vec<(String, AbiValue)>,
}

impl DecodedLog {
    pub fn values(&self) -> impl Iterator<Item = &AbiValue> {
        self.args.iter().map(|(_, v)| v)
    }
}

/// Outcome of decoding every log in a receipt.
#[derive(Debug, Default)]
pub struct LogDecodeResult {
    pub decoded: Vec<DecodedLog>,
    /// Records that matched no known event
    pub skipped: usize,
}

/// Encoder/decoder for one call-data format.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so one codec can serve concurrent
/// invocations.
pub trait CallCodec: Send + Sync {
    /// Selector followed by the encoded parameters.
    fn encode_call(
        &self,
        function: &FunctionSpec,
        args: &[CoercedArgument],
    ) -> Result<Vec<u8>, CodecError>;

    /// The encoded parameters alone, without a selector.
    fn encode_params(
        &self,
        function: &FunctionSpec,
        args: &[CoercedArgument],
    ) -> Result<Vec<u8>, CodecError>;

    /// Decode a read-only call's return data against `function.outputs`.
    ///
    /// A single output is returned as itself; several are returned as a
    /// `Tuple`; none yields an empty `Tuple`.
    fn decode_output(&self, function: &FunctionSpec, data: &[u8])
        -> Result<AbiValue, CodecError>;

    /// Decode one receipt log against the contract's events.
    ///
    /// Returns `CodecError::NoMatchingEvent` when no event's topic matches.
    fn decode_event_log(
        &self,
        events: &[EventSpec],
        log: &LogRecord,
    ) -> Result<DecodedLog, CodecError>;

    /// Decode every log in a receipt, skipping records that do not decode.
    ///
    /// A transaction routinely emits events from other contracts, so
    /// per-record failures are dropped rather than failing the batch.
    fn decode_logs(&self, events: &[EventSpec], logs: &[LogRecord]) -> LogDecodeResult {
        logs.iter()
            .fold(LogDecodeResult::default(), |mut acc, log| {
                match self.decode_event_log(events, log) {
                    Ok(decoded) => acc.decoded.push(decoded),
                    Err(_) => acc.skipped += 1,
                }
                acc
            })
    }
}

/// Serde adapter: bytes as a `0x`-prefixed hex string.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    /// Matches logs whose topic0 equals the event name.
    struct NameCodec;

    impl CallCodec for NameCodec {
        fn encode_call(&self, _: &FunctionSpec, _: &[CoercedArgument]) -> Result<Vec<u8>, CodecError> {
            Ok(vec![])
        }

        fn encode_params(
            &self,
            _: &FunctionSpec,
            _: &[CoercedArgument],
        ) -> Result<Vec<u8>, CodecError> {
            Ok(vec![])
        }

        fn decode_output(&self, _: &FunctionSpec, _: &[u8]) -> Result<AbiValue, CodecError> {
            Ok(AbiValue::Tuple(vec![]))
        }

        fn decode_event_log(
            &self,
            events: &[EventSpec],
            log: &LogRecord,
        ) -> Result<DecodedLog, CodecError> {
            let topic = log.topic0().unwrap_or_default();
            events
                .iter()
                .find(|e| e.name == topic)
                .map(|e| DecodedLog {
                    event: e.name.clone(),
                    args: vec![("n".into(), AbiValue::Uint(U256::from(1u8)))],
                })
                .ok_or_else(|| CodecError::NoMatchingEvent {
                    topic: topic.to_string(),
                })
        }
    }

    fn log(topic: &str) -> LogRecord {
        LogRecord {
            address: "0x01".into(),
            topics: vec![topic.into()],
            data: vec![],
            log_index: None,
        }
    }

    #[test]
    fn decode_logs_skips_unknown_records() {
        let events = vec![EventSpec::new("Known", vec![])];
        let result = NameCodec.decode_logs(&events, &[log("Known"), log("Other"), log("Known")]);
        assert_eq!(result.decoded.len(), 2);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn log_record_data_is_hex_in_json() {
        let record = LogRecord {
            data: vec![0xab, 0xcd],
            ..log("0x00")
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["data"], "0xabcd");
        let back: LogRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
