//! Return data and event log decoding.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use chaincall_core::codec::{DecodedLog, LogRecord};
use chaincall_core::error::CodecError;
use chaincall_core::schema::{EventSpec, FunctionSpec, TypeSpec};
use chaincall_core::types::{AbiValue, ParamKind};

use crate::encoder::dyn_type;
use crate::{fingerprint, normalizer};

fn kinds(params: &[TypeSpec]) -> Result<Vec<ParamKind>, CodecError> {
    params
        .iter()
        .map(|p| {
            p.kind().map_err(|e| CodecError::Decode {
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Decode ABI-encoded parameters into one value per type.
fn decode_params(kinds: &[ParamKind], data: &[u8]) -> Result<Vec<DynSolValue>, CodecError> {
    if kinds.is_empty() {
        return Ok(Vec::new());
    }
    let tuple = DynSolType::Tuple(kinds.iter().map(dyn_type).collect());
    let decoded = tuple
        .abi_decode_params(data)
        .map_err(|e| CodecError::Decode {
            reason: e.to_string(),
        })?;
    match decoded {
        DynSolValue::Tuple(vals) => Ok(vals),
        other => Ok(vec![other]),
    }
}

/// Decode a read-only call's return data against `function.outputs`.
pub fn decode_output(function: &FunctionSpec, data: &[u8]) -> Result<AbiValue, CodecError> {
    let kinds = kinds(&function.outputs)?;
    let mut values: Vec<AbiValue> = decode_params(&kinds, data)?
        .into_iter()
        .map(normalizer::normalize)
        .collect();

    if values.len() == 1 {
        if let Some(single) = values.pop() {
            return Ok(single);
        }
    }
    Ok(AbiValue::Tuple(values))
}

/// Decode one indexed topic (always 32 bytes).
///
/// Value types (uint, int, bool, address, bytes1–bytes32) are padded into the
/// word and decode normally. Reference types (string, bytes, arrays, tuples)
/// are stored as the keccak256 of their encoding, so the original value is
/// unrecoverable and the raw hash is returned as `Bytes`.
fn decode_topic(topic_hex: &str, kind: &ParamKind) -> Result<AbiValue, CodecError> {
    let hex = topic_hex.strip_prefix("0x").unwrap_or(topic_hex);
    let bytes = hex::decode(hex).map_err(|e| CodecError::Decode {
        reason: format!("invalid topic hex: {e}"),
    })?;

    match kind {
        ParamKind::Str
        | ParamKind::Bytes
        | ParamKind::Array(_)
        | ParamKind::FixedArray(..)
        | ParamKind::Tuple(_) => return Ok(AbiValue::Bytes(bytes)),
        _ => {}
    }

    dyn_type(kind)
        .abi_decode(&bytes)
        .map(normalizer::normalize)
        .map_err(|e| CodecError::Decode {
            reason: format!("topic decode: {e}"),
        })
}

/// Decode `log` as an instance of `event`. Arguments keep declaration order.
pub fn decode_event(event: &EventSpec, log: &LogRecord) -> Result<DecodedLog, CodecError> {
    let kinds = kinds(&event.inputs)?;

    let indexed: Vec<&ParamKind> = event
        .inputs
        .iter()
        .zip(&kinds)
        .filter(|(p, _)| p.indexed)
        .map(|(_, k)| k)
        .collect();
    let data_kinds: Vec<ParamKind> = event
        .inputs
        .iter()
        .zip(&kinds)
        .filter(|(p, _)| !p.indexed)
        .map(|(_, k)| k.clone())
        .collect();

    // topics[0] is the event topic for non-anonymous events
    let first_indexed = usize::from(!event.anonymous);
    if log.topics.len() != first_indexed + indexed.len() {
        return Err(CodecError::Decode {
            reason: format!(
                "{} expects {} topics, log has {}",
                event.name,
                first_indexed + indexed.len(),
                log.topics.len()
            ),
        });
    }

    let mut topic_values = log.topics[first_indexed..]
        .iter()
        .zip(indexed)
        .map(|(topic, kind)| decode_topic(topic, kind))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let mut data_values = decode_params(&data_kinds, &log.data)?
        .into_iter()
        .map(normalizer::normalize);

    let mut args = Vec::with_capacity(event.inputs.len());
    for param in &event.inputs {
        let next = if param.indexed {
            topic_values.next()
        } else {
            data_values.next()
        };
        let value = next.ok_or_else(|| CodecError::Decode {
            reason: format!("missing value for {}.{}", event.name, param.name),
        })?;
        args.push((param.name.clone(), value));
    }

    Ok(DecodedLog {
        event: event.name.clone(),
        args,
    })
}

/// Find the event whose topic matches `log.topics[0]` and decode it.
///
/// Several events can share a topic (ERC-20 and ERC-721 `Transfer` differ
/// only in which parameters are indexed); the first that decodes wins.
/// Anonymous events carry no topic and are never matched.
pub fn decode_event_log(events: &[EventSpec], log: &LogRecord) -> Result<DecodedLog, CodecError> {
    let topic0 = fingerprint::from_topics(&log.topics).ok_or_else(|| CodecError::NoMatchingEvent {
        topic: log.topic0().unwrap_or_default().to_string(),
    })?;

    let mut last_err = None;
    for event in events.iter().filter(|e| !e.anonymous) {
        if !fingerprint::same_topic(&fingerprint::event_topic(&event.signature()), topic0) {
            continue;
        }
        match decode_event(event, log) {
            Ok(decoded) => return Ok(decoded),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| CodecError::NoMatchingEvent {
        topic: topic0.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use chaincall_core::schema::Mutability;

    fn word(n: u64) -> Vec<u8> {
        let mut d = vec![0u8; 32];
        d[24..].copy_from_slice(&n.to_be_bytes());
        d
    }

    #[test]
    fn single_output_is_unwrapped() {
        let f = FunctionSpec::new("totalSupply", vec![], Mutability::View)
            .with_outputs(vec![TypeSpec::new("", "uint256")]);
        assert_eq!(
            decode_output(&f, &word(42)).unwrap(),
            AbiValue::Uint(U256::from(42u8))
        );
    }

    #[test]
    fn multiple_outputs_form_a_tuple() {
        let f = FunctionSpec::new("pair", vec![], Mutability::View).with_outputs(vec![
            TypeSpec::new("a", "uint8"),
            TypeSpec::new("b", "bool"),
        ]);
        let mut data = word(7);
        data.extend(word(1));
        assert_eq!(
            decode_output(&f, &data).unwrap(),
            AbiValue::Tuple(vec![AbiValue::Uint(U256::from(7u8)), AbiValue::Bool(true)])
        );
    }

    #[test]
    fn no_outputs_is_an_empty_tuple() {
        let f = FunctionSpec::new("poke", vec![], Mutability::View);
        assert_eq!(decode_output(&f, &[]).unwrap(), AbiValue::Tuple(vec![]));
    }

    #[test]
    fn truncated_return_data_is_a_decode_error() {
        let f = FunctionSpec::new("x", vec![], Mutability::View)
            .with_outputs(vec![TypeSpec::new("", "uint256")]);
        assert!(matches!(
            decode_output(&f, &[0u8; 8]),
            Err(CodecError::Decode { .. })
        ));
    }

    #[test]
    fn indexed_string_is_returned_as_hash() {
        let hash = format!("0x{}", "11".repeat(32));
        assert_eq!(
            decode_topic(&hash, &ParamKind::Str).unwrap(),
            AbiValue::Bytes(vec![0x11; 32])
        );
    }

    #[test]
    fn anonymous_events_are_not_matched() {
        let mut ev = EventSpec::new("Ping", vec![]);
        ev.anonymous = true;
        let log = LogRecord {
            address: "0x01".into(),
            topics: vec![fingerprint::event_topic("Ping()")],
            data: vec![],
            log_index: None,
        };
        assert!(matches!(
            decode_event_log(&[ev], &log),
            Err(CodecError::NoMatchingEvent { .. })
        ));
    }
}
