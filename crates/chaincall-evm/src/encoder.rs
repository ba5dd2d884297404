//! Coerced arguments → alloy `DynSolValue`.
//!
//! The coercer has already turned integers and array literals into real
//! values; this is where the remaining text leaves (bool, address, bytes,
//! string) are validated against their declared kind.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, Function, B256};
use chaincall_core::error::CodecError;
use chaincall_core::types::{CoercedArgument, ParamKind};
use std::str::FromStr;

/// Build the alloy type for a parsed parameter kind.
pub fn dyn_type(kind: &ParamKind) -> DynSolType {
    match kind {
        ParamKind::Uint(bits) => DynSolType::Uint(*bits),
        ParamKind::Int(bits) => DynSolType::Int(*bits),
        ParamKind::Bool => DynSolType::Bool,
        ParamKind::Address => DynSolType::Address,
        ParamKind::FixedBytes(n) => DynSolType::FixedBytes(*n),
        ParamKind::Bytes => DynSolType::Bytes,
        ParamKind::Str => DynSolType::String,
        ParamKind::Function => DynSolType::Function,
        ParamKind::Array(elem) => DynSolType::Array(Box::new(dyn_type(elem))),
        ParamKind::FixedArray(elem, len) => DynSolType::FixedArray(Box::new(dyn_type(elem)), *len),
        ParamKind::Tuple(members) => {
            DynSolType::Tuple(members.iter().map(|(_, k)| dyn_type(k)).collect())
        }
    }
}

/// Convert one coerced argument to the alloy value for `kind`.
/// `path` names the leaf in errors.
pub fn to_dyn_value(
    arg: &CoercedArgument,
    kind: &ParamKind,
    path: &str,
) -> Result<DynSolValue, CodecError> {
    let fail = |reason: String| CodecError::Encode {
        param: path.to_string(),
        reason,
    };

    match (arg, kind) {
        (CoercedArgument::Uint(v), ParamKind::Uint(bits)) => Ok(DynSolValue::Uint(*v, *bits)),
        (CoercedArgument::Int(v), ParamKind::Int(bits)) => Ok(DynSolValue::Int(*v, *bits)),

        (CoercedArgument::Text(s), ParamKind::Bool) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(DynSolValue::Bool(true)),
            "false" | "0" => Ok(DynSolValue::Bool(false)),
            other => Err(fail(format!("expected true or false, got {other:?}"))),
        },

        (CoercedArgument::Text(s), ParamKind::Address) => Address::from_str(s.trim())
            .map(DynSolValue::Address)
            .map_err(|e| fail(format!("invalid address {s:?}: {e}"))),

        (CoercedArgument::Text(s), ParamKind::Bytes) => {
            parse_hex(s).map(DynSolValue::Bytes).map_err(fail)
        }

        (CoercedArgument::Text(s), ParamKind::FixedBytes(n)) => {
            let bytes = parse_hex(s).map_err(&fail)?;
            if bytes.len() != *n {
                return Err(fail(format!("bytes{n}: expected {n} bytes, got {}", bytes.len())));
            }
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(&bytes);
            Ok(DynSolValue::FixedBytes(B256::from(word), *n))
        }

        (CoercedArgument::Text(s), ParamKind::Str) => Ok(DynSolValue::String(s.clone())),

        (CoercedArgument::Text(s), ParamKind::Function) => {
            let bytes = parse_hex(s).map_err(&fail)?;
            Function::try_from(bytes.as_slice())
                .map(DynSolValue::Function)
                .map_err(|_| fail(format!("function: expected 24 bytes, got {}", bytes.len())))
        }

        (CoercedArgument::Array(items), ParamKind::Array(elem)) => {
            encode_elements(items, elem, path).map(DynSolValue::Array)
        }

        (CoercedArgument::Array(items), ParamKind::FixedArray(elem, len)) => {
            if items.len() != *len {
                return Err(fail(format!(
                    "fixed array length mismatch: expected {len}, got {}",
                    items.len()
                )));
            }
            encode_elements(items, elem, path).map(DynSolValue::FixedArray)
        }

        (CoercedArgument::Tuple(items), ParamKind::Tuple(members)) => {
            if items.len() != members.len() {
                return Err(fail(format!(
                    "tuple has {} components, got {}",
                    members.len(),
                    items.len()
                )));
            }
            let values = items
                .iter()
                .zip(members)
                .map(|(item, (name, member))| to_dyn_value(item, member, &format!("{path}.{name}")))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DynSolValue::Tuple(values))
        }

        _ => Err(fail(format!("cannot encode {arg} as {kind}"))),
    }
}

fn encode_elements(
    items: &[CoercedArgument],
    elem: &ParamKind,
    path: &str,
) -> Result<Vec<DynSolValue>, CodecError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| to_dyn_value(item, elem, &format!("{path}[{i}]")))
        .collect()
}

fn parse_hex(s: &str) -> Result<Vec<u8>, String> {
    let s = s.trim();
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| format!("invalid hex {s:?}: {e}"))
}
