//! Converts alloy `DynSolValue` → ChainCall `AbiValue`.

use alloy_dyn_abi::DynSolValue;
use chaincall_core::types::AbiValue;

/// Convert a decoded `DynSolValue` into an `AbiValue`.
pub fn normalize(val: DynSolValue) -> AbiValue {
    match val {
        DynSolValue::Bool(b) => AbiValue::Bool(b),
        DynSolValue::Int(i, _bits) => AbiValue::Int(i),
        DynSolValue::Uint(u, _bits) => AbiValue::Uint(u),

        // alloy keeps the full word; only the first `size` bytes are the value
        DynSolValue::FixedBytes(word, size) => AbiValue::Bytes(word[..size.min(32)].to_vec()),

        DynSolValue::Bytes(b) => AbiValue::Bytes(b),
        DynSolValue::String(s) => AbiValue::Str(s),

        // EIP-55 checksum encoding
        DynSolValue::Address(a) => AbiValue::Address(a.to_checksum(None)),

        DynSolValue::Function(f) => AbiValue::Bytes(f.to_vec()),

        DynSolValue::Array(vals) | DynSolValue::FixedArray(vals) => {
            AbiValue::Array(vals.into_iter().map(normalize).collect())
        }

        DynSolValue::Tuple(fields) => AbiValue::Tuple(fields.into_iter().map(normalize).collect()),

        // Variants behind optional alloy features (e.g. eip712 structs)
        #[allow(unreachable_patterns)]
        other => AbiValue::Str(format!("{other:?}")),
    }
}
