//! Type-directed argument coercion.
//!
//! Bridges free-form user text and the shapes the codec expects: integers
//! become `U256`/`I256`, array literals become real sequences, tuple groups
//! recurse per component, everything else passes through as text for the
//! codec to validate.
//!
//! Array literals are parsed with `serde_json::value::RawValue`, so numeric
//! elements keep their exact source text and never pass through `f64`.

use crate::error::CoerceError;
use crate::schema::TypeSpec;
use crate::types::{CoercedArgument, ParamKind, RawValue};
use alloy_primitives::{I256, U256};
use serde_json::value::RawValue as JsonFragment;

/// Coerce reconstructed arguments into typed values.
///
/// `args`, `types` and `inputs` are parallel. Fails on the first leaf that
/// cannot be parsed; no partial result is returned.
pub fn coerce(
    args: &[RawValue],
    types: &[String],
    inputs: &[TypeSpec],
) -> Result<Vec<CoercedArgument>, CoerceError> {
    if args.len() != inputs.len() {
        return Err(CoerceError::ArgumentCount {
            expected: inputs.len(),
            got: args.len(),
        });
    }
    if types.len() != inputs.len() {
        return Err(CoerceError::ArgumentCount {
            expected: inputs.len(),
            got: types.len(),
        });
    }

    args.iter()
        .zip(types)
        .zip(inputs)
        .map(|((raw, tag), input)| {
            if *tag != input.type_tag {
                return Err(CoerceError::ShapeMismatch {
                    param: input.name.clone(),
                    reason: format!("type '{tag}' does not match declared '{}'", input.type_tag),
                });
            }
            let kind = input.kind()?;
            coerce_value(raw, &kind, &input.name)
        })
        .collect()
}

/// Coerce one value against its parsed kind. `path` names the leaf in errors
/// (`order.amount`, `ids[2]`).
pub fn coerce_value(
    raw: &RawValue,
    kind: &ParamKind,
    path: &str,
) -> Result<CoercedArgument, CoerceError> {
    match (kind, raw) {
        (ParamKind::Tuple(members), RawValue::Group(items)) => {
            if items.len() != members.len() {
                return Err(CoerceError::ShapeMismatch {
                    param: path.to_string(),
                    reason: format!(
                        "tuple has {} components, got {} values",
                        members.len(),
                        items.len()
                    ),
                });
            }
            let coerced = members
                .iter()
                .zip(items)
                .map(|((name, member), item)| coerce_value(item, member, &member_path(path, name)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CoercedArgument::Tuple(coerced))
        }
        (_, RawValue::Group(_)) => Err(CoerceError::ShapeMismatch {
            param: path.to_string(),
            reason: format!("grouped value supplied for non-tuple type '{kind}'"),
        }),
        (_, RawValue::Text(text)) => coerce_text(text, kind, path),
    }
}

fn coerce_text(text: &str, kind: &ParamKind, path: &str) -> Result<CoercedArgument, CoerceError> {
    match kind {
        ParamKind::Array(elem) => {
            let items = parse_literal(text, path)?;
            coerce_elements(&items, elem, path).map(CoercedArgument::Array)
        }
        ParamKind::FixedArray(elem, len) => {
            let items = parse_literal(text, path)?;
            if items.len() != *len {
                return Err(CoerceError::MalformedArrayLiteral {
                    param: path.to_string(),
                    reason: format!("expected {len} elements, got {}", items.len()),
                });
            }
            coerce_elements(&items, elem, path).map(CoercedArgument::Array)
        }
        ParamKind::Tuple(members) => {
            let items = parse_literal(text, path)?;
            if items.len() != members.len() {
                return Err(CoerceError::ShapeMismatch {
                    param: path.to_string(),
                    reason: format!(
                        "tuple has {} components, got {} values",
                        members.len(),
                        items.len()
                    ),
                });
            }
            let coerced = members
                .iter()
                .zip(&items)
                .map(|((name, member), item)| {
                    coerce_fragment(item, member, &member_path(path, name))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CoercedArgument::Tuple(coerced))
        }
        ParamKind::Uint(bits) => parse_uint(text, *bits, path).map(CoercedArgument::Uint),
        ParamKind::Int(bits) => parse_int(text, *bits, path).map(CoercedArgument::Int),
        ParamKind::Bool
        | ParamKind::Address
        | ParamKind::FixedBytes(_)
        | ParamKind::Bytes
        | ParamKind::Str
        | ParamKind::Function => Ok(CoercedArgument::Text(text.to_string())),
    }
}

fn coerce_elements(
    items: &[Box<JsonFragment>],
    elem: &ParamKind,
    path: &str,
) -> Result<Vec<CoercedArgument>, CoerceError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| coerce_fragment(item, elem, &format!("{path}[{i}]")))
        .collect()
}

/// One element of a parsed literal. JSON strings are unquoted; numbers,
/// booleans and nested literals keep their exact source text.
fn coerce_fragment(
    item: &JsonFragment,
    kind: &ParamKind,
    path: &str,
) -> Result<CoercedArgument, CoerceError> {
    let src = item.get().trim();
    if src.starts_with('"') {
        let text: String =
            serde_json::from_str(src).map_err(|e| CoerceError::MalformedArrayLiteral {
                param: path.to_string(),
                reason: e.to_string(),
            })?;
        return coerce_text(&text, kind, path);
    }
    if src == "null" {
        return Err(CoerceError::MalformedArrayLiteral {
            param: path.to_string(),
            reason: "null element".into(),
        });
    }
    coerce_text(src, kind, path)
}

fn parse_literal(text: &str, path: &str) -> Result<Vec<Box<JsonFragment>>, CoerceError> {
    serde_json::from_str::<Vec<Box<JsonFragment>>>(text.trim()).map_err(|e| {
        CoerceError::MalformedArrayLiteral {
            param: path.to_string(),
            reason: e.to_string(),
        }
    })
}

fn member_path(parent: &str, member: &str) -> String {
    if parent.is_empty() {
        member.to_string()
    } else {
        format!("{parent}.{member}")
    }
}

/// Parse an unsigned integer of at most `bits` bits. Accepts base 10, or
/// base 16 with a `0x` prefix.
pub fn parse_uint(text: &str, bits: usize, path: &str) -> Result<U256, CoerceError> {
    let malformed = |reason: String| CoerceError::MalformedInteger {
        param: path.to_string(),
        value: text.to_string(),
        reason,
    };

    let s = text.trim();
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    if digits.is_empty() {
        return Err(malformed("empty value".into()));
    }
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(malformed(format!("not a base-{radix} number")));
    }

    let value = U256::from_str_radix(digits, radix as u64).map_err(|e| malformed(e.to_string()))?;
    if value.bit_len() > bits {
        return Err(malformed(format!("does not fit in uint{bits}")));
    }
    Ok(value)
}

/// Parse a signed decimal integer in the range of `int<bits>`.
pub fn parse_int(text: &str, bits: usize, path: &str) -> Result<I256, CoerceError> {
    let malformed = |reason: String| CoerceError::MalformedInteger {
        param: path.to_string(),
        value: text.to_string(),
        reason,
    };

    let s = text.trim();
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    if unsigned.is_empty() {
        return Err(malformed("empty value".into()));
    }
    if !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("not a base-10 number".into()));
    }

    let value = I256::from_dec_str(s).map_err(|e| malformed(e.to_string()))?;
    if bits < 256 {
        let limit = U256::from(1u8) << (bits - 1);
        let magnitude = value.unsigned_abs();
        let out_of_range = if value.is_negative() {
            magnitude > limit
        } else {
            magnitude >= limit
        };
        if out_of_range {
            return Err(malformed(format!("does not fit in int{bits}")));
        }
    }
    Ok(value)
}
