//! Parsed parameter kinds and the value shapes that flow through the pipeline.
//!
//! ```text
//! RawValue  --coerce-->  CoercedArgument  --codec-->  bytes
//! bytes     --codec-->   AbiValue         --display--> DisplayValue
//! ```
//!
//! Every stage is an explicit tagged union so each recursion step is an
//! exhaustive `match`.

use crate::error::SchemaError;
use crate::schema::TypeSpec;
use alloy_primitives::{I256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parameter type tag, parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Unsigned integer, width in bits (8..=256).
    Uint(usize),
    /// Signed integer, width in bits (8..=256).
    Int(usize),
    Bool,
    Address,
    /// Fixed-size byte array (bytes1 .. bytes32). Length in bytes.
    FixedBytes(usize),
    /// Variable-length byte array
    Bytes,
    Str,
    /// 24-byte address + selector
    Function,
    /// `T[]`
    Array(Box<ParamKind>),
    /// `T[k]`
    FixedArray(Box<ParamKind>, usize),
    /// Named members in declaration order
    Tuple(Vec<(String, ParamKind)>),
}

impl ParamKind {
    /// Parse a `TypeSpec` (tag plus components), enforcing that components
    /// are present exactly when the base tag is `tuple`.
    pub fn parse(spec: &TypeSpec) -> Result<Self, SchemaError> {
        parse_tag(&spec.type_tag, spec)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, ParamKind::Uint(_) | ParamKind::Int(_))
    }

    /// Element kind for `T[]` / `T[k]`.
    pub fn element(&self) -> Option<&ParamKind> {
        match self {
            ParamKind::Array(inner) | ParamKind::FixedArray(inner, _) => Some(inner),
            _ => None,
        }
    }
}

fn parse_tag(tag: &str, spec: &TypeSpec) -> Result<ParamKind, SchemaError> {
    let unknown = || SchemaError::UnknownType {
        param: spec.name.clone(),
        tag: spec.type_tag.clone(),
    };

    if let Some(stripped) = tag.strip_suffix(']') {
        let open = stripped.rfind('[').ok_or_else(unknown)?;
        let inner = Box::new(parse_tag(&stripped[..open], spec)?);
        let dim = &stripped[open + 1..];
        if dim.is_empty() {
            return Ok(ParamKind::Array(inner));
        }
        let len = digits(dim).ok_or_else(unknown)?;
        return Ok(ParamKind::FixedArray(inner, len));
    }

    if tag == "tuple" {
        if spec.components.is_empty() {
            return Err(SchemaError::EmptyTuple {
                param: spec.name.clone(),
            });
        }
        let members = spec
            .components
            .iter()
            .map(|c| Ok((c.name.clone(), ParamKind::parse(c)?)))
            .collect::<Result<Vec<_>, SchemaError>>()?;
        return Ok(ParamKind::Tuple(members));
    }

    let kind = match tag {
        "bool" => ParamKind::Bool,
        "address" => ParamKind::Address,
        "string" => ParamKind::Str,
        "bytes" => ParamKind::Bytes,
        "function" => ParamKind::Function,
        "uint" => ParamKind::Uint(256),
        "int" => ParamKind::Int(256),
        _ => parse_sized(tag).ok_or_else(unknown)?,
    };

    if !spec.components.is_empty() {
        return Err(SchemaError::UnexpectedComponents {
            param: spec.name.clone(),
            tag: spec.type_tag.clone(),
        });
    }
    Ok(kind)
}

fn parse_sized(tag: &str) -> Option<ParamKind> {
    if let Some(n) = tag.strip_prefix("bytes") {
        let n = digits(n)?;
        return (1..=32).contains(&n).then_some(ParamKind::FixedBytes(n));
    }
    if let Some(bits) = tag.strip_prefix("uint") {
        return int_width(bits).map(ParamKind::Uint);
    }
    if let Some(bits) = tag.strip_prefix("int") {
        return int_width(bits).map(ParamKind::Int);
    }
    None
}

fn int_width(s: &str) -> Option<usize> {
    let bits = digits(s)?;
    (bits % 8 == 0 && (8..=256).contains(&bits)).then_some(bits)
}

fn digits(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Uint(bits) => write!(f, "uint{bits}"),
            ParamKind::Int(bits) => write!(f, "int{bits}"),
            ParamKind::Bool => write!(f, "bool"),
            ParamKind::Address => write!(f, "address"),
            ParamKind::FixedBytes(n) => write!(f, "bytes{n}"),
            ParamKind::Bytes => write!(f, "bytes"),
            ParamKind::Str => write!(f, "string"),
            ParamKind::Function => write!(f, "function"),
            ParamKind::Array(elem) => write!(f, "{elem}[]"),
            ParamKind::FixedArray(elem, len) => write!(f, "{elem}[{len}]"),
            ParamKind::Tuple(members) => {
                let parts: Vec<String> = members.iter().map(|(_, k)| k.to_string()).collect();
                write!(f, "({})", parts.join(","))
            }
        }
    }
}

/// Loosely-typed user input, rebuilt into the schema's nesting shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// One form field's text (possibly an array literal)
    Text(String),
    /// The members of a tuple, in component order
    Group(Vec<RawValue>),
}

impl RawValue {
    pub fn text(s: impl Into<String>) -> Self {
        RawValue::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            RawValue::Group(_) => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{s}"),
            RawValue::Group(items) => {
                let parts: Vec<String> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// A typed argument ready for the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoercedArgument {
    Uint(U256),
    Int(I256),
    /// bool, address, bytes, string: validated by the codec
    Text(String),
    Array(Vec<CoercedArgument>),
    Tuple(Vec<CoercedArgument>),
}

impl CoercedArgument {
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            CoercedArgument::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CoercedArgument::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CoercedArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercedArgument::Uint(v) => write!(f, "{v}"),
            CoercedArgument::Int(v) => write!(f, "{v}"),
            CoercedArgument::Text(s) => write!(f, "{s}"),
            CoercedArgument::Array(items) | CoercedArgument::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// A value as produced by the codec when decoding return data or event logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Uint(U256),
    Int(I256),
    Bool(bool),
    /// 20-byte address, `0x`-prefixed, EIP-55 checksummed
    Address(String),
    Bytes(Vec<u8>),
    Str(String),
    Array(Vec<AbiValue>),
    Tuple(Vec<AbiValue>),
}

impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiValue::Uint(v) => write!(f, "{v}"),
            AbiValue::Int(v) => write!(f, "{v}"),
            AbiValue::Bool(v) => write!(f, "{v}"),
            AbiValue::Address(a) => write!(f, "{a}"),
            AbiValue::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            AbiValue::Str(s) => write!(f, "{s}"),
            AbiValue::Array(items) | AbiValue::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}
