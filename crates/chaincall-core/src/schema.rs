//! Schema types: the in-memory representation of a contract interface (ABI).
//!
//! A `ContractAbi` is parsed once from JSON (either a bare ABI array or a
//! compiler artifact) and is immutable afterwards. Every parameter is
//! validated on load, so the flattener and coercer can assume well-formed
//! type tags.

use crate::error::SchemaError;
use crate::types::ParamKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a function interacts with contract state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    Pure,
    View,
    #[default]
    Nonpayable,
    Payable,
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mutability::Pure => "pure",
            Mutability::View => "view",
            Mutability::Nonpayable => "nonpayable",
            Mutability::Payable => "payable",
        };
        write!(f, "{s}")
    }
}

/// One parameter, or one member of a tuple parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    /// Display label; may be empty
    #[serde(default)]
    pub name: String,
    /// Type tag as written in the ABI, e.g. `uint256`, `tuple`, `address[]`
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Tuple members, in declaration order. Empty unless the base tag is `tuple`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<TypeSpec>,
    /// Events only: whether this parameter is stored in a topic
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indexed: bool,
    /// Compiler-provided source type, e.g. `struct Order`
    #[serde(rename = "internalType", default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            components: Vec::new(),
            indexed: false,
            internal_type: None,
        }
    }

    /// A `tuple` parameter with the given members.
    pub fn tuple(name: impl Into<String>, components: Vec<TypeSpec>) -> Self {
        Self {
            components,
            ..Self::new(name, "tuple")
        }
    }

    /// Mark as an indexed event parameter.
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// `true` for a plain (non-array) tuple, the only shape the flattener expands.
    pub fn is_tuple(&self) -> bool {
        self.type_tag == "tuple"
    }

    /// `true` for any array-tagged type (`T[]` or `T[k]`).
    pub fn is_array(&self) -> bool {
        self.type_tag.ends_with(']')
    }

    /// The tag with every array suffix removed: `tuple[2][]` → `tuple`.
    pub fn base_tag(&self) -> &str {
        match self.type_tag.find('[') {
            Some(i) => &self.type_tag[..i],
            None => &self.type_tag,
        }
    }

    /// Parse the tag into a structured kind.
    pub fn kind(&self) -> Result<ParamKind, SchemaError> {
        ParamKind::parse(self)
    }

    /// Check the tag and the tuple/components invariant, recursively.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.kind().map(|_| ())
    }

    /// Canonical type string used in signatures: tuples are expanded to
    /// `(t1,t2)` and bare `uint`/`int` become `uint256`/`int256`.
    pub fn canonical_type(&self) -> String {
        let base = self.base_tag();
        let suffix = &self.type_tag[base.len()..];
        let base = match base {
            "tuple" => {
                let inner: Vec<String> =
                    self.components.iter().map(TypeSpec::canonical_type).collect();
                format!("({})", inner.join(","))
            }
            "uint" => "uint256".to_string(),
            "int" => "int256".to_string(),
            other => other.to_string(),
        };
        format!("{base}{suffix}")
    }
}

/// Identity of a function schema: its canonical signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaId(pub String);

impl SchemaId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One callable entry of the interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<TypeSpec>,
    #[serde(default)]
    pub outputs: Vec<TypeSpec>,
    #[serde(rename = "stateMutability", default)]
    pub mutability: Mutability,
    /// Legacy read-only marker from pre-0.5 compilers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
}

impl FunctionSpec {
    pub fn new(name: impl Into<String>, inputs: Vec<TypeSpec>, mutability: Mutability) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs: Vec::new(),
            mutability,
            constant: None,
        }
    }

    pub fn with_outputs(mut self, outputs: Vec<TypeSpec>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        signature_of(&self.name, &self.inputs)
    }

    pub fn schema_id(&self) -> SchemaId {
        SchemaId(self.signature())
    }

    /// Read-only functions are simulated instead of submitted as transactions.
    pub fn is_read_only(&self) -> bool {
        matches!(self.mutability, Mutability::View | Mutability::Pure)
            || self.constant == Some(true)
    }

    /// Only payable functions accept a native-value amount.
    pub fn is_payable(&self) -> bool {
        self.mutability == Mutability::Payable
    }
}

/// One event the contract may emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpec {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<TypeSpec>,
    #[serde(default)]
    pub anonymous: bool,
}

impl EventSpec {
    pub fn new(name: impl Into<String>, inputs: Vec<TypeSpec>) -> Self {
        Self {
            name: name.into(),
            inputs,
            anonymous: false,
        }
    }

    /// Canonical signature, e.g. `Transfer(address,address,uint256)`.
    pub fn signature(&self) -> String {
        signature_of(&self.name, &self.inputs)
    }
}

fn signature_of(name: &str, params: &[TypeSpec]) -> String {
    let types: Vec<String> = params.iter().map(TypeSpec::canonical_type).collect();
    format!("{name}({})", types.join(","))
}

/// A parsed, validated contract interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAbi {
    pub name: String,
    pub functions: Vec<FunctionSpec>,
    pub events: Vec<EventSpec>,
}

/// Raw ABI entry as found in JSON. Every field is optional so that the
/// legacy and modern dialects both deserialize.
#[derive(Debug, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<TypeSpec>,
    #[serde(default)]
    outputs: Vec<TypeSpec>,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<Mutability>,
    #[serde(default)]
    constant: Option<bool>,
    #[serde(default)]
    payable: Option<bool>,
    #[serde(default)]
    anonymous: bool,
}

fn default_entry_type() -> String {
    "function".to_string()
}

/// Compiler artifact (Truffle/Hardhat style): only the parts we need.
#[derive(Debug, Deserialize)]
struct Artifact {
    #[serde(rename = "contractName", default)]
    contract_name: Option<String>,
    abi: Vec<AbiEntry>,
}

impl ContractAbi {
    /// Parse either a bare ABI array or an artifact object with an `abi` field.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(invalid_json)?;
        match value {
            serde_json::Value::Array(_) => Self::from_abi_json(text, ""),
            serde_json::Value::Object(ref map) if map.contains_key("abi") => {
                Self::from_artifact(text)
            }
            _ => Err(SchemaError::InvalidJson {
                reason: "expected an ABI array or an artifact object with an `abi` field".into(),
            }),
        }
    }

    /// Parse a standard Ethereum ABI JSON array.
    pub fn from_abi_json(text: &str, name: impl Into<String>) -> Result<Self, SchemaError> {
        let entries: Vec<AbiEntry> = serde_json::from_str(text).map_err(invalid_json)?;
        Self::from_entries(name.into(), entries)
    }

    /// Parse a compiler artifact; the contract name is taken from `contractName`.
    pub fn from_artifact(text: &str) -> Result<Self, SchemaError> {
        let artifact: Artifact = serde_json::from_str(text).map_err(invalid_json)?;
        Self::from_entries(artifact.contract_name.unwrap_or_default(), artifact.abi)
    }

    fn from_entries(name: String, entries: Vec<AbiEntry>) -> Result<Self, SchemaError> {
        let mut abi = ContractAbi {
            name,
            ..Default::default()
        };

        for entry in entries {
            match entry.kind.as_str() {
                "function" => {
                    let mutability = entry.state_mutability.unwrap_or(
                        match (entry.constant, entry.payable) {
                            (Some(true), _) => Mutability::View,
                            (_, Some(true)) => Mutability::Payable,
                            _ => Mutability::Nonpayable,
                        },
                    );
                    let function = FunctionSpec {
                        name: entry.name,
                        inputs: entry.inputs,
                        outputs: entry.outputs,
                        mutability,
                        constant: entry.constant,
                    };
                    for param in function.inputs.iter().chain(&function.outputs) {
                        param.validate()?;
                    }
                    abi.functions.push(function);
                }
                "event" => {
                    let event = EventSpec {
                        name: entry.name,
                        inputs: entry.inputs,
                        anonymous: entry.anonymous,
                    };
                    for param in &event.inputs {
                        param.validate()?;
                    }
                    abi.events.push(event);
                }
                // constructor, fallback, receive, error: nothing to call or decode
                _ => {}
            }
        }

        Ok(abi)
    }

    /// Look up a function by name, or by full signature when the query
    /// contains `(`. Overloads resolve to the first declaration by name.
    pub fn function(&self, query: &str) -> Result<&FunctionSpec, SchemaError> {
        let found = if query.contains('(') {
            self.function_by_signature(query)
        } else {
            self.functions.iter().find(|f| f.name == query)
        };
        found.ok_or_else(|| SchemaError::FunctionNotFound {
            name: query.to_string(),
        })
    }

    pub fn function_by_signature(&self, signature: &str) -> Option<&FunctionSpec> {
        let wanted = signature.replace(' ', "");
        self.functions.iter().find(|f| f.signature() == wanted)
    }

    pub fn function_names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name.as_str()).collect()
    }
}

fn invalid_json(e: serde_json::Error) -> SchemaError {
    SchemaError::InvalidJson {
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABI: &str = r#"[
        {
            "type": "function",
            "name": "transfer",
            "inputs": [
                {"name": "to", "type": "address"},
                {"name": "amount", "type": "uint256"}
            ],
            "outputs": [{"name": "", "type": "bool"}],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "fill",
            "inputs": [
                {"name": "order", "type": "tuple", "components": [
                    {"name": "amount", "type": "uint256"},
                    {"name": "to", "type": "address"}
                ]},
                {"name": "ids", "type": "uint256[]"}
            ],
            "outputs": [],
            "stateMutability": "payable"
        },
        {"name": "balanceOf", "inputs": [{"name": "who", "type": "address"}],
         "outputs": [{"name": "", "type": "uint256"}], "constant": true},
        {"type": "constructor", "inputs": []},
        {"type": "event", "name": "Transfer", "anonymous": false, "inputs": [
            {"name": "from", "type": "address", "indexed": true},
            {"name": "to", "type": "address", "indexed": true},
            {"name": "value", "type": "uint256", "indexed": false}
        ]}
    ]"#;

    #[test]
    fn parses_functions_and_events() {
        let abi = ContractAbi::parse(ABI).unwrap();
        assert_eq!(abi.function_names(), vec!["transfer", "fill", "balanceOf"]);
        assert_eq!(abi.events.len(), 1);
        assert!(abi.events[0].inputs[0].indexed);
    }

    #[test]
    fn legacy_constant_marker_means_read_only() {
        let abi = ContractAbi::parse(ABI).unwrap();
        let f = abi.function("balanceOf").unwrap();
        assert_eq!(f.mutability, Mutability::View);
        assert!(f.is_read_only());
    }

    #[test]
    fn signatures_expand_tuples() {
        let abi = ContractAbi::parse(ABI).unwrap();
        assert_eq!(
            abi.function("fill").unwrap().signature(),
            "fill((uint256,address),uint256[])"
        );
        assert_eq!(
            abi.events[0].signature(),
            "Transfer(address,address,uint256)"
        );
        assert!(abi.function("fill((uint256,address), uint256[])").is_ok());
    }

    #[test]
    fn artifact_takes_contract_name() {
        let text = format!(r#"{{"contractName": "Token", "abi": {}, "bytecode": "0x"}}"#, ABI);
        let abi = ContractAbi::parse(&text).unwrap();
        assert_eq!(abi.name, "Token");
        assert_eq!(abi.functions.len(), 3);
    }

    #[test]
    fn rejects_empty_tuple() {
        let text = r#"[{"type":"function","name":"f","inputs":[{"name":"t","type":"tuple","components":[]}]}]"#;
        assert_eq!(
            ContractAbi::parse(text).unwrap_err(),
            SchemaError::EmptyTuple { param: "t".into() }
        );
    }

    #[test]
    fn rejects_unknown_type() {
        let text = r#"[{"type":"function","name":"f","inputs":[{"name":"x","type":"uint7"}]}]"#;
        assert!(matches!(
            ContractAbi::parse(text),
            Err(SchemaError::UnknownType { .. })
        ));
    }

    #[test]
    fn rejects_non_abi_json() {
        assert!(matches!(
            ContractAbi::parse(r#"{"hello": 1}"#),
            Err(SchemaError::InvalidJson { .. })
        ));
        assert!(ContractAbi::parse("not json").is_err());
    }

    #[test]
    fn missing_function_is_an_error() {
        let abi = ContractAbi::parse(ABI).unwrap();
        assert_eq!(
            abi.function("mint").unwrap_err(),
            SchemaError::FunctionNotFound { name: "mint".into() }
        );
    }
}
