//! Form flattening and argument reconstruction.
//!
//! `flatten` turns a parameter list into the ordered leaf fields a user fills
//! in; `reconstruct` reads those fields back into the schema's nesting shape.
//! The two are structural inverses: both walk `inputs` in order and expand
//! plain `tuple` inputs one level, addressing members with the same
//! `FieldKey`.

use crate::error::SchemaError;
use crate::schema::{FunctionSpec, SchemaId, TypeSpec};
use crate::types::RawValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Address of one leaf field: the top-level input index and, for tuple
/// members, the component index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub parent: usize,
    pub component: Option<usize>,
}

impl FieldKey {
    pub fn top(parent: usize) -> Self {
        Self {
            parent,
            component: None,
        }
    }

    pub fn member(parent: usize, component: usize) -> Self {
        Self {
            parent,
            component: Some(component),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.component {
            Some(c) => write!(f, "{}.{}", self.parent, c),
            None => write!(f, "{}", self.parent),
        }
    }
}

/// Error returned when a field key string is not `p` or `p.c`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field key '{0}': expected <index> or <index>.<component>")]
pub struct ParseFieldKeyError(pub String);

impl FromStr for FieldKey {
    type Err = ParseFieldKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFieldKeyError(s.to_string());
        let index = |part: &str| -> Result<usize, ParseFieldKeyError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }
            part.parse().map_err(|_| err())
        };
        match s.split_once('.') {
            Some((p, c)) => Ok(FieldKey::member(index(p)?, index(c)?)),
            None => Ok(FieldKey::top(index(s)?)),
        }
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One leaf the user can fill in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedField {
    pub key: FieldKey,
    /// `parent.member` for tuple members, else the input's own name
    pub display_path: String,
    /// The leaf's own name
    pub name: String,
    /// Owning tuple's name, for tuple members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    pub type_tag: String,
}

impl FlattenedField {
    pub fn parent_index(&self) -> usize {
        self.key.parent
    }

    pub fn component_index(&self) -> Option<usize> {
        self.key.component
    }

    pub fn is_component(&self) -> bool {
        self.key.component.is_some()
    }
}

/// Flatten a parameter list into display-ordered leaf fields.
///
/// Plain tuples are replaced inline by their members; everything else
/// (including `tuple[]`) is a single leaf. A tuple without components is
/// rejected rather than silently dropped.
pub fn flatten(inputs: &[TypeSpec]) -> Result<Vec<FlattenedField>, SchemaError> {
    let mut fields = Vec::with_capacity(inputs.len());

    for (idx, input) in inputs.iter().enumerate() {
        if input.is_tuple() {
            if input.components.is_empty() {
                return Err(SchemaError::EmptyTuple {
                    param: input.name.clone(),
                });
            }
            for (comp_idx, component) in input.components.iter().enumerate() {
                fields.push(FlattenedField {
                    key: FieldKey::member(idx, comp_idx),
                    display_path: format!("{}.{}", input.name, component.name),
                    name: component.name.clone(),
                    parent_name: Some(input.name.clone()),
                    type_tag: component.type_tag.clone(),
                });
            }
        } else {
            fields.push(FlattenedField {
                key: FieldKey::top(idx),
                display_path: input.name.clone(),
                name: input.name.clone(),
                parent_name: None,
                type_tag: input.type_tag.clone(),
            });
        }
    }

    Ok(fields)
}

/// `flatten(&function.inputs)`.
pub fn flatten_function(function: &FunctionSpec) -> Result<Vec<FlattenedField>, SchemaError> {
    flatten(&function.inputs)
}

/// User-entered text per field, scoped to the function it was entered for.
///
/// Keys are only meaningful relative to one schema, so a state built for one
/// function is cleared when another is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    schema: SchemaId,
    values: HashMap<FieldKey, String>,
}

impl FormState {
    /// Empty state for `function`.
    pub fn new(function: &FunctionSpec) -> Self {
        Self {
            schema: function.schema_id(),
            values: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &SchemaId {
        &self.schema
    }

    /// Whether this state was built for `function`.
    pub fn is_for(&self, function: &FunctionSpec) -> bool {
        self.schema == function.schema_id()
    }

    /// Re-scope to `function`. Values are discarded when the schema changes.
    /// Returns `true` if the state was reset.
    pub fn select(&mut self, function: &FunctionSpec) -> bool {
        let id = function.schema_id();
        if id == self.schema {
            return false;
        }
        self.schema = id;
        self.values.clear();
        true
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn with(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Missing keys read as blank.
    fn read(&self, key: FieldKey) -> String {
        self.get(key).unwrap_or_default().to_string()
    }
}

/// Nested arguments plus the parallel list of top-level type tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconstructed {
    pub args: Vec<RawValue>,
    pub types: Vec<String>,
}

/// Rebuild the nested argument list from per-field text.
///
/// Never fails: a field the user has not filled in reads as `""`.
pub fn reconstruct(inputs: &[TypeSpec], form: &FormState) -> Reconstructed {
    let mut args = Vec::with_capacity(inputs.len());
    let mut types = Vec::with_capacity(inputs.len());

    for (idx, input) in inputs.iter().enumerate() {
        if input.is_tuple() {
            let members = (0..input.components.len())
                .map(|comp_idx| RawValue::Text(form.read(FieldKey::member(idx, comp_idx))))
                .collect();
            args.push(RawValue::Group(members));
        } else {
            args.push(RawValue::Text(form.read(FieldKey::top(idx))));
        }
        types.push(input.type_tag.clone());
    }

    Reconstructed { args, types }
}

/// `reconstruct` after checking the form belongs to `function`.
pub fn reconstruct_for(
    function: &FunctionSpec,
    form: &FormState,
) -> Result<Reconstructed, SchemaError> {
    if !form.is_for(function) {
        return Err(SchemaError::ForeignFormState {
            expected: function.signature(),
            found: form.schema().to_string(),
        });
    }
    Ok(reconstruct(&function.inputs, form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Mutability;

    fn fill_order() -> FunctionSpec {
        FunctionSpec::new(
            "fill",
            vec![
                TypeSpec::new("maker", "address"),
                TypeSpec::tuple(
                    "order",
                    vec![
                        TypeSpec::new("amount", "uint256"),
                        TypeSpec::new("to", "address"),
                    ],
                ),
                TypeSpec::new("ids", "uint256[]"),
            ],
            Mutability::Nonpayable,
        )
    }

    #[test]
    fn field_key_display_and_parse() {
        assert_eq!(FieldKey::top(3).to_string(), "3");
        assert_eq!(FieldKey::member(1, 0).to_string(), "1.0");
        assert_eq!("1.0".parse::<FieldKey>().unwrap(), FieldKey::member(1, 0));
        assert_eq!("7".parse::<FieldKey>().unwrap(), FieldKey::top(7));
        assert!("1.".parse::<FieldKey>().is_err());
        assert!("a".parse::<FieldKey>().is_err());
        assert!("1.2.3".parse::<FieldKey>().is_err());
    }

    #[test]
    fn field_key_serializes_as_string() {
        let json = serde_json::to_string(&FieldKey::member(2, 1)).unwrap();
        assert_eq!(json, "\"2.1\"");
        let back: FieldKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FieldKey::member(2, 1));
    }

    #[test]
    fn flatten_expands_tuples_inline() {
        let fields = flatten_function(&fill_order()).unwrap();
        let keys: Vec<String> = fields.iter().map(|f| f.key.to_string()).collect();
        assert_eq!(keys, vec!["0", "1.0", "1.1", "2"]);

        let paths: Vec<&str> = fields.iter().map(|f| f.display_path.as_str()).collect();
        assert_eq!(paths, vec!["maker", "order.amount", "order.to", "ids"]);

        assert_eq!(fields[1].type_tag, "uint256");
        assert_eq!(fields[1].parent_name.as_deref(), Some("order"));
        assert!(fields[1].is_component());
        assert_eq!(fields[3].component_index(), None);
    }

    #[test]
    fn flatten_is_idempotent() {
        let f = fill_order();
        assert_eq!(flatten(&f.inputs).unwrap(), flatten(&f.inputs).unwrap());
    }

    #[test]
    fn flatten_keeps_tuple_arrays_as_one_leaf() {
        let inputs = vec![TypeSpec {
            components: vec![TypeSpec::new("a", "uint8")],
            ..TypeSpec::new("orders", "tuple[]")
        }];
        let fields = flatten(&inputs).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].key, FieldKey::top(0));
    }

    #[test]
    fn flatten_rejects_empty_tuple() {
        let inputs = vec![TypeSpec::tuple("t", vec![])];
        assert_eq!(
            flatten(&inputs).unwrap_err(),
            SchemaError::EmptyTuple { param: "t".into() }
        );
    }

    #[test]
    fn reconstruct_is_structural_inverse_of_flatten() {
        let f = fill_order();
        let mut form = FormState::new(&f);
        for (i, field) in flatten_function(&f).unwrap().iter().enumerate() {
            form.set(field.key, format!("v{i}"));
        }

        let rebuilt = reconstruct(&f.inputs, &form);
        let tags: Vec<&str> = f.inputs.iter().map(|i| i.type_tag.as_str()).collect();
        assert_eq!(rebuilt.types, tags);
        assert_eq!(
            rebuilt.args,
            vec![
                RawValue::text("v0"),
                RawValue::Group(vec![RawValue::text("v1"), RawValue::text("v2")]),
                RawValue::text("v3"),
            ]
        );
    }

    #[test]
    fn missing_fields_read_as_blank() {
        let f = fill_order();
        let form = FormState::new(&f).with(FieldKey::member(1, 1), "0xabc");
        let rebuilt = reconstruct(&f.inputs, &form);
        assert_eq!(rebuilt.args[0], RawValue::text(""));
        assert_eq!(
            rebuilt.args[1],
            RawValue::Group(vec![RawValue::text(""), RawValue::text("0xabc")])
        );
    }

    #[test]
    fn selecting_another_function_clears_values() {
        let f = fill_order();
        let g = FunctionSpec::new(
            "approve",
            vec![TypeSpec::new("spender", "address")],
            Mutability::Nonpayable,
        );
        let mut form = FormState::new(&f).with(FieldKey::top(0), "0x1");

        assert!(!form.select(&f));
        assert_eq!(form.len(), 1);

        assert!(form.select(&g));
        assert!(form.is_empty());
        assert!(form.is_for(&g));
    }

    #[test]
    fn reconstruct_for_rejects_foreign_state() {
        let f = fill_order();
        let g = FunctionSpec::new("ping", vec![], Mutability::View);
        let form = FormState::new(&g);
        assert!(matches!(
            reconstruct_for(&f, &form),
            Err(SchemaError::ForeignFormState { .. })
        ));
        assert!(reconstruct_for(&g, &form).is_ok());
    }
}
