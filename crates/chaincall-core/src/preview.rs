//! Encode preview: what the user has entered and what it encodes to,
//! without dispatching anything.

use crate::codec::CallCodec;
use crate::coerce::coerce;
use crate::error::CallError;
use crate::field::{reconstruct_for, FormState};
use crate::schema::FunctionSpec;
use serde::Serialize;

/// One top-level input as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewInput {
    pub label: String,
    pub type_tag: String,
    /// Entered text; tuples are rendered `[a, b]`
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodePreview {
    pub inputs: Vec<PreviewInput>,
    /// `0x`-prefixed parameter encoding (no selector), `No inputs`, or the
    /// error message when `has_error` is set
    pub encoded: String,
    pub has_error: bool,
}

pub const NO_INPUTS: &str = "No inputs";

/// Reconstruct, coerce and encode the form's parameters.
pub fn encode_preview(
    codec: &dyn CallCodec,
    function: &FunctionSpec,
    form: &FormState,
) -> EncodePreview {
    if function.inputs.is_empty() {
        return EncodePreview {
            inputs: Vec::new(),
            encoded: NO_INPUTS.to_string(),
            has_error: false,
        };
    }

    let rebuilt = match reconstruct_for(function, form) {
        Ok(r) => r,
        Err(e) => {
            return EncodePreview {
                inputs: Vec::new(),
                encoded: e.to_string(),
                has_error: true,
            }
        }
    };

    let inputs = function
        .inputs
        .iter()
        .zip(&rebuilt.args)
        .enumerate()
        .map(|(i, (spec, raw))| PreviewInput {
            label: if spec.name.is_empty() {
                format!("arg{i}")
            } else {
                spec.name.clone()
            },
            type_tag: spec.type_tag.clone(),
            display: raw.to_string(),
        })
        .collect();

    let encoded = coerce(&rebuilt.args, &rebuilt.types, &function.inputs)
        .map_err(CallError::from)
        .and_then(|args| codec.encode_params(function, &args).map_err(CallError::from));

    match encoded {
        Ok(bytes) => EncodePreview {
            inputs,
            encoded: format!("0x{}", hex::encode(bytes)),
            has_error: false,
        },
        Err(e) => EncodePreview {
            inputs,
            encoded: e.to_string(),
            has_error: true,
        },
    }
}
