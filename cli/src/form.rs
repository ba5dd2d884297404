//! Shared helpers: load an ABI file, turn `KEY=VALUE` flags into a form.

use anyhow::{anyhow, bail, Context, Result};
use chaincall_core::{flatten_function, ContractAbi, FieldKey, FormState, FunctionSpec};
use std::path::Path;

pub fn load_abi(path: &Path) -> Result<ContractAbi> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read ABI file '{}'", path.display()))?;
    ContractAbi::parse(&text).with_context(|| format!("parse ABI file '{}'", path.display()))
}

/// Fill a fresh form for `function` from `KEY=VALUE` pairs.
///
/// `KEY` matches a field's display path first, then parses as a raw key.
/// Fields left out stay blank.
pub fn build_form(function: &FunctionSpec, pairs: &[String]) -> Result<FormState> {
    let fields = flatten_function(function)?;
    let mut form = FormState::new(function);

    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{pair}'"))?;
        let key = key.trim();

        let field_key = match fields.iter().find(|f| f.display_path == key) {
            Some(field) => field.key,
            None => key
                .parse::<FieldKey>()
                .map_err(|_| anyhow!("no field '{key}' in {}", function.signature()))?,
        };
        if !fields.iter().any(|f| f.key == field_key) {
            bail!("no field '{key}' in {}", function.signature());
        }
        form.set(field_key, value);
    }

    Ok(form)
}
