//! `chaincall functions` and `chaincall fields`: read-only ABI inspection.

use crate::form::load_abi;
use anyhow::Result;
use chaincall_core::{flatten_function, FunctionSpec};
use chaincall_evm::fingerprint::event_topic;
use chaincall_evm::EvmCodec;
use std::path::Path;

pub fn functions(abi_path: &Path) -> Result<()> {
    let abi = load_abi(abi_path)?;

    if !abi.name.is_empty() {
        println!("Contract: {}", abi.name);
    }
    println!("Functions ({}):", abi.functions.len());
    for f in &abi.functions {
        println!("{}", function_line(f));
    }

    println!("Events ({}):", abi.events.len());
    for e in &abi.events {
        let anonymous = if e.anonymous { " [anonymous]" } else { "" };
        println!("  {}  {}{}", event_topic(&e.signature()), e.signature(), anonymous);
    }
    Ok(())
}

pub fn fields(abi_path: &Path, function: &str, as_json: bool) -> Result<()> {
    let abi = load_abi(abi_path)?;
    let f = abi.function(function)?;
    let fields = flatten_function(f)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    println!("{}  [{}]", f.signature(), f.mutability);
    if fields.is_empty() {
        println!("  (no inputs)");
    }
    for field in &fields {
        println!("  {:<6} {:<24} {}", field.key.to_string(), field.display_path, field.type_tag);
    }
    Ok(())
}

/// `  0x<selector>  <mutability>  <signature>`
fn function_line(f: &FunctionSpec) -> String {
    format!(
        "  0x{}  {:<10}  {}",
        hex::encode(EvmCodec::selector(f)),
        f.mutability.to_string(),
        f.signature()
    )
}
