//! `chaincall encode`: show what the entered arguments encode to.

use crate::form::{build_form, load_abi};
use anyhow::{bail, Result};
use chaincall_core::{coerce, encode_preview, reconstruct_for, CallCodec, FormState, FunctionSpec};
use chaincall_evm::EvmCodec;
use std::path::Path;

pub fn run(abi_path: &Path, function: &str, args: &[String], full_calldata: bool) -> Result<()> {
    let abi = load_abi(abi_path)?;
    let f = abi.function(function)?;
    let form = build_form(f, args)?;
    let codec = EvmCodec::new();

    if full_calldata {
        println!("{}", calldata_hex(&codec, f, &form)?);
        return Ok(());
    }

    let preview = encode_preview(&codec, f, &form);
    println!("{}", f.signature());
    for input in &preview.inputs {
        println!("  {} ({}): {}", input.label, input.type_tag, input.display);
    }
    if preview.has_error {
        bail!("{}", preview.encoded);
    }
    println!("Encoded: {}", preview.encoded);
    Ok(())
}

/// Selector plus parameters, `0x`-prefixed.
fn calldata_hex(codec: &EvmCodec, f: &FunctionSpec, form: &FormState) -> Result<String> {
    let rebuilt = reconstruct_for(f, form)?;
    let coerced = coerce(&rebuilt.args, &rebuilt.types, &f.inputs)?;
    let calldata = codec.encode_call(f, &coerced)?;
    Ok(format!("0x{}", hex::encode(calldata)))
}
