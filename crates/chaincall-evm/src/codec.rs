//! `EvmCodec`: the `CallCodec` implementation for EVM chains.

use alloy_dyn_abi::DynSolValue;
use chaincall_core::codec::{CallCodec, DecodedLog, LogRecord};
use chaincall_core::error::CodecError;
use chaincall_core::schema::{EventSpec, FunctionSpec};
use chaincall_core::types::{AbiValue, CoercedArgument};

use crate::{decoder, encoder, fingerprint};

/// The EVM ABI codec.
/// Stateless and cheap to clone.
#[derive(Debug, Default, Clone, Copy)]
pub struct EvmCodec;

impl EvmCodec {
    pub fn new() -> Self {
        Self
    }

    /// 4-byte selector of `function`.
    pub fn selector(function: &FunctionSpec) -> [u8; 4] {
        fingerprint::selector(&function.signature())
    }

    fn dyn_values(
        function: &FunctionSpec,
        args: &[CoercedArgument],
    ) -> Result<Vec<DynSolValue>, CodecError> {
        if args.len() != function.inputs.len() {
            return Err(CodecError::Encode {
                param: function.name.clone(),
                reason: format!(
                    "argument count mismatch: ABI has {}, got {}",
                    function.inputs.len(),
                    args.len()
                ),
            });
        }

        function
            .inputs
            .iter()
            .zip(args)
            .enumerate()
            .map(|(i, (param, arg))| {
                let path = if param.name.is_empty() {
                    format!("arg{i}")
                } else {
                    param.name.clone()
                };
                let kind = param.kind().map_err(|e| CodecError::Encode {
                    param: path.clone(),
                    reason: e.to_string(),
                })?;
                encoder::to_dyn_value(arg, &kind, &path)
            })
            .collect()
    }
}

impl CallCodec for EvmCodec {
    fn encode_call(
        &self,
        function: &FunctionSpec,
        args: &[CoercedArgument],
    ) -> Result<Vec<u8>, CodecError> {
        let mut calldata = Self::selector(function).to_vec();
        calldata.extend(self.encode_params(function, args)?);
        Ok(calldata)
    }

    fn encode_params(
        &self,
        function: &FunctionSpec,
        args: &[CoercedArgument],
    ) -> Result<Vec<u8>, CodecError> {
        let values = Self::dyn_values(function, args)?;
        Ok(DynSolValue::Tuple(values).abi_encode_params())
    }

    fn decode_output(&self, function: &FunctionSpec, data: &[u8]) -> Result<AbiValue, CodecError> {
        decoder::decode_output(function, data)
    }

    fn decode_event_log(
        &self,
        events: &[EventSpec],
        log: &LogRecord,
    ) -> Result<DecodedLog, CodecError> {
        decoder::decode_event_log(events, log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use chaincall_core::schema::{Mutability, TypeSpec};

    #[test]
    fn wrong_arg_count_returns_error() {
        let f = FunctionSpec::new(
            "transfer",
            vec![TypeSpec::new("to", "address"), TypeSpec::new("amount", "uint256")],
            Mutability::Nonpayable,
        );
        let result = EvmCodec.encode_call(&f, &[CoercedArgument::Uint(U256::from(1u8))]);
        assert!(matches!(result, Err(CodecError::Encode { .. })));
    }

    #[test]
    fn no_inputs_encodes_to_selector_only() {
        let f = FunctionSpec::new("totalSupply", vec![], Mutability::View);
        let calldata = EvmCodec.encode_call(&f, &[]).unwrap();
        assert_eq!(hex::encode(calldata), "18160ddd");
        assert!(EvmCodec.encode_params(&f, &[]).unwrap().is_empty());
    }
}
