//! Types describing one invocation request and its output lines.

use crate::error::CallError;
use crate::field::FormState;
use crate::schema::{ContractAbi, FunctionSpec};
use alloy_primitives::utils::parse_ether;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction options outside the function's own inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOptions {
    /// Native value to send, in wei. Payable functions only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
}

impl CallOptions {
    /// Build options from user text. `ether` is a decimal ether amount
    /// (`"0.5"`), `gas` a decimal gas limit. Blank strings mean absent.
    pub fn parse(
        function: &FunctionSpec,
        ether: Option<&str>,
        gas: Option<&str>,
    ) -> Result<Self, CallError> {
        let ether = ether.map(str::trim).filter(|s| !s.is_empty());
        let gas = gas.map(str::trim).filter(|s| !s.is_empty());

        let value = match ether {
            Some(text) => {
                let wei = parse_ether(text).map_err(|e| CallError::InvalidOption {
                    reason: format!("invalid ether amount {text:?}: {e}"),
                })?;
                Some(wei)
            }
            None => None,
        };

        let options = CallOptions {
            value,
            gas_limit: gas
                .map(|text| {
                    text.parse::<u64>().map_err(|e| CallError::InvalidOption {
                        reason: format!("invalid gas limit {text:?}: {e}"),
                    })
                })
                .transpose()?,
        };
        options.check(function)?;
        Ok(options)
    }

    /// Reject a non-zero value on a function that cannot receive one.
    pub fn check(&self, function: &FunctionSpec) -> Result<(), CallError> {
        match self.value {
            Some(v) if !v.is_zero() && !function.is_payable() => Err(CallError::InvalidOption {
                reason: format!(
                    "function {} is {} and cannot receive value",
                    function.name, function.mutability
                ),
            }),
            _ => Ok(()),
        }
    }
}

/// Everything needed to run one invocation.
#[derive(Debug, Clone, Copy)]
pub struct ContractCall<'a> {
    /// Interface of the target; its events decode the receipt logs
    pub abi: &'a ContractAbi,
    pub function: &'a FunctionSpec,
    /// Deployed contract address. `None` when the user has not picked one.
    pub address: Option<&'a str>,
    pub form: &'a FormState,
    pub options: CallOptions,
}

/// One line of invocation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "line", rename_all = "lowercase")]
pub enum LogLine {
    /// Plain text
    Text(String),
    /// Pre-formatted JSON
    Json(String),
}

impl LogLine {
    pub fn text(s: impl Into<String>) -> Self {
        LogLine::Text(s.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            LogLine::Text(s) | LogLine::Json(s) => s,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, LogLine::Json(_))
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
