//! `Orchestrator`: runs one contract invocation end to end.
//!
//! ```text
//! Idle -> ArgsCoerced -> Dispatched -> Confirmed | Failed     (transaction)
//! Idle -> ArgsCoerced -> ReadCompleted | Failed               (read-only)
//! ```
//!
//! Every failure is caught here and becomes a single `Error: …` log line;
//! nothing is retried and a dispatched transaction cannot be cancelled.

use crate::output::OutputLog;
use chaincall_core::call::{ContractCall, LogLine};
use chaincall_core::codec::CallCodec;
use chaincall_core::coerce::coerce;
use chaincall_core::display::{decode_all, decode_for_display, format_event_line, DisplayValue};
use chaincall_core::error::CallError;
use chaincall_core::field::reconstruct_for;
use chaincall_core::schema::FunctionSpec;
use chaincall_core::transport::{ContractTransport, TxId};
use chaincall_observability::CallMetrics;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Which route an invocation takes, decided by mutability alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationPath {
    /// view / pure (or legacy `constant: true`): simulated, no transaction
    Read,
    /// nonpayable / payable: submitted and awaited
    Transaction,
}

impl InvocationPath {
    pub fn for_function(function: &FunctionSpec) -> Self {
        if function.is_read_only() {
            InvocationPath::Read
        } else {
            InvocationPath::Transaction
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationPath::Read => "read",
            InvocationPath::Transaction => "transaction",
        }
    }
}

/// Where an invocation is, or where it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationState {
    Idle,
    ArgsCoerced,
    Dispatched(TxId),
    Confirmed { tx: TxId, events: usize },
    ReadCompleted,
    Failed { reason: String },
}

impl InvocationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvocationState::Confirmed { .. }
                | InvocationState::ReadCompleted
                | InvocationState::Failed { .. }
        )
    }

    /// The transaction id, once one exists.
    pub fn tx(&self) -> Option<&TxId> {
        match self {
            InvocationState::Dispatched(tx) | InvocationState::Confirmed { tx, .. } => Some(tx),
            _ => None,
        }
    }
}

/// Sequences coerce → encode → dispatch → decode for one codec/transport pair.
///
/// Holds no per-invocation state; one orchestrator can serve any number of
/// independent invocations.
pub struct Orchestrator<C, T> {
    codec: C,
    transport: T,
    metrics: Option<CallMetrics>,
}

impl<C: CallCodec, T: ContractTransport> Orchestrator<C, T> {
    pub fn new(codec: C, transport: T) -> Self {
        Self {
            codec,
            transport,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: CallMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run `call`, writing its output to `out`. Never fails: errors end the
    /// invocation in `Failed` with an `Error: …` line.
    pub async fn call_function(&self, call: ContractCall<'_>, out: &mut OutputLog) -> InvocationState {
        let function = call.function;
        let path = InvocationPath::for_function(function);
        let started = Instant::now();

        info!(
            function = %function.signature(),
            path = path.as_str(),
            endpoint = self.transport.endpoint(),
            "invoking"
        );
        if let Some(m) = &self.metrics {
            m.record_invocation(&function.name, path.as_str());
        }

        let mut state = InvocationState::Idle;
        if let Err(e) = self.run(call, path, out, &mut state).await {
            warn!(function = %function.name, error = %e, "invocation failed");
            if let Some(m) = &self.metrics {
                m.record_failure(&function.name, e.kind());
            }
            out.text(format!("Error: {e}"));
            state = InvocationState::Failed {
                reason: e.to_string(),
            };
        }

        if let Some(m) = &self.metrics {
            m.record_latency(started.elapsed().as_secs_f64() * 1_000.0, path.as_str());
        }
        state
    }

    /// `call_function` into a fresh log, returning the collected lines.
    pub async fn invoke(&self, call: ContractCall<'_>) -> (InvocationState, Vec<LogLine>) {
        let mut out = OutputLog::new();
        let state = self.call_function(call, &mut out).await;
        (state, out.into_lines())
    }

    async fn run(
        &self,
        call: ContractCall<'_>,
        path: InvocationPath,
        out: &mut OutputLog,
        state: &mut InvocationState,
    ) -> Result<(), CallError> {
        let function = call.function;
        let address = call
            .address
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(CallError::MissingAddress)?;
        call.options.check(function)?;

        let rebuilt = reconstruct_for(function, call.form)?;
        let args = coerce(&rebuilt.args, &rebuilt.types, &function.inputs)?;
        *state = InvocationState::ArgsCoerced;
        debug!(function = %function.name, args = args.len(), "arguments coerced");

        let calldata = self.codec.encode_call(function, &args)?;

        match path {
            InvocationPath::Read => {
                let data = self
                    .transport
                    .simulate_call(address, &calldata, &call.options)
                    .await?;
                let value = self.codec.decode_output(function, &data)?;
                match decode_for_display(&value) {
                    DisplayValue::Scalar(s) => out.text(s),
                    seq @ DisplayValue::Sequence(_) => out.json(seq.to_pretty_json()),
                }
                *state = InvocationState::ReadCompleted;
            }
            InvocationPath::Transaction => {
                let tx = self
                    .transport
                    .submit_transaction(address, &calldata, &call.options)
                    .await?;
                out.text(format!("tx.hash: {tx}"));
                *state = InvocationState::Dispatched(tx.clone());
                info!(tx = %tx, "transaction submitted");

                let receipt = self.transport.await_confirmation(&tx).await?;
                if receipt.reverted() {
                    return Err(CallError::Reverted { tx: tx.to_string() });
                }
                out.text(format!("tx mined: {tx}"));

                let result = self.codec.decode_logs(&call.abi.events, &receipt.logs);
                for decoded in &result.decoded {
                    let args = decode_all(decoded.values());
                    out.text(format_event_line(&decoded.event, &args));
                    if let Some(m) = &self.metrics {
                        m.record_event(&decoded.event);
                    }
                }
                if let Some(m) = &self.metrics {
                    m.record_skipped(result.skipped as u64);
                }
                debug!(
                    tx = %tx,
                    decoded = result.decoded.len(),
                    skipped = result.skipped,
                    "receipt logs processed"
                );

                *state = InvocationState::Confirmed {
                    tx,
                    events: result.decoded.len(),
                };
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaincall_core::schema::{Mutability, TypeSpec};

    #[test]
    fn routing_follows_mutability() {
        let f = |m| FunctionSpec::new("f", vec![TypeSpec::new("a", "uint8")], m);
        assert_eq!(InvocationPath::for_function(&f(Mutability::View)), InvocationPath::Read);
        assert_eq!(InvocationPath::for_function(&f(Mutability::Pure)), InvocationPath::Read);
        assert_eq!(
            InvocationPath::for_function(&f(Mutability::Nonpayable)),
            InvocationPath::Transaction
        );
        assert_eq!(
            InvocationPath::for_function(&f(Mutability::Payable)),
            InvocationPath::Transaction
        );

        let mut legacy = f(Mutability::Nonpayable);
        legacy.constant = Some(true);
        assert_eq!(InvocationPath::for_function(&legacy), InvocationPath::Read);
    }

    #[test]
    fn terminal_states() {
        assert!(!InvocationState::Idle.is_terminal());
        assert!(!InvocationState::Dispatched(TxId::new("0x1")).is_terminal());
        assert!(InvocationState::ReadCompleted.is_terminal());
        assert_eq!(
            InvocationState::Confirmed {
                tx: TxId::new("0x1"),
                events: 0
            }
            .tx(),
            Some(&TxId::new("0x1"))
        );
    }
}
