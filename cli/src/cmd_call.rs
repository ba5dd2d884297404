//! `chaincall call`: run one invocation against a JSON-RPC node.
//!
//! Output lines are streamed to stdout as the orchestrator produces them;
//! the process exits non-zero when the invocation fails.

use crate::form::{build_form, load_abi};
use anyhow::{Context, Result};
use chaincall_core::{CallOptions, ContractCall};
use chaincall_evm::EvmCodec;
use chaincall_exec::{JsonRpcTransport, InvocationState, Orchestrator, OutputLog, RpcConfig};
use chaincall_observability::CallMetrics;
use std::path::Path;
use tracing::debug;

pub struct CallArgs<'a> {
    pub abi: &'a Path,
    pub address: &'a str,
    pub function: &'a str,
    pub args: &'a [String],
    pub value: Option<&'a str>,
    pub gas_limit: Option<&'a str>,
    pub rpc: Option<&'a str>,
    pub from: Option<&'a str>,
    pub config: Option<&'a Path>,
}

pub async fn run(args: CallArgs<'_>) -> Result<()> {
    let abi = load_abi(args.abi)?;
    let function = abi.function(args.function)?;
    let form = build_form(function, args.args)?;
    let options = CallOptions::parse(function, args.value, args.gas_limit)?;

    let config = resolve_config(args.config, args.rpc, args.from)?;
    debug!(rpc = %config.rpc_url, from = ?config.from, "rpc config resolved");
    let transport = JsonRpcTransport::new(config).context("build HTTP client")?;
    let orchestrator =
        Orchestrator::new(EvmCodec::new(), transport).with_metrics(CallMetrics::global());

    let mut out = OutputLog::new();
    let mut rx = out.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            println!("{line}");
        }
    });

    let state = orchestrator
        .call_function(
            ContractCall {
                abi: &abi,
                function,
                address: Some(args.address),
                form: &form,
                options,
            },
            &mut out,
        )
        .await;
    drop(out);
    printer.await.context("output stream task")?;

    if let InvocationState::Failed { .. } = state {
        std::process::exit(1);
    }
    Ok(())
}

/// Config file first, then environment, then flag overrides.
fn resolve_config(
    file: Option<&Path>,
    rpc: Option<&str>,
    from: Option<&str>,
) -> Result<RpcConfig> {
    let mut config = match (file, rpc) {
        (Some(path), _) => RpcConfig::from_file(path)?,
        (None, Some(url)) => {
            let mut config = RpcConfig::new(url);
            config.from = std::env::var(chaincall_exec::config::FROM_ENV).ok();
            config
        }
        (None, None) => RpcConfig::from_env()?,
    };

    if let Some(url) = rpc {
        config.rpc_url = url.to_string();
    }
    if let Some(from) = from {
        config.from = Some(from.to_string());
    }
    Ok(config)
}
