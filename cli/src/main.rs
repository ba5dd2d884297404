//! ChainCall CLI: fill in a contract function's inputs and call it.
//!
//! # Commands
//! ```
//! chaincall functions --abi <path.json>
//! chaincall fields    --abi <path.json> --function <name|signature> [--json]
//! chaincall encode    --abi <path.json> --function <name> --arg KEY=VALUE... [--calldata]
//! chaincall call      --abi <path.json> --address <addr> --function <name> --arg KEY=VALUE...
//! ```
//!
//! `KEY` is either a field path as listed by `fields` (`to`, `order.amount`)
//! or a raw field key (`0`, `1.2`).

use anyhow::Result;
use chaincall_observability::{init_tracing, LogConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd_call;
mod cmd_encode;
mod cmd_inspect;
mod form;

#[derive(Parser)]
#[command(
    name = "chaincall",
    about = "Call smart-contract functions from their ABI: ChainCall CLI",
    long_about = "
ChainCall CLI: turn an ABI into fillable fields, coerce the entered text into
typed arguments, and either simulate (view/pure) or submit (nonpayable/payable)
the call. Receipt logs are decoded against the ABI's events.

ENVIRONMENT VARIABLES:
  CHAINCALL_RPC_URL    JSON-RPC endpoint for `call`
  CHAINCALL_FROM       Node-managed sender account for transactions
  CHAINCALL_LOG        Log filter, e.g. `debug` or `warn,chaincall_exec=debug`
  CHAINCALL_LOG_JSON   Set to 1 for JSON logs on stderr
",
    version
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the functions and events in an ABI
    Functions {
        /// ABI JSON array or compiler artifact
        #[arg(long)]
        abi: PathBuf,
    },

    /// Show the flattened input fields of a function
    Fields {
        #[arg(long)]
        abi: PathBuf,
        /// Function name, or full signature for overloads
        #[arg(long)]
        function: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Preview the argument encoding without calling anything
    Encode {
        #[arg(long)]
        abi: PathBuf,
        #[arg(long)]
        function: String,
        /// Field value, KEY=VALUE (repeatable)
        #[arg(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
        /// Print the full calldata (selector + params) instead of the preview
        #[arg(long)]
        calldata: bool,
    },

    /// Call a function on a deployed contract
    Call {
        #[arg(long)]
        abi: PathBuf,
        /// Contract address
        #[arg(long)]
        address: String,
        #[arg(long)]
        function: String,
        #[arg(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
        /// Native value to send, in ether (payable functions only)
        #[arg(long)]
        value: Option<String>,
        /// Gas limit
        #[arg(long)]
        gas_limit: Option<String>,
        /// RPC URL (overrides config file and CHAINCALL_RPC_URL)
        #[arg(long)]
        rpc: Option<String>,
        /// Sender account (overrides config file and CHAINCALL_FROM)
        #[arg(long)]
        from: Option<String>,
        /// YAML or JSON RPC config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config.level = "debug".to_string();
    }
    log_config.json |= cli.json_logs;
    init_tracing(&log_config);

    match cli.command {
        Commands::Functions { abi } => cmd_inspect::functions(&abi),

        Commands::Fields { abi, function, json } => cmd_inspect::fields(&abi, &function, json),

        Commands::Encode { abi, function, args, calldata } => {
            cmd_encode::run(&abi, &function, &args, calldata)
        }

        Commands::Call {
            abi,
            address,
            function,
            args,
            value,
            gas_limit,
            rpc,
            from,
            config,
        } => {
            cmd_call::run(cmd_call::CallArgs {
                abi: &abi,
                address: &address,
                function: &function,
                args: &args,
                value: value.as_deref(),
                gas_limit: gas_limit.as_deref(),
                rpc: rpc.as_deref(),
                from: from.as_deref(),
                config: config.as_deref(),
            })
            .await
        }
    }
}
