//! # chaincall-exec
//!
//! Execution layer for ChainCall: the call orchestrator and the JSON-RPC
//! transport it dispatches through.
//!
//! ## Architecture
//! ```text
//! ContractCall (function + form + options)
//!       │
//!       ▼
//! reconstruct → coerce → CallCodec::encode_call
//!       │
//!       ├── read-only ──► ContractTransport::simulate_call ─► decode_output
//!       │
//!       └── state-changing ──► submit_transaction ─► await_confirmation
//!                                                       │
//!                                                       ▼
//!                                         CallCodec::decode_logs (skip unknown)
//!       │
//!       ▼
//! OutputLog (LogLine stream)   ← optional live mpsc subscriber
//! ```

pub mod config;
pub mod http;
pub mod orchestrator;
pub mod output;
pub mod rpc;

pub use config::{ConfigError, RpcConfig};
pub use http::JsonRpcTransport;
pub use orchestrator::{InvocationPath, InvocationState, Orchestrator};
pub use output::OutputLog;
