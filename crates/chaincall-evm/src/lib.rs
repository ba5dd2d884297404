//! # chaincall-evm
//!
//! EVM ABI codec implementing the `CallCodec` trait.
//! Works for Ethereum and any EVM-compatible chain.
//!
//! ## Implementation notes
//! - Uses `alloy-dyn-abi` for ABI encode/decode
//! - Selector = keccak256(signature)[..4], event topic = keccak256(signature)
//! - Topics[1..] → indexed parameters (each 32 bytes, ABI-encoded)
//! - `data` → non-indexed parameters (ABI-encoded tuple)

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod fingerprint;
pub mod normalizer;

pub use codec::EvmCodec;
