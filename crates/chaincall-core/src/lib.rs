//! # chaincall-core
//!
//! The argument/result marshalling engine behind ChainCall.
//!
//! ```text
//! ContractAbi -> flatten -> (form) -> reconstruct -> coerce -> CallCodec
//!                                                       |
//!        display <- decode_for_display <- AbiValue <----+
//! ```
//!
//! The binary codec and the network transport are traits defined here and
//! implemented in `chaincall-evm` and `chaincall-exec`.

pub mod call;
pub mod codec;
pub mod coerce;
pub mod display;
pub mod error;
pub mod field;
pub mod preview;
pub mod schema;
pub mod transport;
pub mod types;

pub use call::{CallOptions, ContractCall, LogLine};
pub use codec::{CallCodec, DecodedLog, LogDecodeResult, LogRecord};
pub use coerce::coerce;
pub use display::{decode_for_display, format_event_line, DisplayValue};
pub use error::{CallError, CodecError, CoerceError, SchemaError, TransportError};
pub use field::{
    flatten, flatten_function, reconstruct, reconstruct_for, FieldKey, FlattenedField, FormState,
    Reconstructed,
};
pub use preview::{encode_preview, EncodePreview, PreviewInput};
pub use schema::{ContractAbi, EventSpec, FunctionSpec, Mutability, SchemaId, TypeSpec};
pub use transport::{ContractTransport, Receipt, TxId};
pub use types::{AbiValue, CoercedArgument, ParamKind, RawValue};
