//! # protowire - Protocol Buffers scalar wire codec
//!
//! Encoder/decoder for the Protocol Buffers binary wire format, covering the
//! primitive scalar field kinds (the varint, zigzag-varint and fixed-width
//! little-endian lanes), tag framing, repeated fields in both unpacked and
//! packed representations, and extension fields resolved through an explicit
//! registry. Serialization is byte-for-byte reproducible and sizes are
//! computable before any bytes are written.
//!
//! ## API Surface
//!
//! - **Schema**: [`FieldDescriptor`], [`FieldRegistry`] - the explicit table
//!   mapping field numbers to {kind, cardinality, packed} for intrinsic and
//!   extension fields
//! - **Values**: [`ScalarKind`], [`ScalarValue`], [`FieldValue`]
//! - **Message Building**: [`MessageBuilder`] - set/add/merge accumulator
//! - **Messages**: [`Message`] - frozen snapshots supporting `to_bytes()`,
//!   `write_to()` and exact `serialized_size()`
//! - **Wire Layer**: [`WireReader`], [`WireWriter`], [`Tag`], [`WireType`]
//!   for callers that need raw record access
//!
//! ## Quick Start
//!
//! ```rust
//! use protowire::{FieldDescriptor, FieldRegistry, Message, MessageBuilder, ScalarKind};
//!
//! # fn main() -> protowire::Result<()> {
//! let mut registry = FieldRegistry::new([
//!     FieldDescriptor::singular(1, ScalarKind::Int32),
//!     FieldDescriptor::packed(2, ScalarKind::Sint64),
//! ])?;
//! // Extensions share the field-number space but are registered explicitly.
//! registry.register_extension(FieldDescriptor::singular(1000, ScalarKind::Bool))?;
//!
//! let mut builder = MessageBuilder::new(&registry);
//! builder.set(1, -3i32)?.add(2, -70i64)?.add(2, 71i64)?.set(1000, true)?;
//! let message = builder.build();
//!
//! let bytes = message.to_bytes();
//! assert_eq!(bytes.len(), message.serialized_size());
//!
//! let decoded = Message::parse(&bytes, &registry)?;
//! assert_eq!(decoded, message);
//! # Ok(())
//! # }
//! ```
//!
//! ## Decoding Unknown Fields
//!
//! Field numbers absent from the registry are skipped, not errors: decoding
//! stays forward-compatible with schemas that have grown fields this build
//! does not know about. Malformed input (truncated records, overlong varints,
//! wire-type conflicts on *known* fields) aborts the decode call immediately;
//! the decoder never resynchronizes.
//!
//! ## Concurrency
//!
//! Everything here is synchronous call-and-return logic over in-memory
//! buffers. Builders and messages are independent values; share a
//! [`FieldRegistry`] across threads only after all extensions are registered.

use thiserror::Error;

pub mod message;
pub mod registry;
pub mod value;
pub mod wire;

pub use message::{Message, MessageBuilder};
pub use registry::{
    Cardinality, FieldDescriptor, FieldNumber, FieldRegistry, FIRST_RESERVED_FIELD_NUMBER,
    LAST_RESERVED_FIELD_NUMBER, MAX_FIELD_NUMBER,
};
pub use value::{FieldValue, ScalarKind, ScalarValue};
pub use wire::{Tag, WireError, WireReader, WireType, WireWriter};

/// Errors surfaced by the typed codec API.
///
/// Wire-level decode failures arrive wrapped as [`CodecError::Wire`]; the
/// remaining variants are registration-time or builder-API misuse, rejected
/// before any state changes.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("wire format error: {0}")]
    Wire(#[from] WireError),

    #[error("value kind does not match field {field_number} (declared {expected:?})")]
    TypeMismatch {
        field_number: FieldNumber,
        expected: ScalarKind,
    },

    #[error("field {field_number} is declared {expected:?}")]
    CardinalityMismatch {
        field_number: FieldNumber,
        expected: Cardinality,
    },

    #[error("field number {0} is not registered")]
    UnknownFieldNumber(FieldNumber),

    #[error("field number {0} is already registered")]
    DuplicateFieldNumber(FieldNumber),

    #[error("field number {0} is zero, reserved, or out of range")]
    InvalidFieldNumber(FieldNumber),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
