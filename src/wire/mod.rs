//! Wire-level encoding primitives.
//!
//! The wire format is a flat sequence of tag+value records. A tag is a varint
//! packing a field number with a 3-bit wire type; the wire type alone decides
//! how the bytes that follow are framed. Everything above this layer (field
//! descriptors, messages) is built on [`WireReader`] and [`WireWriter`].

pub mod fixed;
pub mod reader;
pub mod varint;
pub mod writer;

pub use reader::WireReader;
pub use varint::{
    decode_zigzag32, decode_zigzag64, encode_zigzag32, encode_zigzag64, encoded_varint_len,
    MAX_VARINT_LEN,
};
pub use writer::{encoded_field_len, WireWriter};

use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::registry::FieldNumber;

/// Errors surfaced while decoding the wire format.
///
/// All decode errors are terminal for the call that hit them; the decoder
/// never resynchronizes after corruption. Offsets are byte positions in the
/// input the reader was constructed over.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    #[error("varint exceeds 10 bytes at offset {offset}")]
    MalformedVarint { offset: usize },

    #[error("input truncated at offset {offset}")]
    TruncatedInput { offset: usize },

    #[error("unrecognized wire type {value} at offset {offset}")]
    InvalidWireType { value: u8, offset: usize },

    #[error("field {field_number} declared as {expected:?} but encoded as {actual:?}")]
    WireTypeMismatch {
        field_number: FieldNumber,
        expected: WireType,
        actual: WireType,
    },

    #[error("packed block for field {field_number} ends mid-element")]
    MalformedPacked { field_number: FieldNumber },
}

/// Result type for wire-level operations.
pub type WireResult<T> = std::result::Result<T, WireError>;

/// The 3-bit framing discriminator carried in every tag.
///
/// Values 3 and 4 are the legacy group markers and 6/7 were never assigned;
/// all four are rejected as [`WireError::InvalidWireType`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

/// A field number and wire type, packed into a single varint on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub field_number: FieldNumber,
    pub wire_type: WireType,
}

impl Tag {
    pub const fn new(field_number: FieldNumber, wire_type: WireType) -> Self {
        Self {
            field_number,
            wire_type,
        }
    }

    /// The varint payload of this tag: `(field_number << 3) | wire_type`.
    pub const fn value(self) -> u64 {
        ((self.field_number as u64) << 3) | self.wire_type as u64
    }

    /// Unpacks a decoded tag varint. `offset` is where the tag started,
    /// carried into the error when the low three bits are unrecognized.
    pub fn from_value(value: u64, offset: usize) -> WireResult<Self> {
        let bits = (value & 0b111) as u8;
        let wire_type = WireType::try_from(bits)
            .map_err(|_| WireError::InvalidWireType { value: bits, offset })?;
        Ok(Self {
            field_number: (value >> 3) as FieldNumber,
            wire_type,
        })
    }

    /// Bytes this tag occupies on the wire (1-5 for valid field numbers).
    pub fn encoded_len(self) -> usize {
        encoded_varint_len(self.value())
    }
}
