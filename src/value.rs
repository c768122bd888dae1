//! Scalar value model.
//!
//! Thirteen primitive field kinds share seven runtime representations: the
//! kind decides the wire encoding (plain varint, zigzag varint, fixed width),
//! the value carries the decoded payload. sint32 and sfixed32 decode into the
//! same `i32` representation as int32, and so on; only the bytes differ.

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::wire::WireType;

/// The primitive field kinds supported by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum ScalarKind {
    Int32,
    Uint32,
    Sint32,
    Fixed32,
    Sfixed32,
    Int64,
    Uint64,
    Sint64,
    Fixed64,
    Sfixed64,
    Bool,
    Float,
    Double,
}

impl ScalarKind {
    /// The wire type a value of this kind is framed as when not packed.
    pub const fn wire_type(self) -> WireType {
        match self {
            ScalarKind::Int32
            | ScalarKind::Uint32
            | ScalarKind::Sint32
            | ScalarKind::Int64
            | ScalarKind::Uint64
            | ScalarKind::Sint64
            | ScalarKind::Bool => WireType::Varint,
            ScalarKind::Fixed32 | ScalarKind::Sfixed32 | ScalarKind::Float => WireType::Fixed32,
            ScalarKind::Fixed64 | ScalarKind::Sfixed64 | ScalarKind::Double => WireType::Fixed64,
        }
    }

    /// Whether `value` carries the runtime representation this kind expects.
    pub fn matches(self, value: &ScalarValue) -> bool {
        matches!(
            (self, value),
            (
                ScalarKind::Int32 | ScalarKind::Sint32 | ScalarKind::Sfixed32,
                ScalarValue::Int32(_)
            ) | (
                ScalarKind::Uint32 | ScalarKind::Fixed32,
                ScalarValue::Uint32(_)
            ) | (
                ScalarKind::Int64 | ScalarKind::Sint64 | ScalarKind::Sfixed64,
                ScalarValue::Int64(_)
            ) | (
                ScalarKind::Uint64 | ScalarKind::Fixed64,
                ScalarValue::Uint64(_)
            ) | (ScalarKind::Bool, ScalarValue::Bool(_))
                | (ScalarKind::Float, ScalarValue::Float(_))
                | (ScalarKind::Double, ScalarValue::Double(_))
        )
    }
}

/// One decoded primitive value.
///
/// Floats and doubles compare bit-for-bit as far as the wire is concerned,
/// but `PartialEq` here is the ordinary IEEE comparison; round-trip tests
/// compare the re-encoded bytes when NaN handling matters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum ScalarValue {
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Bool(bool),
    Float(f32),
    Double(f64),
}

macro_rules! scalar_accessor {
    ($name:ident, $branch:ident, $t:ty) => {
        pub fn $name(&self) -> Option<$t> {
            if let Self::$branch(v) = self {
                Some(*v)
            } else {
                None
            }
        }
    };
}

impl ScalarValue {
    scalar_accessor!(as_i32, Int32, i32);
    scalar_accessor!(as_u32, Uint32, u32);
    scalar_accessor!(as_i64, Int64, i64);
    scalar_accessor!(as_u64, Uint64, u64);
    scalar_accessor!(as_bool, Bool, bool);
    scalar_accessor!(as_f32, Float, f32);
    scalar_accessor!(as_f64, Double, f64);
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<u32> for ScalarValue {
    fn from(v: u32) -> Self {
        Self::Uint32(v)
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<u64> for ScalarValue {
    fn from(v: u64) -> Self {
        Self::Uint64(v)
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for ScalarValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

/// The value state of one field: a single scalar or an ordered sequence.
///
/// Repeated sequences preserve insertion order and keep duplicates; merge
/// concatenation relies on both.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FieldValue {
    Singular(ScalarValue),
    Repeated(Vec<ScalarValue>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            FieldValue::Singular(v) => Some(v),
            FieldValue::Repeated(_) => None,
        }
    }

    pub fn as_repeated(&self) -> Option<&[ScalarValue]> {
        match self {
            FieldValue::Singular(_) => None,
            FieldValue::Repeated(v) => Some(v),
        }
    }

    /// Element at `index`: the scalar itself for singular fields at index 0,
    /// the sequence element for repeated fields.
    pub fn get(&self, index: usize) -> Option<&ScalarValue> {
        match self {
            FieldValue::Singular(v) if index == 0 => Some(v),
            FieldValue::Singular(_) => None,
            FieldValue::Repeated(v) => v.get(index),
        }
    }

    /// Number of scalar elements carried.
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Singular(_) => 1,
            FieldValue::Repeated(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
