//! Sequential encode sink.
//!
//! A [`WireWriter`] appends tag+value records to an owned buffer. Encoding is
//! two-phase by design: [`encoded_field_len`] computes the exact byte count a
//! field will occupy before anything is written, so callers can size buffers
//! (and length prefixes) up front and the writer can emit into a single
//! pre-allocated allocation. The two paths share one representation
//! computation and cannot disagree.

use crate::registry::{Cardinality, FieldDescriptor};
use crate::value::{FieldValue, ScalarKind, ScalarValue};
use crate::CodecError;

use super::varint::{encode_varint, encode_zigzag32, encode_zigzag64, encoded_varint_len};
use super::{fixed, Tag, WireType};

/// The wire image of one scalar, resolved before any bytes move.
#[derive(Clone, Copy)]
enum WireRepr {
    Varint(u64),
    Fixed32(u32),
    Fixed64(u64),
}

impl WireRepr {
    fn encoded_len(self) -> usize {
        match self {
            WireRepr::Varint(v) => encoded_varint_len(v),
            WireRepr::Fixed32(_) => 4,
            WireRepr::Fixed64(_) => 8,
        }
    }
}

/// Resolves the wire image of `value` encoded as `kind`, or `None` when the
/// runtime representation does not belong to that kind.
fn wire_repr(kind: ScalarKind, value: &ScalarValue) -> Option<WireRepr> {
    Some(match (kind, value) {
        // Plain int32/int64 varints sign-extend negatives to the full 64-bit
        // width (ten bytes); only sint kinds get the zigzag compaction.
        (ScalarKind::Int32, ScalarValue::Int32(n)) => WireRepr::Varint(*n as i64 as u64),
        (ScalarKind::Sint32, ScalarValue::Int32(n)) => WireRepr::Varint(encode_zigzag32(*n) as u64),
        (ScalarKind::Sfixed32, ScalarValue::Int32(n)) => WireRepr::Fixed32(*n as u32),
        (ScalarKind::Uint32, ScalarValue::Uint32(n)) => WireRepr::Varint(*n as u64),
        (ScalarKind::Fixed32, ScalarValue::Uint32(n)) => WireRepr::Fixed32(*n),
        (ScalarKind::Int64, ScalarValue::Int64(n)) => WireRepr::Varint(*n as u64),
        (ScalarKind::Sint64, ScalarValue::Int64(n)) => WireRepr::Varint(encode_zigzag64(*n)),
        (ScalarKind::Sfixed64, ScalarValue::Int64(n)) => WireRepr::Fixed64(*n as u64),
        (ScalarKind::Uint64, ScalarValue::Uint64(n)) => WireRepr::Varint(*n),
        (ScalarKind::Fixed64, ScalarValue::Uint64(n)) => WireRepr::Fixed64(*n),
        (ScalarKind::Bool, ScalarValue::Bool(b)) => WireRepr::Varint(*b as u64),
        (ScalarKind::Float, ScalarValue::Float(f)) => WireRepr::Fixed32(f.to_bits()),
        (ScalarKind::Double, ScalarValue::Double(f)) => WireRepr::Fixed64(f.to_bits()),
        _ => return None,
    })
}

fn field_reprs(
    descriptor: &FieldDescriptor,
    elements: &[ScalarValue],
) -> Result<Vec<WireRepr>, CodecError> {
    elements
        .iter()
        .map(|value| {
            wire_repr(descriptor.kind, value).ok_or(CodecError::TypeMismatch {
                field_number: descriptor.number,
                expected: descriptor.kind,
            })
        })
        .collect()
}

/// Exact number of bytes [`WireWriter::write_field`] emits for this field.
pub fn encoded_field_len(
    descriptor: &FieldDescriptor,
    value: &FieldValue,
) -> Result<usize, CodecError> {
    let tag_len = Tag::new(descriptor.number, descriptor.kind.wire_type()).encoded_len();

    match (descriptor.cardinality, value) {
        (Cardinality::Singular, FieldValue::Singular(v)) => {
            let repr = wire_repr(descriptor.kind, v).ok_or(CodecError::TypeMismatch {
                field_number: descriptor.number,
                expected: descriptor.kind,
            })?;
            Ok(tag_len + repr.encoded_len())
        }
        (Cardinality::Repeated, FieldValue::Repeated(elements)) => {
            let reprs = field_reprs(descriptor, elements)?;
            if descriptor.packed {
                if reprs.is_empty() {
                    return Ok(0);
                }
                let inner: usize = reprs.iter().map(|r| r.encoded_len()).sum();
                let packed_tag_len =
                    Tag::new(descriptor.number, WireType::LengthDelimited).encoded_len();
                Ok(packed_tag_len + encoded_varint_len(inner as u64) + inner)
            } else {
                let values: usize = reprs.iter().map(|r| r.encoded_len()).sum();
                Ok(reprs.len() * tag_len + values)
            }
        }
        (Cardinality::Singular, FieldValue::Repeated(_)) => Err(CodecError::CardinalityMismatch {
            field_number: descriptor.number,
            expected: Cardinality::Singular,
        }),
        (Cardinality::Repeated, FieldValue::Singular(_)) => Err(CodecError::CardinalityMismatch {
            field_number: descriptor.number,
            expected: Cardinality::Repeated,
        }),
    }
}

/// Output sink accumulating encoded tag+value records.
#[derive(Default)]
pub struct WireWriter {
    out: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer whose buffer is pre-allocated for `capacity` bytes, usually
    /// obtained from [`encoded_field_len`] sums.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Consumes the writer, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    pub fn write_varint(&mut self, value: u64) {
        encode_varint(value, &mut self.out);
    }

    pub fn write_fixed32(&mut self, value: u32) {
        fixed::encode_fixed32(value, &mut self.out);
    }

    pub fn write_fixed64(&mut self, value: u64) {
        fixed::encode_fixed64(value, &mut self.out);
    }

    pub fn write_tag(&mut self, tag: Tag) {
        self.write_varint(tag.value());
    }

    fn write_repr(&mut self, repr: WireRepr) {
        match repr {
            WireRepr::Varint(v) => self.write_varint(v),
            WireRepr::Fixed32(v) => self.write_fixed32(v),
            WireRepr::Fixed64(v) => self.write_fixed64(v),
        }
    }

    /// Emits one field.
    ///
    /// Singular fields always produce exactly one tag+value pair, even for
    /// zero/false values: presence is explicit. Repeated fields produce one
    /// pair per element, or one length-delimited block when the descriptor
    /// carries the packed hint; an empty packed field emits nothing.
    pub fn write_field(
        &mut self,
        descriptor: &FieldDescriptor,
        value: &FieldValue,
    ) -> Result<(), CodecError> {
        match (descriptor.cardinality, value) {
            (Cardinality::Singular, FieldValue::Singular(v)) => {
                let repr = wire_repr(descriptor.kind, v).ok_or(CodecError::TypeMismatch {
                    field_number: descriptor.number,
                    expected: descriptor.kind,
                })?;
                self.write_tag(Tag::new(descriptor.number, descriptor.kind.wire_type()));
                self.write_repr(repr);
                Ok(())
            }
            (Cardinality::Repeated, FieldValue::Repeated(elements)) => {
                let reprs = field_reprs(descriptor, elements)?;
                if descriptor.packed {
                    if reprs.is_empty() {
                        return Ok(());
                    }
                    let inner: usize = reprs.iter().map(|r| r.encoded_len()).sum();
                    self.write_tag(Tag::new(descriptor.number, WireType::LengthDelimited));
                    self.write_varint(inner as u64);
                    for repr in reprs {
                        self.write_repr(repr);
                    }
                } else {
                    let tag = Tag::new(descriptor.number, descriptor.kind.wire_type());
                    for repr in reprs {
                        self.write_tag(tag);
                        self.write_repr(repr);
                    }
                }
                Ok(())
            }
            (Cardinality::Singular, FieldValue::Repeated(_)) => {
                Err(CodecError::CardinalityMismatch {
                    field_number: descriptor.number,
                    expected: Cardinality::Singular,
                })
            }
            (Cardinality::Repeated, FieldValue::Singular(_)) => {
                Err(CodecError::CardinalityMismatch {
                    field_number: descriptor.number,
                    expected: Cardinality::Repeated,
                })
            }
        }
    }
}
