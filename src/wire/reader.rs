//! Sequential decode cursor.
//!
//! A [`WireReader`] walks a byte buffer one tag+value record at a time.
//! Bounds are checked at every step and errors carry the byte offset where
//! decoding stopped. The reader has no schema knowledge of its own: callers
//! look up each tag's field number in their registry and then ask for a value
//! of the declared kind, a packed block, or a skip.

use crate::registry::FieldNumber;
use crate::value::{ScalarKind, ScalarValue};

use super::varint::{decode_varint, decode_zigzag32, decode_zigzag64};
use super::{fixed, Tag, WireError, WireResult, WireType};

/// Cursor over an input buffer containing consecutive tag+value records.
pub struct WireReader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset from the start of the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True once every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// Decodes one varint at the cursor.
    pub fn read_varint(&mut self) -> WireResult<u64> {
        let (value, used) = decode_varint(self.rest(), self.pos)?;
        self.pos += used;
        Ok(value)
    }

    /// Reads the next tag, or `None` at clean end of input.
    ///
    /// A tag that starts but does not finish before the input ends is
    /// [`WireError::TruncatedInput`].
    pub fn next_tag(&mut self) -> WireResult<Option<Tag>> {
        if self.is_at_end() {
            return Ok(None);
        }
        let start = self.pos;
        let value = self.read_varint()?;
        Tag::from_value(value, start).map(Some)
    }

    fn read_fixed32(&mut self) -> WireResult<u32> {
        let value = fixed::decode_fixed32(self.rest(), self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    fn read_fixed64(&mut self) -> WireResult<u64> {
        let value = fixed::decode_fixed64(self.rest(), self.pos)?;
        self.pos += 8;
        Ok(value)
    }

    /// Decodes one value of `kind` at the cursor.
    ///
    /// The caller is expected to have already checked the tag's wire type
    /// against `kind.wire_type()`; this only frames the bytes.
    pub fn read_scalar(&mut self, kind: ScalarKind) -> WireResult<ScalarValue> {
        Ok(match kind {
            // Plain varints: int32 negatives arrive sign-extended to 64 bits,
            // so truncating back to 32 recovers the value.
            ScalarKind::Int32 => ScalarValue::Int32(self.read_varint()? as i32),
            ScalarKind::Int64 => ScalarValue::Int64(self.read_varint()? as i64),
            ScalarKind::Uint32 => ScalarValue::Uint32(self.read_varint()? as u32),
            ScalarKind::Uint64 => ScalarValue::Uint64(self.read_varint()?),
            ScalarKind::Sint32 => ScalarValue::Int32(decode_zigzag32(self.read_varint()? as u32)),
            ScalarKind::Sint64 => ScalarValue::Int64(decode_zigzag64(self.read_varint()?)),
            ScalarKind::Bool => ScalarValue::Bool(self.read_varint()? != 0),
            ScalarKind::Fixed32 => ScalarValue::Uint32(self.read_fixed32()?),
            ScalarKind::Sfixed32 => ScalarValue::Int32(self.read_fixed32()? as i32),
            ScalarKind::Float => ScalarValue::Float(f32::from_bits(self.read_fixed32()?)),
            ScalarKind::Fixed64 => ScalarValue::Uint64(self.read_fixed64()?),
            ScalarKind::Sfixed64 => ScalarValue::Int64(self.read_fixed64()? as i64),
            ScalarKind::Double => ScalarValue::Double(f64::from_bits(self.read_fixed64()?)),
        })
    }

    /// Decodes a length-delimited packed block of `kind` elements.
    ///
    /// The block must be exhausted exactly; a trailing partial element is
    /// [`WireError::MalformedPacked`]. `field_number` is only for error
    /// context.
    pub fn read_packed(
        &mut self,
        kind: ScalarKind,
        field_number: FieldNumber,
    ) -> WireResult<Vec<ScalarValue>> {
        let len = self.read_varint()? as usize;
        if self.rest().len() < len {
            return Err(WireError::TruncatedInput {
                offset: self.input.len(),
            });
        }

        // Sub-reader bounded to the block but sharing absolute offsets.
        let mut block = WireReader {
            input: &self.input[..self.pos + len],
            pos: self.pos,
        };
        let mut values = Vec::new();
        while !block.is_at_end() {
            match block.read_scalar(kind) {
                Ok(value) => values.push(value),
                Err(WireError::TruncatedInput { .. }) => {
                    return Err(WireError::MalformedPacked { field_number })
                }
                Err(e) => return Err(e),
            }
        }
        self.pos += len;
        Ok(values)
    }

    /// Consumes and discards one value framed as `wire_type`.
    ///
    /// This is how unknown field numbers stay non-fatal: the bytes are walked
    /// past without building a value.
    pub fn skip_value(&mut self, wire_type: WireType) -> WireResult<()> {
        match wire_type {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed32 => {
                self.read_fixed32()?;
            }
            WireType::Fixed64 => {
                self.read_fixed64()?;
            }
            WireType::LengthDelimited => {
                let len = self.read_varint()? as usize;
                if self.rest().len() < len {
                    return Err(WireError::TruncatedInput {
                        offset: self.input.len(),
                    });
                }
                self.pos += len;
            }
        }
        Ok(())
    }
}
