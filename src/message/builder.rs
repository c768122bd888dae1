//! Mutable field-state accumulator.
//!
//! The builder is where every mutation lives: typed set/add calls, merges
//! from another message, and the wire decode loop. [`MessageBuilder::build`]
//! freezes the accumulated state into an independently owned [`Message`] and
//! leaves the builder usable for further mutation.

use std::collections::BTreeMap;
use std::io::Read;

use tracing::{debug, trace};

use crate::registry::{Cardinality, FieldDescriptor, FieldNumber, FieldRegistry};
use crate::value::{FieldValue, ScalarValue};
use crate::wire::{WireError, WireReader, WireType};
use crate::CodecError;

use super::Message;

/// Accumulates field values keyed by a [`FieldRegistry`], then freezes them
/// into [`Message`] snapshots.
///
/// Misuse (wrong kind, wrong cardinality, unregistered number) is rejected
/// before any state changes, so a failed call never disturbs values already
/// accumulated for other fields.
#[derive(Debug)]
pub struct MessageBuilder<'r> {
    registry: &'r FieldRegistry,
    // Descriptor travels with the value so built messages stay
    // self-contained.
    fields: BTreeMap<FieldNumber, (FieldDescriptor, FieldValue)>,
}

impl<'r> MessageBuilder<'r> {
    /// An empty builder over `registry`.
    pub fn new(registry: &'r FieldRegistry) -> Self {
        Self {
            registry,
            fields: BTreeMap::new(),
        }
    }

    fn descriptor_for(
        &self,
        number: FieldNumber,
        cardinality: Cardinality,
        value: &ScalarValue,
    ) -> Result<FieldDescriptor, CodecError> {
        let descriptor = *self
            .registry
            .lookup(number)
            .ok_or(CodecError::UnknownFieldNumber(number))?;
        if descriptor.cardinality != cardinality {
            return Err(CodecError::CardinalityMismatch {
                field_number: number,
                expected: descriptor.cardinality,
            });
        }
        if !descriptor.kind.matches(value) {
            return Err(CodecError::TypeMismatch {
                field_number: number,
                expected: descriptor.kind,
            });
        }
        Ok(descriptor)
    }

    /// Sets a singular field, replacing any previous value (last write wins).
    pub fn set(
        &mut self,
        number: FieldNumber,
        value: impl Into<ScalarValue>,
    ) -> Result<&mut Self, CodecError> {
        let value = value.into();
        let descriptor = self.descriptor_for(number, Cardinality::Singular, &value)?;
        self.fields
            .insert(number, (descriptor, FieldValue::Singular(value)));
        Ok(self)
    }

    /// Appends to a repeated field, creating the sequence on first use.
    /// Call order is element order.
    pub fn add(
        &mut self,
        number: FieldNumber,
        value: impl Into<ScalarValue>,
    ) -> Result<&mut Self, CodecError> {
        let value = value.into();
        let descriptor = self.descriptor_for(number, Cardinality::Repeated, &value)?;
        match self
            .fields
            .entry(number)
            .or_insert((descriptor, FieldValue::Repeated(Vec::new())))
        {
            (_, FieldValue::Repeated(elements)) => elements.push(value),
            (_, slot) => *slot = FieldValue::Repeated(vec![value]),
        }
        Ok(self)
    }

    /// Removes any accumulated value for `number`.
    pub fn clear(&mut self, number: FieldNumber) -> &mut Self {
        self.fields.remove(&number);
        self
    }

    /// The accumulated value of field `number`, if any.
    pub fn field(&self, number: FieldNumber) -> Option<&FieldValue> {
        self.fields.get(&number).map(|(_, value)| value)
    }

    /// Number of fields currently holding a value.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Merges another message's fields into this builder.
    ///
    /// Singular fields are overwritten (`other` wins); repeated fields are
    /// concatenated with this builder's elements first. Merging the same
    /// message twice therefore doubles its repeated elements; that asymmetry
    /// is part of the format's merge semantics, not an accident.
    pub fn merge_message(&mut self, other: &Message) -> &mut Self {
        for (descriptor, value) in other.iter() {
            match value {
                FieldValue::Singular(v) => {
                    self.fields
                        .insert(descriptor.number, (*descriptor, FieldValue::Singular(*v)));
                }
                FieldValue::Repeated(elements) => {
                    match self
                        .fields
                        .entry(descriptor.number)
                        .or_insert((*descriptor, FieldValue::Repeated(Vec::new())))
                    {
                        (_, FieldValue::Repeated(existing)) => {
                            existing.extend(elements.iter().copied())
                        }
                        (_, slot) => *slot = FieldValue::Repeated(elements.clone()),
                    }
                }
            }
        }
        self
    }

    /// Runs the wire decode loop over `input`, applying each record to this
    /// builder's state.
    ///
    /// Known singular fields are overwritten, known repeated fields appended
    /// (element-wise for their own wire type, block-wise for packed
    /// occurrences; both forms may be mixed freely across the stream).
    /// Unknown field numbers are skipped. A wire error aborts the call
    /// immediately.
    pub fn merge_from_slice(&mut self, input: &[u8]) -> Result<&mut Self, CodecError> {
        let mut reader = WireReader::new(input);
        while let Some(tag) = reader.next_tag()? {
            let descriptor = match self.registry.lookup(tag.field_number) {
                Some(d) => *d,
                None => {
                    trace!(
                        field_number = tag.field_number,
                        wire_type = ?tag.wire_type,
                        offset = reader.position(),
                        "skipping unknown field"
                    );
                    reader.skip_value(tag.wire_type)?;
                    continue;
                }
            };

            let declared = descriptor.kind.wire_type();
            match descriptor.cardinality {
                Cardinality::Singular => {
                    if tag.wire_type != declared {
                        return Err(WireError::WireTypeMismatch {
                            field_number: descriptor.number,
                            expected: declared,
                            actual: tag.wire_type,
                        }
                        .into());
                    }
                    let value = reader.read_scalar(descriptor.kind)?;
                    self.fields
                        .insert(descriptor.number, (descriptor, FieldValue::Singular(value)));
                }
                Cardinality::Repeated => {
                    let decoded = if tag.wire_type == declared {
                        vec![reader.read_scalar(descriptor.kind)?]
                    } else if tag.wire_type == WireType::LengthDelimited {
                        reader.read_packed(descriptor.kind, descriptor.number)?
                    } else {
                        return Err(WireError::WireTypeMismatch {
                            field_number: descriptor.number,
                            expected: declared,
                            actual: tag.wire_type,
                        }
                        .into());
                    };
                    match self
                        .fields
                        .entry(descriptor.number)
                        .or_insert((descriptor, FieldValue::Repeated(Vec::new())))
                    {
                        (_, FieldValue::Repeated(elements)) => elements.extend(decoded),
                        (_, slot) => *slot = FieldValue::Repeated(decoded),
                    }
                }
            }
        }
        Ok(self)
    }

    /// Drains `source` to end-of-stream and merges the buffered bytes.
    ///
    /// The stream is consumed exactly once, including when decoding fails
    /// afterwards; the format has no internal framing, so end-of-stream is
    /// the only record terminator.
    pub fn merge_from_reader<R: Read>(&mut self, mut source: R) -> Result<&mut Self, CodecError> {
        let mut buffer = Vec::new();
        source.read_to_end(&mut buffer)?;
        self.merge_from_slice(&buffer)
    }

    /// Freezes the current state into an independently owned [`Message`].
    ///
    /// The snapshot is a deep copy: the builder remains usable and later
    /// mutations never reach messages already built. Building twice without
    /// intervening mutation yields value-equal messages.
    pub fn build(&self) -> Message {
        debug!(fields = self.fields.len(), "freezing message snapshot");
        Message::from_entries(self.fields.values().cloned().collect())
    }
}
