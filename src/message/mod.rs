//! Immutable messages and their builder.
//!
//! A [`Message`] is a frozen snapshot of field state: a list of
//! (descriptor, value) pairs sorted ascending by field number, owned outright
//! with no aliasing back to whatever produced it. Mutation happens only in
//! [`MessageBuilder`]; freezing is a copy.

pub mod builder;

pub use builder::MessageBuilder;

use std::io;

use crate::registry::{FieldDescriptor, FieldNumber, FieldRegistry};
use crate::value::FieldValue;
use crate::wire::writer::encoded_field_len;
use crate::wire::WireWriter;
use crate::CodecError;

/// A finalized, immutable field mapping.
///
/// Descriptors are copied into the snapshot at build time, so a message
/// serializes without access to the registry that shaped it. Field entries
/// are held in ascending field-number order across the combined
/// intrinsic+extension space; serialization emits them in exactly that order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    entries: Vec<(FieldDescriptor, FieldValue)>,
}

impl Message {
    /// Decodes `input` into a frozen message in one step.
    ///
    /// Unknown field numbers are skipped; any wire error aborts the parse.
    pub fn parse(input: &[u8], registry: &FieldRegistry) -> Result<Self, CodecError> {
        let mut builder = MessageBuilder::new(registry);
        builder.merge_from_slice(input)?;
        Ok(builder.build())
    }

    pub(crate) fn from_entries(entries: Vec<(FieldDescriptor, FieldValue)>) -> Self {
        Self { entries }
    }

    /// The value of field `number`, if present.
    pub fn field(&self, number: FieldNumber) -> Option<&FieldValue> {
        self.entries
            .binary_search_by_key(&number, |(d, _)| d.number)
            .ok()
            .map(|i| &self.entries[i].1)
    }

    /// The descriptor snapshot for field `number`, if present.
    pub fn descriptor(&self, number: FieldNumber) -> Option<&FieldDescriptor> {
        self.entries
            .binary_search_by_key(&number, |(d, _)| d.number)
            .ok()
            .map(|i| &self.entries[i].0)
    }

    /// Iterates entries in ascending field-number order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldDescriptor, &FieldValue)> {
        self.entries.iter().map(|(d, v)| (d, v))
    }

    /// Number of fields carrying a value.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact length of [`Message::to_bytes`] in bytes.
    pub fn serialized_size(&self) -> usize {
        self.entries
            .iter()
            .map(|(descriptor, value)| {
                // Entries were validated against their descriptors when the
                // builder accepted them.
                encoded_field_len(descriptor, value)
                    .expect("frozen entry matches its descriptor")
            })
            .sum()
    }

    /// Serializes the message into a fresh buffer of exactly
    /// [`Message::serialized_size`] bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(self.serialized_size());
        for (descriptor, value) in &self.entries {
            writer
                .write_field(descriptor, value)
                .expect("frozen entry matches its descriptor");
        }
        writer.into_bytes()
    }

    /// Streams the serialized bytes to `sink`.
    pub fn write_to<W: io::Write>(&self, sink: &mut W) -> Result<(), CodecError> {
        sink.write_all(&self.to_bytes())?;
        Ok(())
    }
}
