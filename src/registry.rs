//! Field descriptor tables.
//!
//! A [`FieldRegistry`] is the explicit schema handed to every decode and
//! encode call: a flat table keyed by field number holding the kind,
//! cardinality and packed hint of each known field. Intrinsic fields (the
//! message's own) and extension fields (registered later, from outside the
//! base schema) live in separate tables but share one field-number space and
//! one wire format; lookups search the union.
//!
//! Registries carry no interior synchronization. Register all extensions
//! before sharing a registry across threads.

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use crate::value::ScalarKind;
use crate::CodecError;

/// Identifies a field within a message's combined intrinsic+extension space.
pub type FieldNumber = u32;

/// Largest encodable field number: 2^29 - 1.
pub const MAX_FIELD_NUMBER: FieldNumber = (1 << 29) - 1;

/// First field number of the range reserved by the wire format.
pub const FIRST_RESERVED_FIELD_NUMBER: FieldNumber = 19_000;

/// Last field number of the reserved range.
pub const LAST_RESERVED_FIELD_NUMBER: FieldNumber = 19_999;

/// Whether a field holds one value or an ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Cardinality {
    Singular,
    Repeated,
}

/// Static description of one field: everything the codec needs to encode or
/// decode it.
///
/// `packed` only affects how repeated fields are *emitted* (one
/// length-delimited block vs. one tag per element); decoding accepts both
/// representations for any repeated field regardless of the hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct FieldDescriptor {
    pub number: FieldNumber,
    pub kind: ScalarKind,
    pub cardinality: Cardinality,
    pub packed: bool,
}

impl FieldDescriptor {
    /// A singular field of the given kind.
    pub const fn singular(number: FieldNumber, kind: ScalarKind) -> Self {
        Self {
            number,
            kind,
            cardinality: Cardinality::Singular,
            packed: false,
        }
    }

    /// A repeated field emitted as one tag+value pair per element.
    pub const fn repeated(number: FieldNumber, kind: ScalarKind) -> Self {
        Self {
            number,
            kind,
            cardinality: Cardinality::Repeated,
            packed: false,
        }
    }

    /// A repeated field emitted as a single length-delimited block.
    pub const fn packed(number: FieldNumber, kind: ScalarKind) -> Self {
        Self {
            number,
            kind,
            cardinality: Cardinality::Repeated,
            packed: true,
        }
    }
}

/// Lookup table mapping field numbers to descriptors.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    intrinsic: BTreeMap<FieldNumber, FieldDescriptor>,
    extensions: BTreeMap<FieldNumber, FieldDescriptor>,
}

impl FieldRegistry {
    /// Builds a registry from a message's own field descriptors.
    ///
    /// Rejects invalid field numbers (zero, above [`MAX_FIELD_NUMBER`], or in
    /// the reserved 19000-19999 range) and duplicate numbers.
    pub fn new(intrinsic: impl IntoIterator<Item = FieldDescriptor>) -> Result<Self, CodecError> {
        let mut registry = Self::default();
        for descriptor in intrinsic {
            validate_field_number(descriptor.number)?;
            if registry.intrinsic.contains_key(&descriptor.number) {
                return Err(CodecError::DuplicateFieldNumber(descriptor.number));
            }
            registry.intrinsic.insert(descriptor.number, descriptor);
        }
        Ok(registry)
    }

    /// Adds an extension descriptor to the table.
    ///
    /// Extensions share the field-number space with intrinsic fields, so a
    /// collision with either table is [`CodecError::DuplicateFieldNumber`].
    pub fn register_extension(&mut self, descriptor: FieldDescriptor) -> Result<(), CodecError> {
        validate_field_number(descriptor.number)?;
        if self.intrinsic.contains_key(&descriptor.number)
            || self.extensions.contains_key(&descriptor.number)
        {
            return Err(CodecError::DuplicateFieldNumber(descriptor.number));
        }
        self.extensions.insert(descriptor.number, descriptor);
        Ok(())
    }

    /// Registers a whole table of extensions, stopping at the first error.
    pub fn register_extensions(
        &mut self,
        descriptors: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<(), CodecError> {
        for descriptor in descriptors {
            self.register_extension(descriptor)?;
        }
        Ok(())
    }

    /// Finds the descriptor for `number` across intrinsic and extension
    /// tables. `None` means the field is unknown and should be skipped on
    /// decode.
    pub fn lookup(&self, number: FieldNumber) -> Option<&FieldDescriptor> {
        self.intrinsic
            .get(&number)
            .or_else(|| self.extensions.get(&number))
    }

    /// Whether `number` names a registered extension (as opposed to an
    /// intrinsic field or an unknown number).
    pub fn is_extension(&self, number: FieldNumber) -> bool {
        self.extensions.contains_key(&number)
    }

    /// All known descriptors in ascending field-number order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        // Both maps are ordered; a merge keeps the union ordered.
        let mut merged: Vec<&FieldDescriptor> = self
            .intrinsic
            .values()
            .chain(self.extensions.values())
            .collect();
        merged.sort_by_key(|d| d.number);
        merged.into_iter()
    }

    /// Number of registered fields, intrinsic plus extensions.
    pub fn len(&self) -> usize {
        self.intrinsic.len() + self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intrinsic.is_empty() && self.extensions.is_empty()
    }
}

fn validate_field_number(number: FieldNumber) -> Result<(), CodecError> {
    if number == 0 || number > MAX_FIELD_NUMBER {
        return Err(CodecError::InvalidFieldNumber(number));
    }
    if (FIRST_RESERVED_FIELD_NUMBER..=LAST_RESERVED_FIELD_NUMBER).contains(&number) {
        return Err(CodecError::InvalidFieldNumber(number));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FieldRegistry {
        FieldRegistry::new([
            FieldDescriptor::singular(1, ScalarKind::Int32),
            FieldDescriptor::repeated(2, ScalarKind::Uint64),
        ])
        .unwrap()
    }

    #[test]
    fn lookup_spans_both_tables() {
        let mut registry = base();
        registry
            .register_extension(FieldDescriptor::packed(100, ScalarKind::Sint32))
            .unwrap();

        assert_eq!(registry.lookup(1).unwrap().kind, ScalarKind::Int32);
        assert_eq!(registry.lookup(100).unwrap().kind, ScalarKind::Sint32);
        assert!(registry.lookup(3).is_none());
        assert!(registry.is_extension(100));
        assert!(!registry.is_extension(1));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_numbers_rejected() {
        let mut registry = base();
        let err = registry
            .register_extension(FieldDescriptor::singular(1, ScalarKind::Bool))
            .unwrap_err();
        assert!(matches!(err, CodecError::DuplicateFieldNumber(1)));

        let err = registry
            .register_extensions([
                FieldDescriptor::singular(50, ScalarKind::Bool),
                FieldDescriptor::singular(50, ScalarKind::Bool),
            ])
            .unwrap_err();
        assert!(matches!(err, CodecError::DuplicateFieldNumber(50)));

        let err = FieldRegistry::new([
            FieldDescriptor::singular(7, ScalarKind::Bool),
            FieldDescriptor::repeated(7, ScalarKind::Bool),
        ])
        .unwrap_err();
        assert!(matches!(err, CodecError::DuplicateFieldNumber(7)));
    }

    #[test]
    fn reserved_and_out_of_range_numbers_rejected() {
        for number in [0, 19_000, 19_500, 19_999, MAX_FIELD_NUMBER + 1] {
            let err = FieldRegistry::new([FieldDescriptor::singular(number, ScalarKind::Int32)])
                .unwrap_err();
            assert!(matches!(err, CodecError::InvalidFieldNumber(n) if n == number));
        }

        // Numbers flanking the reserved range are fine.
        FieldRegistry::new([
            FieldDescriptor::singular(18_999, ScalarKind::Int32),
            FieldDescriptor::singular(20_000, ScalarKind::Int32),
            FieldDescriptor::singular(MAX_FIELD_NUMBER, ScalarKind::Int32),
        ])
        .unwrap();
    }

    #[test]
    fn iteration_is_ascending_across_tables() {
        let mut registry = base();
        registry
            .register_extensions([
                FieldDescriptor::singular(10, ScalarKind::Bool),
                FieldDescriptor::singular(5, ScalarKind::Bool),
            ])
            .unwrap();

        let numbers: Vec<_> = registry.iter().map(|d| d.number).collect();
        assert_eq!(numbers, [1, 2, 5, 10]);
    }

    #[test]
    fn failed_registration_leaves_table_intact() {
        let mut registry = base();
        let before = registry.len();
        registry
            .register_extension(FieldDescriptor::singular(19_001, ScalarKind::Int32))
            .unwrap_err();
        assert_eq!(registry.len(), before);
    }
}
