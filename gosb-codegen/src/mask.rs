//! Required-field bitmask layout.
//!
//! Required fields are numbered from 1 in declaration order. Index `i` lives
//! in byte `i / 8` at bit `i % 8`; bit 0 of the first byte is never used.

use gosb_core::Record;
use indexmap::IndexMap;

const BITS_IN_BYTE: usize = 8;

/// Position of one required field inside the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskBit {
    pub byte: usize,
    pub value: u8,
}

impl MaskBit {
    pub fn for_index(index: usize) -> Self {
        Self {
            byte: index / BITS_IN_BYTE,
            value: 1 << (index % BITS_IN_BYTE),
        }
    }

    /// Go hex literal of the bit value, e.g. `0x2`.
    pub fn literal(&self) -> String {
        format!("{:#x}", self.value)
    }
}

/// Mask indices of a record's required fields, keyed by field position.
#[derive(Debug, Clone, Default)]
pub struct RequiredFields {
    indices: IndexMap<usize, usize>,
}

impl RequiredFields {
    pub fn of(record: &Record) -> Self {
        let indices = record
            .fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.required)
            .enumerate()
            .map(|(i, (position, _))| (position, i + 1))
            .collect();
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Mask index of the field at `position`, if it is required.
    pub fn index_of(&self, position: usize) -> Option<usize> {
        self.indices.get(&position).copied()
    }

    pub fn bit_of(&self, position: usize) -> Option<MaskBit> {
        self.index_of(position).map(MaskBit::for_index)
    }

    /// `(field position, mask index)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.indices.iter().map(|(&position, &index)| (position, index))
    }

    /// Number of bytes in the mask.
    pub fn mask_len(&self) -> usize {
        self.len() / BITS_IN_BYTE + 1
    }

    /// Initial mask with the bit of every required field set.
    pub fn initial_mask(&self) -> Vec<u8> {
        let mut mask = vec![0u8; self.mask_len()];
        for (_, index) in self.iter() {
            let bit = MaskBit::for_index(index);
            mask[bit.byte] |= bit.value;
        }
        mask
    }

    /// Go literal of the initial mask, e.g. `[]byte{0xfe, 0x1}`.
    pub fn initial_mask_literal(&self) -> String {
        let bytes: Vec<String> = self
            .initial_mask()
            .iter()
            .map(|b| format!("{b:#x}"))
            .collect();
        format!("[]byte{{{}}}", bytes.join(", "))
    }
}
