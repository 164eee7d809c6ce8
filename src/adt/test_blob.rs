// ABOUTME: Test-only assembler for synthetic ADT buffers
// ABOUTME: Emits node and property records in depth-first on-disk order

use super::cursor::calculate_padding;
use super::header::PropertyHeader;
use alloc::vec::Vec;

/// Appends records in the order they appear on disk; the caller is
/// responsible for matching counts to what follows.
#[derive(Debug, Default)]
pub struct BlobBuilder {
    bytes: Vec<u8>,
}

impl BlobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, nr_props: u32, nr_children: u32) -> Self {
        self.bytes.extend_from_slice(&nr_props.to_le_bytes());
        self.bytes.extend_from_slice(&nr_children.to_le_bytes());
        self
    }

    pub fn property(self, name: &str, data: &[u8]) -> Self {
        let length = u32::try_from(data.len()).expect("test payload too large");
        self.property_raw(name.as_bytes(), length, data)
    }

    /// Property with an explicit length word; padding follows `data.len()`
    pub fn property_raw(mut self, name: &[u8], raw_length: u32, data: &[u8]) -> Self {
        let mut field = [0u8; PropertyHeader::NAME_LEN];
        field[..name.len()].copy_from_slice(name);
        self.bytes.extend_from_slice(&field);
        self.bytes.extend_from_slice(&raw_length.to_le_bytes());
        self.bytes.extend_from_slice(data);
        let padding = calculate_padding(data.len(), 4);
        self.bytes.extend(core::iter::repeat_n(0u8, padding));
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
