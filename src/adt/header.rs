// ABOUTME: Fixed-size ADT node and property header definitions
// ABOUTME: Handles the 8-byte node header and 36-byte property header layouts

use super::cursor::Cursor;
use super::error::AdtError;
use alloc::{borrow::Cow, string::String};

/// Node header: property count followed by child count (8 bytes total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHeader {
    /// Number of property records that follow the header
    pub nr_props: u32,
    /// Number of child nodes that follow the properties
    pub nr_children: u32,
}

impl NodeHeader {
    /// Header size in bytes
    pub const SIZE: usize = 8;

    /// Read a node header and advance past it
    pub fn read(cursor: &mut Cursor<'_>) -> Result<Self, AdtError> {
        let nr_props = cursor.read_u32_le()?;
        let nr_children = cursor.read_u32_le()?;
        Ok(NodeHeader {
            nr_props,
            nr_children,
        })
    }
}

/// Width of the NUL-padded property name field
pub const PROP_NAME_LEN: usize = 32;

/// Property header: fixed-width name field followed by the length word (36 bytes total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyHeader {
    /// Raw NUL-padded name field
    pub name: [u8; PROP_NAME_LEN],
    /// Length word exactly as stored, including the flag byte
    pub raw_length: u32,
}

impl PropertyHeader {
    /// Width of the name field
    pub const NAME_LEN: usize = PROP_NAME_LEN;

    /// Header size in bytes
    pub const SIZE: usize = Self::NAME_LEN + 4;

    /// Bits of the length word that carry the payload length
    pub const LENGTH_MASK: u32 = 0x00ff_ffff;

    /// Read a property header and advance past it
    pub fn read(cursor: &mut Cursor<'_>) -> Result<Self, AdtError> {
        let name = cursor.read_array::<PROP_NAME_LEN>()?;
        let raw_length = cursor.read_u32_le()?;
        Ok(PropertyHeader { name, raw_length })
    }

    /// Payload length with the flag byte masked off
    pub fn length(&self) -> usize {
        (self.raw_length & Self::LENGTH_MASK) as usize
    }

    /// Reserved top byte of the length word
    pub fn flags(&self) -> u8 {
        (self.raw_length >> 24) as u8
    }

    /// Name bytes up to the first NUL, or all 32 if the field is full
    pub fn name_bytes(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(Self::NAME_LEN);
        &self.name[..end]
    }

    /// Display form of the name field
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name_bytes())
    }
}
