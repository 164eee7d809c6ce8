// ABOUTME: ADT property records, payload decoding and text/binary classification
// ABOUTME: Renders payloads as escaped text or a lowercase hex dump

use super::cursor::{ADT_ALIGNMENT, Cursor, aligned_len};
use super::error::AdtError;
use super::header::PropertyHeader;
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt::{self, Write};

/// How a property payload is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyEncoding {
    /// One or more NUL-terminated printable strings
    Text,
    /// Opaque bytes, rendered as hex
    Binary,
}

/// Device tree property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name, truncated at the first NUL of the 32-byte name field
    pub name: String,
    /// Reserved top byte of the on-disk length word
    pub flags: u8,
    /// Payload bytes, without alignment padding
    pub data: Vec<u8>,
}

impl Property {
    /// Flag bit Apple firmware sets on template properties
    pub const PLACEHOLDER_FLAG: u8 = 0x80;

    /// Create a property with no flags set
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            flags: 0,
            data: data.into(),
        }
    }

    /// Whether the payload is a placeholder for firmware to fill in
    pub fn is_placeholder(&self) -> bool {
        self.flags & Self::PLACEHOLDER_FLAG != 0
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes this record occupies on disk, including header and padding
    pub fn encoded_len(&self) -> usize {
        PropertyHeader::SIZE + aligned_len(self.data.len())
    }

    /// Rendering mode chosen by [`is_ascii`]
    pub fn encoding(&self) -> PropertyEncoding {
        if is_ascii(&self.data) {
            PropertyEncoding::Text
        } else {
            PropertyEncoding::Binary
        }
    }

    /// Displayable form of the payload, as it appears in JSON output
    pub fn value_display(&self) -> PropertyDisplay<'_> {
        PropertyDisplay {
            data: &self.data,
            encoding: self.encoding(),
        }
    }

    /// Rendered payload string
    pub fn rendered(&self) -> String {
        self.value_display().to_string()
    }
}

/// Decode one property record: header, payload, then padding up to 4 bytes.
///
/// The cursor is left at the start of the next structure.
pub fn parse_property(cursor: &mut Cursor<'_>) -> Result<Property, AdtError> {
    let start = cursor.offset();
    let header = PropertyHeader::read(cursor)?;
    let data = cursor.read(header.length())?;
    cursor.align_to(ADT_ALIGNMENT)?;

    log::trace!(
        "property '{}' at {:#x}: {} bytes, flags {:#04x}",
        header.name_lossy(),
        start,
        data.len(),
        header.flags()
    );

    Ok(Property {
        name: header.name_lossy().into_owned(),
        flags: header.flags(),
        data: data.to_vec(),
    })
}

/// Heuristic deciding whether a payload looks like NUL-terminated text.
///
/// High-bit and control bytes make it binary. A NUL is only accepted right
/// after a non-NUL byte, so a leading NUL or a run of NULs means binary.
/// An empty payload counts as text.
pub fn is_ascii(data: &[u8]) -> bool {
    let mut last = 0u8;
    for &byte in data {
        if byte & 0x80 != 0 {
            return false;
        }
        if byte != 0 && byte < 0x20 {
            return false;
        }
        if byte == 0 && last == 0 {
            return false;
        }
        last = byte;
    }
    true
}

/// Writes a payload as text (NUL shown as `<0>`) or as space-separated hex
#[derive(Debug, Clone, Copy)]
pub struct PropertyDisplay<'a> {
    data: &'a [u8],
    encoding: PropertyEncoding,
}

impl fmt::Display for PropertyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encoding {
            PropertyEncoding::Text => write_text(f, self.data),
            PropertyEncoding::Binary => write_hex(f, self.data),
        }
    }
}

fn write_text(f: &mut impl Write, data: &[u8]) -> fmt::Result {
    for &byte in data {
        if byte == 0 {
            f.write_str("<0>")?;
        } else {
            f.write_char(char::from(byte))?;
        }
    }
    Ok(())
}

fn write_hex(f: &mut impl Write, data: &[u8]) -> fmt::Result {
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{byte:02x}")?;
    }
    Ok(())
}
