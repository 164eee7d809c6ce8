// ABOUTME: Bounds-checked read cursor over an ADT buffer
// ABOUTME: Handles little-endian integer reads and 4-byte alignment skips

use super::error::AdtError;

/// Alignment every ADT structure starts on, relative to the buffer start
pub const ADT_ALIGNMENT: usize = 4;

/// Read-only view over a byte buffer with a current offset.
///
/// Every structured read goes through [`Cursor::read`], which fails with
/// [`AdtError::OutOfBounds`] instead of reading past the end of the buffer.
/// Cursors are `Copy`, so a caller can snapshot a position before a read.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Create a cursor positioned at `offset`
    pub fn at(data: &'a [u8], offset: usize) -> Result<Self, AdtError> {
        if offset > data.len() {
            return Err(AdtError::OutOfBounds {
                offset,
                needed: 0,
                available: data.len(),
            });
        }
        Ok(Self { data, offset })
    }

    /// Current offset from the start of the buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes left after the current offset
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Whether the cursor sits at the end of the buffer
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Return the next `n` bytes and advance past them
    pub fn read(&mut self, n: usize) -> Result<&'a [u8], AdtError> {
        if n > self.remaining() {
            return Err(self.out_of_bounds(n));
        }
        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    /// Read exactly `N` bytes into an array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], AdtError> {
        let bytes = self.read(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read a little-endian u32
    pub fn read_u32_le(&mut self) -> Result<u32, AdtError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Advance to the next multiple of `alignment` relative to the buffer start.
    ///
    /// Filler bytes are consumed without being inspected.
    pub fn align_to(&mut self, alignment: usize) -> Result<(), AdtError> {
        let padding = calculate_padding(self.offset, alignment);
        self.read(padding).map(|_| ())
    }

    fn out_of_bounds(&self, needed: usize) -> AdtError {
        AdtError::OutOfBounds {
            offset: self.offset,
            needed,
            available: self.data.len(),
        }
    }
}

/// Calculate padding needed to bring `offset` up to a multiple of `alignment`
pub fn calculate_padding(offset: usize, alignment: usize) -> usize {
    if alignment == 0 {
        return 0;
    }
    (alignment - (offset % alignment)) % alignment
}

/// Round `len` up to the next multiple of [`ADT_ALIGNMENT`]
pub fn aligned_len(len: usize) -> usize {
    len + calculate_padding(len, ADT_ALIGNMENT)
}
