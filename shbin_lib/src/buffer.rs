//! Bounds checked little-endian access to the owned file bytes.
use std::io::Cursor;
use std::ops::Range;

use binrw::BinRead;
use log::trace;

use crate::error::{OutOfRangeError, ReadShbinError};

/// A binary structure that always occupies the same number of bytes.
pub trait FixedSize {
    const SIZE: u64;
}

/// The owned bytes of a shader binary.
///
/// Every access checks `offset + size` against the buffer length first,
/// so offsets computed from untrusted file contents can never index past the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteBuffer {
    bytes: Vec<u8>,
}

impl ByteBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The byte range for `size` bytes starting at `offset`.
    pub fn range(&self, offset: u64, size: u64) -> Result<Range<usize>, OutOfRangeError> {
        let len = self.bytes.len() as u64;
        match offset.checked_add(size) {
            Some(end) if end <= len => Ok(offset as usize..end as usize),
            _ => Err(OutOfRangeError { offset, size, len }),
        }
    }

    pub fn read_u8(&self, offset: u64) -> Result<u8, OutOfRangeError> {
        let range = self.range(offset, 1)?;
        Ok(self.bytes[range.start])
    }

    pub fn read_u16(&self, offset: u64) -> Result<u16, OutOfRangeError> {
        let mut value = [0u8; 2];
        value.copy_from_slice(&self.bytes[self.range(offset, 2)?]);
        Ok(u16::from_le_bytes(value))
    }

    pub fn read_u32(&self, offset: u64) -> Result<u32, OutOfRangeError> {
        let mut value = [0u8; 4];
        value.copy_from_slice(&self.bytes[self.range(offset, 4)?]);
        Ok(u32::from_le_bytes(value))
    }

    /// Read a null terminated string starting at `offset`.
    ///
    /// The scan stops at the end of the buffer if there is no terminator,
    /// so an `offset` equal to the buffer length returns an empty string.
    /// Only offsets past the end are an error.
    /// Each byte maps to the corresponding Latin-1 character.
    pub fn read_c_string(&self, offset: u64) -> Result<String, OutOfRangeError> {
        let start = self.range(offset, 0)?.start;
        let bytes = &self.bytes[start..];
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        Ok(bytes[..end].iter().map(|b| *b as char).collect())
    }

    /// Read a fixed size structure at an absolute `offset`.
    pub fn read_type<T>(&self, offset: u64) -> Result<T, ReadShbinError>
    where
        T: FixedSize + for<'a> BinRead<Args<'a> = ()>,
    {
        let range = self.range(offset, T::SIZE)?;
        trace!("{}: {:#x}", std::any::type_name::<T>(), offset);

        // The reader only sees the checked bytes for this structure.
        let mut reader = Cursor::new(&self.bytes[range]);
        T::read_le(&mut reader).map_err(Into::into)
    }

    pub fn write_u8(&mut self, offset: u64, value: u8) -> Result<(), OutOfRangeError> {
        self.write_bytes(offset, &[value])
    }

    pub fn write_u32(&mut self, offset: u64, value: u32) -> Result<(), OutOfRangeError> {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    pub fn write_bytes(&mut self, offset: u64, values: &[u8]) -> Result<(), OutOfRangeError> {
        let range = self.range(offset, values.len() as u64)?;
        self.bytes[range].copy_from_slice(values);
        Ok(())
    }
}
