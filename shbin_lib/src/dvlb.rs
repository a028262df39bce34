//! The outer `.shbin` container listing each embedded [Dvle](crate::dvle) shader unit.
use binrw::BinRead;
use log::debug;

use crate::buffer::{ByteBuffer, FixedSize};
use crate::error::ReadShbinError;

/// The fixed portion of the container header.
/// The offset table with one absolute `u32` per unit follows immediately.
#[derive(Debug, BinRead, PartialEq, Eq)]
#[br(magic(b"DVLB"))]
pub struct DvlbHeader {
    pub dvle_count: u32,
}

impl FixedSize for DvlbHeader {
    const SIZE: u64 = 8;
}

/// Read the absolute start offset of each shader unit in file order.
pub fn read_dvle_offsets(buffer: &ByteBuffer) -> Result<Vec<u32>, ReadShbinError> {
    let header: DvlbHeader = buffer.read_type(0).map_err(|e| match e {
        ReadShbinError::Binrw(binrw::Error::BadMagic { .. }) => ReadShbinError::Format {
            magic: read_magic(buffer),
        },
        e => e,
    })?;
    debug!("DVLB with {} shader units", header.dvle_count);

    // Check the whole table before allocating anything based on the count.
    let table_offset = DvlbHeader::SIZE;
    buffer.range(table_offset, header.dvle_count as u64 * 4)?;

    (0..header.dvle_count as u64)
        .map(|i| buffer.read_u32(table_offset + i * 4).map_err(Into::into))
        .collect()
}

fn read_magic(buffer: &ByteBuffer) -> [u8; 4] {
    let mut magic = [0u8; 4];
    for (i, b) in magic.iter_mut().enumerate() {
        *b = buffer.read_u8(i as u64).unwrap_or_default();
    }
    magic
}
