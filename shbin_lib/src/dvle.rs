//! A single compiled shader unit embedded in a [Dvlb](crate::dvlb) container.
//!
//! Only the tables needed to find and name uniform constants are parsed.
//! Names come from the input register table and are assigned by position,
//! so the i-th constant receives the i-th name.
//! Nothing in the tables links the two, so use [ShaderUnit::validate] to detect
//! units where the table lengths disagree.
use binrw::BinRead;
use log::{debug, warn};

use crate::buffer::{ByteBuffer, FixedSize};
use crate::error::ReadShbinError;
use crate::uniform::{array_runs, group_arrays, UniformConstant, UniformKind};
use crate::validate::ValidationIssue;

/// Table locations relative to the start of the unit.
#[derive(Debug, BinRead, PartialEq, Eq)]
pub struct DvleHeader {
    #[br(pad_before = 0x18)]
    pub constant_table_offset: u32,
    pub constant_table_count: u32,

    #[br(pad_before = 0x10)]
    pub input_register_table_offset: u32,
    pub input_register_table_count: u32,
    pub symbol_table_offset: u32,
}

impl FixedSize for DvleHeader {
    const SIZE: u64 = 0x3C;
}

#[derive(Debug, BinRead, PartialEq, Eq)]
pub struct ConstantEntry {
    pub kind: UniformKind,
    pub unk1: u8,
    pub id: u8,
    pub len: u8,
    /// Raw payload words. The meaning depends on [kind](#structfield.kind).
    pub payload: [u32; 4],
}

impl FixedSize for ConstantEntry {
    const SIZE: u64 = 20;
}

impl ConstantEntry {
    /// The meaningful payload slots for this entry's type.
    pub fn raw_values(&self) -> [u32; 4] {
        match self.kind {
            UniformKind::FloatVec4 => self.payload,
            UniformKind::IntVec => self.payload[0].to_le_bytes().map(u32::from),
            UniformKind::Bool => [self.payload[0] & 0xFF, 0, 0, 0],
        }
    }
}

#[derive(Debug, BinRead, PartialEq, Eq)]
pub struct InputRegisterEntry {
    /// Offset relative to the start of the symbol table.
    pub name_offset: u32,
    pub register_start: u16,
    pub register_end: u16,
}

impl FixedSize for InputRegisterEntry {
    const SIZE: u64 = 8;
}

/// An input register entry with its name and absolute offsets for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRegister {
    /// The absolute offset of the table entry.
    pub entry_offset: u64,
    pub name_offset: u32,
    pub register_start: u16,
    pub register_end: u16,
    /// The absolute offset of the name string.
    pub string_offset: u64,
    pub name: String,
}

/// A parsed shader unit.
///
/// Offsets and types are fixed after parsing.
/// Only the raw values of constants change when editing.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderUnit {
    /// The position of this unit in the container's offset table.
    pub index: usize,
    /// The absolute offset where the unit starts.
    pub base_offset: u64,
    /// Every constant table entry in table order.
    pub constants: Vec<UniformConstant>,
    pub input_registers: Vec<InputRegister>,
}

impl ShaderUnit {
    /// Find the constant at `position` in the constant table.
    pub fn constant(&self, position: usize) -> Option<&UniformConstant> {
        self.constants.iter().find(|c| c.position == position)
    }

    /// Check assumptions about the layout that parsing can't verify.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.constants.len() != self.input_registers.len() {
            issues.push(ValidationIssue::NameTableLengthMismatch {
                unit: self.index,
                constants: self.constants.len(),
                input_registers: self.input_registers.len(),
            });
        }

        issues.extend(
            array_runs(&self.constants)
                .into_iter()
                .filter(|run| run.is_truncated())
                .map(|run| ValidationIssue::TruncatedArray {
                    unit: self.index,
                    position: run.start,
                    declared_length: run.declared_length,
                    available: run.len,
                }),
        );

        issues
    }
}

/// Parse the unit starting at the absolute offset `base_offset`.
pub fn read_shader_unit(
    buffer: &ByteBuffer,
    index: usize,
    base_offset: u64,
) -> Result<ShaderUnit, ReadShbinError> {
    let header: DvleHeader = buffer.read_type(base_offset)?;
    debug!("DVLE {index} at {base_offset:#x}: {header:?}");

    let mut constants = read_constants(buffer, base_offset, &header)?;
    let input_registers = read_input_registers(buffer, base_offset, &header)?;

    if input_registers.len() != constants.len() {
        warn!(
            "DVLE {index} has {} constants but {} input register names. Names may not match.",
            constants.len(),
            input_registers.len()
        );
    }

    // Extra constants keep an empty name.
    for (constant, register) in constants.iter_mut().zip(&input_registers) {
        constant.name = register.name.clone();
    }

    group_arrays(&mut constants);

    Ok(ShaderUnit {
        index,
        base_offset,
        constants,
        input_registers,
    })
}

fn read_constants(
    buffer: &ByteBuffer,
    base_offset: u64,
    header: &DvleHeader,
) -> Result<Vec<UniformConstant>, ReadShbinError> {
    let table_offset = base_offset + header.constant_table_offset as u64;
    let count = header.constant_table_count as u64;
    buffer.range(table_offset, count * ConstantEntry::SIZE)?;

    (0..count)
        .map(|i| {
            let entry_offset = table_offset + i * ConstantEntry::SIZE;
            let entry: ConstantEntry = buffer.read_type(entry_offset).map_err(|e| match e {
                ReadShbinError::Binrw(source) => ReadShbinError::ConstantEntry {
                    offset: entry_offset,
                    source,
                },
                e => e,
            })?;

            Ok(UniformConstant {
                position: i as usize,
                kind: entry.kind,
                register_id: entry.id,
                declared_length: entry.len,
                entry_offset,
                payload_offset: entry_offset + 4,
                raw_values: entry.raw_values(),
                name: String::new(),
                array_index: None,
            })
        })
        .collect()
}

fn read_input_registers(
    buffer: &ByteBuffer,
    base_offset: u64,
    header: &DvleHeader,
) -> Result<Vec<InputRegister>, ReadShbinError> {
    let table_offset = base_offset + header.input_register_table_offset as u64;
    let symbol_table_offset = base_offset + header.symbol_table_offset as u64;
    let count = header.input_register_table_count as u64;
    buffer.range(table_offset, count * InputRegisterEntry::SIZE)?;

    (0..count)
        .map(|i| {
            let entry_offset = table_offset + i * InputRegisterEntry::SIZE;
            let entry: InputRegisterEntry = buffer.read_type(entry_offset)?;

            let string_offset = symbol_table_offset + entry.name_offset as u64;
            let name = buffer.read_c_string(string_offset)?;

            Ok(InputRegister {
                entry_offset,
                name_offset: entry.name_offset,
                register_start: entry.register_start,
                register_end: entry.register_end,
                string_offset,
                name,
            })
        })
        .collect()
}
