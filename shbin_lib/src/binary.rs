//! Loading, editing and saving complete `.shbin` files.
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::buffer::ByteBuffer;
use crate::dvlb::read_dvle_offsets;
use crate::dvle::{read_shader_unit, ShaderUnit};
use crate::error::{OutOfRangeError, ReadShbinError, UpdateValueError};
use crate::snapshot::Snapshot;
use crate::uniform::{UniformConstant, UniformKind};
use crate::validate::ValidationIssue;

/// A `.shbin` file with its parsed shader units.
///
/// The file bytes are kept as is and only constant payloads are ever modified.
/// Writing without any edits produces the original file.
#[derive(Debug, Clone)]
pub struct ShaderBinary {
    buffer: ByteBuffer,
    units: Vec<ShaderUnit>,
    file_name: Option<String>,
}

impl ShaderBinary {
    /// Parse all shader units from `bytes`.
    pub fn from_bytes<T: Into<Vec<u8>>>(bytes: T) -> Result<Self, ReadShbinError> {
        let buffer = ByteBuffer::new(bytes.into());

        let units = read_dvle_offsets(&buffer)?
            .into_iter()
            .enumerate()
            .map(|(i, offset)| read_shader_unit(&buffer, i, offset as u64))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Parsed {} shader units", units.len());

        Ok(Self {
            buffer,
            units,
            file_name: None,
        })
    }

    /// Read and parse the file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadShbinError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;

        let mut binary = Self::from_bytes(bytes)?;
        binary.file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(binary)
    }

    /// The file name if this was loaded with [ShaderBinary::from_file].
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn units(&self) -> &[ShaderUnit] {
        &self.units
    }

    /// The uniforms for the unit at `unit` in table order.
    pub fn uniforms(&self, unit: usize) -> Option<&[UniformConstant]> {
        self.units.get(unit).map(|u| u.constants.as_slice())
    }

    /// Replace the values of the constant at `position` in the constant table of unit `unit`.
    ///
    /// Values are masked to the bits stored on disk for the constant's type:
    /// the low 24 bits for each float, a byte for each integer component,
    /// and only the first byte for bools.
    /// Only the payload bytes for this constant are written.
    pub fn update_value(
        &mut self,
        unit: usize,
        position: usize,
        raw_values: [u32; 4],
    ) -> Result<(), UpdateValueError> {
        let constant = self
            .units
            .get_mut(unit)
            .ok_or(UpdateValueError::UnitIndex(unit))?
            .constants
            .iter_mut()
            .find(|c| c.position == position)
            .ok_or(UpdateValueError::ConstantPosition { unit, position })?;

        let values = constant.kind.mask(raw_values);
        write_payload(&mut self.buffer, constant.kind, constant.payload_offset, values)?;
        constant.raw_values = values;

        Ok(())
    }

    /// Parse `text` for each component based on the constant's type and update the values.
    ///
    /// Nothing is modified if any component fails to parse.
    pub fn update_value_text(
        &mut self,
        unit: usize,
        position: usize,
        text: [&str; 4],
    ) -> Result<(), UpdateValueError> {
        let kind = self
            .units
            .get(unit)
            .ok_or(UpdateValueError::UnitIndex(unit))?
            .constant(position)
            .ok_or(UpdateValueError::ConstantPosition { unit, position })?
            .kind;

        let values = kind.parse_values(text)?;
        self.update_value(unit, position, values)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// The full file with any modified payloads.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.as_bytes().to_vec()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_bytes()
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.buffer.as_bytes())
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, self.buffer.as_bytes())
    }

    /// Decoded uniforms for all units.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.file_name.as_deref().unwrap_or_default(), &self.units)
    }

    /// Check all units for layouts where names or arrays may be incorrect.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        self.units.iter().flat_map(|u| u.validate()).collect()
    }
}

fn write_payload(
    buffer: &mut ByteBuffer,
    kind: UniformKind,
    offset: u64,
    values: [u32; 4],
) -> Result<(), OutOfRangeError> {
    match kind {
        UniformKind::FloatVec4 => {
            // Check the full payload first to avoid partial writes.
            buffer.range(offset, 16)?;
            for (i, value) in values.into_iter().enumerate() {
                buffer.write_u32(offset + i as u64 * 4, value)?;
            }
            Ok(())
        }
        UniformKind::IntVec => buffer.write_bytes(offset, &values.map(|v| v as u8)),
        UniformKind::Bool => buffer.write_u8(offset, values[0] as u8),
    }
}
