//! Named uniform constants resolved from a shader unit's constant table.
use binrw::BinRead;
use log::warn;
use serde::Serialize;

use crate::error::ParseValueError;
use crate::float24::{f24_to_f32, f64_to_f24};

/// The type byte of a constant table entry.
#[derive(Debug, BinRead, Clone, Copy, PartialEq, Eq, Hash)]
#[br(repr(u8))]
pub enum UniformKind {
    /// A single byte stored in the first payload slot.
    Bool = 0,
    /// Four bytes stored in the first payload word.
    IntVec = 1,
    /// Four 24-bit floats stored in the low bits of each payload word.
    FloatVec4 = 2,
}

impl UniformKind {
    /// Clear the bits of `values` that are not stored on disk for this kind.
    pub fn mask(self, values: [u32; 4]) -> [u32; 4] {
        match self {
            UniformKind::Bool => [values[0] & 0xFF, 0, 0, 0],
            UniformKind::IntVec => values.map(|v| v & 0xFF),
            UniformKind::FloatVec4 => values.map(|v| v & 0xFFFFFF),
        }
    }

    /// Convert user supplied text for each component to raw values for this kind.
    ///
    /// Float components are encoded with [f64_to_f24],
    /// so finite text outside the `f32` range is stored as `0`.
    /// Integer components must fit in a byte.
    pub fn parse_values(self, text: [&str; 4]) -> Result<[u32; 4], ParseValueError> {
        let mut values = [0u32; 4];
        for (component, (value, text)) in values.iter_mut().zip(text).enumerate() {
            let text = text.trim();
            *value = match self {
                UniformKind::FloatVec4 => text
                    .parse::<f64>()
                    .map(f64_to_f24)
                    .map_err(|source| ParseValueError::Float {
                        component,
                        text: text.to_string(),
                        source,
                    })?,
                UniformKind::Bool | UniformKind::IntVec => text
                    .parse::<u8>()
                    .map(u32::from)
                    .map_err(|source| ParseValueError::Int {
                        component,
                        text: text.to_string(),
                        source,
                    })?,
            };
        }
        Ok(values)
    }
}

/// A single constant table entry with its resolved name.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformConstant {
    /// The index in the unit's constant table.
    pub position: usize,
    pub kind: UniformKind,
    /// The raw register id byte. This is not guaranteed to be unique.
    pub register_id: u8,
    /// The number of table entries used by this constant. Larger than 1 for array heads.
    pub declared_length: u8,
    /// The absolute offset of the table entry.
    pub entry_offset: u64,
    /// The absolute offset of the 16 byte payload.
    pub payload_offset: u64,
    /// The payload with only the slots used by [kind](#structfield.kind) filled in.
    pub raw_values: [u32; 4],
    /// The resolved name or an empty string if there was no name for this position.
    pub name: String,
    /// The element index for members of an array uniform.
    pub array_index: Option<usize>,
}

/// Human readable uniform values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedValues {
    Float([f32; 4]),
    Int([u32; 4]),
}

impl UniformConstant {
    /// The name or a placeholder using the register id like `Unknown_ID_0A` if there is no name.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("Unknown_ID_{:02X}", self.register_id)
        } else {
            self.name.clone()
        }
    }

    pub fn decoded_values(&self) -> DecodedValues {
        match self.kind {
            UniformKind::FloatVec4 => DecodedValues::Float(self.raw_values.map(f24_to_f32)),
            UniformKind::Bool | UniformKind::IntVec => DecodedValues::Int(self.raw_values),
        }
    }

    /// A short summary of the values like `(1.00, ...)` or `[1, 0, 0, 0]`.
    pub fn preview(&self) -> String {
        match self.decoded_values() {
            DecodedValues::Float(values) => format!("({:.2}, ...)", values[0]),
            DecodedValues::Int(values) => format!("{values:?}"),
        }
    }
}

/// A run of table entries making up a single array uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayRun {
    /// The position of the head entry.
    pub start: usize,
    pub declared_length: u8,
    /// The number of entries actually present in the table.
    pub len: usize,
}

impl ArrayRun {
    pub fn is_truncated(&self) -> bool {
        self.len < self.declared_length as usize
    }
}

/// Find array runs in table order.
///
/// A float constant with a length larger than 1 starts a run covering the following entries.
/// Entries inside a run never start a run themselves.
pub fn array_runs(constants: &[UniformConstant]) -> Vec<ArrayRun> {
    let mut runs = Vec::new();

    let mut i = 0;
    while i < constants.len() {
        let head = &constants[i];
        if head.kind == UniformKind::FloatVec4 && head.declared_length > 1 {
            let len = (head.declared_length as usize).min(constants.len() - i);
            runs.push(ArrayRun {
                start: i,
                declared_length: head.declared_length,
                len,
            });
            i += len;
        } else {
            i += 1;
        }
    }

    runs
}

/// Rename the members of each array run to `base[i]` using the name of the head entry.
///
/// Every member stays in `constants`, so all elements remain visible and editable.
pub fn group_arrays(constants: &mut [UniformConstant]) {
    for run in array_runs(constants) {
        if run.is_truncated() {
            warn!(
                "Array at position {} declares {} entries but only {} are present.",
                run.start, run.declared_length, run.len
            );
        }

        let base = base_name(&constants[run.start].name).to_string();
        for (array_index, member) in constants[run.start..run.start + run.len]
            .iter_mut()
            .enumerate()
        {
            member.name = format!("{base}[{array_index}]");
            member.array_index = Some(array_index);
        }
    }
}

/// Strip any array suffix like `light[0]` -> `light`.
fn base_name(name: &str) -> &str {
    name.find('[').map_or(name, |i| &name[..i])
}
