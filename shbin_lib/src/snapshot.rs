//! Read only, human readable exports of the parsed uniforms.
use std::path::Path;

use serde::Serialize;

use crate::dvle::ShaderUnit;
use crate::error::SaveSnapshotError;
use crate::uniform::{DecodedValues, UniformConstant, UniformKind};

/// The decoded uniforms for every unit in a file.
///
/// The JSON keys match the exports of earlier editing tools.
#[derive(Debug, PartialEq, Serialize)]
pub struct Snapshot {
    #[serde(rename = "filename")]
    pub file_name: String,
    #[serde(rename = "dvles")]
    pub units: Vec<UnitSnapshot>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct UnitSnapshot {
    pub index: usize,
    pub uniforms: Vec<UniformSnapshot>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct UniformSnapshot {
    pub name: String,
    pub id: u8,
    #[serde(rename = "type")]
    pub kind: KindLabel,
    pub values: DecodedValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KindLabel {
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "int/bool")]
    IntBool,
}

impl Snapshot {
    pub fn new(file_name: &str, units: &[ShaderUnit]) -> Self {
        Self {
            file_name: file_name.to_string(),
            units: units
                .iter()
                .map(|unit| UnitSnapshot {
                    index: unit.index,
                    uniforms: unit.constants.iter().map(UniformSnapshot::from).collect(),
                })
                .collect(),
        }
    }

    /// Pretty printed JSON with an indent of 2 spaces.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SaveSnapshotError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl From<&UniformConstant> for UniformSnapshot {
    fn from(constant: &UniformConstant) -> Self {
        Self {
            name: constant.name.clone(),
            id: constant.register_id,
            kind: match constant.kind {
                UniformKind::FloatVec4 => KindLabel::Float,
                UniformKind::Bool | UniformKind::IntVec => KindLabel::IntBool,
            },
            values: constant.decoded_values(),
        }
    }
}
