use thiserror::Error;

/// A read or write would touch bytes outside the owned buffer.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[error("{size} bytes at {offset:#x} are outside the buffer of length {len:#x}")]
pub struct OutOfRangeError {
    pub offset: u64,
    pub size: u64,
    pub len: u64,
}

#[derive(Debug, Error)]
pub enum ReadShbinError {
    #[error("expected DVLB magic but found {magic:?}")]
    Format { magic: [u8; 4] },

    #[error("offset out of range")]
    OutOfRange(#[from] OutOfRangeError),

    #[error("error reading constant table entry at {offset:#x}")]
    ConstantEntry {
        offset: u64,
        #[source]
        source: binrw::Error,
    },

    #[error("error reading data")]
    Binrw(#[from] binrw::Error),

    #[error("error reading file")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum UpdateValueError {
    #[error("shader unit {0} does not exist")]
    UnitIndex(usize),

    #[error("shader unit {unit} has no constant at position {position}")]
    ConstantPosition { unit: usize, position: usize },

    #[error("error parsing replacement value")]
    Parse(#[from] ParseValueError),

    #[error("constant payload out of range")]
    OutOfRange(#[from] OutOfRangeError),
}

/// Replacement text that can't be converted to the constant's type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseValueError {
    #[error("component {component} value {text:?} is not a valid float")]
    Float {
        component: usize,
        text: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("component {component} value {text:?} is not an integer in 0..=255")]
    Int {
        component: usize,
        text: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Error)]
pub enum SaveSnapshotError {
    #[error("error writing files")]
    Io(#[from] std::io::Error),

    #[error("error serializing JSON file")]
    Json(#[from] serde_json::Error),
}
